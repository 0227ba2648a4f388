//! Negotiator configuration

use crate::NegotiatorError;
use serde::{Deserialize, Serialize};

/// Configuration for language negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Share of the visitor's priority granted when only the bare language
    /// matches (visitor asks for `pt`, site serves `pt-BR`), within `[0, 1]`
    pub language_only_factor: f64,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            language_only_factor: 0.7,
        }
    }
}

impl NegotiationConfig {
    /// Only exact HTTP code matches count
    pub fn exact_only() -> Self {
        Self {
            language_only_factor: 0.0,
        }
    }

    /// A bare language match counts as much as an exact one
    pub fn language_only() -> Self {
        Self {
            language_only_factor: 1.0,
        }
    }

    /// The factor clamped to `[0, 1]`; NaN counts as 0
    pub fn factor(&self) -> f64 {
        if self.language_only_factor.is_nan() {
            0.0
        } else {
            self.language_only_factor.clamp(0.0, 1.0)
        }
    }

    /// Reject factors outside `[0, 1]`
    pub fn validate(&self) -> Result<(), NegotiatorError> {
        if !(0.0..=1.0).contains(&self.language_only_factor) {
            return Err(NegotiatorError::Config(format!(
                "language_only_factor must be within [0, 1], got {}",
                self.language_only_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NegotiationConfig::default();
        assert_eq!(config.factor(), 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(NegotiationConfig::exact_only().factor(), 0.0);
        assert_eq!(NegotiationConfig::language_only().factor(), 1.0);
    }

    #[test]
    fn test_out_of_range_factor() {
        let config = NegotiationConfig {
            language_only_factor: 1.5,
        };
        assert_eq!(config.factor(), 1.0);
        assert!(config.validate().is_err());

        let config = NegotiationConfig {
            language_only_factor: f64::NAN,
        };
        assert_eq!(config.factor(), 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: NegotiationConfig = toml::from_str("language_only_factor = 0.5").unwrap();
        assert_eq!(config.factor(), 0.5);

        let config: NegotiationConfig = toml::from_str("").unwrap();
        assert_eq!(config, NegotiationConfig::default());
    }
}
