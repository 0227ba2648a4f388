//! Translation listing command.

use super::{request_context, App};
use crate::cli::TranslationsArgs;
use crate::error::Result;
use crate::output::Formatter;
use polyglot_translations::TranslationArgs;

/// Execute the translations command.
pub fn execute_translations(
    args: TranslationsArgs,
    app: &App,
    formatter: &Formatter,
) -> Result<String> {
    let context = request_context(&args.request)?;
    let options = TranslationArgs::new()
        .include_base(args.include_base)
        .strict(args.strict);

    let translations = app.assembler().get_translations(&context, options)?;
    formatter.format_translations(&translations)
}
