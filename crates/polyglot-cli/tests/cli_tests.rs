//! End-to-end tests of the CLI commands against an on-disk database

use clap::Parser;
use polyglot_cli::commands;
use polyglot_cli::config::OutputFormat;
use polyglot_cli::{Cli, CliError, Formatter, NetworkConfig};
use std::path::Path;
use tempfile::TempDir;

fn quiet() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

/// Parse and execute one command line against a fresh `App` on `database`.
fn run(database: &Path, args: &[&str]) -> String {
    let mut argv = vec!["polyglot", "--database"];
    argv.push(database.to_str().unwrap());
    argv.extend_from_slice(args);

    let cli = Cli::try_parse_from(argv).unwrap();
    execute(database, cli).unwrap()
}

fn execute(database: &Path, cli: Cli) -> polyglot_cli::Result<String> {
    commands::execute(
        cli.command,
        NetworkConfig::example(),
        None,
        Some(database),
        &quiet(),
    )
}

#[test]
fn test_relations_persist_between_invocations() {
    let temp_dir = TempDir::new().unwrap();
    let database = temp_dir.path().join("polyglot.db");

    assert_eq!(run(&database, &["sites", "link", "1", "2"]), "1");
    run(&database, &["content", "link", "1", "10", "2", "20"]);

    assert_eq!(run(&database, &["sites", "related", "2"]), "1");
    assert_eq!(run(&database, &["content", "show", "2", "20"]), "1:10\n2:20");
    assert_eq!(
        run(&database, &["translations", "1", "10"]),
        "https://example.com/de/?p=20"
    );
}

#[test]
fn test_negotiation_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let database = temp_dir.path().join("polyglot.db");

    run(&database, &["sites", "link", "1", "2"]);
    run(&database, &["content", "link", "1", "10", "2", "20"]);

    assert_eq!(
        run(&database, &["negotiate", "1", "10", "--accept", "de;q=0.9, en;q=0.2"]),
        "https://example.com/de/?p=20"
    );
    assert_eq!(
        run(&database, &["negotiate", "2", "20", "--accept", "en-US"]),
        "https://example.com/?p=10"
    );
    assert_eq!(
        run(
            &database,
            &["negotiate", "2", "20", "--accept", "en-US", "--noredirect"]
        ),
        ""
    );
}

#[test]
fn test_removing_a_site_clears_its_relations() {
    let temp_dir = TempDir::new().unwrap();
    let database = temp_dir.path().join("polyglot.db");

    run(&database, &["sites", "link", "1", "2"]);
    run(&database, &["content", "link", "1", "10", "2", "20"]);
    run(&database, &["sites", "remove", "2"]);

    assert_eq!(run(&database, &["sites", "related", "1"]), "");
    assert_eq!(run(&database, &["content", "show", "1", "10"]), "");
    assert_eq!(run(&database, &["content", "has", "2"]), "false");
    assert_eq!(run(&database, &["translations", "1", "10"]), "");
}

#[test]
fn test_parse_header_strips_comments() {
    let temp_dir = TempDir::new().unwrap();
    let database = temp_dir.path().join("polyglot.db");
    assert_eq!(
        run(&database, &["parse-header", "fr (Swiss), de;q=0.5"]),
        "fr\nde"
    );
}

#[test]
fn test_header_parsing_never_opens_the_database() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "").unwrap();
    let database = blocker.join("polyglot.db");

    assert_eq!(run(&database, &["parse-header", "de, en;q=0.5"]), "de\nen");

    let cli = Cli::try_parse_from(["polyglot", "sites", "related", "1"]).unwrap();
    assert!(matches!(execute(&database, cli), Err(CliError::Io(_))));
    assert!(!database.exists());
}
