//! Argument parsing tests

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use storefront_cli::{Cli, Command};

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("storefront").chain(args.iter().copied()))
}

#[test]
fn parses_token_with_global_flags() {
    let cli = parse(&["--config", "/tmp/c.toml", "token", "--ssr"]).unwrap();
    assert_eq!(cli.command, Command::Token);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    assert!(cli.ssr);
    assert!(cli.locale.is_none());
}

#[test]
fn accepts_equals_form() {
    let cli = parse(&["--config=/tmp/c.toml", "home", "--locale=sr"]).unwrap();
    assert_eq!(cli.command, Command::Home);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    assert_eq!(cli.locale.as_deref(), Some("sr"));
}

#[test]
fn parses_query_with_variables() {
    let cli = parse(&[
        "query",
        "home.graphql",
        "--variables",
        r#"{"url":"home"}"#,
        "--operation-name",
        "CmsPage",
        "--locale",
        "sr",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Command::Query {
            document: PathBuf::from("home.graphql"),
            variables: Some(r#"{"url":"home"}"#.to_string()),
            operation_name: Some("CmsPage".to_string()),
        }
    );
    assert_eq!(cli.locale.as_deref(), Some("sr"));
    assert!(!cli.ssr);
}

#[test]
fn document_may_follow_end_of_options() {
    let cli = parse(&["query", "--", "-odd.graphql"]).unwrap();
    let Command::Query { document, .. } = cli.command else {
        panic!("expected query");
    };
    assert_eq!(document, PathBuf::from("-odd.graphql"));
}

#[test]
fn help_is_reported_as_display_help() {
    let err = parse(&["--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    assert!(err.to_string().contains("query"));
}

#[test]
fn rejects_bad_input() {
    assert!(parse(&[]).is_err());
    assert!(parse(&["checkout"]).is_err());
    assert!(parse(&["query"]).is_err());
    assert!(parse(&["token", "extra"]).is_err());
    assert!(parse(&["token", "--verbose"]).is_err());
    assert!(parse(&["token", "--config"]).is_err());
    assert!(parse(&["home", "--variables", "{}"]).is_err());
}
