//! CLI argument parsing tests.

use clap::Parser;
use gitlab_buildno::cli::{ApiVersionArg, Cli, Command, ConnectionArgs};
use gitlab_buildno::{ApiVersion, DEFAULT_MAX_PAGES};

#[test]
fn test_cli_parses_next_version() {
    let cli = Cli::parse_from([
        "gitlab-buildno",
        "--url",
        "https://gitlab.example.com",
        "--token",
        "t0ken",
        "next-version",
        "Alpha",
    ]);

    assert!(!cli.json);
    match cli.command {
        Command::NextVersion { project } => assert_eq!(project, "Alpha"),
        _ => panic!("Expected NextVersion command"),
    }
}

#[test]
fn test_cli_parses_tag_with_message() {
    let cli = Cli::parse_from([
        "gitlab-buildno",
        "tag",
        "Alpha",
        "bcd3098b54bcdb5b864f6299a80890a3740bafdb",
        "build-4",
        "--message",
        "Build 4",
    ]);

    match cli.command {
        Command::Tag {
            project,
            commit,
            tag_name,
            message,
        } => {
            assert_eq!(project, "Alpha");
            assert_eq!(commit, "bcd3098b54bcdb5b864f6299a80890a3740bafdb");
            assert_eq!(tag_name, "build-4");
            assert_eq!(message.as_deref(), Some("Build 4"));
        }
        _ => panic!("Expected Tag command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "gitlab-buildno",
        "commits",
        "Alpha",
        "--json",
        "--api-version",
        "v3",
        "--insecure",
        "--url",
        "https://ci.local",
        "--token",
        "t0ken",
    ]);

    assert!(cli.json);
    assert!(cli.connection.insecure);
    assert_eq!(cli.connection.api_version, ApiVersionArg::V3);
    assert!(matches!(cli.command, Command::Commits { .. }));
}

#[test]
fn test_connection_args_to_config() {
    let cli = Cli::parse_from([
        "gitlab-buildno",
        "--url",
        "https://ci.local",
        "--token",
        "t0ken",
        "--timeout",
        "5",
        "--max-pages",
        "20",
        "project-id",
        "Alpha",
    ]);

    let config = cli.connection.to_config().unwrap();
    assert_eq!(config.base_url, "https://ci.local");
    assert_eq!(config.token, "t0ken");
    assert_eq!(config.api_version, ApiVersion::V4);
    assert_eq!(config.timeout.as_secs(), 5);
    assert_eq!(config.max_pages, 20);
    assert!(!config.accept_invalid_certs);
}

fn connection(url: Option<&str>, token: Option<&str>) -> ConnectionArgs {
    ConnectionArgs {
        url: url.map(str::to_string),
        token: token.map(str::to_string),
        api_version: ApiVersionArg::V4,
        insecure: false,
        timeout: 300,
        max_pages: DEFAULT_MAX_PAGES,
    }
}

#[test]
fn test_missing_token_is_reported() {
    let err = connection(Some("https://ci.local"), None)
        .to_config()
        .unwrap_err();
    assert!(err.contains("GITLAB_PRIVATE_TOKEN"));
}

#[test]
fn test_missing_url_is_reported() {
    let err = connection(None, Some("t0ken")).to_config().unwrap_err();
    assert!(err.contains("GITLAB_URL"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let result = Cli::try_parse_from([
        "gitlab-buildno",
        "--timeout",
        "0",
        "next-version",
        "Alpha",
    ]);
    assert!(result.is_err());
}
