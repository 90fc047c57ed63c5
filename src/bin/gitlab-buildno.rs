//! gitlab-buildno CLI binary.
//!
//! Prints build numbers derived from GitLab build history and tags commits.

use std::process::ExitCode;

use clap::Parser;
use gitlab_buildno::cli::{Cli, Command};
use gitlab_buildno::{
    distinct_commits, CommitsReport, GitLabClient, PrettyPrint, TagCreateParams, TagReport,
    VersionReport,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.connection.to_config() {
        Ok(c) => c,
        Err(missing) => {
            eprintln!("Error: {missing} is required");
            eprintln!("Hint: Set GITLAB_URL and GITLAB_PRIVATE_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    let client = match GitLabClient::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &GitLabClient, command: Command, json: bool) -> gitlab_buildno::Result<()> {
    match command {
        Command::NextVersion { project } => {
            let version = client.next_version_no(&project).await?;
            output(&VersionReport { project, version }, json)
        }
        Command::ProjectId { project } => {
            let id = client.resolve_project_id(&project).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "project": project, "id": id }))?
                );
            } else {
                println!("{id}");
            }
            Ok(())
        }
        Command::Commits { project } => {
            let commits = distinct_commits(client, &project).await?;
            output(&CommitsReport::new(&project, &commits), json)
        }
        Command::Tag {
            project,
            commit,
            tag_name,
            message,
        } => {
            let project_id = client.resolve_project_id(&project).await?;
            let mut params = TagCreateParams::new(&tag_name, &commit);
            if let Some(message) = message.as_deref() {
                params = params.with_message(message);
            }
            gitlab_buildno::create_tag_with(client, project_id, &params).await?;
            output(
                &TagReport {
                    project,
                    tag: tag_name,
                    git_ref: commit,
                },
                json,
            )
        }
    }
}

fn output<T: Serialize + PrettyPrint>(report: &T, json: bool) -> gitlab_buildno::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.pretty_print());
    }
    Ok(())
}
