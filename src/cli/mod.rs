//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! gitlab-buildno binary.

use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::{ApiVersion, ClientConfig, DEFAULT_MAX_PAGES};

/// Build numbers from GitLab build history.
#[derive(Parser, Debug)]
#[command(name = "gitlab-buildno", about = "Build numbers from GitLab build history", version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output results as JSON instead of plain text.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// How to reach the GitLab server.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// GitLab base URL, e.g. https://gitlab.example.com.
    #[arg(long, env = "GITLAB_URL", global = true)]
    pub url: Option<String>,

    /// Private token used for every request.
    #[arg(long, env = "GITLAB_PRIVATE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// REST API version.
    #[arg(long, env = "GITLAB_API_VERSION", value_enum, default_value_t = ApiVersionArg::V4, global = true)]
    pub api_version: ApiVersionArg,

    /// Skip TLS certificate verification (self-signed servers only).
    #[arg(
        long,
        env = "GITLAB_INSECURE",
        global = true,
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[arg(
        long,
        env = "GITLAB_TIMEOUT_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: u64,

    /// Maximum number of pages fetched for one listing.
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES, global = true)]
    pub max_pages: u32,
}

impl ConnectionArgs {
    /// Client settings, or the name of the first missing required option.
    pub fn to_config(&self) -> Result<ClientConfig, &'static str> {
        let url = self.url.as_deref().ok_or("--url / GITLAB_URL")?;
        let token = self
            .token
            .as_deref()
            .ok_or("--token / GITLAB_PRIVATE_TOKEN")?;

        let mut config = ClientConfig::new(token, url);
        config.api_version = self.api_version.into();
        config.accept_invalid_certs = self.insecure;
        config.timeout = Duration::from_secs(self.timeout);
        config.max_pages = self.max_pages;
        Ok(config)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the next build number of a project.
    NextVersion {
        /// Exact project name.
        project: String,
    },

    /// Print the numeric id of a project.
    ProjectId {
        /// Exact project name.
        project: String,
    },

    /// List the distinct commits built for a project.
    Commits {
        /// Exact project name.
        project: String,
    },

    /// Tag a commit of a project.
    Tag {
        /// Exact project name.
        project: String,

        /// Commit id to tag.
        commit: String,

        /// Name of the new tag.
        tag_name: String,

        /// Annotation message; creates an annotated tag.
        #[arg(long, short)]
        message: Option<String>,
    },
}

/// API versions accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVersionArg {
    /// GitLab API v3 (builds).
    V3,
    /// GitLab API v4 (jobs).
    V4,
}

impl From<ApiVersionArg> for ApiVersion {
    fn from(arg: ApiVersionArg) -> Self {
        match arg {
            ApiVersionArg::V3 => ApiVersion::V3,
            ApiVersionArg::V4 => ApiVersion::V4,
        }
    }
}
