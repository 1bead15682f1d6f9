//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Print the labeled texts found in the design
//! - `diff`: Compare the design against the published snapshot
//! - `sync`: Gated run from review to publish (dry-run unless `--apply`)
//! - `init`: Initialize the strsync configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::Credentials;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Diff(cmd)) => cmd.common.verbose,
            Some(Command::Sync(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Service credentials. Each one falls back to its environment variable.
#[derive(Clone, Default, Args)]
pub struct CredentialArgs {
    /// Design API token
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub figma_token: Option<String>,

    /// Repository API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Spelling correction API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Remote config service-account key (JSON)
    #[arg(long, env = "FIREBASE_CREDENTIALS_JSON", hide_env_values = true)]
    pub firebase_credentials_json: Option<String>,
}

impl std::fmt::Debug for CredentialArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.clone().into_credentials(), f)
    }
}

impl CredentialArgs {
    pub fn into_credentials(self) -> Credentials {
        Credentials {
            figma_token: self.figma_token,
            github_token: self.github_token,
            correction_api_key: self.gemini_api_key,
            remote_config_credentials: self.firebase_credentials_json,
        }
        .normalized()
    }
}

/// Common arguments shared by the pipeline commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Read the design document from a local JSON file instead of the design API
    #[arg(long)]
    pub tree_file: Option<PathBuf>,

    /// Use a local JSON file as the published snapshot (read and written)
    #[arg(long)]
    pub snapshot_file: Option<PathBuf>,

    /// Treat a snapshot that does not exist yet as empty (first publish)
    #[arg(long)]
    pub allow_missing_snapshot: bool,

    /// Export directory (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print every extracted value per label instead of the first one
    #[arg(long)]
    pub raw: bool,

    /// Also save the grouped extraction as JSON
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DiffCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write exports and publish (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Confirm deletions without prompting
    #[arg(long)]
    pub yes: bool,

    /// Skip the spelling review
    #[arg(long)]
    pub no_correct: bool,

    /// Accept every spelling suggestion
    #[arg(long, conflicts_with_all = ["accept", "no_correct"])]
    pub accept_all: bool,

    /// Accept the suggestion for a label; can be repeated
    #[arg(long, value_name = "LABEL", conflicts_with = "no_correct")]
    pub accept: Vec<String>,

    /// Do not publish to remote config
    #[arg(long)]
    pub skip_remote_config: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the labeled texts found in the design
    Extract(ExtractCommand),
    /// Compare the design against the published snapshot
    Diff(DiffCommand),
    /// Review, correct and publish the strings
    Sync(SyncCommand),
    /// Initialize a new .strsyncrc.json configuration file
    Init,
}
