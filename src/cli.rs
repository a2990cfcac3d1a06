//! CLI argument parsing module for renovate-datasource

use crate::config::{Config, DEFAULT_INDENT, DEFAULT_OUTPUT_DIR};
use crate::http::DEFAULT_TIMEOUT;
use crate::provider::{DEFAULT_IMAGE_PATH, DEFAULT_REGISTRY};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Generate Renovate custom datasource JSON files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "renovate-datasource",
    version,
    about = "Generate JSON datasources for Renovate"
)]
pub struct CliArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the progress display
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output directory for per-package JSON files
    #[arg(
        long,
        global = true,
        env = "RENOVATE_DATASOURCE_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output_dir: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "RENOVATE_DATASOURCE_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT.as_secs()
    )]
    pub timeout: u64,

    /// JSON indentation in spaces
    #[arg(long, global = true, default_value_t = DEFAULT_INDENT)]
    pub indent: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a single manifest
    Generate {
        #[command(subcommand)]
        provider: GenerateCommand,
    },
    /// Run a specific batch provider
    Provider {
        #[command(subcommand)]
        provider: ProviderCommand,
    },
    /// Run all registered providers
    AllProviders,
    /// List all registered providers
    ListProviders,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GenerateCommand {
    /// K3s versions from GitHub releases
    K3s {
        /// Keep pre-release versions
        #[arg(long)]
        include_prereleases: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Red Hat container versions from the container catalog
    RedhatCatalog {
        /// Image path in the registry
        #[arg(long, default_value = DEFAULT_IMAGE_PATH)]
        image_path: String,

        /// Registry hosting the image
        #[arg(long, default_value = DEFAULT_REGISTRY)]
        registry: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    /// Red Hat container images, one file per repository
    RedhatDocker {
        /// Repository to fetch (can be specified multiple times)
        #[arg(short = 'r', long = "repository", action = ArgAction::Append)]
        repositories: Vec<String>,
    },
}

impl CliArgs {
    /// Settings shared by every command
    pub fn config(&self) -> Config {
        Config {
            timeout: Duration::from_secs(self.timeout),
            indent: self.indent,
            verbose: self.verbose,
            quiet: self.quiet,
            output_dir: self.output_dir.clone(),
        }
    }
}
