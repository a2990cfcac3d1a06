//! Runtime configuration
//!
//! `Config` holds the settings shared by every command; `ProviderConfig` is
//! what the batch runner hands to each provider factory.

use crate::http::DEFAULT_TIMEOUT;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default output directory for per-package files
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Default JSON indentation
pub const DEFAULT_INDENT: usize = 2;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP request timeout
    pub timeout: Duration,
    /// JSON output indentation
    pub indent: usize,
    /// Enable verbose output
    pub verbose: bool,
    /// Suppress progress display
    pub quiet: bool,
    /// Output directory for batch runs
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            indent: DEFAULT_INDENT,
            verbose: false,
            quiet: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Configuration handed to one provider
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            output_dir: self.output_dir.clone(),
            timeout: self.timeout,
            indent: self.indent,
        }
    }

    /// Whether the progress spinner should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.verbose
    }
}

/// Base configuration for batch providers
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Directory the provider writes its package files into
    pub output_dir: PathBuf,
    /// HTTP request timeout for the provider's client
    pub timeout: Duration,
    /// JSON indentation of written files
    pub indent: usize,
}

impl ProviderConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            timeout: DEFAULT_TIMEOUT,
            indent: DEFAULT_INDENT,
        }
    }

    /// Ensure the output directory exists
    pub fn ensure_output_dir(&self) -> std::io::Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
