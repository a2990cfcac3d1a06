//! Provider contracts and built-in providers
//!
//! This module provides:
//! - `Provider`: fetch raw versions, turn them into a `Manifest`
//! - `DatasourceProvider`: fetch per-package outputs for batch runs
//! - `generate_output`: write a batch provider's packages to disk
//! - Built-in providers: k3s, redhat-catalog, redhat-docker

mod k3s;
mod redhat_catalog;
mod redhat_docker;

pub use k3s::K3sProvider;
pub use redhat_catalog::{
    filter_version_tags, RedHatCatalogProvider, DEFAULT_IMAGE_PATH, DEFAULT_REGISTRY,
};
pub use redhat_docker::{RedHatDockerConfig, RedHatDockerProvider};

use crate::config::ProviderConfig;
use crate::domain::{DatasourceOutput, Manifest};
use crate::error::DatasourceError;
use crate::output::write_package;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Contract for single-manifest providers.
///
/// Errors are `anyhow::Error` so provider code can surface anything;
/// providers should report retrieval failures as `DatasourceError::Fetch`
/// and schema problems as `DatasourceError::Validation`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable lowercase, hyphenated identifier
    fn name(&self) -> &str;

    /// Retrieve raw version identifiers, in the order the provider chooses
    async fn fetch_versions(&self) -> anyhow::Result<Vec<String>>;

    /// Wrap versions into a manifest with provider metadata. No I/O.
    fn create_manifest(&self, versions: &[String]) -> anyhow::Result<Manifest>;
}

/// Provider-specific arguments for a batch fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Packages to fetch (repositories, images, ...); empty means the
    /// provider's defaults
    pub targets: Vec<String>,
}

impl FetchOptions {
    pub fn with_targets(targets: Vec<String>) -> Self {
        Self { targets }
    }
}

/// Contract for batch providers emitting one output per package
#[async_trait]
pub trait DatasourceProvider: Send + Sync {
    /// Stable lowercase, hyphenated identifier
    fn name(&self) -> &str;

    /// Fetch outputs for every package selected by `options`
    async fn fetch_outputs(&self, options: &FetchOptions)
        -> anyhow::Result<Vec<DatasourceOutput>>;
}

/// Fetch a batch provider's packages and write one JSON file per package.
///
/// Returns the written paths in output order.
pub async fn generate_output(
    provider: &dyn DatasourceProvider,
    config: &ProviderConfig,
    options: &FetchOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    let name = provider.name();
    config.ensure_output_dir().with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    tracing::info!(provider = name, "starting version fetch");
    let outputs = provider.fetch_outputs(options).await?;
    if outputs
        .iter()
        .any(|o| o.package_name.split('/').all(|s| s.trim().is_empty()))
    {
        return Err(DatasourceError::validation(format!(
            "provider '{}' returned a package without a name",
            name
        ))
        .into());
    }

    let mut written = Vec::with_capacity(outputs.len());
    for output in &outputs {
        let path = write_package(output, &config.output_dir, config.indent).with_context(|| {
            format!("failed to write output for {}", output.package_name)
        })?;
        tracing::info!(
            provider = name,
            package = %output.package_name,
            versions = output.versions.len(),
            path = %path.display(),
            "wrote package output"
        );
        written.push(path);
    }

    tracing::info!(
        provider = name,
        files = written.len(),
        "provider completed successfully"
    );
    Ok(written)
}
