//! Manifest generation for a single provider
//!
//! Workflow: fetch → validate non-empty → transform.
//! The first failure aborts the run; domain errors pass through unchanged
//! and anything else is wrapped into `DatasourceError::Provider`.

use crate::domain::Manifest;
use crate::error::DatasourceError;
use crate::provider::Provider;

/// Stage a generation run is in, used for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    Transforming,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetching => "fetching",
            Stage::Validating => "validating",
            Stage::Transforming => "transforming",
        }
    }
}

/// Generates a manifest from one provider
pub struct GenerateManifest<'a> {
    provider: &'a dyn Provider,
}

impl<'a> GenerateManifest<'a> {
    pub fn new(provider: &'a dyn Provider) -> Self {
        Self { provider }
    }

    /// Run fetch → validate → transform
    pub async fn execute(&self) -> Result<Manifest, DatasourceError> {
        let name = self.provider.name();

        tracing::debug!(provider = name, stage = Stage::Fetching.as_str(), "fetching versions");
        let versions = self
            .provider
            .fetch_versions()
            .await
            .map_err(|e| DatasourceError::classify(name, e))?;

        tracing::debug!(
            provider = name,
            stage = Stage::Validating.as_str(),
            count = versions.len(),
            "validating versions"
        );
        if versions.is_empty() {
            return Err(DatasourceError::provider(format!(
                "provider '{}' returned no versions",
                name
            )));
        }

        tracing::debug!(provider = name, stage = Stage::Transforming.as_str(), "creating manifest");
        let manifest = self
            .provider
            .create_manifest(&versions)
            .map_err(|e| DatasourceError::classify(name, e))?;

        if manifest.releases.is_empty() {
            return Err(DatasourceError::validation(format!(
                "provider '{}' produced a manifest without releases",
                name
            )));
        }

        tracing::info!(provider = name, releases = manifest.releases.len(), "manifest generated");
        Ok(manifest)
    }
}
