//! Batch execution over every registered provider
//!
//! Providers run one after another in registry order. A failing provider is
//! logged and recorded; the remaining providers still run.

use crate::config::ProviderConfig;
use crate::progress::Progress;
use crate::provider::{generate_output, FetchOptions};
use crate::registry::{ProviderFactory, ProviderRegistry};

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Providers that completed, in run order
    pub succeeded: Vec<String>,
    /// Providers that failed with their error message, in run order
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when no provider failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Runs every provider of a registry with failure isolation
pub struct BatchRunner<'a> {
    registry: &'a ProviderRegistry,
    config: ProviderConfig,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(registry: &'a ProviderRegistry, config: ProviderConfig) -> Self {
        Self {
            registry,
            config,
            show_progress: false,
        }
    }

    /// Draw a progress bar while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let entries = self.registry.all();

        if entries.is_empty() {
            tracing::warn!("no providers registered");
            return summary;
        }

        tracing::info!(count = entries.len(), "running all providers");
        let mut progress = Progress::new(self.show_progress);
        progress.start(entries.len() as u64, "Running providers");

        for (name, factory) in &entries {
            progress.set_message(name);
            tracing::info!(provider = %name, "processing provider");

            match self.run_one(factory).await {
                Ok(files) => {
                    tracing::info!(provider = %name, files, "provider completed successfully");
                    summary.succeeded.push(name.clone());
                }
                Err(e) => {
                    tracing::error!(
                        provider = %name,
                        error = %e,
                        "provider failed, continuing with next provider"
                    );
                    summary.failed.push((name.clone(), e.to_string()));
                }
            }
            progress.inc();
        }

        progress.finish_and_clear();
        summary
    }

    /// Build one provider and write its outputs; the instance is dropped on return
    async fn run_one(&self, factory: &ProviderFactory) -> anyhow::Result<usize> {
        let provider = factory(self.config.clone())?;
        let written =
            generate_output(provider.as_ref(), &self.config, &FetchOptions::default()).await?;
        Ok(written.len())
    }
}
