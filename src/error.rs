//! Domain error types using thiserror
//!
//! Error hierarchy:
//! - Fetch: retrieving raw data from a provider's source failed
//! - Validation: retrieved data could not be converted into the output schema
//! - Provider: orchestration-level policy violation or unexpected provider failure
//!
//! Anything that is not a `DatasourceError` is an uncategorized failure and
//! travels as `anyhow::Error` until the pipeline classifies it.

use thiserror::Error;

/// Boxed underlying cause kept for diagnostic chaining
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Domain error shared by every provider and the generation pipeline
#[derive(Error, Debug)]
pub enum DatasourceError {
    /// Network, HTTP-status or parse failure while retrieving raw data
    #[error("provider '{provider}' failed to fetch {url}: {message}")]
    Fetch {
        provider: String,
        url: String,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Retrieved data failed to convert into the output schema
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Orchestration-level policy violation or wrapped unexpected failure
    #[error("{message}")]
    Provider {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl DatasourceError {
    /// Creates a new Fetch error
    pub fn fetch(
        provider: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        DatasourceError::Fetch {
            provider: provider.into(),
            url: url.into(),
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new Fetch error keeping the transport error as its cause
    pub fn fetch_with_source(
        provider: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxedSource>,
    ) -> Self {
        DatasourceError::Fetch {
            provider: provider.into(),
            url: url.into(),
            status: None,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a new Fetch error for a non-success HTTP status
    pub fn http_status(provider: impl Into<String>, url: impl Into<String>, status: u16) -> Self {
        DatasourceError::Fetch {
            provider: provider.into(),
            url: url.into(),
            status: Some(status),
            message: format!("HTTP {}", status),
            source: None,
        }
    }

    /// Creates a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        DatasourceError::Validation {
            message: message.into(),
        }
    }

    /// Creates a new Provider error without an underlying cause
    pub fn provider(message: impl Into<String>) -> Self {
        DatasourceError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new Provider error wrapping an underlying cause
    pub fn provider_with_source(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        DatasourceError::Provider {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Pass domain errors through unchanged, wrap anything else into a
    /// Provider error naming the provider.
    pub fn classify(provider: &str, err: anyhow::Error) -> Self {
        match err.downcast::<DatasourceError>() {
            Ok(domain) => domain,
            Err(other) => DatasourceError::provider_with_source(
                format!(
                    "unexpected error generating manifest for '{}': {}",
                    provider, other
                ),
                other,
            ),
        }
    }

    /// Prefix the message of a Fetch error, keeping provider, URL, status and cause
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            DatasourceError::Fetch {
                provider,
                url,
                status,
                message,
                source,
            } => DatasourceError::Fetch {
                provider,
                url,
                status,
                message: format!("{}: {}", context, message),
                source,
            },
            other => other,
        }
    }

    /// Returns true for fetch failures
    pub fn is_fetch(&self) -> bool {
        matches!(self, DatasourceError::Fetch { .. })
    }

    /// Returns true when the upstream answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatasourceError::Fetch {
                status: Some(404),
                ..
            }
        )
    }
}
