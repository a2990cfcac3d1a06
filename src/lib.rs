//! renovate-datasource - Renovate custom datasource generator library
//!
//! This library fetches version metadata from upstream registries and
//! renders it as JSON that Renovate custom datasources consume:
//! - Single manifests from K3s releases and the Red Hat container catalog
//! - Per-package files from batch providers such as Red Hat docker images
//! - A provider registry and a batch runner with failure isolation

pub mod batch;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod registry;
