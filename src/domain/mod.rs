//! Core domain models for renovate-datasource
//!
//! This module contains the output shapes consumed by Renovate:
//! - Manifest and Release for single-provider custom datasources
//! - DatasourceOutput and VersionInfo for per-package batch output

mod datasource;
mod manifest;

pub use datasource::{DatasourceOutput, VersionInfo};
pub use manifest::{Manifest, Release};
