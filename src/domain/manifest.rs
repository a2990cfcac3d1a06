//! Renovate custom datasource manifest
//!
//! `Manifest` is the document Renovate reads for a custom datasource: a list
//! of releases plus optional defaults shared by every release. Absent fields
//! are omitted from the JSON entirely, never emitted as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single version entry in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// The version string (required)
    pub version: String,
    /// Whether this version is deprecated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deprecated: Option<bool>,
    /// When the version was released
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_timestamp: Option<DateTime<Utc>>,
    /// Changelog for this version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_url: Option<String>,
    /// Source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Directory within the source repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    /// Content digest of the release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Whether this is a stable release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stable: Option<bool>,
}

impl Release {
    /// Creates a release with only the version set
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            is_deprecated: None,
            release_timestamp: None,
            changelog_url: None,
            source_url: None,
            source_directory: None,
            digest: None,
            is_stable: None,
        }
    }

    pub fn with_release_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.release_timestamp = Some(timestamp);
        self
    }

    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn with_stable(mut self, is_stable: bool) -> Self {
        self.is_stable = Some(is_stable);
        self
    }

    pub fn with_deprecated(mut self, is_deprecated: bool) -> Self {
        self.is_deprecated = Some(is_deprecated);
        self
    }
}

/// The complete custom datasource document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Available releases
    pub releases: Vec<Release>,
    /// Default source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Default source directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    /// Default changelog URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_url: Option<String>,
    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl Manifest {
    /// Creates a manifest without top-level metadata
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases,
            source_url: None,
            source_directory: None,
            changelog_url: None,
            homepage: None,
        }
    }

    /// Creates a manifest with one version-only release per version string
    pub fn from_versions<S: AsRef<str>>(versions: &[S]) -> Self {
        Self::new(versions.iter().map(|v| Release::new(v.as_ref())).collect())
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_source_directory(mut self, dir: impl Into<String>) -> Self {
        self.source_directory = Some(dir.into());
        self
    }

    pub fn with_changelog_url(mut self, url: impl Into<String>) -> Self {
        self.changelog_url = Some(url.into());
        self
    }

    pub fn with_homepage(mut self, url: impl Into<String>) -> Self {
        self.homepage = Some(url.into());
        self
    }

    /// Returns the version strings in release order
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.releases.iter().map(|r| r.version.as_str())
    }
}
