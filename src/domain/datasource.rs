//! Per-package datasource output
//!
//! Batch providers emit one `DatasourceOutput` per package. Unlike
//! [`Manifest`](super::Manifest), an empty version list is allowed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Information about one version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// The version string
    pub version: String,
    /// When this version was released
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Digest of the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_url: Option<String>,
}

impl VersionInfo {
    /// Create a new VersionInfo with only the version set
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release_timestamp: None,
            registry_url: None,
            source_url: None,
            digest: None,
            homepage: None,
            changelog_url: None,
        }
    }

    pub fn with_release_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.release_timestamp = timestamp;
        self
    }

    pub fn with_digest(mut self, digest: Option<String>) -> Self {
        self.digest = digest;
        self
    }
}

/// Output document for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceOutput {
    /// Datasource type (e.g. "docker")
    pub datasource: String,
    /// Package name, may contain `/`
    pub package_name: String,
    /// Available versions
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

impl DatasourceOutput {
    /// Create an output with no versions and no metadata
    pub fn new(datasource: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            datasource: datasource.into(),
            package_name: package_name.into(),
            versions: Vec::new(),
            homepage: None,
            source_url: None,
            registry_url: None,
        }
    }

    pub fn with_versions(mut self, versions: Vec<VersionInfo>) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_homepage(mut self, url: impl Into<String>) -> Self {
        self.homepage = Some(url.into());
        self
    }

    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = Some(url.into());
        self
    }

    /// Path of this package's file under `output_dir`.
    ///
    /// Each `/` in the package name becomes a directory level.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let mut path = output_dir.to_path_buf();
        let mut segments = self.package_name.split('/').filter(|s| !s.is_empty()).peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.json", segment));
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_output_keys() {
        let output = DatasourceOutput::new("docker", "registry.access.redhat.com/ubi9")
            .with_registry_url("https://catalog.redhat.com")
            .with_versions(vec![VersionInfo::new("9.5-1")]);
        let json = serde_json::to_value(&output).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(json["datasource"], "docker");
        assert_eq!(json["packageName"], "registry.access.redhat.com/ubi9");
        assert_eq!(json["registryUrl"], "https://catalog.redhat.com");
        assert!(!object.contains_key("homepage"));
        assert!(!object.contains_key("sourceUrl"));
        assert_eq!(json["versions"][0].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_versions_are_serialized() {
        let json = serde_json::to_value(DatasourceOutput::new("docker", "empty")).unwrap();
        assert_eq!(json["versions"], serde_json::json!([]));
    }

    #[test]
    fn test_version_info_timestamp_and_digest() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let info = VersionInfo::new("9.0")
            .with_release_timestamp(Some(ts))
            .with_digest(Some("sha256:def".to_string()));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["releaseTimestamp"], "2024-01-02T00:00:00Z");
        assert_eq!(json["digest"], "sha256:def");
    }

    #[test]
    fn test_output_path_nests_package_segments() {
        let output = DatasourceOutput::new("docker", "registry.access.redhat.com/ubi9/ubi-minimal");
        let path = output.output_path(Path::new("/tmp/out"));
        assert_eq!(
            path,
            PathBuf::from("/tmp/out/registry.access.redhat.com/ubi9/ubi-minimal.json")
        );
    }

    #[test]
    fn test_output_path_flat_package() {
        let output = DatasourceOutput::new("docker", "k3s");
        assert_eq!(
            output.output_path(Path::new("out")),
            PathBuf::from("out/k3s.json")
        );
    }
}
