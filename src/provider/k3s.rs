//! K3s Kubernetes distribution provider
//!
//! Fetches K3s versions from GitHub releases.
//! API endpoint: https://api.github.com/repos/k3s-io/k3s/releases

use crate::domain::Manifest;
use crate::http::HttpClient;
use crate::provider::Provider;
use async_trait::async_trait;
use serde::Deserialize;

/// GitHub API base URL
const GITHUB_API_URL: &str = "https://api.github.com";

const RELEASES_PATH: &str = "/repos/k3s-io/k3s/releases";
const ACCEPT_HEADER: (&str, &str) = ("Accept", "application/vnd.github.v3+json");

const SOURCE_URL: &str = "https://github.com/k3s-io/k3s";
const HOMEPAGE: &str = "https://k3s.io";
const CHANGELOG_URL: &str = "https://github.com/k3s-io/k3s/releases";

/// Release object returned by the GitHub API
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: Option<String>,
    /// Absent or null counts as a full release
    #[serde(default)]
    prerelease: Option<bool>,
}

/// Provider for K3s versions
pub struct K3sProvider {
    client: HttpClient,
    include_prereleases: bool,
    api_url: String,
}

impl K3sProvider {
    /// Create a new K3s provider
    pub fn new(client: HttpClient, include_prereleases: bool) -> Self {
        Self {
            client,
            include_prereleases,
            api_url: GITHUB_API_URL.to_string(),
        }
    }

    /// Point the provider at a different GitHub API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self) -> String {
        format!("{}{}", self.api_url, RELEASES_PATH)
    }

    /// Tag names in arrival order, pre-releases dropped unless requested
    fn select_tags(&self, releases: Vec<GitHubRelease>) -> Vec<String> {
        releases
            .into_iter()
            .filter(|r| self.include_prereleases || !r.prerelease.unwrap_or(false))
            .filter_map(|r| r.tag_name)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[async_trait]
impl Provider for K3sProvider {
    fn name(&self) -> &str {
        "k3s"
    }

    async fn fetch_versions(&self) -> anyhow::Result<Vec<String>> {
        let url = self.build_url();
        let releases: Vec<GitHubRelease> = self
            .client
            .get_json(&url, &[ACCEPT_HEADER], self.name())
            .await
            .map_err(|e| e.with_context("failed to fetch K3s versions"))?;

        let tags = self.select_tags(releases);
        tracing::debug!(provider = self.name(), count = tags.len(), "fetched K3s tags");
        Ok(tags)
    }

    fn create_manifest(&self, versions: &[String]) -> anyhow::Result<Manifest> {
        Ok(Manifest::from_versions(versions)
            .with_source_url(SOURCE_URL)
            .with_homepage(HOMEPAGE)
            .with_changelog_url(CHANGELOG_URL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasourceError;

    const RELEASES_BODY: &str = r#"[
        {"tag_name": "v1.30.0+k3s1", "prerelease": false},
        {"tag_name": "v1.30.1-rc1+k3s1", "prerelease": true},
        {"tag_name": "v1.29.4+k3s1", "prerelease": false},
        {"prerelease": false}
    ]"#;

    fn provider(include_prereleases: bool) -> K3sProvider {
        K3sProvider::new(HttpClient::new().unwrap(), include_prereleases)
    }

    #[test]
    fn test_k3s_provider_name() {
        assert_eq!(provider(false).name(), "k3s");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            provider(false).build_url(),
            "https://api.github.com/repos/k3s-io/k3s/releases"
        );
        assert_eq!(
            provider(false).with_api_url("http://127.0.0.1:1234/").build_url(),
            "http://127.0.0.1:1234/repos/k3s-io/k3s/releases"
        );
    }

    #[test]
    fn test_create_manifest_metadata() {
        let versions = vec!["v1.30.0+k3s1".to_string(), "v1.29.4+k3s1".to_string()];
        let manifest = provider(false).create_manifest(&versions).unwrap();

        assert_eq!(manifest.releases.len(), 2);
        assert_eq!(manifest.releases[0].version, "v1.30.0+k3s1");
        assert_eq!(manifest.source_url.as_deref(), Some(SOURCE_URL));
        assert_eq!(manifest.homepage.as_deref(), Some(HOMEPAGE));
        assert_eq!(manifest.changelog_url.as_deref(), Some(CHANGELOG_URL));
    }

    #[tokio::test]
    async fn test_fetch_versions_skips_prereleases() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", RELEASES_PATH)
            .match_header("accept", "application/vnd.github.v3+json")
            .with_status(200)
            .with_body(RELEASES_BODY)
            .create_async()
            .await;

        let versions = provider(false)
            .with_api_url(server.url())
            .fetch_versions()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(versions, vec!["v1.30.0+k3s1", "v1.29.4+k3s1"]);
    }

    #[tokio::test]
    async fn test_fetch_versions_includes_prereleases() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", RELEASES_PATH)
            .with_status(200)
            .with_body(RELEASES_BODY)
            .create_async()
            .await;

        let versions = provider(true)
            .with_api_url(server.url())
            .fetch_versions()
            .await
            .unwrap();

        assert_eq!(
            versions,
            vec!["v1.30.0+k3s1", "v1.30.1-rc1+k3s1", "v1.29.4+k3s1"]
        );
    }

    #[tokio::test]
    async fn test_fetch_versions_treats_null_prerelease_as_release() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", RELEASES_PATH)
            .with_status(200)
            .with_body(
                r#"[{"tag_name": "v1.31.0+k3s1", "prerelease": null},
                    {"tag_name": "v1.30.5+k3s1", "prerelease": false},
                    {"tag_name": "v1.31.1-rc1+k3s1", "prerelease": true}]"#,
            )
            .create_async()
            .await;

        let versions = provider(false)
            .with_api_url(server.url())
            .fetch_versions()
            .await
            .unwrap();

        assert_eq!(versions, vec!["v1.31.0+k3s1", "v1.30.5+k3s1"]);
    }

    #[tokio::test]
    async fn test_fetch_versions_reports_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", RELEASES_PATH)
            .with_status(500)
            .create_async()
            .await;

        let err = provider(false)
            .with_api_url(server.url())
            .fetch_versions()
            .await
            .unwrap_err();

        let domain = err.downcast_ref::<DatasourceError>().unwrap();
        assert!(domain.is_fetch());
        assert!(domain.to_string().contains("failed to fetch K3s versions"));
    }
}
