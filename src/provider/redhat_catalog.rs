//! Red Hat Container Catalog provider
//!
//! Fetches container image tags from Red Hat's Pyxis API and keeps only
//! `major.minor-timestamp` tags such as `9.5-1734081738`.

use crate::domain::Manifest;
use crate::error::DatasourceError;
use crate::http::HttpClient;
use crate::provider::Provider;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Pyxis API base URL
const CATALOG_API_URL: &str = "https://catalog.redhat.com/api/containers/v1";

pub const DEFAULT_IMAGE_PATH: &str = "ubi9/ubi";
pub const DEFAULT_REGISTRY: &str = "registry.access.redhat.com";

/// Pattern for versions like 9.5-1734081738
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+-\d+$").expect("valid version pattern"));

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    tags: Vec<String>,
}

/// Keep tags matching `major.minor-timestamp`, sorted descending
pub fn filter_version_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut versions: Vec<String> = tags
        .iter()
        .map(|tag| tag.as_ref())
        .filter(|tag| VERSION_PATTERN.is_match(tag))
        .map(str::to_string)
        .collect();
    versions.sort_by(|a, b| b.cmp(a));
    versions
}

/// Provider for Red Hat container versions
pub struct RedHatCatalogProvider {
    client: HttpClient,
    image_path: String,
    registry: String,
    api_url: String,
}

impl RedHatCatalogProvider {
    /// Create a new provider for `image_path` hosted on `registry`
    pub fn new(
        client: HttpClient,
        image_path: impl Into<String>,
        registry: impl Into<String>,
    ) -> Self {
        Self {
            client,
            image_path: image_path.into(),
            registry: registry.into(),
            api_url: CATALOG_API_URL.to_string(),
        }
    }

    /// Point the provider at a different catalog API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    fn images_url(&self, base: &str) -> String {
        format!(
            "{}/repositories/registry/{}/repository/{}/images",
            base, self.registry, self.image_path
        )
    }
}

#[async_trait]
impl Provider for RedHatCatalogProvider {
    fn name(&self) -> &str {
        "redhat-catalog"
    }

    async fn fetch_versions(&self) -> anyhow::Result<Vec<String>> {
        let url = self.images_url(&self.api_url);
        let response: ImagesResponse = self
            .client
            .get_json(&url, &[], self.name())
            .await
            .map_err(|e| {
                e.with_context(format!(
                    "failed to fetch Red Hat container versions for {}",
                    self.image_path
                ))
            })?;

        if response.tags.is_empty() {
            return Err(DatasourceError::fetch(
                self.name(),
                &url,
                format!("no tags found for {}", self.image_path),
            )
            .into());
        }

        let versions = filter_version_tags(&response.tags);
        if versions.is_empty() {
            return Err(DatasourceError::fetch(
                self.name(),
                &url,
                format!(
                    "no versions matching pattern found for {}: found {} tags but none matched major.minor-timestamp format",
                    self.image_path,
                    response.tags.len()
                ),
            )
            .into());
        }

        tracing::debug!(
            provider = self.name(),
            image = %self.image_path,
            total = response.tags.len(),
            matched = versions.len(),
            "filtered catalog tags"
        );
        Ok(versions)
    }

    fn create_manifest(&self, versions: &[String]) -> anyhow::Result<Manifest> {
        Ok(Manifest::from_versions(versions)
            .with_source_url(format!("https://{}/{}", self.registry, self.image_path))
            .with_homepage(self.images_url(CATALOG_API_URL)))
    }
}
