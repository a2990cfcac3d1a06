//! Red Hat Docker provider for UBI images
//!
//! Emits one docker package per repository from the Red Hat Container
//! Catalog. API endpoints:
//! - Repository: {registry_url}/repositories/registry/registry.access.redhat.com/repository/{repo}
//! - Images: {registry_url}/repositories/id/{id}/images?page_size=100&page={n}

use crate::config::ProviderConfig;
use crate::domain::{DatasourceOutput, VersionInfo};
use crate::error::DatasourceError;
use crate::http::HttpClient;
use crate::provider::{DatasourceProvider, FetchOptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Reverse;

/// Red Hat Container Catalog API URL
pub const DEFAULT_REGISTRY_URL: &str = "https://catalog.redhat.com/api/containers/v1";

const REGISTRY_HOST: &str = "registry.access.redhat.com";
const CATALOG_URL: &str = "https://catalog.redhat.com";
const PAGE_SIZE: usize = 100;

/// Repositories fetched when no targets are given
pub const DEFAULT_REPOSITORIES: &[&str] = &["ubi9/ubi-minimal", "ubi8", "ubi9"];

/// Configuration for the Red Hat Docker provider
#[derive(Debug, Clone, PartialEq)]
pub struct RedHatDockerConfig {
    /// Shared provider settings
    pub base: ProviderConfig,
    /// Red Hat Container Catalog API URL
    pub registry_url: String,
}

impl RedHatDockerConfig {
    pub fn new(base: ProviderConfig) -> Self {
        Self {
            base,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }

    pub fn with_registry_url(mut self, registry_url: impl Into<String>) -> Self {
        self.registry_url = registry_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for RedHatDockerConfig {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    #[serde(rename = "_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesPage {
    #[serde(default)]
    data: Vec<ImageRecord>,
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ImageRecord {
    #[serde(default)]
    repositories: Vec<ImageRepository>,
    parsed_data: Option<ParsedData>,
    manifest_schema2_digest: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageRepository {
    #[serde(default)]
    tags: Vec<ImageTag>,
}

#[derive(Debug, Deserialize)]
struct ImageTag {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParsedData {
    created: Option<String>,
}

/// Provider for Red Hat UBI images
pub struct RedHatDockerProvider {
    config: RedHatDockerConfig,
    client: HttpClient,
}

impl RedHatDockerProvider {
    /// Create a provider with its own HTTP client
    pub fn new(config: RedHatDockerConfig) -> Result<Self, DatasourceError> {
        let client = HttpClient::with_timeout(config.base.timeout)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RedHatDockerConfig {
        &self.config
    }

    fn repository_url(&self, repository: &str) -> String {
        format!(
            "{}/repositories/registry/{}/repository/{}",
            self.config.registry_url, REGISTRY_HOST, repository
        )
    }

    fn images_url(&self, repository_id: &str, page: usize) -> String {
        format!(
            "{}/repositories/id/{}/images?page_size={}&page={}",
            self.config.registry_url, repository_id, PAGE_SIZE, page
        )
    }

    /// Look up a repository's catalog ID. `None` when the repository does not exist.
    async fn fetch_repository(
        &self,
        repository: &str,
    ) -> Result<Option<RepositoryResponse>, DatasourceError> {
        let url = self.repository_url(repository);
        tracing::debug!(provider = self.name(), url = %url, "fetching repository data");

        match self.client.get_json(&url, &[], self.name()).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Collect every image record for a repository, page by page
    async fn fetch_images(&self, repository_id: &str) -> Result<Vec<ImageRecord>, DatasourceError> {
        let mut images = Vec::new();
        let mut page = 0;

        loop {
            let url = self.images_url(repository_id, page);
            tracing::debug!(provider = self.name(), url = %url, "fetching image page");
            let response: ImagesPage = self.client.get_json(&url, &[], self.name()).await?;

            if response.data.is_empty() {
                break;
            }
            images.extend(response.data);

            if images.len() >= response.total {
                break;
            }
            page += 1;
        }

        tracing::info!(
            provider = self.name(),
            repository_id,
            count = images.len(),
            "found image tags"
        );
        Ok(images)
    }

    async fn fetch_repository_output(
        &self,
        repository: &str,
    ) -> Result<Option<DatasourceOutput>, DatasourceError> {
        let Some(data) = self.fetch_repository(repository).await? else {
            tracing::warn!(provider = self.name(), repository, "skipping repository: not found");
            return Ok(None);
        };
        let Some(repository_id) = data.id.filter(|id| !id.is_empty()) else {
            tracing::warn!(provider = self.name(), repository, "skipping repository: no ID found");
            return Ok(None);
        };

        let images = self.fetch_images(&repository_id).await?;
        let mut versions: Vec<VersionInfo> = images.iter().filter_map(parse_version_info).collect();
        sort_newest_first(&mut versions);

        Ok(Some(
            DatasourceOutput::new("docker", format!("{}/{}", REGISTRY_HOST, repository))
                .with_versions(versions)
                .with_registry_url(CATALOG_URL)
                .with_homepage(format!(
                    "{}/software/containers/{}",
                    CATALOG_URL,
                    repository.replace('/', "%2F")
                )),
        ))
    }
}

/// Build a VersionInfo from one image record, `None` if it carries no tag
fn parse_version_info(image: &ImageRecord) -> Option<VersionInfo> {
    let version = image
        .repositories
        .first()?
        .tags
        .first()?
        .name
        .as_deref()
        .filter(|name| !name.is_empty())?;

    let released_at = image
        .parsed_data
        .as_ref()
        .and_then(|p| p.created.as_deref())
        .and_then(|created| DateTime::parse_from_rfc3339(created).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let digest = image
        .manifest_schema2_digest
        .as_ref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("sha256:{}", d));

    Some(
        VersionInfo::new(version)
            .with_release_timestamp(released_at)
            .with_digest(digest),
    )
}

/// Newest first; versions without a timestamp go last
fn sort_newest_first(versions: &mut [VersionInfo]) {
    versions.sort_by_key(|v| Reverse(v.release_timestamp));
}

#[async_trait]
impl DatasourceProvider for RedHatDockerProvider {
    fn name(&self) -> &str {
        "redhat-docker"
    }

    async fn fetch_outputs(&self, options: &FetchOptions) -> anyhow::Result<Vec<DatasourceOutput>> {
        let repositories: Vec<String> = if options.targets.is_empty() {
            DEFAULT_REPOSITORIES.iter().map(|r| r.to_string()).collect()
        } else {
            options.targets.clone()
        };

        let mut outputs = Vec::new();
        for repository in &repositories {
            tracing::info!(provider = self.name(), repository = %repository, "processing repository");
            match self.fetch_repository_output(repository).await {
                Ok(Some(output)) => {
                    tracing::info!(
                        provider = self.name(),
                        repository = %repository,
                        versions = output.versions.len(),
                        "processed repository"
                    );
                    outputs.push(output);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        provider = self.name(),
                        repository = %repository,
                        error = %e,
                        "failed to process repository"
                    );
                }
            }
        }

        Ok(outputs)
    }
}
