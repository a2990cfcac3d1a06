//! HTTP transport used by providers
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry on transport errors and rate limiting
//! - Pass-through request headers supplied by providers
//!
//! Every failure is reported as a `DatasourceError::Fetch` naming the
//! provider and the URL.

use crate::error::DatasourceError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("renovate-datasource/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, DatasourceError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, DatasourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| {
                DatasourceError::provider_with_source(
                    format!("failed to create HTTP client: {}", e),
                    e,
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic.
    ///
    /// Non-success statuses other than 429 fail immediately.
    pub async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        provider: &str,
    ) -> Result<reqwest::Response, DatasourceError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.get(url);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            tracing::debug!(provider, url, attempt, "sending request");
            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(DatasourceError::http_status(
                            provider,
                            url,
                            status.as_u16(),
                        ));

                        if attempt < self.max_retries {
                            tracing::warn!(provider, url, "rate limited, retrying");
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if !status.is_success() {
                        return Err(DatasourceError::http_status(provider, url, status.as_u16()));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    let message = if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        e.to_string()
                    };
                    last_error = Some(DatasourceError::fetch_with_source(provider, url, message, e));

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DatasourceError::fetch(provider, url, "unknown error")))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        provider: &str,
    ) -> Result<T, DatasourceError> {
        let response = self.get(url, headers, provider).await?;
        response.json::<T>().await.map_err(|e| {
            DatasourceError::fetch_with_source(
                provider,
                url,
                format!("invalid JSON response: {}", e),
                e,
            )
        })
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        provider: &str,
    ) -> Result<String, DatasourceError> {
        let response = self.get(url, headers, provider).await?;
        response.text().await.map_err(|e| {
            DatasourceError::fetch_with_source(
                provider,
                url,
                format!("failed to read response body: {}", e),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_http_client_with_max_retries() {
        let client = HttpClient::new().unwrap().with_max_retries(5);
        assert_eq!(client.max_retries, 5);
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("renovate-datasource/"));
        assert_eq!(MAX_RETRIES, 3);
    }

    #[tokio::test]
    async fn test_get_json_passes_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/releases")
            .match_header("accept", "application/vnd.github.v3+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"tag_name": "v1.0.0"}]"#)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/releases", server.url());
        let body: serde_json::Value = client
            .get_json(&url, &[("Accept", "application/vnd.github.v3+json")], "test")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body[0]["tag_name"], "v1.0.0");
    }

    #[tokio::test]
    async fn test_get_json_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/missing", server.url());
        let err = client
            .get_json::<serde_json::Value>(&url, &[], "test")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("test"));
    }

    #[tokio::test]
    async fn test_get_json_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/broken", server.url());
        let err = client
            .get_json::<serde_json::Value>(&url, &[], "test")
            .await
            .unwrap_err();

        assert!(err.is_fetch());
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[tokio::test]
    async fn test_get_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/list")
            .with_status(200)
            .with_body("v1\nv2\n")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/list", server.url());
        let text = client.get_text(&url, &[], "test").await.unwrap();
        assert_eq!(text, "v1\nv2\n");
    }

    #[tokio::test]
    async fn test_connection_refused_keeps_cause() {
        // Bind then drop a listener so the port is known to be closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/releases", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpClient::new().unwrap().with_max_retries(0);
        let err = client
            .get_json::<serde_json::Value>(&url, &[], "test")
            .await
            .unwrap_err();

        assert!(err.is_fetch());
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_cause() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("{")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/broken", server.url());
        let err = client
            .get_json::<serde_json::Value>(&url, &[], "test")
            .await
            .unwrap_err();

        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/limited")
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap().with_max_retries(1);
        let url = format!("{}/limited", server.url());
        let err = client.get(&url, &[], "test").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, DatasourceError::Fetch { status: Some(429), .. }));
    }
}
