//! HTTP client for the package index JSON API

use crate::error::{Result, VersionInfoError};
use crate::types::UNKNOWN;
use crate::{DEFAULT_INDEX_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Release metadata returned by `GET /pypi/{name}/json`
#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(default)]
    info: Option<IndexInfo>,
}

#[derive(Debug, Deserialize)]
struct IndexInfo {
    #[serde(default)]
    version: Option<String>,
}

/// HTTP client for package index lookups
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl IndexClient {
    /// Create a new client builder
    pub fn builder() -> IndexClientBuilder {
        IndexClientBuilder::default()
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the version the index advertises as latest.
    ///
    /// A well-formed response without `info.version` yields `"unknown"`
    /// rather than an error.
    pub async fn latest_version(&self, package: &str) -> Result<String> {
        self.validate_package_name(package)?;

        let url = format!(
            "{}/pypi/{}/json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(package)
        );
        debug!("Fetching package index entry: {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let parsed: IndexResponse = serde_json::from_str(&body)?;
                let version = parsed
                    .info
                    .and_then(|info| info.version)
                    .unwrap_or_else(|| UNKNOWN.to_string());

                info!("Package index lists '{}' at version {}", package, version);
                Ok(version)
            }
            StatusCode::NOT_FOUND => Err(VersionInfoError::PackageNotPublished(package.to_string())),
            status => Err(VersionInfoError::from(status)),
        }
    }

    /// Validate a distribution name before it goes into a URL
    pub fn validate_package_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(VersionInfoError::InvalidPackageName(
                name.to_string(),
                "Package name cannot be empty",
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(VersionInfoError::InvalidPackageName(
                name.to_string(),
                "Names may contain ASCII letters, digits, '-', '_' and '.'",
            ));
        }

        Ok(())
    }

    /// Request timeout in effect
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for creating an IndexClient with custom configuration
#[derive(Debug, Default)]
pub struct IndexClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl IndexClientBuilder {
    /// Set the base URL of the package index
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the user agent string
    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the IndexClient
    pub fn build(self) -> Result<IndexClient> {
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(IndexClient {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string()),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(server: &mockito::ServerGuard) -> IndexClient {
        IndexClient::builder()
            .base_url(server.url())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_latest_version_reads_info_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/neovim/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"info": {"version": "0.5.0", "name": "neovim"}, "releases": {}}"#)
            .create_async()
            .await;

        let version = client_for(&server).latest_version("neovim").await.unwrap();

        mock.assert_async().await;
        assert_eq!(version, "0.5.0");
    }

    #[tokio::test]
    async fn test_missing_version_field_is_unknown() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/neovim/json")
            .with_status(200)
            .with_body(r#"{"info": {"name": "neovim"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/pypi/pynvim/json")
            .with_status(200)
            .with_body(r#"{"releases": {}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.latest_version("neovim").await.unwrap(), UNKNOWN);
        assert_eq!(client.latest_version("pynvim").await.unwrap(), UNKNOWN);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/neovim/json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .latest_version("neovim")
            .await
            .unwrap_err();
        assert!(matches!(err, VersionInfoError::JsonError(_)));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/no-such-package/json")
            .with_status(404)
            .create_async()
            .await;

        let err = client_for(&server)
            .latest_version("no-such-package")
            .await
            .unwrap_err();
        assert!(matches!(err, VersionInfoError::PackageNotPublished(name) if name == "no-such-package"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pypi/neovim/json")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server)
            .latest_version("neovim")
            .await
            .unwrap_err();
        assert!(matches!(err, VersionInfoError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_validate_package_name() {
        let client = IndexClient::builder().build().unwrap();
        assert!(client.validate_package_name("neovim").is_ok());
        assert!(client.validate_package_name("zope.interface").is_ok());
        assert!(client.validate_package_name("").is_err());
        assert!(client.validate_package_name("../etc").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let client = IndexClient::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_INDEX_URL);
        assert_eq!(client.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
