#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod hooks;

pub use hooks::{
    GitHubStatsData, GitHubStatsHook, GitHubStatsSnapshot, ResourceHook, ResourceSnapshot,
};

use std::time::Duration;

use optiblog_stats_models::{
    ActivityStats, ApiResponse, CommunityEvent, ContributorStats, Discussion, IssueStats,
    RepositoryStats, Resource,
};
use serde::de::DeserializeOwned;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with `success: false`.
    #[error("{0}")]
    Api(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// HTTP client for the `/api/github/*` endpoints of a running site API.
#[derive(Clone)]
pub struct SiteClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SiteClient {
    /// # Errors
    ///
    /// * If the underlying HTTP client fails to initialize
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// # Errors
    ///
    /// * If the underlying HTTP client fails to initialize
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one resource and unwrap its envelope.
    ///
    /// # Errors
    ///
    /// * If the request fails
    /// * If the envelope reports `success: false`
    /// * If the body is not an envelope of `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> Result<ApiResponse<T>, ClientError> {
        let url = format!("{}{}", self.base_url, resource.path());
        log::debug!("GET {url}");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ClientError::Decode(e.to_string())),
            Err(_) => {
                return Err(ClientError::Api(format!(
                    "Failed to fetch {}: HTTP {}",
                    resource.noun(),
                    status.as_u16()
                )));
            }
        };

        if !envelope.success {
            let message = envelope
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| format!("Failed to fetch {}", resource.noun()));
            log::error!("Failed to fetch {}: {message}", resource.noun());
            return Err(ClientError::Api(message));
        }

        if let Some(warning) = &envelope.error {
            log::warn!("{}: {warning}", resource.noun());
        }

        Ok(envelope)
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn repository_stats(&self) -> Result<ApiResponse<RepositoryStats>, ClientError> {
        self.fetch(Resource::Stats).await
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn contributors(&self) -> Result<ApiResponse<Vec<ContributorStats>>, ClientError> {
        self.fetch(Resource::Contributors).await
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn issues(&self) -> Result<ApiResponse<IssueStats>, ClientError> {
        self.fetch(Resource::Issues).await
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn activity(&self) -> Result<ApiResponse<ActivityStats>, ClientError> {
        self.fetch(Resource::Activity).await
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn discussions(&self) -> Result<ApiResponse<Vec<Discussion>>, ClientError> {
        self.fetch(Resource::Discussions).await
    }

    /// # Errors
    ///
    /// * See [`SiteClient::fetch`]
    pub async fn events(&self) -> Result<ApiResponse<Vec<CommunityEvent>>, ClientError> {
        self.fetch(Resource::Events).await
    }

    /// Whether `/health` answers 2xx.
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        matches!(
            self.http_client.get(&url).send().await,
            Ok(response) if response.status().is_success()
        )
    }
}
