use std::sync::Arc;

use optiblog_fallback::FallbackData;
use optiblog_github::{GitHubClient, GitHubProvider};
use optiblog_stats_provider::StatsProvider;

use crate::{ServerConfig, ServerError};

/// Shared by every worker. Both parts are immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn StatsProvider>,
    pub fallback: Arc<FallbackData>,
}

impl AppState {
    #[must_use]
    pub fn new(provider: Arc<dyn StatsProvider>, fallback: FallbackData) -> Self {
        Self {
            provider,
            fallback: Arc::new(fallback),
        }
    }

    /// Build the GitHub provider and load the fallback data described by
    /// `config`.
    ///
    /// # Errors
    ///
    /// * If the HTTP client cannot be created
    /// * If the fallback data cannot be loaded
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let mut client = GitHubClient::new(config.repository.clone())?
            .with_base_url(config.api_url.clone())
            .with_timeout(config.upstream_timeout)
            .with_cache_ttl(config.cache_ttl);

        if let Some(token) = &config.token {
            client = client.with_token(token.clone());
        }

        let fallback = FallbackData::load(config.fallback_path.as_deref())?;

        log::info!(
            "Serving {} via {} (authenticated: {}, cache ttl: {:?})",
            config.repository,
            config.api_url,
            client.has_token(),
            config.cache_ttl
        );

        Ok(Self::new(Arc::new(GitHubProvider::new(client)), fallback))
    }
}
