#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use optiblog_fallback::FallbackData;
use optiblog_github::RepoId;
use optiblog_server::{
    RunServerResponse, ServerConfig, run_server_with_handle, run_server_with_state,
    state::AppState,
};
use optiblog_stats_provider::StatsProvider;

pub const OWNER: &str = "solve-ease";
pub const REPO: &str = "OptiBlogAi";

pub struct TestServer {
    port: u16,
    http_url: String,
    handle: actix_web::dev::ServerHandle,
}

impl TestServer {
    /// Serve the GitHub API mocked at `api_url`, without response caching.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start or no ports are available
    pub async fn start(api_url: &str) -> anyhow::Result<Self> {
        Self::start_with_config(Self::config(api_url)).await
    }

    #[must_use]
    pub fn config(api_url: &str) -> ServerConfig {
        ServerConfig::new("127.0.0.1".to_string(), 0)
            .with_repository(RepoId::new(OWNER, REPO))
            .with_api_url(api_url.to_string())
            .with_upstream_timeout(Duration::from_secs(2))
            .with_cache_ttl(Duration::ZERO)
    }

    /// # Errors
    ///
    /// Returns an error if the server fails to start or no ports are available
    pub async fn start_with_config(config: ServerConfig) -> anyhow::Result<Self> {
        Self::wrap(run_server_with_handle(&config)?).await
    }

    /// Serve an arbitrary provider with the built-in fallback data.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start or no ports are available
    pub async fn start_with_provider(provider: Arc<dyn StatsProvider>) -> anyhow::Result<Self> {
        let state = AppState::new(provider, FallbackData::builtin()?);
        let config = ServerConfig::new("127.0.0.1".to_string(), 0);

        Self::wrap(run_server_with_state(&config, state)?).await
    }

    async fn wrap(response: RunServerResponse) -> anyhow::Result<Self> {
        let port = response
            .addrs
            .first()
            .ok_or_else(|| anyhow::anyhow!("Expected at least one address"))?
            .port();
        let http_url = format!("http://127.0.0.1:{port}");

        wait_for_server_ready(&http_url).await?;

        Ok(Self {
            port,
            http_url,
            handle: response.handle,
        })
    }

    #[must_use]
    pub fn http_url(&self) -> &str {
        &self.http_url
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.http_url)
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            handle.stop(true).await;
        });
    }
}

async fn wait_for_server_ready(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{url}/health");

    for _ in 0..30 {
        if let Ok(response) = client.get(&health_url).send().await
            && response.status().is_success()
        {
            return Ok(());
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server failed to start within timeout")
}
