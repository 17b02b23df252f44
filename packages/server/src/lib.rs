#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod routes;
pub mod state;

use std::{path::PathBuf, time::Duration};

use actix_web::{App, HttpServer, middleware, web};
use optiblog_fallback::FallbackError;
use optiblog_github::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RepoId};
use optiblog_stats_provider::ProviderError;
use state::AppState;
use tokio::task::JoinHandle;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to create GitHub client: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Fallback(#[from] FallbackError),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub repository: RepoId,
    pub api_url: String,
    pub token: Option<String>,
    pub upstream_timeout: Duration,
    /// Zero disables the upstream response cache.
    pub cache_ttl: Duration,
    pub fallback_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            repository: RepoId::default(),
            api_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            upstream_timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            fallback_path: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_repository(mut self, repository: RepoId) -> Self {
        self.repository = repository;
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub const fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_fallback_path(mut self, path: Option<PathBuf>) -> Self {
        self.fallback_path = path;
        self
    }
}

/// # Errors
///
/// Returns an error if the server fails to start or run
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let RunServerResponse { join_handle, .. } = run_server_with_handle(&config)?;

    join_handle.await.map_err(std::io::Error::other)??;

    Ok(())
}

pub struct RunServerResponse {
    pub handle: actix_web::dev::ServerHandle,
    pub addrs: Vec<std::net::SocketAddr>,
    pub join_handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Start the server against the GitHub API described by `config`.
///
/// # Errors
///
/// Returns an error if the provider or fallback data cannot be set up or the
/// server fails to bind
pub fn run_server_with_handle(config: &ServerConfig) -> Result<RunServerResponse, ServerError> {
    let state = AppState::from_config(config)?;

    Ok(run_server_with_state(config, state)?)
}

/// Start the server with an already assembled [`AppState`]. Only `host` and
/// `port` are read from `config`.
///
/// # Errors
///
/// Returns an error if the server fails to bind
pub fn run_server_with_state(
    config: &ServerConfig,
    state: AppState,
) -> std::io::Result<RunServerResponse> {
    log::info!(
        "Starting site API on {}:{} (provider: {})",
        config.host,
        config.port,
        state.provider.provider_name()
    );

    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .bind((config.host.as_str(), config.port))?;

    let addrs = server.addrs();
    let server = server.run();
    let handle = server.handle();

    let join_handle = tokio::spawn(server);

    Ok(RunServerResponse {
        handle,
        addrs,
        join_handle,
    })
}
