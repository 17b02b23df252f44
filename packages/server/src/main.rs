#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use optiblog_github::RepoId;
use optiblog_server::{ServerConfig, ServerError, run_server};

#[derive(Parser)]
#[command(name = "optiblog-server")]
#[command(about = "Serve normalized GitHub statistics for the OptiBlog site", long_about = None)]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// `owner/name` or a github.com URL
    #[arg(short, long, env = "GITHUB_REPOSITORY", default_value = "solve-ease/OptiBlogAi")]
    repository: RepoId,

    #[arg(long, env = "GITHUB_API_URL", default_value = optiblog_github::DEFAULT_BASE_URL)]
    api_url: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    upstream_timeout_secs: u64,

    /// 0 disables the upstream response cache
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    cache_ttl_secs: u64,

    /// JSON file overriding the built-in fallback discussions and events
    #[arg(long, env = "FALLBACK_DATA")]
    fallback_data: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    env_logger::init();

    let cli = Cli::parse();

    let config = ServerConfig::new(cli.host, cli.port)
        .with_repository(cli.repository)
        .with_api_url(cli.api_url)
        .with_token(cli.token)
        .with_upstream_timeout(Duration::from_secs(cli.upstream_timeout_secs))
        .with_cache_ttl(Duration::from_secs(cli.cache_ttl_secs))
        .with_fallback_path(cli.fallback_data);

    run_server(config).await
}
