use std::time::Duration;

use optiblog_github_models::{
    ApiErrorBody, Commit, CommitActivity, Contributor, DiscussionNode, DiscussionsQueryData,
    GraphQlResponse, Issue, Languages, Repository, UserProfile,
};
use optiblog_stats_models::RateLimit;
use optiblog_stats_provider::{Fetched, ProviderError};
use reqwest::{StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;

use crate::{
    RepoId,
    cache::{CacheStats, ResponseCache},
};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = "OptiBlogAi-Website/1.0.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT: &str = "application/vnd.github.v3+json";

const DISCUSSIONS_QUERY: &str = r"
  query($owner: String!, $name: String!, $first: Int!) {
    repository(owner: $owner, name: $name) {
      discussions(first: $first, orderBy: {field: UPDATED_AT, direction: DESC}) {
        nodes {
          id
          title
          body
          url
          createdAt
          updatedAt
          comments { totalCount }
          reactions { totalCount }
          reactionGroups { content users { totalCount } }
          author { login avatarUrl url }
          category { name emoji }
          answerChosenAt
          upvoteCount
        }
      }
    }
  }
";

/// Thin client over the GitHub REST v3 and GraphQL APIs for one repository.
///
/// Each call issues exactly one request. There are no retries: any non-2xx
/// status fails the call with [`ProviderError::Upstream`].
pub struct GitHubClient {
    http_client: reqwest::Client,
    auth_token: Option<String>,
    base_url: String,
    repo: RepoId,
    timeout: Duration,
    cache: Option<ResponseCache>,
}

struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
    rate_limit: Option<RateLimit>,
}

impl GitHubClient {
    /// Create an unauthenticated client for `repo` against the public API.
    ///
    /// # Errors
    ///
    /// * If the underlying HTTP client fails to initialize
    pub fn new(repo: RepoId) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            auth_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            repo,
            timeout: DEFAULT_TIMEOUT,
            cache: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cache successful GET bodies for `ttl`. A zero TTL disables caching.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = if ttl.is_zero() {
            None
        } else {
            Some(ResponseCache::new(ttl))
        };
        self
    }

    #[must_use]
    pub const fn repo(&self) -> &RepoId {
        &self.repo
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.auth_token.is_some()
    }

    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            Some(cache) => cache.stats().await,
            None => CacheStats::default(),
        }
    }

    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a repository object
    pub async fn repository(&self) -> Result<Fetched<Repository>, ProviderError> {
        self.get_json(&self.repo_path("")).await
    }

    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a contributor list
    pub async fn contributors(&self) -> Result<Fetched<Vec<Contributor>>, ProviderError> {
        self.get_json(&self.repo_path("/contributors")).await
    }

    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a user object
    pub async fn user(&self, login: &str) -> Result<Fetched<UserProfile>, ProviderError> {
        self.get_json(&format!("/users/{login}")).await
    }

    /// Up to 100 issues (and pull requests) in any state.
    ///
    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not an issue list
    pub async fn issues(&self) -> Result<Fetched<Vec<Issue>>, ProviderError> {
        self.get_json(&self.repo_path("/issues?state=all&per_page=100"))
            .await
    }

    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a commit list
    pub async fn commits(&self) -> Result<Fetched<Vec<Commit>>, ProviderError> {
        self.get_json(&self.repo_path("/commits?per_page=100")).await
    }

    /// Weekly commit counts for the last year.
    ///
    /// GitHub answers `202 Accepted` with an empty body while it computes
    /// the statistics; that is reported as no activity.
    ///
    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a commit activity list
    pub async fn commit_activity(&self) -> Result<Fetched<Vec<CommitActivity>>, ProviderError> {
        let response = self
            .fetch(&self.repo_path("/stats/commit_activity"))
            .await?;

        if response.status == StatusCode::ACCEPTED || is_blank(&response.body) {
            log::debug!("Commit activity for {} is still being computed", self.repo);
            return Ok(Fetched::new(vec![], response.rate_limit));
        }

        Ok(Fetched::new(decode(&response.body)?, response.rate_limit))
    }

    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not a language map
    pub async fn languages(&self) -> Result<Fetched<Languages>, ProviderError> {
        self.get_json(&self.repo_path("/languages")).await
    }

    /// Issues labelled `discussion`, most recently updated first.
    ///
    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not an issue list
    pub async fn discussion_issues(&self) -> Result<Fetched<Vec<Issue>>, ProviderError> {
        self.get_json(&self.repo_path(
            "/issues?labels=discussion&state=all&sort=updated&per_page=10",
        ))
        .await
    }

    /// Issues carrying any of the event labels.
    ///
    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the body is not an issue list
    pub async fn event_issues(&self) -> Result<Fetched<Vec<Issue>>, ProviderError> {
        self.get_json(&self.repo_path(
            "/issues?labels=event,hackathon,workshop,meetup,webinar,conference&state=all&per_page=20",
        ))
        .await
    }

    /// Discussion threads through the GraphQL API. Requires a token.
    ///
    /// # Errors
    ///
    /// * If the request fails or GitHub responds with a non-2xx status
    /// * If the GraphQL response carries errors or no repository
    pub async fn discussions(&self, first: u32) -> Result<Fetched<Vec<DiscussionNode>>, ProviderError> {
        let url = format!("{}/graphql", self.base_url);
        log::debug!("POST {url}");

        let body = serde_json::json!({
            "query": DISCUSSIONS_QUERY,
            "variables": {
                "owner": self.repo.owner,
                "name": self.repo.name,
                "first": first,
            },
        });

        let mut request = self
            .http_client
            .post(&url)
            .header("Accept", ACCEPT)
            .timeout(self.timeout)
            .json(&body);

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = self.complete(request).await?;
        let graphql: GraphQlResponse<DiscussionsQueryData> = decode(&response.body)?;

        if !graphql.errors.is_empty() {
            let message = graphql
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            log::error!("GitHub GraphQL error: {message}");
            return Err(ProviderError::Upstream {
                status: response.status.as_u16(),
                message,
            });
        }

        let repository = graphql
            .data
            .and_then(|data| data.repository)
            .ok_or_else(|| ProviderError::SchemaMismatch("missing repository".to_string()))?;

        Ok(Fetched::new(
            repository.discussions.nodes,
            response.rate_limit,
        ))
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.repo.owner, self.repo.name)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Fetched<T>, ProviderError> {
        let response = self.fetch(path).await?;
        Ok(Fetched::new(decode(&response.body)?, response.rate_limit))
    }

    async fn fetch(&self, path: &str) -> Result<RawResponse, ProviderError> {
        let url = format!("{}{path}", self.base_url);

        if let Some(cache) = &self.cache
            && let Some(body) = cache.get(&url).await
        {
            log::trace!("Cache hit for {url}");
            return Ok(RawResponse {
                status: StatusCode::OK,
                body,
                rate_limit: None,
            });
        }

        log::debug!("GET {url}");
        let mut request = self
            .http_client
            .get(&url)
            .header("Accept", ACCEPT)
            .timeout(self.timeout);

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = self.complete(request).await?;

        if let Some(cache) = &self.cache
            && response.status == StatusCode::OK
        {
            cache.insert(url, response.body.clone()).await;
        }

        Ok(response)
    }

    async fn complete(&self, request: reqwest::RequestBuilder) -> Result<RawResponse, ProviderError> {
        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let rate_limit = parse_rate_limit(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?
            .to_vec();

        if !status.is_success() {
            let message = upstream_message(status, &body);
            log::error!("GitHub API error: {status}: {message}");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(RawResponse {
            status,
            body,
            rate_limit,
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            log::error!("GitHub API request timed out after {:?}", self.timeout);
            ProviderError::Transport(format!(
                "GitHub API request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            log::error!("GitHub API request failed: {error}");
            ProviderError::Transport(format!("GitHub API request failed: {error}"))
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body).map_err(|e| ProviderError::SchemaMismatch(e.to_string()))
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace) || body == b"{}"
}

/// The `message` of GitHub's error body, or a status line when there is none.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}

/// Reads the `x-ratelimit-*` headers. `None` when GitHub sent none of them.
#[must_use]
pub fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimit> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    let limit = read("x-ratelimit-limit");
    let remaining = read("x-ratelimit-remaining");
    let reset = read("x-ratelimit-reset");
    let used = read("x-ratelimit-used");

    if limit.is_none() && remaining.is_none() && reset.is_none() && used.is_none() {
        return None;
    }

    let defaults = RateLimit::default();
    Some(RateLimit {
        limit: limit.unwrap_or(defaults.limit),
        remaining: remaining.unwrap_or(defaults.remaining),
        reset: reset.unwrap_or(defaults.reset),
        used: used.unwrap_or(defaults.used),
    })
}
