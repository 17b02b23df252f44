//! Stateful data hooks for UI consumers.
//!
//! A hook owns a snapshot of `{data, loading, error}` behind an
//! `Arc<RwLock<..>>`; clones share the same state. `refetch` may run
//! concurrently from several clones, the last one to finish wins.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use optiblog_stats_models::{
    ActivityStats, ApiResponse, CommunityEvent, ContributorStats, Discussion, IssueStats, RateLimit,
    RepositoryStats, Resource,
};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::{ClientError, SiteClient};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubStatsData {
    pub repository: RepositoryStats,
    pub contributors: Vec<ContributorStats>,
    pub issues: Option<IssueStats>,
    pub activity: Option<ActivityStats>,
    /// Always the unauthenticated default; the aggregate view does not track
    /// quota.
    pub rate_limit: RateLimit,
    pub last_fetched: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubStatsSnapshot {
    /// Present only when the repository stats loaded.
    pub data: Option<GitHubStatsData>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct GitHubStatsState {
    repository: Option<RepositoryStats>,
    contributors: Vec<ContributorStats>,
    issues: Option<IssueStats>,
    activity: Option<ActivityStats>,
    last_fetched: Option<String>,
    loading: bool,
    error: Option<String>,
}

/// Aggregate view over stats, contributors, issues and activity.
#[derive(Clone)]
pub struct GitHubStatsHook {
    client: SiteClient,
    state: Arc<RwLock<GitHubStatsState>>,
}

impl GitHubStatsHook {
    #[must_use]
    pub fn new(client: SiteClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(GitHubStatsState::default())),
        }
    }

    /// Create the hook and, when `auto_fetch` is set, load it once.
    pub async fn mount(client: SiteClient, auto_fetch: bool) -> Self {
        let hook = Self::new(client);
        if auto_fetch {
            hook.refetch().await;
        }
        hook
    }

    /// Reload all four resources concurrently.
    ///
    /// Each resource settles independently. The error is only set when all
    /// four fail; otherwise the failures are logged and the loaded parts are
    /// kept.
    pub async fn refetch(&self) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let (repository, contributors, issues, activity) = futures::join!(
            self.client.repository_stats(),
            self.client.contributors(),
            self.client.issues(),
            self.client.activity(),
        );

        let mut errors = vec![];
        let repository = settle("Repository", repository, &mut errors);
        let contributors = settle("Contributors", contributors, &mut errors);
        let issues = settle("Issues", issues, &mut errors);
        let activity = settle("Activity", activity, &mut errors);

        let error = if errors.len() == 4 {
            log::warn!("All GitHub data failed to load: {errors:?}");
            Some(format!("Failed to load GitHub data: {}", errors.join(", ")))
        } else {
            if !errors.is_empty() {
                log::warn!("Some GitHub data failed to load: {errors:?}");
            }
            None
        };

        let mut state = self.state.write().await;
        state.repository = repository;
        state.contributors = contributors.unwrap_or_default();
        state.issues = issues;
        state.activity = activity;
        state.last_fetched = Some(now());
        state.error = error;
        state.loading = false;
    }

    pub async fn snapshot(&self) -> GitHubStatsSnapshot {
        let state = self.state.read().await;

        GitHubStatsSnapshot {
            data: state.repository.clone().map(|repository| GitHubStatsData {
                repository,
                contributors: state.contributors.clone(),
                issues: state.issues.clone(),
                activity: state.activity.clone(),
                rate_limit: RateLimit::default(),
                last_fetched: state.last_fetched.clone().unwrap_or_else(now),
            }),
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

fn settle<T>(
    label: &str,
    result: Result<ApiResponse<T>, ClientError>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(envelope) => envelope.data,
        Err(e) => {
            errors.push(format!("{label}: {e}"));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSnapshot<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

/// Hook over a single resource. `data` keeps its previous value when a
/// refetch fails.
#[derive(Clone)]
pub struct ResourceHook<T> {
    client: SiteClient,
    resource: Resource,
    state: Arc<RwLock<ResourceSnapshot<T>>>,
}

impl<T> ResourceHook<T>
where
    T: DeserializeOwned + Default + Clone + Send + Sync,
{
    fn new(client: SiteClient, resource: Resource) -> Self {
        Self {
            client,
            resource,
            state: Arc::new(RwLock::new(ResourceSnapshot {
                data: T::default(),
                loading: false,
                error: None,
            })),
        }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    /// Load the resource once, as on mount.
    pub async fn mounted(self) -> Self {
        self.refetch().await;
        self
    }

    pub async fn refetch(&self) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.client.fetch::<T>(self.resource).await;

        let mut state = self.state.write().await;
        match result {
            Ok(envelope) => state.data = envelope.data.unwrap_or_default(),
            Err(e) => {
                log::error!("Failed to fetch {}: {e}", self.resource.noun());
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }

    pub async fn snapshot(&self) -> ResourceSnapshot<T> {
        self.state.read().await.clone()
    }
}

impl ResourceHook<Option<RepositoryStats>> {
    #[must_use]
    pub fn repository_stats(client: SiteClient) -> Self {
        Self::new(client, Resource::Stats)
    }
}

impl ResourceHook<Vec<ContributorStats>> {
    #[must_use]
    pub fn contributors(client: SiteClient) -> Self {
        Self::new(client, Resource::Contributors)
    }
}

impl ResourceHook<Vec<Discussion>> {
    #[must_use]
    pub fn discussions(client: SiteClient) -> Self {
        Self::new(client, Resource::Discussions)
    }
}

impl ResourceHook<Vec<CommunityEvent>> {
    #[must_use]
    pub fn events(client: SiteClient) -> Self {
        Self::new(client, Resource::Events)
    }
}
