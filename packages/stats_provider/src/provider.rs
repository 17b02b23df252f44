use optiblog_stats_models::{
    ActivityStats, CommunityEvent, ContributorStats, Discussion, IssueStats, RateLimit,
    RepositoryStats,
};

use crate::ProviderError;

/// A normalized payload together with the upstream quota observed while
/// fetching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub data: T,
    pub rate_limit: Option<RateLimit>,
}

impl<T> Fetched<T> {
    #[must_use]
    pub const fn new(data: T, rate_limit: Option<RateLimit>) -> Self {
        Self { data, rate_limit }
    }
}

/// Source of the normalized data served under `/api/github`.
///
/// Implementations never substitute fallback data themselves; an empty
/// collection or an error is returned as-is and the caller decides.
#[async_trait::async_trait]
pub trait StatsProvider: Send + Sync {
    async fn repository_stats(&self) -> Result<Fetched<RepositoryStats>, ProviderError>;

    async fn contributor_stats(&self) -> Result<Fetched<Vec<ContributorStats>>, ProviderError>;

    async fn issue_stats(&self) -> Result<Fetched<IssueStats>, ProviderError>;

    async fn activity_stats(&self) -> Result<Fetched<ActivityStats>, ProviderError>;

    async fn discussions(&self) -> Result<Vec<Discussion>, ProviderError>;

    async fn events(&self) -> Result<Vec<CommunityEvent>, ProviderError>;

    fn provider_name(&self) -> &str;
}
