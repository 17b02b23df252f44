use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use optiblog_github_models::{Contributor, UserProfile};
use optiblog_stats_models::{
    ActivityStats, CommunityEvent, ContributorStats, Discussion, IssueStats, RateLimit,
    RepositoryStats,
};
use optiblog_stats_provider::{Fetched, ProviderError, StatsProvider};

use crate::{
    GitHubClient, events,
    normalize::{self, PROFILED_CONTRIBUTORS},
};

/// Discussions requested per GraphQL page.
pub const DISCUSSIONS_PAGE_SIZE: u32 = 10;

/// [`StatsProvider`] backed by the live GitHub API.
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    #[must_use]
    pub const fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &GitHubClient {
        &self.client
    }

    async fn profile(&self, contributor: &Contributor) -> Option<UserProfile> {
        match self.client.user(&contributor.login).await {
            Ok(fetched) => Some(fetched.data),
            Err(e) => {
                log::warn!(
                    "Failed to fetch profile for {}, keeping basic info: {e}",
                    contributor.login
                );
                None
            }
        }
    }

    async fn discussions_from_issues(&self) -> Result<Vec<Discussion>, ProviderError> {
        let issues = self.client.discussion_issues().await?;
        Ok(issues
            .data
            .iter()
            .map(normalize::discussion_from_issue)
            .collect())
    }
}

#[async_trait]
impl StatsProvider for GitHubProvider {
    async fn repository_stats(&self) -> Result<Fetched<RepositoryStats>, ProviderError> {
        let repo = self.client.repository().await?;
        Ok(Fetched::new(
            normalize::repository_stats(&repo.data),
            repo.rate_limit,
        ))
    }

    async fn contributor_stats(&self) -> Result<Fetched<Vec<ContributorStats>>, ProviderError> {
        let contributors = self.client.contributors().await?;
        let top = &contributors.data[..contributors.data.len().min(PROFILED_CONTRIBUTORS)];

        let profiles = join_all(top.iter().map(|contributor| self.profile(contributor))).await;

        let stats = top
            .iter()
            .zip(&profiles)
            .map(|(contributor, profile)| {
                normalize::contributor_stats(contributor, profile.as_ref())
            })
            .collect();

        Ok(Fetched::new(stats, contributors.rate_limit))
    }

    async fn issue_stats(&self) -> Result<Fetched<IssueStats>, ProviderError> {
        let issues = self.client.issues().await?;
        Ok(Fetched::new(
            normalize::issue_stats(&issues.data),
            issues.rate_limit,
        ))
    }

    /// Fails only when every sub-request fails; otherwise the failed parts
    /// degrade to empty values.
    async fn activity_stats(&self) -> Result<Fetched<ActivityStats>, ProviderError> {
        let (activity, commits, contributors, languages) = futures::join!(
            self.client.commit_activity(),
            self.client.commits(),
            self.client.contributors(),
            self.client.languages(),
        );

        if let (Err(e), Err(_), Err(_), Err(_)) = (&activity, &commits, &contributors, &languages)
        {
            return Err(e.clone());
        }

        let mut rate_limit = None;
        let activity = settle("commit activity", activity, &mut rate_limit);
        let commits = settle("commits", commits, &mut rate_limit);
        let contributors = settle("contributors", contributors, &mut rate_limit);
        let languages = settle("languages", languages, &mut rate_limit);

        Ok(Fetched::new(
            normalize::activity_stats(&activity, &commits, &contributors, languages),
            rate_limit,
        ))
    }

    /// Uses the GraphQL discussions API when authenticated, issues labelled
    /// `discussion` otherwise or when the GraphQL call fails.
    async fn discussions(&self) -> Result<Vec<Discussion>, ProviderError> {
        if self.client.has_token() {
            match self.client.discussions(DISCUSSIONS_PAGE_SIZE).await {
                Ok(nodes) => {
                    return Ok(nodes
                        .data
                        .iter()
                        .map(normalize::discussion_from_node)
                        .collect());
                }
                Err(e) => {
                    log::warn!("GraphQL discussions unavailable, reading labelled issues: {e}");
                }
            }
        }

        self.discussions_from_issues().await
    }

    async fn events(&self) -> Result<Vec<CommunityEvent>, ProviderError> {
        let issues = self.client.event_issues().await?;
        Ok(events::events_from_issues(
            &issues.data,
            Utc::now().date_naive(),
        ))
    }

    fn provider_name(&self) -> &str {
        "github"
    }
}

/// Unwraps one part of a partially failed fan-out, keeping the most recent
/// rate limit seen.
fn settle<T: Default>(
    part: &str,
    result: Result<Fetched<T>, ProviderError>,
    rate_limit: &mut Option<RateLimit>,
) -> T {
    match result {
        Ok(fetched) => {
            if fetched.rate_limit.is_some() {
                *rate_limit = fetched.rate_limit;
            }
            fetched.data
        }
        Err(e) => {
            log::warn!("Activity {part} unavailable, using empty value: {e}");
            T::default()
        }
    }
}
