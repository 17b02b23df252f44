mod helpers;

use std::sync::Arc;

use helpers::{OWNER, REPO, TestServer};
use optiblog_client::{GitHubStatsHook, SiteClient};
use optiblog_fallback::FallbackData;
use optiblog_stats_models::{
    ActivityStats, ApiResponse, CommunityEvent, ContributorStats, Discussion, IssueStats,
    RepositoryStats, Resource, Source,
};
use optiblog_stats_provider::{Fetched, ProviderError, StatsProvider};
use optiblog_testing::{GitHubMock, IssueBuilder, fixtures};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn get_json<T: serde::de::DeserializeOwned>(
    server: &TestServer,
    resource: Resource,
) -> (reqwest::StatusCode, reqwest::header::HeaderMap, ApiResponse<T>) {
    let response = reqwest::get(server.url(resource.path())).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    (status, headers, response.json().await.unwrap())
}

async fn sample_server() -> (GitHubMock, TestServer) {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.mount_sample_repository().await;
    let server = TestServer::start(&github.uri()).await.unwrap();
    (github, server)
}

#[test_log::test(tokio::test)]
async fn test_health() {
    let github = GitHubMock::start(OWNER, REPO).await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let body = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "OK");
}

#[test_log::test(tokio::test)]
async fn test_stats_success() {
    let (_github, server) = sample_server().await;

    let (status, headers, body) = get_json::<RepositoryStats>(&server, Resource::Stats).await;

    assert_eq!(status, 200);
    assert!(body.success);
    let stats = body.data.unwrap();
    assert_eq!(stats.stars, 128);
    assert_eq!(stats.forks, 16);
    assert_eq!(stats.license.as_deref(), Some("MIT License"));
    assert_eq!(stats.topics, vec!["ai", "blogging", "seo"]);
    assert!(body.last_fetched.is_some());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(
        headers["cache-control"],
        "public, s-maxage=300, stale-while-revalidate=600"
    );
}

#[test_log::test(tokio::test)]
async fn test_stats_forwards_rate_limit() {
    let github = GitHubMock::start(OWNER, REPO).await;
    Mock::given(method("GET"))
        .and(path(github.repo_path("")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::repository(1, 1, None))
                .insert_header("x-ratelimit-limit", "5000")
                .insert_header("x-ratelimit-remaining", "4990")
                .insert_header("x-ratelimit-reset", "1720000000")
                .insert_header("x-ratelimit-used", "10"),
        )
        .mount(github.server())
        .await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (_, _, body) = get_json::<RepositoryStats>(&server, Resource::Stats).await;

    let rate_limit = body.rate_limit.unwrap();
    assert_eq!(rate_limit.limit, 5000);
    assert_eq!(rate_limit.remaining, 4990);
    assert_eq!(body.data.unwrap().license, None);
}

#[test_log::test(tokio::test)]
async fn test_stats_upstream_failure_is_500() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.fail_everything(500).await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, headers, body) = get_json::<RepositoryStats>(&server, Resource::Stats).await;

    assert_eq!(status, 500);
    assert!(!body.success);
    assert_eq!(body.data, None);
    assert_eq!(body.error.as_deref(), Some("HTTP 500: Internal Server Error"));
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[test_log::test(tokio::test)]
async fn test_stats_upstream_message_is_forwarded() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.mount_status("", 404, "Not Found").await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<RepositoryStats>(&server, Resource::Stats).await;

    assert_eq!(status, 500);
    assert_eq!(body.error.as_deref(), Some("Not Found"));
}

#[test_log::test(tokio::test)]
async fn test_contributors_enriched_with_profiles() {
    let (_github, server) = sample_server().await;

    let (status, headers, body) =
        get_json::<Vec<ContributorStats>>(&server, Resource::Contributors).await;

    assert_eq!(status, 200);
    let contributors = body.data.unwrap();
    assert_eq!(contributors.len(), 2);
    assert_eq!(contributors[0].login, "alice");
    assert_eq!(contributors[0].name.as_deref(), Some("Alice"));
    assert_eq!(contributors[0].location.as_deref(), Some("Pune"));
    assert_eq!(contributors[0].commits, 40);
    assert_eq!(contributors[0].additions, 0);
    assert_eq!(contributors[1].name, None);
    assert_eq!(
        headers["cache-control"],
        "public, s-maxage=900, stale-while-revalidate=1800"
    );
}

#[test_log::test(tokio::test)]
async fn test_contributor_without_profile_keeps_basic_info() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github
        .mount_json(
            "/contributors",
            json!([fixtures::contributor("ghost", 3, 5)]),
        )
        .await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) =
        get_json::<Vec<ContributorStats>>(&server, Resource::Contributors).await;

    assert_eq!(status, 200);
    let contributors = body.data.unwrap();
    assert_eq!(contributors.len(), 1);
    assert_eq!(contributors[0].login, "ghost");
    assert_eq!(contributors[0].contributions, 5);
    assert_eq!(contributors[0].name, None);
}

#[test_log::test(tokio::test)]
async fn test_issues_aggregated() {
    let (_github, server) = sample_server().await;

    let (status, _, body) = get_json::<IssueStats>(&server, Resource::Issues).await;

    assert_eq!(status, 200);
    let stats = body.data.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.open, 2);
    assert_eq!(stats.closed, 1);
    assert_eq!(stats.total, stats.open + stats.closed);
    assert_eq!(stats.labels[0].name, "bug");
    assert_eq!(stats.labels[0].count, 2);
    assert_eq!(stats.labels[0].color, "d73a4a");
    assert_eq!(stats.labels[1].name, "enhancement");
}

#[test_log::test(tokio::test)]
async fn test_activity_joins_all_sources() {
    let (_github, server) = sample_server().await;

    let (status, headers, body) = get_json::<ActivityStats>(&server, Resource::Activity).await;

    assert_eq!(status, 200);
    let activity = body.data.unwrap();
    assert_eq!(activity.commit_activity.len(), 2);
    assert_eq!(activity.weekly_commits, 4);
    assert_eq!(activity.monthly_commits, 7);
    assert_eq!(activity.total_commits, 2);
    assert_eq!(activity.top_contributors[0].login, "alice");
    assert_eq!(activity.language_stats.get("Python"), Some(&9000));
    assert_eq!(activity.last_commit.sha, "c0ffee");
    assert_eq!(activity.last_commit.author, "alice");
    assert_eq!(
        headers["cache-control"],
        "public, s-maxage=600, stale-while-revalidate=1200"
    );
}

#[test_log::test(tokio::test)]
async fn test_activity_partial_failure_degrades() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github
        .mount_json("/languages", json!({"Rust": 100}))
        .await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<ActivityStats>(&server, Resource::Activity).await;

    assert_eq!(status, 200);
    let activity = body.data.unwrap();
    assert_eq!(activity.language_stats.get("Rust"), Some(&100));
    assert_eq!(activity.total_commits, 0);
    assert!(activity.commit_activity.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_activity_total_failure_is_500() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.fail_everything(503).await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<ActivityStats>(&server, Resource::Activity).await;

    assert_eq!(status, 500);
    assert!(!body.success);
    assert!(body.error.is_some_and(|e| !e.is_empty()));
}

#[test_log::test(tokio::test)]
async fn test_discussions_from_labelled_issues() {
    let (_github, server) = sample_server().await;

    let (status, headers, body) =
        get_json::<Vec<Discussion>>(&server, Resource::Discussions).await;

    assert_eq!(status, 200);
    assert_eq!(body.source, Some(Source::Github));
    let discussions = body.data.unwrap();
    assert_eq!(discussions.len(), 1);
    assert_eq!(discussions[0].category.name, "Q&A");
    assert_eq!(discussions[0].comments, 3);
    assert_eq!(
        headers["cache-control"],
        "public, s-maxage=900, stale-while-revalidate=1800"
    );
}

#[test_log::test(tokio::test)]
async fn test_discussions_via_graphql_with_token() {
    let github = GitHubMock::start(OWNER, REPO).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"repository": {"discussions": {"nodes": [{
                "id": "D_1",
                "title": "Roadmap",
                "body": "What next?",
                "url": "https://github.com/solve-ease/OptiBlogAi/discussions/1",
                "createdAt": "2024-07-01T00:00:00Z",
                "updatedAt": "2024-07-02T00:00:00Z",
                "comments": {"totalCount": 2},
                "reactions": {"totalCount": 1},
                "reactionGroups": [{"content": "ROCKET", "users": {"totalCount": 1}}],
                "author": {"login": "alice", "avatarUrl": "", "url": ""},
                "category": {"name": "Ideas", "emoji": ":bulb:"},
                "answerChosenAt": null
            }]}}}
        })))
        .expect(1)
        .mount(github.server())
        .await;
    let config = TestServer::config(&github.uri()).with_token(Some("secret-token".to_string()));
    let server = TestServer::start_with_config(config).await.unwrap();

    let (_, _, body) = get_json::<Vec<Discussion>>(&server, Resource::Discussions).await;

    assert_eq!(body.source, Some(Source::Github));
    let discussions = body.data.unwrap();
    assert_eq!(discussions[0].id, "D_1");
    assert_eq!(discussions[0].reactions.rocket, 1);
    assert_eq!(discussions[0].author.login, "alice");
}

#[test_log::test(tokio::test)]
async fn test_discussions_fallback_on_upstream_failure() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.fail_everything(500).await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<Vec<Discussion>>(&server, Resource::Discussions).await;

    assert_eq!(status, 200);
    assert!(body.success);
    assert_eq!(body.source, Some(Source::Fallback));
    assert_eq!(body.error, None);
    assert_eq!(
        body.data.unwrap(),
        FallbackData::builtin().unwrap().discussions
    );
}

#[test_log::test(tokio::test)]
async fn test_events_parsed_and_sorted() {
    let (_github, server) = sample_server().await;

    let (status, headers, body) =
        get_json::<Vec<CommunityEvent>>(&server, Resource::Events).await;

    assert_eq!(status, 200);
    assert_eq!(body.source, Some(Source::Github));
    let events = body.data.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Summer hackathon");
    assert_eq!(events[0].date, "2024-10-12");
    assert_eq!(events[0].time, "12:00");
    assert_eq!(events[1].date, "2024-09-01");
    assert_eq!(events[1].time, "14:30");
    assert_eq!(events[1].location, "Online");
    assert_eq!(events[1].tags, vec!["workshop"]);
    assert_eq!(
        headers["cache-control"],
        "public, s-maxage=1800, stale-while-revalidate=3600"
    );
}

#[test_log::test(tokio::test)]
async fn test_events_without_matches_use_fallback() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github
        .mount_labelled_issues(
            "event,hackathon,workshop,meetup,webinar,conference",
            json!([IssueBuilder::new(1, "Not an event")
                .with_label("bug", "d73a4a")
                .build()]),
        )
        .await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<Vec<CommunityEvent>>(&server, Resource::Events).await;

    assert_eq!(status, 200);
    assert_eq!(body.source, Some(Source::Fallback));
    assert_eq!(body.data.unwrap(), FallbackData::builtin().unwrap().events);
}

#[test_log::test(tokio::test)]
async fn test_events_fallback_on_upstream_failure() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.fail_everything(502).await;
    let server = TestServer::start(&github.uri()).await.unwrap();

    let (status, _, body) = get_json::<Vec<CommunityEvent>>(&server, Resource::Events).await;

    assert_eq!(status, 200);
    assert_eq!(body.source, Some(Source::Fallback));
    assert_eq!(body.data.map(|events| events.len()), Some(4));
}

#[test_log::test(tokio::test)]
async fn test_preflight_on_every_route() {
    let github = GitHubMock::start(OWNER, REPO).await;
    let server = TestServer::start(&github.uri()).await.unwrap();
    let client = reqwest::Client::new();

    for resource in [
        Resource::Stats,
        Resource::Contributors,
        Resource::Issues,
        Resource::Activity,
        Resource::Discussions,
        Resource::Events,
    ] {
        let response = client
            .request(reqwest::Method::OPTIONS, server.url(resource.path()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200, "{resource}");
        let headers = response.headers().clone();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert!(response.bytes().await.unwrap().is_empty());
    }

    assert!(github.server().received_requests().await.unwrap().is_empty());
}

struct BrokenProvider;

#[async_trait::async_trait]
impl StatsProvider for BrokenProvider {
    async fn repository_stats(&self) -> Result<Fetched<RepositoryStats>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    async fn contributor_stats(&self) -> Result<Fetched<Vec<ContributorStats>>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    async fn issue_stats(&self) -> Result<Fetched<IssueStats>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    async fn activity_stats(&self) -> Result<Fetched<ActivityStats>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    async fn discussions(&self) -> Result<Vec<Discussion>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    async fn events(&self) -> Result<Vec<CommunityEvent>, ProviderError> {
        Err(ProviderError::Internal("state corrupted".to_string()))
    }

    fn provider_name(&self) -> &str {
        "broken"
    }
}

#[test_log::test(tokio::test)]
async fn test_internal_errors() {
    let server = TestServer::start_with_provider(Arc::new(BrokenProvider))
        .await
        .unwrap();

    for resource in [
        Resource::Stats,
        Resource::Contributors,
        Resource::Issues,
        Resource::Activity,
    ] {
        let (status, _, body) = get_json::<serde_json::Value>(&server, resource).await;

        assert_eq!(status, 500, "{resource}");
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    let (status, _, body) = get_json::<Vec<Discussion>>(&server, Resource::Discussions).await;
    assert_eq!(status, 200);
    assert!(body.success);
    assert_eq!(body.source, Some(Source::Fallback));
    assert_eq!(
        body.error.as_deref(),
        Some("Using fallback data due to API error")
    );
    assert_eq!(body.data.map(|d| d.len()), Some(3));

    let (status, _, body) = get_json::<Vec<CommunityEvent>>(&server, Resource::Events).await;
    assert_eq!(status, 200);
    assert_eq!(body.source, Some(Source::Fallback));
    assert_eq!(
        body.error.as_deref(),
        Some("Using fallback data due to API error")
    );
}

#[test_log::test(tokio::test)]
async fn test_upstream_responses_are_cached() {
    let github = GitHubMock::start(OWNER, REPO).await;
    Mock::given(method("GET"))
        .and(path(github.repo_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::repository(3, 1, None)))
        .expect(1)
        .mount(github.server())
        .await;
    let config =
        TestServer::config(&github.uri()).with_cache_ttl(std::time::Duration::from_secs(60));
    let server = TestServer::start_with_config(config).await.unwrap();

    for _ in 0..3 {
        let (status, _, body) = get_json::<RepositoryStats>(&server, Resource::Stats).await;
        assert_eq!(status, 200);
        assert_eq!(body.data.unwrap().stars, 3);
    }
}

#[test_log::test(tokio::test)]
async fn test_stats_hook_against_server() {
    let (_github, server) = sample_server().await;
    let client = SiteClient::new(server.http_url()).unwrap();

    let snapshot = GitHubStatsHook::mount(client, true).await.snapshot().await;

    assert_eq!(snapshot.error, None);
    assert!(!snapshot.loading);
    let data = snapshot.data.unwrap();
    assert_eq!(data.repository.stars, 128);
    assert_eq!(data.contributors.len(), 2);
    assert_eq!(data.issues.map(|i| i.total), Some(3));
    assert_eq!(data.activity.map(|a| a.weekly_commits), Some(4));
}

#[test_log::test(tokio::test)]
async fn test_stats_hook_when_github_is_down() {
    let github = GitHubMock::start(OWNER, REPO).await;
    github.fail_everything(500).await;
    let server = TestServer::start(&github.uri()).await.unwrap();
    let client = SiteClient::new(server.http_url()).unwrap();

    let snapshot = GitHubStatsHook::mount(client, true).await.snapshot().await;

    assert_eq!(snapshot.data, None);
    assert!(
        snapshot
            .error
            .is_some_and(|e| e.starts_with("Failed to load GitHub data: Repository: "))
    );
}
