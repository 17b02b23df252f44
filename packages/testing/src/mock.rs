//! A local stand-in for the GitHub API built on `wiremock`.

use serde_json::{Value, json};
use wiremock::{
    Match, Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path, query_param},
};

use crate::fixtures::{self, IssueBuilder};

/// Matches issue listings that are not filtered by label.
struct UnlabelledIssues;

impl Match for UnlabelledIssues {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "labels")
    }
}

pub struct GitHubMock {
    server: MockServer,
    owner: String,
    repo: String,
}

impl GitHubMock {
    pub async fn start(owner: &str, repo: &str) -> Self {
        Self {
            server: MockServer::start().await,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    #[must_use]
    pub fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.owner, self.repo)
    }

    /// `GET /repos/{owner}/{repo}{suffix}` answers 200 with `body`.
    pub async fn mount_json(&self, suffix: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(self.repo_path(suffix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_status(&self, suffix: &str, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path(self.repo_path(suffix)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest",
            })))
            .mount(&self.server)
            .await;
    }

    /// Unfiltered `GET .../issues`.
    pub async fn mount_issues(&self, issues: Value) {
        Mock::given(method("GET"))
            .and(path(self.repo_path("/issues")))
            .and(UnlabelledIssues)
            .respond_with(ResponseTemplate::new(200).set_body_json(issues))
            .mount(&self.server)
            .await;
    }

    /// `GET .../issues?labels={labels}`.
    pub async fn mount_labelled_issues(&self, labels: &str, issues: Value) {
        Mock::given(method("GET"))
            .and(path(self.repo_path("/issues")))
            .and(query_param("labels", labels))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_user(&self, login: &str, profile: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.server)
            .await;
    }

    /// Every request answers `status`.
    pub async fn fail_everything(&self, status: u16) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// A small but complete repository: every REST endpoint the site reads
    /// answers with consistent sample data.
    pub async fn mount_sample_repository(&self) {
        self.mount_json("", fixtures::repository(128, 16, Some("MIT License")))
            .await;
        self.mount_json(
            "/contributors",
            json!([
                fixtures::contributor("alice", 1, 40),
                fixtures::contributor("bob", 2, 12),
            ]),
        )
        .await;
        self.mount_user("alice", fixtures::user_profile("alice", Some("Alice"), Some("Pune")))
            .await;
        self.mount_user("bob", fixtures::user_profile("bob", None, None))
            .await;
        self.mount_issues(json!([
            IssueBuilder::new(1, "Crash on start")
                .with_label("bug", "d73a4a")
                .build(),
            IssueBuilder::new(2, "Add dark mode")
                .with_label("enhancement", "a2eeef")
                .closed()
                .build(),
            IssueBuilder::new(3, "Another crash")
                .with_label("bug", "d73a4a")
                .build(),
        ]))
        .await;
        self.mount_json(
            "/commits",
            json!([
                fixtures::commit("c0ffee", "Add event parser", "alice", "2024-07-01T09:00:00Z"),
                fixtures::commit("beef01", "Initial commit", "bob", "2024-06-01T09:00:00Z"),
            ]),
        )
        .await;
        self.mount_json(
            "/stats/commit_activity",
            json!([
                fixtures::commit_activity_week(1_719_100_800, [0, 1, 2, 0, 0, 0, 0]),
                fixtures::commit_activity_week(1_719_705_600, [1, 0, 0, 0, 3, 0, 0]),
            ]),
        )
        .await;
        self.mount_json("/languages", json!({"Python": 9000, "TypeScript": 3000}))
            .await;
        self.mount_labelled_issues(
            "discussion",
            json!([
                IssueBuilder::new(10, "How do I tune prompts?")
                    .with_label("discussion", "ededed")
                    .with_label("question", "d876e3")
                    .with_comments(3)
                    .build()
            ]),
        )
        .await;
        self.mount_labelled_issues(
            "event,hackathon,workshop,meetup,webinar,conference",
            json!([
                IssueBuilder::new(20, "Prompt engineering workshop")
                    .with_label("event", "ededed")
                    .with_label("workshop", "0e8a16")
                    .with_body("Date: 2024-09-01\nTime: 14:30\nLocation: Online")
                    .build(),
                IssueBuilder::new(21, "Summer hackathon")
                    .with_label("hackathon", "fbca04")
                    .with_body("Date: 2024-10-12")
                    .build(),
            ]),
        )
        .await;
    }
}
