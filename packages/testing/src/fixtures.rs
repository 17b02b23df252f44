//! Upstream GitHub payloads shaped like the real REST responses.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

#[must_use]
pub fn repository(stars: u64, forks: u64, license: Option<&str>) -> Value {
    json!({
        "id": 700_000_001_u64,
        "name": "OptiBlogAi",
        "full_name": "solve-ease/OptiBlogAi",
        "description": "AI-powered blog optimization",
        "html_url": "https://github.com/solve-ease/OptiBlogAi",
        "language": "Python",
        "stargazers_count": stars,
        "watchers_count": stars,
        "forks_count": forks,
        "open_issues_count": 12,
        "subscribers_count": 4,
        "size": 2048,
        "default_branch": "main",
        "created_at": "2024-01-15T10:00:00Z",
        "updated_at": "2024-07-01T12:30:00Z",
        "pushed_at": "2024-07-01T12:00:00Z",
        "archived": false,
        "license": license.map(|name| json!({
            "key": name.to_lowercase().replace(' ', "-"),
            "name": name,
            "spdx_id": null,
        })),
        "topics": ["ai", "blogging", "seo"],
        "owner": user("solve-ease", 1),
    })
}

#[must_use]
pub fn user(login: &str, id: u64) -> Value {
    json!({
        "id": id,
        "login": login,
        "avatar_url": format!("https://avatars.githubusercontent.com/u/{id}?v=4"),
        "html_url": format!("https://github.com/{login}"),
        "type": "User",
    })
}

#[must_use]
pub fn contributor(login: &str, id: u64, contributions: u64) -> Value {
    let mut value = user(login, id);
    value["contributions"] = json!(contributions);
    value
}

#[must_use]
pub fn user_profile(login: &str, name: Option<&str>, location: Option<&str>) -> Value {
    json!({
        "login": login,
        "name": name,
        "bio": null,
        "company": null,
        "location": location,
        "blog": "",
        "public_repos": 3,
        "followers": 10,
        "following": 2,
    })
}

#[must_use]
pub fn commit(sha: &str, message: &str, author: &str, date: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/solve-ease/OptiBlogAi/commit/{sha}"),
        "commit": {
            "message": message,
            "author": {"name": author, "email": format!("{author}@example.com"), "date": date},
            "committer": {"name": author, "email": format!("{author}@example.com"), "date": date},
        },
        "author": null,
    })
}

#[must_use]
pub fn commit_activity_week(week: i64, days: [u64; 7]) -> Value {
    json!({
        "week": week,
        "total": days.iter().sum::<u64>(),
        "days": days,
    })
}

#[must_use]
pub fn label(name: &str, color: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "color": color,
        "description": null,
    })
}

/// Builds issue payloads, the unit every issue-backed resource is parsed from.
pub struct IssueBuilder {
    id: u64,
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    labels: Vec<Value>,
    user: Option<Value>,
    comments: u64,
    reactions: u64,
    milestone: bool,
    timestamp: DateTime<Utc>,
}

impl IssueBuilder {
    #[must_use]
    pub fn new(number: u64, title: &str) -> Self {
        Self {
            id: 1_000_000 + number,
            number,
            title: title.to_string(),
            body: None,
            state: "open".to_string(),
            labels: vec![],
            user: Some(user("test-user", 12345)),
            comments: 0,
            reactions: 0,
            milestone: false,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    #[must_use]
    pub fn closed(mut self) -> Self {
        self.state = "closed".to_string();
        self
    }

    #[must_use]
    pub fn with_label(mut self, name: &str, color: &str) -> Self {
        self.labels.push(label(name, color));
        self
    }

    #[must_use]
    pub fn with_user(mut self, login: &str, id: u64) -> Self {
        self.user = Some(user(login, id));
        self
    }

    #[must_use]
    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }

    #[must_use]
    pub const fn with_comments(mut self, comments: u64) -> Self {
        self.comments = comments;
        self
    }

    /// Every reaction is counted as a `+1`.
    #[must_use]
    pub const fn with_reactions(mut self, reactions: u64) -> Self {
        self.reactions = reactions;
        self
    }

    #[must_use]
    pub const fn with_milestone(mut self) -> Self {
        self.milestone = true;
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn build(&self) -> Value {
        json!({
            "id": self.id,
            "number": self.number,
            "title": self.title,
            "body": self.body,
            "html_url": format!("https://github.com/solve-ease/OptiBlogAi/issues/{}", self.number),
            "state": self.state,
            "created_at": self.timestamp,
            "updated_at": self.timestamp,
            "closed_at": (self.state == "closed").then_some(self.timestamp),
            "labels": self.labels,
            "user": self.user,
            "comments": self.comments,
            "reactions": {
                "total_count": self.reactions,
                "+1": self.reactions,
                "-1": 0,
                "laugh": 0,
                "hooray": 0,
                "confused": 0,
                "heart": 0,
                "rocket": 0,
                "eyes": 0,
            },
            "milestone": self.milestone.then(|| json!({
                "id": 1,
                "title": "v1.0",
                "state": "open",
                "due_on": null,
            })),
        })
    }
}
