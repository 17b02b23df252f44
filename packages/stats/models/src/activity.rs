use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub commit_activity: Vec<WeeklyCommits>,
    pub total_commits: u64,
    pub weekly_commits: u64,
    pub monthly_commits: u64,
    pub top_contributors: Vec<TopContributor>,
    pub language_stats: BTreeMap<String, u64>,
    pub last_commit: LastCommit,
}

/// One week of commit counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCommits {
    /// Unix timestamp of the start of the week (Sunday).
    pub week: i64,
    pub total: u64,
    /// Sunday through Saturday.
    pub days: [u64; 7],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopContributor {
    pub login: String,
    pub contributions: u64,
    pub avatar_url: String,
}

/// Empty strings in every field when the repository has no commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastCommit {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
}
