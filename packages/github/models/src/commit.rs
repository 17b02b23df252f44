use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
    pub author: Option<User>,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<GitAuthor>,
    pub committer: Option<GitAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitAuthor {
    pub name: String,
    pub email: String,
    pub date: String,
}

/// Entry of `GET /repos/{owner}/{repo}/stats/commit_activity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitActivity {
    pub week: i64,
    pub total: u64,
    pub days: Vec<u64>,
}

/// `GET /repos/{owner}/{repo}/languages`: language name to byte count.
pub type Languages = BTreeMap<String, u64>;
