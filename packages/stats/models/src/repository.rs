use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub size: u64,
    pub language: Option<String>,
    /// License display name, e.g. `MIT License`.
    pub license: Option<String>,
    pub topics: Vec<String>,
    pub last_updated: String,
    pub created_at: String,
}
