use serde::{Deserialize, Serialize};

use crate::user::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub state: IssueState,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: Option<String>,
    pub labels: Vec<Label>,
    pub user: Option<User>,
    pub comments: u64,
    pub reactions: Option<Reactions>,
    pub milestone: Option<Milestone>,
}

impl Issue {
    /// Lowercased label names, in upstream order.
    #[must_use]
    pub fn label_names_lowercase(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.to_lowercase()).collect()
    }

    #[must_use]
    pub fn reaction_total(&self) -> u64 {
        self.reactions.as_ref().map_or(0, |r| r.total_count)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reactions {
    pub total_count: u64,
    #[serde(rename = "+1")]
    pub plus_one: u64,
    #[serde(rename = "-1")]
    pub minus_one: u64,
    pub laugh: u64,
    pub hooray: u64,
    pub confused: u64,
    pub heart: u64,
    pub rocket: u64,
    pub eyes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
    pub state: String,
    pub due_on: Option<String>,
}
