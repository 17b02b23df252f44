//! Response of the GraphQL discussions query.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionsQueryData {
    pub repository: Option<DiscussionsQueryRepository>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionsQueryRepository {
    pub discussions: DiscussionConnection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionConnection {
    pub nodes: Vec<DiscussionNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscussionNode {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub comments: TotalCount,
    pub reactions: TotalCount,
    pub reaction_groups: Vec<ReactionGroup>,
    pub author: Option<DiscussionAuthor>,
    pub category: Option<DiscussionCategory>,
    pub answer_chosen_at: Option<String>,
    pub upvote_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionGroup {
    /// GraphQL `ReactionContent`, e.g. `HEART`, `THUMBS_UP`, `ROCKET`.
    pub content: String,
    pub users: TotalCount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscussionAuthor {
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionCategory {
    pub name: String,
    pub emoji: String,
}
