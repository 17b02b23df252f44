#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Typed shapes of the GitHub REST v3 and GraphQL responses consumed by the
//! site API.
//!
//! Every struct is lenient: fields the site does not need are ignored and
//! fields that GitHub may omit fall back to their defaults, so a partially
//! unexpected payload still decodes.

pub mod commit;
pub mod discussion;
pub mod issue;
pub mod repository;
pub mod user;

pub use commit::{Commit, CommitActivity, CommitDetail, GitAuthor, Languages};
pub use discussion::{
    DiscussionAuthor, DiscussionCategory, DiscussionConnection, DiscussionNode,
    DiscussionsQueryData, DiscussionsQueryRepository, GraphQlError, GraphQlResponse, ReactionGroup,
    TotalCount,
};
pub use issue::{Issue, IssueState, Label, Milestone, Reactions};
pub use repository::{License, Repository};
pub use user::{Contributor, User, UserProfile};

use serde::{Deserialize, Serialize};

/// Error body returned by GitHub alongside non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
