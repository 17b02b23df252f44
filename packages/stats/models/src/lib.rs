#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod activity;
pub mod community;
pub mod contributor;
pub mod envelope;
pub mod issue;
pub mod repository;
pub mod resource;

pub use activity::{ActivityStats, LastCommit, TopContributor, WeeklyCommits};
pub use community::{
    CommunityEvent, Discussion, DiscussionAuthor, DiscussionCategory, DiscussionReactions,
    EventType,
};
pub use contributor::ContributorStats;
pub use envelope::{ApiResponse, RateLimit, Source};
pub use issue::{IssueStats, LabelCount};
pub use repository::RepositoryStats;
pub use resource::Resource;
