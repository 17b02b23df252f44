#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

pub mod fixtures;
pub mod mock;

pub use fixtures::IssueBuilder;
pub use mock::GitHubMock;
