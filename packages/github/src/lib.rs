#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! GitHub implementation of [`optiblog_stats_provider::StatsProvider`].
//!
//! [`GitHubClient`] performs the raw REST/GraphQL calls for one repository,
//! [`normalize`] and [`events`] map the responses onto the site schemas and
//! [`GitHubProvider`] ties them together.

mod cache;
mod client;
pub mod events;
pub mod normalize;
mod provider;
mod repo;

pub use cache::CacheStats;
pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GitHubClient, USER_AGENT, parse_rate_limit};
pub use provider::{DISCUSSIONS_PAGE_SIZE, GitHubProvider};
pub use repo::{ParseRepoIdError, RepoId};
