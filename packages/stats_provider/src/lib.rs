#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod provider;

pub use error::ProviderError;
pub use provider::{Fetched, StatsProvider};
