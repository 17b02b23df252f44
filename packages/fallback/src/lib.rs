#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Static community content served when GitHub cannot provide any.
//!
//! Only discussions and events have a fallback. The built-in sets are
//! embedded at compile time; an operator can replace either set with a JSON
//! file of the form `{"discussions": [...], "events": [...]}`.

use std::path::{Path, PathBuf};

use optiblog_stats_models::{CommunityEvent, Discussion};
use serde::Deserialize;

const BUILTIN_DISCUSSIONS: &str = include_str!("../data/discussions.json");
const BUILTIN_EVENTS: &str = include_str!("../data/events.json");

#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("Failed to read fallback data from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid fallback {kind}: {source}")]
    Parse {
        kind: &'static str,
        source: serde_json::Error,
    },
    #[error("Fallback {0} must not be empty")]
    Empty(&'static str),
}

/// Immutable fallback datasets, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackData {
    pub discussions: Vec<Discussion>,
    pub events: Vec<CommunityEvent>,
}

#[derive(Deserialize)]
struct FallbackFile {
    discussions: Option<Vec<Discussion>>,
    events: Option<Vec<CommunityEvent>>,
}

impl FallbackData {
    /// The embedded datasets.
    ///
    /// # Errors
    ///
    /// * If the embedded JSON does not match the schemas
    pub fn builtin() -> Result<Self, FallbackError> {
        Self::new(
            parse("discussions", BUILTIN_DISCUSSIONS)?,
            parse("events", BUILTIN_EVENTS)?,
        )
    }

    /// Loads an override file. A set missing from the file keeps its
    /// built-in value.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read or parsed
    /// * If a set in the file is empty
    pub fn from_path(path: &Path) -> Result<Self, FallbackError> {
        let content = std::fs::read_to_string(path).map_err(|source| FallbackError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// * If `content` is not a valid fallback document
    /// * If a set in the document is empty
    pub fn from_json(content: &str) -> Result<Self, FallbackError> {
        let file: FallbackFile = parse("data", content)?;
        let builtin = Self::builtin()?;

        Self::new(
            file.discussions.unwrap_or(builtin.discussions),
            file.events.unwrap_or(builtin.events),
        )
    }

    /// The override at `path` when given, the built-in data otherwise.
    ///
    /// # Errors
    ///
    /// * See [`FallbackData::from_path`]
    pub fn load(path: Option<&Path>) -> Result<Self, FallbackError> {
        match path {
            Some(path) => {
                log::info!("Loading fallback data from {}", path.display());
                Self::from_path(path)
            }
            None => Self::builtin(),
        }
    }

    fn new(
        discussions: Vec<Discussion>,
        events: Vec<CommunityEvent>,
    ) -> Result<Self, FallbackError> {
        if discussions.is_empty() {
            return Err(FallbackError::Empty("discussions"));
        }
        if events.is_empty() {
            return Err(FallbackError::Empty("events"));
        }

        Ok(Self {
            discussions,
            events,
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    kind: &'static str,
    content: &str,
) -> Result<T, FallbackError> {
    serde_json::from_str(content).map_err(|source| FallbackError::Parse { kind, source })
}
