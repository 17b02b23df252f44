use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Uniform wrapper returned by every route.
///
/// `success == false` implies `data` is absent. `success == true` implies
/// `data` holds the resource's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            error: None,
            rate_limit: None,
            last_fetched: None,
            source: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            error: Some(error.into()),
            rate_limit: None,
            last_fetched: None,
            source: None,
        }
    }

    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: Option<RateLimit>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    #[must_use]
    pub fn with_last_fetched(mut self, last_fetched: String) -> Self {
        self.last_fetched = Some(last_fetched);
        self
    }

    #[must_use]
    pub const fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches an explanatory message without changing `success`.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Snapshot of the upstream `x-ratelimit-*` headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
    pub used: u64,
}

impl Default for RateLimit {
    /// GitHub's anonymous quota, untouched.
    fn default() -> Self {
        Self {
            limit: 60,
            remaining: 60,
            reset: 0,
            used: 0,
        }
    }
}

/// Provenance tag of a discussions/events payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Source {
    Github,
    Fallback,
}
