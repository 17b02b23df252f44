use strum_macros::{AsRefStr, Display, EnumIter};

/// The resources exposed under `/api/github`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Stats,
    Contributors,
    Issues,
    Activity,
    Discussions,
    Events,
}

impl Resource {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Stats => "/api/github/stats",
            Self::Contributors => "/api/github/contributors",
            Self::Issues => "/api/github/issues",
            Self::Activity => "/api/github/activity",
            Self::Discussions => "/api/github/discussions",
            Self::Events => "/api/github/events",
        }
    }

    /// Human readable noun used in error messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Stats => "repository stats",
            Self::Contributors => "repository contributors",
            Self::Issues => "repository issues",
            Self::Activity => "repository activity",
            Self::Discussions => "discussions",
            Self::Events => "events",
        }
    }

    /// Whether upstream failures are replaced by a static dataset instead of
    /// being reported.
    #[must_use]
    pub const fn has_fallback(self) -> bool {
        matches!(self, Self::Discussions | Self::Events)
    }
}
