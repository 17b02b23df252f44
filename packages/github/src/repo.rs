use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
        .expect("valid GitHub URL pattern")
});

static OWNER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.-]+)/([\w.-]+)$").expect("valid owner/name pattern"));

/// The single repository the site reports on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Default for RepoId {
    fn default() -> Self {
        Self::new("solve-ease", "OptiBlogAi")
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid GitHub repository '{0}', expected 'owner/name' or a github.com URL")]
pub struct ParseRepoIdError(String);

impl FromStr for RepoId {
    type Err = ParseRepoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let captures = GITHUB_URL
            .captures(s)
            .or_else(|| OWNER_NAME.captures(s))
            .ok_or_else(|| ParseRepoIdError(s.to_string()))?;

        Ok(Self::new(&captures[1], &captures[2]))
    }
}
