#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Upstream answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    /// The request never produced a response (connect failure, timeout).
    #[error("{0}")]
    Transport(String),
    /// The response body did not decode into the expected shape.
    #[error("Unexpected response from GitHub: {0}")]
    SchemaMismatch(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
