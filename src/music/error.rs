use std::fmt;
use thiserror::Error;

/// What a catalog search was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Artist,
    Track,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Artist => write!(f, "artist"),
            SearchKind::Track => write!(f, "track"),
        }
    }
}

/// Errors raised by the catalog, recommendation and playback backends.
#[derive(Debug, Error)]
pub enum MusicServiceError {
    /// The search returned no hit for the given name.
    #[error("No {kind} found for \"{query}\"")]
    NotFound { kind: SearchKind, query: String },

    #[error("Catalog lookup failed: {0}")]
    Lookup(String),

    #[error("Recommendation service error: {0}")]
    Recommendation(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl MusicServiceError {
    pub fn not_found(kind: SearchKind, query: impl Into<String>) -> Self {
        MusicServiceError::NotFound {
            kind,
            query: query.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MusicServiceError::NotFound { .. })
    }
}
