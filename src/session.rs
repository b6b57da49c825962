//! Interactive session state.
//!
//! A session remembers the last request text and its result. Asking the same
//! text again reuses the stored result; any other text replaces it wholesale.

use crate::agent::{Orchestrator, OrchestratorError, RecommendationResult};
use crate::music::{MusicServiceError, Playback, RecommendedTrack};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("No recommendation at position {0}")]
    NoSuchTrack(usize),

    #[error(transparent)]
    Playback(#[from] MusicServiceError),
}

#[derive(Debug, Default)]
pub struct Session {
    last_text: Option<String>,
    result: Option<RecommendationResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for `text`, running the orchestrator unless it is the text of
    /// the stored result. A failed request leaves the session empty.
    pub async fn fetch(
        &mut self,
        orchestrator: &Orchestrator,
        text: &str,
    ) -> Result<&RecommendationResult, OrchestratorError> {
        let result = match self.result.take() {
            Some(result) if self.last_text.as_deref() == Some(text) => {
                debug!("Reusing result for repeated request");
                result
            }
            _ => {
                self.last_text = None;
                let result = orchestrator.run(text).await?;
                self.last_text = Some(text.to_string());
                result
            }
        };
        Ok(self.result.insert(result))
    }

    pub fn result(&self) -> Option<&RecommendationResult> {
        self.result.as_ref()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    pub fn tracks(&self) -> &[RecommendedTrack] {
        self.result.as_ref().map(|r| r.tracks.as_slice()).unwrap_or(&[])
    }

    /// `"{track} by {artist}"` for each recommended track.
    pub fn options(&self) -> Vec<String> {
        self.tracks().iter().map(RecommendedTrack::label).collect()
    }

    pub fn select(&self, label: &str) -> Option<&RecommendedTrack> {
        self.tracks().iter().find(|t| t.label() == label)
    }

    /// Start playback of the track at `index` (0-based).
    ///
    /// The stored result is not affected, whether playback succeeds or not.
    pub async fn play(
        &self,
        playback: &dyn Playback,
        index: usize,
    ) -> Result<&RecommendedTrack, PlayError> {
        let track = self
            .tracks()
            .get(index)
            .ok_or(PlayError::NoSuchTrack(index + 1))?;
        playback.start_playback(&track.uri()).await?;
        info!(track = %track.label(), "Started playback");
        Ok(track)
    }
}
