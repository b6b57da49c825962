//! Backend traits.
//!
//! The streaming client implements all of them; tests substitute fakes.

use super::error::MusicServiceError;
use super::tunables::TunableConstraints;
use async_trait::async_trait;

/// Resolves human-readable names to catalog identifiers.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Identifier of the first artist matching `name`.
    async fn resolve_artist(&self, name: &str) -> Result<String, MusicServiceError>;

    /// Identifier of the first track matching `name`, optionally narrowed by artist.
    async fn resolve_track(
        &self,
        name: &str,
        artist: Option<&str>,
    ) -> Result<String, MusicServiceError>;

    /// Genre tags accepted as recommendation seeds.
    async fn list_genre_seeds(&self) -> Result<Vec<String>, MusicServiceError>;
}

/// Already-resolved seeds for a recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSeeds {
    pub artist_ids: Vec<String>,
    pub track_ids: Vec<String>,
    pub genres: Vec<String>,
}

impl RecommendationSeeds {
    pub fn len(&self) -> usize {
        self.artist_ids.len() + self.track_ids.len() + self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A recommended track as the backend reports it, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
}

#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Issue one recommendation request. Results keep the backend's ranking.
    async fn fetch_recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
        constraints: &TunableConstraints,
    ) -> Result<Vec<CandidateTrack>, MusicServiceError>;
}

#[async_trait]
pub trait Playback: Send + Sync {
    /// Start playing `track_uri` on the user's active device.
    async fn start_playback(&self, track_uri: &str) -> Result<(), MusicServiceError>;
}
