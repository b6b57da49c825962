//! Recommendation client.

use super::backend::{CandidateTrack, CatalogLookup, RecommendationBackend, RecommendationSeeds};
use super::error::MusicServiceError;
use super::models::RecommendedTrack;
use super::seeds::SeedSet;
use super::tunables::TunableConstraints;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Number of tracks requested when the caller doesn't say.
pub const DEFAULT_LIMIT: u32 = 5;

/// A recommendation request expressed with human-readable names.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub artist_names: Vec<String>,
    pub track_names: Vec<String>,
    pub genre_names: Vec<String>,
    pub limit: u32,
    pub constraints: TunableConstraints,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            artist_names: Vec::new(),
            track_names: Vec::new(),
            genre_names: Vec::new(),
            limit: DEFAULT_LIMIT,
            constraints: TunableConstraints::new(),
        }
    }
}

/// Turns names into seeds and asks the backend for recommendations.
///
/// Seed down-sampling draws from the client's own generator. Construct it
/// with [`RecommendationClient::with_seed`] for reproducible selections.
pub struct RecommendationClient {
    catalog: Arc<dyn CatalogLookup>,
    backend: Arc<dyn RecommendationBackend>,
    rng: Mutex<StdRng>,
}

impl RecommendationClient {
    /// Create a client whose seed sampling is seeded from the OS.
    pub fn new(catalog: Arc<dyn CatalogLookup>, backend: Arc<dyn RecommendationBackend>) -> Self {
        Self::with_rng(catalog, backend, StdRng::from_os_rng())
    }

    /// Create a client with a fixed sampling seed.
    pub fn with_seed(
        catalog: Arc<dyn CatalogLookup>,
        backend: Arc<dyn RecommendationBackend>,
        seed: u64,
    ) -> Self {
        Self::with_rng(catalog, backend, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(
        catalog: Arc<dyn CatalogLookup>,
        backend: Arc<dyn RecommendationBackend>,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            backend,
            rng: Mutex::new(rng),
        }
    }

    /// The catalog used for name resolution.
    pub fn catalog(&self) -> &Arc<dyn CatalogLookup> {
        &self.catalog
    }

    /// Recommend up to `request.limit` tracks.
    ///
    /// Name lookups and the backend call are not retried; the first failure
    /// is returned as is.
    pub async fn recommend(
        &self,
        request: RecommendRequest,
    ) -> Result<Vec<RecommendedTrack>, MusicServiceError> {
        let seeds = SeedSet::new(
            request.artist_names,
            request.track_names,
            request.genre_names,
        );
        let requested = seeds.len();

        let seeds = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            seeds.down_sample(&mut *rng)
        };
        if seeds.len() < requested {
            debug!(
                requested = requested,
                artists = ?seeds.artists,
                tracks = ?seeds.tracks,
                genres = ?seeds.genres,
                "Down-sampled recommendation seeds"
            );
        }

        let mut resolved = RecommendationSeeds {
            genres: seeds.genres,
            ..Default::default()
        };
        for artist in &seeds.artists {
            resolved
                .artist_ids
                .push(self.catalog.resolve_artist(artist).await?);
        }
        for track in &seeds.tracks {
            resolved
                .track_ids
                .push(self.catalog.resolve_track(track, None).await?);
        }

        let candidates = self
            .backend
            .fetch_recommendations(&resolved, request.limit, &request.constraints)
            .await?;

        let tracks = reshape(candidates, request.limit as usize);
        info!(
            count = tracks.len(),
            limit = request.limit,
            seeds = resolved.len(),
            "Recommendations fetched"
        );
        Ok(tracks)
    }
}

/// Keep backend order, drop entries without an id or artist, cap at `limit`.
fn reshape(candidates: Vec<CandidateTrack>, limit: usize) -> Vec<RecommendedTrack> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let id = match candidate.id {
                Some(id) if !id.is_empty() => id,
                _ => {
                    warn!(name = %candidate.name, "Skipping recommended track without id");
                    return None;
                }
            };
            let Some(artist) = candidate.artists.into_iter().next() else {
                warn!(id = %id, "Skipping recommended track without artists");
                return None;
            };
            Some(RecommendedTrack {
                name: candidate.name,
                artist,
                id,
            })
        })
        .take(limit)
        .collect()
}
