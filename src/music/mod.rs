//! Music domain types and the recommendation client.
//!
//! This module is independent of any particular streaming service:
//! - `backend`: the traits a catalog/recommendation/playback backend implements
//! - `seeds`: seed sets and the five-seed down-sampling policy
//! - `tunables`: `{min|max|target}_<attribute>` recommendation constraints
//! - `recommender`: name resolution + one recommendation request

mod backend;
mod error;
mod models;
mod recommender;
mod seeds;
mod tunables;

pub use backend::{
    CandidateTrack, CatalogLookup, Playback, RecommendationBackend, RecommendationSeeds,
};
pub use error::{MusicServiceError, SearchKind};
pub use models::RecommendedTrack;
pub use recommender::{RecommendRequest, RecommendationClient, DEFAULT_LIMIT};
pub use seeds::{SeedSet, MAX_SEEDS};
pub use tunables::{Bound, TunableAttribute, TunableConstraints, TunableKey};
