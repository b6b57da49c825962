//! Spotify Web API response types.
//!
//! Only the fields this crate reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub artists: Option<Page<SpotifyArtist>>,
    #[serde(default)]
    pub tracks: Option<Page<SpotifyTrack>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpotifyArtist {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpotifyTrack {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
}

// =============================================================================
// Recommendations
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationsResponse {
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreSeedsResponse {
    pub genres: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartPlaybackBody<'a> {
    pub uris: Vec<&'a str>,
}

// =============================================================================
// Library
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SavedTrackItem {
    pub track: SpotifyTrack,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<serde_json::Map<String, serde_json::Value>>>,
}

/// A saved track together with its numeric audio features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedTrackFeatures {
    pub name: String,
    pub id: String,
    /// Numeric features keyed by name (`energy`, `tempo`, ...). Empty when
    /// the service has no analysis for the track.
    pub features: BTreeMap<String, f64>,
}
