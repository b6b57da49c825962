//! HTTP client for the Spotify Web API.

use super::models::{
    AudioFeaturesResponse, GenreSeedsResponse, RecommendationsResponse, SavedTrackFeatures,
    SavedTracksResponse, SearchResponse, SpotifyTrack, StartPlaybackBody,
};
use super::token::TokenSource;
use crate::music::{
    CandidateTrack, CatalogLookup, MusicServiceError, Playback, RecommendationBackend,
    RecommendationSeeds, SearchKind, TunableConstraints,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Which error a failed request turns into.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Lookup,
    Recommendation,
    Playback,
}

impl Endpoint {
    fn error(self, message: String) -> MusicServiceError {
        match self {
            Endpoint::Lookup => MusicServiceError::Lookup(message),
            Endpoint::Recommendation => MusicServiceError::Recommendation(message),
            Endpoint::Playback => MusicServiceError::Playback(message),
        }
    }
}

/// Authenticated Spotify Web API client.
///
/// Implements [`CatalogLookup`], [`RecommendationBackend`] and [`Playback`].
pub struct SpotifyClient {
    client: reqwest::Client,
    base_url: String,
    token: TokenSource,
}

impl SpotifyClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://api.spotify.com/v1")
    /// * `token` - Source of the bearer token
    /// * `timeout` - Timeout applied to every request
    pub fn new(base_url: impl Into<String>, token: TokenSource, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, MusicServiceError> {
        let token = self.token.token().await?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        path: &str,
        endpoint: Endpoint,
    ) -> Result<Response, MusicServiceError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                endpoint.error(format!("{} timed out", path))
            } else {
                endpoint.error(format!("{}: {}", path, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MusicServiceError::Auth(format!(
                "{} rejected the access token",
                path
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path = %path, status = status.as_u16(), "Spotify request failed");
            return Err(endpoint.error(format!("{} failed with status {}: {}", path, status, body)));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        endpoint: Endpoint,
    ) -> Result<T, MusicServiceError> {
        debug!(path = %path, params = query.len(), "GET");
        let builder = self.request(Method::GET, path).await?.query(query);
        let response = self.send(builder, path, endpoint).await?;
        response
            .json()
            .await
            .map_err(|e| endpoint.error(format!("Malformed response from {}: {}", path, e)))
    }

    async fn search(&self, q: String, kind: SearchKind) -> Result<SearchResponse, MusicServiceError> {
        let query = vec![
            ("q".to_string(), q),
            ("type".to_string(), kind.to_string()),
            ("limit".to_string(), "1".to_string()),
        ];
        self.get_json("/search", &query, Endpoint::Lookup).await
    }

    /// The user's `limit` most recently saved tracks with their audio features.
    pub async fn saved_tracks_audio_features(
        &self,
        limit: u32,
    ) -> Result<Vec<SavedTrackFeatures>, MusicServiceError> {
        let saved: SavedTracksResponse = self
            .get_json(
                "/me/tracks",
                &[("limit".to_string(), limit.to_string())],
                Endpoint::Lookup,
            )
            .await?;

        let tracks: Vec<(String, String)> = saved
            .items
            .into_iter()
            .filter_map(|item| item.track.id.map(|id| (id, item.track.name)))
            .collect();
        if tracks.is_empty() {
            return Ok(Vec::new());
        }

        let ids = tracks
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let features: AudioFeaturesResponse = self
            .get_json("/audio-features", &[("ids".to_string(), ids)], Endpoint::Lookup)
            .await?;

        let mut features = features.audio_features.into_iter();
        Ok(tracks
            .into_iter()
            .map(|(id, name)| {
                let values = features
                    .next()
                    .flatten()
                    .map(|map| {
                        map.into_iter()
                            .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
                            .collect()
                    })
                    .unwrap_or_default();
                SavedTrackFeatures {
                    name,
                    id,
                    features: values,
                }
            })
            .collect())
    }
}

#[async_trait]
impl CatalogLookup for SpotifyClient {
    async fn resolve_artist(&self, name: &str) -> Result<String, MusicServiceError> {
        if name.trim().is_empty() {
            return Err(MusicServiceError::not_found(SearchKind::Artist, name));
        }

        let response = self
            .search(format!("artist:{}", name), SearchKind::Artist)
            .await?;

        response
            .artists
            .into_iter()
            .flat_map(|page| page.items)
            .find_map(|artist| artist.id)
            .ok_or_else(|| MusicServiceError::not_found(SearchKind::Artist, name))
    }

    async fn resolve_track(
        &self,
        name: &str,
        artist: Option<&str>,
    ) -> Result<String, MusicServiceError> {
        if name.trim().is_empty() {
            return Err(MusicServiceError::not_found(SearchKind::Track, name));
        }

        let q = match artist {
            Some(artist) => format!("track:{} artist:{}", name, artist),
            None => format!("track:{}", name),
        };
        let response = self.search(q, SearchKind::Track).await?;

        response
            .tracks
            .into_iter()
            .flat_map(|page| page.items)
            .find_map(|track| track.id)
            .ok_or_else(|| MusicServiceError::not_found(SearchKind::Track, name))
    }

    async fn list_genre_seeds(&self) -> Result<Vec<String>, MusicServiceError> {
        let response: GenreSeedsResponse = self
            .get_json(
                "/recommendations/available-genre-seeds",
                &[],
                Endpoint::Lookup,
            )
            .await?;
        Ok(response.genres)
    }
}

#[async_trait]
impl RecommendationBackend for SpotifyClient {
    async fn fetch_recommendations(
        &self,
        seeds: &RecommendationSeeds,
        limit: u32,
        constraints: &TunableConstraints,
    ) -> Result<Vec<CandidateTrack>, MusicServiceError> {
        let mut query = Vec::new();
        for (key, values) in [
            ("seed_artists", &seeds.artist_ids),
            ("seed_tracks", &seeds.track_ids),
            ("seed_genres", &seeds.genres),
        ] {
            if !values.is_empty() {
                query.push((key.to_string(), values.join(",")));
            }
        }
        query.push(("limit".to_string(), limit.to_string()));
        query.extend(constraints.query_params());

        let response: RecommendationsResponse = self
            .get_json("/recommendations", &query, Endpoint::Recommendation)
            .await?;

        Ok(response.tracks.into_iter().map(to_candidate).collect())
    }
}

#[async_trait]
impl Playback for SpotifyClient {
    async fn start_playback(&self, track_uri: &str) -> Result<(), MusicServiceError> {
        let path = "/me/player/play";
        let builder = self
            .request(Method::PUT, path)
            .await?
            .json(&StartPlaybackBody {
                uris: vec![track_uri],
            });
        self.send(builder, path, Endpoint::Playback).await?;
        debug!(uri = %track_uri, "Playback started");
        Ok(())
    }
}

fn to_candidate(track: SpotifyTrack) -> CandidateTrack {
    CandidateTrack {
        id: track.id,
        name: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
    }
}
