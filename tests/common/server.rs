//! Fake Spotify Web API.
//!
//! Serves the handful of endpoints the client uses from the fixture data in
//! `constants`, and records what it receives so tests can assert on it.

use super::constants::*;
use autospotify::{SpotifyClient, TokenSource};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Params = Query<HashMap<String, String>>;

#[derive(Default)]
pub struct FakeState {
    /// Query parameters of every `/recommendations` request.
    pub recommendation_queries: Mutex<Vec<HashMap<String, String>>>,
    /// Bodies of every accepted `PUT /me/player/play`.
    pub played: Mutex<Vec<Value>>,
    /// Number of `/search` requests served.
    pub searches: Mutex<usize>,
    /// When set, playback requests fail as if no device were active.
    pub no_active_device: Mutex<bool>,
}

/// Fake API instance. Shuts down when dropped.
pub struct FakeSpotify {
    /// API root, e.g. "http://127.0.0.1:12345/v1"
    pub base_url: String,
    pub state: Arc<FakeState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeSpotify {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());

        let api = Router::new()
            .route("/search", get(search))
            .route("/recommendations", get(recommendations))
            .route(
                "/recommendations/available-genre-seeds",
                get(genre_seeds),
            )
            .route("/me/player/play", put(play))
            .route("/me/tracks", get(saved_tracks))
            .route("/audio-features", get(audio_features))
            .with_state(state.clone());
        let app = Router::new().nest("/v1", api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Spotify listener");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake Spotify server failed");
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Client authenticated with the accepted test token.
    pub fn client(&self) -> SpotifyClient {
        self.client_with_token(TokenSource::Static(TEST_TOKEN.to_string()))
    }

    pub fn client_with_token(&self, token: TokenSource) -> SpotifyClient {
        SpotifyClient::new(self.base_url.clone(), token, Duration::from_secs(5))
            .expect("Failed to create client")
    }

    pub fn recommendation_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.recommendation_queries.lock().unwrap().clone()
    }

    pub fn played(&self) -> Vec<Value> {
        self.state.played.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        *self.state.searches.lock().unwrap()
    }

    pub fn set_no_active_device(&self, value: bool) {
        *self.state.no_active_device.lock().unwrap() = value;
    }
}

impl Drop for FakeSpotify {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
    )
        .into_response()
}

async fn search(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    *state.searches.lock().unwrap() += 1;

    let q = params.get("q").cloned().unwrap_or_default();
    match params.get("type").map(String::as_str) {
        Some("artist") => {
            let name = q.strip_prefix("artist:").unwrap_or(&q);
            let items: Vec<Value> = ARTISTS
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(n, id)| json!({"id": id, "name": n}))
                .collect();
            Json(json!({"artists": {"items": items}})).into_response()
        }
        Some("track") => {
            let rest = q.strip_prefix("track:").unwrap_or(&q);
            let (name, artist) = match rest.split_once(" artist:") {
                Some((name, artist)) => (name, Some(artist)),
                None => (rest, None),
            };
            let items: Vec<Value> = TRACKS
                .iter()
                .filter(|(n, a, _)| {
                    n.eq_ignore_ascii_case(name)
                        && artist.map(|x| a.eq_ignore_ascii_case(x)).unwrap_or(true)
                })
                .map(|(n, a, id)| json!({"id": id, "name": n, "artists": [{"name": a}]}))
                .collect();
            Json(json!({"tracks": {"items": items}})).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"status": 400, "message": "Missing type"}})),
        )
            .into_response(),
    }
}

async fn recommendations(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state
        .recommendation_queries
        .lock()
        .unwrap()
        .push(params.clone());

    let seeded = ["seed_artists", "seed_tracks", "seed_genres"]
        .iter()
        .any(|key| params.get(*key).is_some_and(|v| !v.is_empty()));
    if !seeded {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"status": 400, "message": "No seed"}})),
        )
            .into_response();
    }

    let genres = params.get("seed_genres").cloned().unwrap_or_default();
    if genres.split(',').any(|g| g == BROKEN_GENRE) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "recommendation engine unavailable",
        )
            .into_response();
    }

    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    let tracks: Vec<Value> = (1..=limit)
        .map(|i| {
            json!({
                "id": format!("rec{:02}", i),
                "name": format!("Recommended {}", i),
                "artists": [{"id": format!("artist{}", i), "name": format!("Artist {}", i)}]
            })
        })
        .collect();
    Json(json!({"tracks": tracks, "seeds": []})).into_response()
}

async fn genre_seeds(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"genres": GENRE_SEEDS})).into_response()
}

async fn play(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if *state.no_active_device.lock().unwrap() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Player command failed: No active device found", "reason": "NO_ACTIVE_DEVICE"}})),
        )
            .into_response();
    }
    state.played.lock().unwrap().push(body);
    StatusCode::NO_CONTENT.into_response()
}

async fn saved_tracks(headers: HeaderMap, Query(params): Params) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);
    let items: Vec<Value> = TRACKS
        .iter()
        .take(limit)
        .map(|(n, a, id)| {
            json!({
                "added_at": "2024-01-01T00:00:00Z",
                "track": {"id": id, "name": n, "artists": [{"name": a}]}
            })
        })
        .collect();
    Json(json!({"items": items, "total": items.len()})).into_response()
}

async fn audio_features(headers: HeaderMap, Query(params): Params) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let ids = params.get("ids").cloned().unwrap_or_default();
    let features: Vec<Value> = ids
        .split(',')
        .map(|id| {
            // Levels has no analysis.
            if id == "5UqCQaDshqbIk3pkhy4Pjg" {
                Value::Null
            } else {
                json!({
                    "id": id,
                    "type": "audio_features",
                    "energy": 0.8,
                    "valence": 0.5,
                    "tempo": 120.0,
                    "mode": 1,
                    "uri": format!("spotify:track:{}", id)
                })
            }
        })
        .collect();
    Json(json!({"audio_features": features})).into_response()
}
