//! End-to-end tests: scripted model, real tools, fake Spotify API.

mod common;

use autospotify::agent::music_tools;
use autospotify::agent::trace::InvocationKind;
use autospotify::music::{MusicServiceError, RecommendationClient};
use autospotify::{ExtractionStatus, Orchestrator, OrchestratorError};
use common::*;
use serde_json::json;
use std::sync::Arc;

fn orchestrator(fake: &FakeSpotify, model: Arc<ScriptedModel>) -> Orchestrator {
    let spotify = Arc::new(fake.client());
    let recommender = RecommendationClient::with_seed(spotify.clone(), spotify, 11);
    Orchestrator::new(model, Arc::new(music_tools(Arc::new(recommender))))
}

#[tokio::test]
async fn test_small_talk_yields_empty_result() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(ScriptedModel::new().then_text("Hi! What would you like to hear?"));

    let result = orchestrator(&fake, model.clone()).run("hello").await.unwrap();

    assert!(result.tracks.is_empty());
    assert_eq!(result.status, ExtractionStatus::NoRecommendation);
    assert!(!result
        .trace
        .iter()
        .any(|r| r.kind == InvocationKind::Response && r.tool_name == "recommend"));
    assert_eq!(result.reply, "Hi! What would you like to hear?");
    assert_eq!(
        model.offered_tools(),
        vec![vec!["list_genre_seeds".to_string(), "recommend".to_string()]]
    );
    assert!(fake.recommendation_queries().is_empty());
}

#[tokio::test]
async fn test_songs_like_stargazing_up_to_ten() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call(
                "recommend",
                json!({"track_names": ["Stargazing"], "artist_names": ["Kygo"], "limit": 10}),
            )
            .then_text("Here are ten songs in the spirit of Stargazing."),
    );

    let result = orchestrator(&fake, model)
        .run("recommend songs like Stargazing by Kygo, up to 10")
        .await
        .unwrap();

    let call = result
        .trace
        .iter()
        .find(|r| r.kind == InvocationKind::Call && r.tool_name == "recommend")
        .expect("recommend was called");
    assert!(call.payload["track_names"]
        .as_array()
        .unwrap()
        .contains(&json!("Stargazing")));
    assert_eq!(call.payload["limit"], 10);

    assert_eq!(result.status, ExtractionStatus::Found);
    assert!(result.tracks.len() <= 10);
    assert_eq!(result.tracks.len(), 10);
    assert!(result.tracks.iter().all(|t| !t.id.is_empty()));
    assert_eq!(result.tracks[0].label(), "Recommended 1 by Artist 1");

    let query = &fake.recommendation_queries()[0];
    assert_eq!(query["seed_tracks"], STARGAZING_ID);
    assert_eq!(query["seed_artists"], KYGO_ID);
    assert_eq!(query["limit"], "10");

    let table = result.trace_table();
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.rows()[1].kind, "response");
}

#[tokio::test]
async fn test_genre_listing_then_tuned_recommendation() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call("list_genre_seeds", json!({}))
            .then_call(
                "recommend",
                json!({"genre_names": "house", "min_energy": 0.7, "max_acousticness": 0.2}),
            )
            .then_text("Energetic house coming up."),
    );

    let result = orchestrator(&fake, model.clone())
        .run("energetic house music")
        .await
        .unwrap();

    assert_eq!(result.trace.len(), 4);
    assert_eq!(
        result.trace[1].payload,
        json!({"result": GENRE_SEEDS})
    );
    // Default limit when the model gives none.
    assert_eq!(result.tracks.len(), 5);

    let query = &fake.recommendation_queries()[0];
    assert_eq!(query["seed_genres"], "house");
    assert_eq!(query["min_energy"], "0.7");
    assert_eq!(query["max_acousticness"], "0.2");
    assert_eq!(query["limit"], "5");

    // The genre list was fed back to the model before its second turn.
    let second_request = &model.requests()[1];
    assert!(second_request
        .last()
        .unwrap()
        .content
        .contains("\"house\""));
}

#[tokio::test]
async fn test_too_many_seeds_are_reduced_to_five() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call(
                "recommend",
                json!({
                    "artist_names": ["Kygo", "Avicii"],
                    "track_names": ["Stargazing", "Firestone", "Levels"],
                    "genre_names": ["house", "edm"]
                }),
            )
            .then_text("Done."),
    );

    orchestrator(&fake, model).run("mix of everything").await.unwrap();

    let query = &fake.recommendation_queries()[0];
    let count = |key: &str| {
        query
            .get(key)
            .map(|v| v.split(',').count())
            .unwrap_or(0)
    };
    assert_eq!(
        count("seed_artists") + count("seed_tracks") + count("seed_genres"),
        5
    );
}

#[tokio::test]
async fn test_invalid_arguments_are_reported_back() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call("recommend", json!({"track_names": ["Stargazing"], "limit": "lots"}))
            .then_call("recommend", json!({"track_names": ["Stargazing"], "limit": 3}))
            .then_text("Fixed it."),
    );

    let result = orchestrator(&fake, model).run("a few like Stargazing").await.unwrap();

    assert_eq!(result.trace.len(), 4);
    assert!(result.trace[1].payload["error"]
        .as_str()
        .unwrap()
        .contains("limit"));
    assert_eq!(result.status, ExtractionStatus::Found);
    assert_eq!(result.tracks.len(), 3);
    assert_eq!(fake.recommendation_queries().len(), 1);
}

#[tokio::test]
async fn test_seedless_call_is_reported_back() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call("recommend", json!({}))
            .then_call("recommend", json!({"genre_names": ["house"], "limit": 4}))
            .then_text("Here you go."),
    );

    let result = orchestrator(&fake, model.clone())
        .run("something to dance to")
        .await
        .unwrap();

    assert_eq!(result.trace.len(), 4);
    assert_eq!(result.trace[1].kind, InvocationKind::Response);
    assert!(result.trace[1].payload["error"]
        .as_str()
        .unwrap()
        .contains("genre_names"));
    assert_eq!(result.status, ExtractionStatus::Found);
    assert_eq!(result.tracks.len(), 4);
    assert_eq!(result.reply, "Here you go.");
    assert_eq!(model.requests().len(), 3);
    // Only the corrected call reached the API.
    assert_eq!(fake.recommendation_queries().len(), 1);
}

#[tokio::test]
async fn test_unknown_artist_aborts_request() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call("recommend", json!({"artist_names": ["Nobody Famous"]}))
            .then_text("unreachable"),
    );

    let err = orchestrator(&fake, model.clone())
        .run("like Nobody Famous")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::Service(MusicServiceError::NotFound { .. })
    ));
    assert_eq!(model.requests().len(), 1);
    assert!(fake.recommendation_queries().is_empty());
}

#[tokio::test]
async fn test_same_text_twice_gives_two_results() {
    let fake = FakeSpotify::spawn().await;
    let model = Arc::new(
        ScriptedModel::new()
            .then_call("recommend", json!({"track_names": ["Stargazing"]}))
            .then_text("First.")
            .then_call("recommend", json!({"track_names": ["Stargazing"]}))
            .then_text("Second."),
    );
    let orchestrator = orchestrator(&fake, model);

    let first = orchestrator.run("like Stargazing").await.unwrap();
    let second = orchestrator.run("like Stargazing").await.unwrap();

    for result in [&first, &second] {
        assert_eq!(result.status, ExtractionStatus::Found);
        assert_eq!(result.tracks.len(), 5);
        assert_eq!(result.trace.len(), 2);
    }
    assert_eq!(first.reply, "First.");
    assert_eq!(second.reply, "Second.");
}
