//! The `recommend` tool.

use super::registry::{AgentTool, ToolDefinition, ToolError};
use crate::music::{
    RecommendRequest, RecommendationClient, TunableAttribute, TunableKey, DEFAULT_LIMIT, MAX_SEEDS,
};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

pub const RECOMMEND_TOOL: &str = "recommend";

/// Exposes [`RecommendationClient::recommend`] to the model.
///
/// Output shape: `{"result": [{"name", "artist", "id"}, ...]}`.
pub struct RecommendTool {
    client: Arc<RecommendationClient>,
}

impl RecommendTool {
    pub fn new(client: Arc<RecommendationClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentTool for RecommendTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(RECOMMEND_TOOL, description(), parameters_schema())
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let request = parse_request(args)?;
        let tracks = self.client.recommend(request).await?;
        Ok(json!({ "result": tracks }))
    }
}

fn description() -> String {
    let attributes: Vec<&str> = TunableAttribute::ALL.iter().map(|a| a.as_str()).collect();
    format!(
        "Recommend tracks similar to the given artists, tracks and genres. \
         Seeds are artist names, track names and genre tags; at most {max} seeds are used \
         in total and any extra seeds are dropped at random. Genre tags must come from \
         list_genre_seeds. Tunable constraints are optional keyword arguments named \
         {{min|max|target}}_<attribute>, where <attribute> is one of: {attributes}. \
         For example min_energy=0.7, target_tempo=120 or max_duration_ms=240000. \
         Returns a list of tracks, each with its name, primary artist and id.",
        max = MAX_SEEDS,
        attributes = attributes.join(", ")
    )
}

fn parameters_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(
        "artist_names".to_string(),
        json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "Artist names to seed from, e.g. [\"Kygo\"]"
        }),
    );
    properties.insert(
        "track_names".to_string(),
        json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "Track names to seed from, without the artist, e.g. [\"Stargazing\"]"
        }),
    );
    properties.insert(
        "genre_names".to_string(),
        json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "Genre tags to seed from, e.g. [\"house\"]"
        }),
    );
    properties.insert(
        "limit".to_string(),
        json!({
            "type": "integer",
            "description": format!("Number of tracks to return (default {})", DEFAULT_LIMIT),
            "default": DEFAULT_LIMIT,
            "minimum": 1,
            "maximum": 100
        }),
    );
    for key in TunableKey::all() {
        properties.insert(key.to_string(), json!({"type": "number"}));
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": []
    })
}

/// Turn model-supplied arguments into a request.
///
/// Name lists may also be given as a single string. Numbers may be given as
/// numeric strings. Keys outside the known parameters and the tunable naming
/// convention are ignored. At least one seed is required.
fn parse_request(args: Value) -> Result<RecommendRequest, ToolError> {
    let map = match args {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ToolError::InvalidArguments(format!(
                "expected an object, got {}",
                other
            )))
        }
    };

    let mut request = RecommendRequest::default();
    for (key, value) in map {
        match key.as_str() {
            "artist_names" => request.artist_names = string_list(&key, value)?,
            "track_names" => request.track_names = string_list(&key, value)?,
            "genre_names" => request.genre_names = string_list(&key, value)?,
            "limit" => {
                if let Some(limit) = parse_limit(&value)? {
                    request.limit = limit;
                }
            }
            other => match TunableKey::parse(other) {
                Some(tunable) => {
                    let number = as_number(&value).ok_or_else(|| {
                        ToolError::InvalidArguments(format!("{} must be a number", other))
                    })?;
                    request.constraints.insert(tunable, number);
                }
                None => warn!(argument = %other, "Ignoring unknown recommend argument"),
            },
        }
    }
    if request.artist_names.is_empty()
        && request.track_names.is_empty()
        && request.genre_names.is_empty()
    {
        return Err(ToolError::InvalidArguments(
            "at least one of artist_names, track_names, genre_names is required".to_string(),
        ));
    }
    Ok(request)
}

fn string_list(key: &str, value: Value) -> Result<Vec<String>, ToolError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(ToolError::InvalidArguments(format!(
                    "{} must contain strings, got {}",
                    key, other
                ))),
            })
            .collect(),
        other => Err(ToolError::InvalidArguments(format!(
            "{} must be a list of strings, got {}",
            key, other
        ))),
    }
}

fn parse_limit(value: &Value) -> Result<Option<u32>, ToolError> {
    if value.is_null() {
        return Ok(None);
    }
    match as_number(value) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(Some(n as u32)),
        _ => Err(ToolError::InvalidArguments(format!(
            "limit must be a non-negative integer, got {}",
            value
        ))),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
