//! Tools the model can call.
//!
//! `recommend` and `list_genre_seeds` are the two music capabilities; the
//! registry holds them and executes calls by name.

mod genre_seeds;
mod recommend;
mod registry;

pub use genre_seeds::{GenreSeedsTool, GENRE_SEEDS_TOOL};
pub use recommend::{RecommendTool, RECOMMEND_TOOL};
pub use registry::{AgentTool, AgentToolRegistry, ToolDefinition, ToolError};

use crate::music::RecommendationClient;
use std::sync::Arc;

/// Registry with the music tools, backed by `client` and its catalog.
pub fn music_tools(client: Arc<RecommendationClient>) -> AgentToolRegistry {
    let mut registry = AgentToolRegistry::new();
    registry.register(GenreSeedsTool::new(client.catalog().clone()));
    registry.register(RecommendTool::new(client));
    registry
}
