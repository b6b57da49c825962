//! The `list_genre_seeds` tool.

use super::registry::{AgentTool, ToolDefinition, ToolError};
use crate::music::CatalogLookup;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub const GENRE_SEEDS_TOOL: &str = "list_genre_seeds";

pub struct GenreSeedsTool {
    catalog: Arc<dyn CatalogLookup>,
}

impl GenreSeedsTool {
    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl AgentTool for GenreSeedsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::no_params(
            GENRE_SEEDS_TOOL,
            "List the genre tags accepted by recommend as genre_names.",
        )
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        let genres = self.catalog.list_genre_seeds().await?;
        Ok(json!({ "result": genres }))
    }
}
