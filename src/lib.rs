//! AutoSpotify Library
//!
//! Conversational music recommendations: a language model turns free text
//! into tool calls against a streaming catalog, and the resulting call trace
//! is reduced to a list of recommended tracks.

pub mod agent;
pub mod cli_style;
pub mod config;
pub mod music;
pub mod session;
pub mod spotify;

// Re-export commonly used types for convenience
pub use agent::{
    ExtractionStatus, Orchestrator, OrchestratorError, RecommendationResult, ToolInvocationRecord,
    TraceTable,
};
pub use music::{MusicServiceError, RecommendationClient, RecommendedTrack};
pub use session::Session;
pub use spotify::{SpotifyClient, TokenSource};
