//! Request orchestration.
//!
//! One user text goes in; the model is given the tool schemas and may call
//! tools any number of times (up to a round bound). The call/response trace
//! is kept, and the latest `recommend` output becomes the result.

mod executor;
mod extract;
mod prompt;
mod state;

pub use executor::{Orchestrator, OrchestratorError, RecommendationResult, DEFAULT_MAX_ROUNDS};
pub use extract::{extract_recommendations, ExtractionStatus};
pub use prompt::SYSTEM_PREAMBLE;
pub use state::ExchangeState;
