//! Recommendation extraction from a finished trace.

use crate::agent::tools::RECOMMEND_TOOL;
use crate::agent::trace::ToolInvocationRecord;
use crate::music::RecommendedTrack;
use tracing::warn;

/// How the track list of a result was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// A `recommend` response was found and parsed.
    Found,
    /// The model never got a successful `recommend` response.
    NoRecommendation,
    /// The latest `recommend` response could not be parsed.
    Malformed(String),
}

/// Take the track list from the most recent successful `recommend` response.
///
/// Responses that carry an error payload are not recommendations and are
/// skipped.
pub fn extract_recommendations(
    trace: &[ToolInvocationRecord],
) -> (Vec<RecommendedTrack>, ExtractionStatus) {
    let Some(record) = trace
        .iter()
        .rev()
        .find(|r| r.is_response_from(RECOMMEND_TOOL) && r.payload.get("error").is_none())
    else {
        return (Vec::new(), ExtractionStatus::NoRecommendation);
    };

    let Some(result) = record.payload.get("result") else {
        warn!(step = record.step_number, "recommend response has no result field");
        return (
            Vec::new(),
            ExtractionStatus::Malformed("missing result field".to_string()),
        );
    };

    match serde_json::from_value::<Vec<RecommendedTrack>>(result.clone()) {
        Ok(tracks) => (tracks, ExtractionStatus::Found),
        Err(e) => {
            warn!(step = record.step_number, error = %e, "Unparsable recommend result");
            (Vec::new(), ExtractionStatus::Malformed(e.to_string()))
        }
    }
}
