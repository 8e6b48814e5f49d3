//! CouncilClient trait: the only API boundary between the council UI and the
//! analysis collaborator. The UI crate never sees HTTP.

pub mod http;

use async_trait::async_trait;
use council_types::{
    AnalysisRequest, AnalysisResult, DebateInjectionRequest, DebateInjectionResponse, ShapeError,
    ValidationError,
};
use thiserror::Error;

pub use http::HttpClient;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally; nothing was sent
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[async_trait]
pub trait CouncilClient: Send + Sync {
    /// Summon or refine: returns a complete, shape-checked analysis snapshot
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult>;

    /// Speak into a tension dialogue (also used to score a new criterion)
    async fn inject_debate(
        &self,
        request: DebateInjectionRequest,
    ) -> Result<DebateInjectionResponse>;
}

/// Decode and shape-check an analysis body. Non-conforming responses are
/// rejected whole, never partially accepted.
pub fn decode_analysis(body: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult = serde_json::from_str(body)?;
    result.check_shape()?;
    Ok(result)
}

pub fn decode_debate(body: &str) -> Result<DebateInjectionResponse> {
    let response: DebateInjectionResponse = serde_json::from_str(body)?;
    response.check_shape()?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ANALYSIS: &str = r#"{
        "summary": "Career move versus staying close to a partner.",
        "counselors": [
            {"id": "mirror", "impression": "You want both.", "assessment": "a",
             "actionPlan": ["talk"], "reflectionQuestion": "q?"},
            {"id": "sage", "impression": "Think long.", "assessment": "b",
             "actionPlan": [], "reflectionQuestion": "q?"}
        ],
        "tensions": [
            {"pairId": "mirror-sage", "counselorIds": ["mirror", "sage"],
             "kind": "synthesis", "coreIssue": "now versus later",
             "dialogue": [{"speaker": "mirror", "text": "Now matters."}],
             "matrix": {"criteria": [
                {"id": "money", "label": "Money", "scoreA": 7, "scoreB": 4, "reasoning": "r"}
             ]}}
        ],
        "contextSummary": "partner is unsure"
    }"#;

    #[test]
    fn decodes_well_formed_analysis() {
        let result = decode_analysis(ANALYSIS).unwrap();
        assert_eq!(result.counselors.len(), 2);
        assert_eq!(result.tensions[0].matrix.criteria[0].score_a, 7.0);
        assert_eq!(result.context_summary.as_deref(), Some("partner is unsure"));
    }

    #[test]
    fn missing_dialogue_is_a_decode_error() {
        let body = ANALYSIS.replace(r#""dialogue": [{"speaker": "mirror", "text": "Now matters."}],"#, "");
        assert!(matches!(decode_analysis(&body), Err(ClientError::Decode(_))));
    }

    #[test]
    fn out_of_range_score_is_a_shape_error() {
        let body = ANALYSIS.replace(r#""scoreA": 7"#, r#""scoreA": 12"#);
        match decode_analysis(&body) {
            Err(ClientError::Shape(err)) => {
                assert_eq!(err.path, "tensions[0].matrix.criteria[0].scoreA")
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn debate_reply_needs_dialogue() {
        assert!(matches!(
            decode_debate(r#"{"dialogue": []}"#),
            Err(ClientError::Shape(_))
        ));
        let reply = decode_debate(
            r#"{"dialogue": [{"speaker": "sage", "text": "Look further out."}],
                "matrixUpdate": {"coreIssue": "now versus later", "criteria": []}}"#,
        )
        .unwrap();
        assert!(reply.matrix_update.is_some());
    }
}
