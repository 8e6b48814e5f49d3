//! Analysis request sent to the collaborator for both summon and refine

use serde::{Deserialize, Serialize};

use crate::style::{CognitiveStyle, ReflectionFocus};
use crate::validation::{
    clamp_advisor_count, validate_additional_context, validate_dilemma, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub dilemma_text: String,
    pub cognitive_style: Option<CognitiveStyle>,
    pub advisor_count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_context_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_focus: Option<ReflectionFocus>,
}

impl AnalysisRequest {
    /// Request for a first summoning; the advisor count is clamped to 3..=7
    pub fn summon(
        dilemma_text: impl Into<String>,
        cognitive_style: Option<CognitiveStyle>,
        advisor_count: u8,
        reflection_focus: ReflectionFocus,
    ) -> Self {
        Self {
            dilemma_text: dilemma_text.into(),
            cognitive_style,
            advisor_count: clamp_advisor_count(advisor_count),
            previous_context_summary: None,
            additional_context: None,
            reflection_focus: Some(reflection_focus),
        }
    }

    pub fn with_refinement(
        mut self,
        previous_context_summary: Option<String>,
        additional_context: impl Into<String>,
    ) -> Self {
        self.previous_context_summary = previous_context_summary;
        self.additional_context = Some(additional_context.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dilemma(&self.dilemma_text)?;
        if let Some(extra) = &self.additional_context {
            validate_additional_context(extra)?;
        }
        if clamp_advisor_count(self.advisor_count) != self.advisor_count {
            return Err(ValidationError::new(
                "advisorCount",
                format!("{} outside 3..=7", self.advisor_count),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summon_request_wire_shape() {
        let req = AnalysisRequest::summon(
            "I was offered a new job in another city",
            Some("INTJ".parse().unwrap()),
            9,
            ReflectionFocus::DecisionMaking,
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "dilemmaText": "I was offered a new job in another city",
                "cognitiveStyle": "INTJ",
                "advisorCount": 7,
                "reflectionFocus": "Decision-Making"
            })
        );
        assert!(req.validate().is_ok());
    }

    #[test]
    fn refinement_fields_are_validated() {
        let req = AnalysisRequest::summon(
            "I was offered a new job in another city",
            None,
            4,
            ReflectionFocus::Relationships,
        )
        .with_refinement(Some("earlier".into()), "x".repeat(301));
        assert_eq!(req.validate().unwrap_err().field, "additionalContext");
    }
}
