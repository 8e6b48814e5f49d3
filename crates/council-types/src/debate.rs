//! Debate-injection exchange: the user speaks into a tension dialogue and the
//! collaborator answers with new turns and, optionally, an updated matrix.

use serde::{Deserialize, Serialize};

use crate::analysis::{Criterion, DecisionMatrix, DialogueTurn};
use crate::validation::{validate_dilemma, validate_utterance, ShapeError, ValidationError};
use crate::CounselorId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionContext {
    pub core_issue: String,
    pub advisor_ids: [CounselorId; 2],
    pub matrix: DecisionMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorDescriptor {
    pub id: CounselorId,
    pub name: String,
    pub role: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateInjectionRequest {
    pub dilemma_text: String,
    pub tension_context: TensionContext,
    pub dialogue_history: Vec<DialogueTurn>,
    pub user_utterance: String,
    pub advisors: Vec<AdvisorDescriptor>,
}

impl DebateInjectionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dilemma(&self.dilemma_text)?;
        validate_utterance(&self.user_utterance)?;
        if self.advisors.len() < 2 {
            return Err(ValidationError::new(
                "advisors",
                format!("need at least 2 advisor descriptors (got {})", self.advisors.len()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixUpdate {
    pub core_issue: String,
    pub criteria: Vec<Criterion>,
}

impl MatrixUpdate {
    pub fn into_matrix(self) -> (String, DecisionMatrix) {
        (
            self.core_issue,
            DecisionMatrix {
                criteria: self.criteria,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateInjectionResponse {
    pub dialogue: Vec<DialogueTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_update: Option<MatrixUpdate>,
}

impl DebateInjectionResponse {
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        if self.dialogue.is_empty() {
            return Err(ShapeError::new("dialogue", "must contain at least one turn"));
        }
        if let Some(update) = &self.matrix_update {
            DecisionMatrix {
                criteria: update.criteria.clone(),
            }
            .check_shape()
            .map_err(|e| e.nested("matrixUpdate"))?;
        }
        Ok(())
    }
}
