//! Analysis snapshot produced by the collaborator.
//!
//! An `AnalysisResult` is immutable once accepted: a refinement produces a
//! brand-new snapshot, it never patches the previous one.

use serde::{Deserialize, Serialize};

use crate::validation::ShapeError;
use crate::CounselorId;

/// Speaker tag used for turns typed by the user in a debate transcript.
pub const USER_SPEAKER: &str = "user";

/// Upper bound of a criterion score (scores run 0..=10).
pub const MAX_CRITERION_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub counselors: Vec<CounselorInsight>,
    pub tensions: Vec<Tension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_summary: Option<String>,
}

/// One advisor's reading of the dilemma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounselorInsight {
    pub id: CounselorId,
    pub impression: String,
    pub assessment: String,
    pub action_plan: Vec<String>,
    pub reflection_question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensionKind {
    Conflict,
    Challenge,
    Synthesis,
}

/// A framed disagreement (or synthesis) between two counselors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tension {
    pub pair_id: String,
    pub counselor_ids: [CounselorId; 2],
    pub kind: TensionKind,
    pub core_issue: String,
    pub dialogue: Vec<DialogueTurn>,
    pub matrix: DecisionMatrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: String,
    pub text: String,
}

impl DialogueTurn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(USER_SPEAKER, text)
    }

    pub fn is_user(&self) -> bool {
        self.speaker == USER_SPEAKER
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    pub criteria: Vec<Criterion>,
}

/// One row of the decision matrix: how each side of the tension scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub label: String,
    pub score_a: f64,
    pub score_b: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl AnalysisResult {
    /// Shape check applied before a response is accepted.
    ///
    /// Deserialization already rejects missing fields (e.g. no `dialogue`
    /// array); this covers the semantic shape serde cannot express.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        if self.summary.trim().is_empty() {
            return Err(ShapeError::new("summary", "must not be empty"));
        }
        if self.counselors.is_empty() {
            return Err(ShapeError::new("counselors", "must not be empty"));
        }
        for (i, c) in self.counselors.iter().enumerate() {
            if c.id.trim().is_empty() {
                return Err(ShapeError::new(format!("counselors[{i}].id"), "must not be empty"));
            }
        }
        for (i, t) in self.tensions.iter().enumerate() {
            if t.counselor_ids[0] == t.counselor_ids[1] {
                return Err(ShapeError::new(
                    format!("tensions[{i}].counselorIds"),
                    "must name two distinct counselors",
                ));
            }
            t.matrix
                .check_shape()
                .map_err(|e| e.nested(&format!("tensions[{i}].matrix")))?;
        }
        Ok(())
    }

    pub fn counselor(&self, id: &str) -> Option<&CounselorInsight> {
        self.counselors.iter().find(|c| c.id == id)
    }

    /// Find the tension for an unordered pair of counselor ids
    pub fn tension_for(&self, a: &str, b: &str) -> Option<&Tension> {
        self.tensions.iter().find(|t| t.involves_pair(a, b))
    }
}

impl Tension {
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        let [x, y] = &self.counselor_ids;
        (x == a && y == b) || (x == b && y == a)
    }
}

impl DecisionMatrix {
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        for (i, c) in self.criteria.iter().enumerate() {
            if c.id.trim().is_empty() {
                return Err(ShapeError::new(format!("criteria[{i}].id"), "must not be empty"));
            }
            for (field, score) in [("scoreA", c.score_a), ("scoreB", c.score_b)] {
                if !(0.0..=MAX_CRITERION_SCORE).contains(&score) {
                    return Err(ShapeError::new(
                        format!("criteria[{i}].{field}"),
                        format!("{score} outside 0..=10"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn contains(&self, criterion_id: &str) -> bool {
        self.criteria.iter().any(|c| c.id == criterion_id)
    }
}
