//! Debate / matrix sub-state for one opened tension pair
//!
//! Initialised from the immutable analysis snapshot when the dialogue opens
//! and thrown away when it closes. The next open starts from the snapshot
//! again.
//!
//! `send` is a local transaction: snapshot the transcript, append the
//! user's turn optimistically, and restore the snapshot if the call fails.

use std::collections::HashMap;

use council_types::analysis::MAX_CRITERION_SCORE;
use council_types::validation::validate_utterance;
use council_types::{
    AnalysisResult, CounselorId, DebateInjectionRequest, DebateInjectionResponse, DecisionMatrix,
    DialogueTurn, TensionContext, TensionKind,
};
use serde::Serialize;

use crate::error::{CouncilError, Result};
use crate::roster::{Advisor, TensionKey};
use crate::tasks::{PendingSlot, Ticket};

/// Weight applied to a criterion the user has not touched
pub const DEFAULT_WEIGHT: u8 = 50;
pub const MAX_WEIGHT: u8 = 100;

/// Percentage spread at or under which neither side is favoured
pub const BALANCED_SPREAD: u32 = 5;

/// Utterance sent when the user asks for a new criterion to be scored
pub fn add_criterion_utterance(label: &str) -> String {
    format!(
        "Add the criterion \"{label}\" to the decision matrix and score it for both advisors."
    )
}

#[derive(Debug, Clone)]
struct SendTxn {
    ticket: Ticket,
    snapshot: Vec<DialogueTurn>,
}

/// What a debate reply did to the open session
#[derive(Debug, Clone, PartialEq)]
pub enum DebateOutcome {
    /// Not ours (overlay re-opened or closed since); dropped
    Stale,
    SendApplied { new_turns: usize },
    /// The optimistic user turn was rolled back
    SendReverted(CouncilError),
    CriterionAdded,
    CriterionFailed(CouncilError),
}

#[derive(Debug, Clone)]
pub struct DebateSession {
    key: TensionKey,
    advisor_ids: [CounselorId; 2],
    kind: TensionKind,
    core_issue: String,
    transcript: Vec<DialogueTurn>,
    matrix: DecisionMatrix,
    user_weights: HashMap<String, u8>,
    send: Option<SendTxn>,
    add: PendingSlot,
}

impl DebateSession {
    /// Load the pair's tension from the snapshot (matched as an unordered pair)
    pub fn open(analysis: &AnalysisResult, key: &TensionKey) -> Result<Self> {
        let (a, b) = key.ids();
        let tension = analysis
            .tension_for(a, b)
            .ok_or_else(|| CouncilError::not_found("tension", format!("{a}/{b}")))?;
        Ok(Self {
            key: key.clone(),
            advisor_ids: tension.counselor_ids.clone(),
            kind: tension.kind,
            core_issue: tension.core_issue.clone(),
            transcript: tension.dialogue.clone(),
            matrix: tension.matrix.clone(),
            user_weights: HashMap::new(),
            send: None,
            add: PendingSlot::default(),
        })
    }

    pub fn key(&self) -> &TensionKey {
        &self.key
    }

    /// Side A and side B, in the order the scores refer to
    pub fn advisor_ids(&self) -> &[CounselorId; 2] {
        &self.advisor_ids
    }

    pub fn kind(&self) -> TensionKind {
        self.kind
    }

    pub fn core_issue(&self) -> &str {
        &self.core_issue
    }

    pub fn transcript(&self) -> &[DialogueTurn] {
        &self.transcript
    }

    pub fn matrix(&self) -> &DecisionMatrix {
        &self.matrix
    }

    pub fn is_sending(&self) -> bool {
        self.send.is_some()
    }

    pub fn is_adding_criterion(&self) -> bool {
        self.add.is_in_flight()
    }

    // =========================================================================
    // COLLABORATOR ROUND TRIPS
    // =========================================================================

    fn injection_request(
        &self,
        dilemma_text: &str,
        utterance: String,
        advisors: &[Advisor],
    ) -> Result<DebateInjectionRequest> {
        let descriptors = self
            .advisor_ids
            .iter()
            .map(|id| {
                advisors
                    .iter()
                    .find(|a| &a.id == id)
                    .map(Advisor::descriptor)
                    .ok_or_else(|| CouncilError::not_found("advisor", id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let request = DebateInjectionRequest {
            dilemma_text: dilemma_text.to_string(),
            tension_context: TensionContext {
                core_issue: self.core_issue.clone(),
                advisor_ids: self.advisor_ids.clone(),
                matrix: self.matrix.clone(),
            },
            dialogue_history: self.transcript.clone(),
            user_utterance: utterance,
            advisors: descriptors,
        };
        request.validate()?;
        Ok(request)
    }

    /// Optimistically append the user's turn and build the injection request.
    ///
    /// Blank text or a send already in flight is a no-op (`Ok(None)`).
    pub fn begin_send(
        &mut self,
        ticket: Ticket,
        text: &str,
        dilemma_text: &str,
        advisors: &[Advisor],
    ) -> Result<Option<DebateInjectionRequest>> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return Ok(None);
        }
        validate_utterance(text)?;

        let snapshot = self.transcript.clone();
        self.transcript.push(DialogueTurn::user(text));
        match self.injection_request(dilemma_text, text.to_string(), advisors) {
            Ok(request) => {
                self.send = Some(SendTxn { ticket, snapshot });
                Ok(Some(request))
            }
            Err(err) => {
                self.transcript = snapshot;
                Err(err)
            }
        }
    }

    /// Ask the collaborator to score a new criterion for both sides.
    ///
    /// Blank labels or an add already in flight are a no-op (`Ok(None)`).
    pub fn begin_add_criterion(
        &mut self,
        ticket: Ticket,
        label: &str,
        dilemma_text: &str,
        advisors: &[Advisor],
    ) -> Result<Option<DebateInjectionRequest>> {
        let label = label.trim();
        if label.is_empty() || self.is_adding_criterion() {
            return Ok(None);
        }
        let request = self.injection_request(dilemma_text, add_criterion_utterance(label), advisors)?;
        self.add.begin(ticket);
        Ok(Some(request))
    }

    /// Route a reply to whichever transaction owns `ticket`
    pub fn complete(
        &mut self,
        ticket: Ticket,
        reply: std::result::Result<DebateInjectionResponse, String>,
    ) -> DebateOutcome {
        let reply = reply.and_then(|r| match r.check_shape() {
            Ok(()) => Ok(r),
            Err(shape) => Err(shape.to_string()),
        });

        if self.send.as_ref().is_some_and(|txn| txn.ticket == ticket) {
            let Some(txn) = self.send.take() else {
                return DebateOutcome::Stale;
            };
            return self.finish_send(txn, reply);
        }
        if self.add.finish(ticket) {
            return self.finish_add(reply);
        }
        tracing::debug!(%ticket, pair = ?self.key, "stale debate reply discarded");
        DebateOutcome::Stale
    }

    fn finish_send(
        &mut self,
        txn: SendTxn,
        reply: std::result::Result<DebateInjectionResponse, String>,
    ) -> DebateOutcome {
        match reply {
            Ok(response) => {
                let new_turns = response.dialogue.len();
                self.transcript.extend(response.dialogue);
                if let Some(update) = response.matrix_update {
                    self.replace_matrix(update.into_matrix());
                }
                DebateOutcome::SendApplied { new_turns }
            }
            Err(message) => {
                tracing::warn!(ticket = %txn.ticket, %message, "debate send failed, reverting");
                self.transcript = txn.snapshot;
                DebateOutcome::SendReverted(CouncilError::Collaborator(message))
            }
        }
    }

    fn finish_add(
        &mut self,
        reply: std::result::Result<DebateInjectionResponse, String>,
    ) -> DebateOutcome {
        let update = reply.and_then(|r| {
            r.matrix_update
                .ok_or_else(|| "response carried no matrix update".to_string())
        });
        match update {
            Ok(update) => {
                self.replace_matrix(update.into_matrix());
                tracing::info!(criteria = self.matrix.criteria.len(), "criterion added");
                DebateOutcome::CriterionAdded
            }
            Err(message) => {
                tracing::warn!(%message, "add criterion failed");
                DebateOutcome::CriterionFailed(CouncilError::Collaborator(message))
            }
        }
    }

    fn replace_matrix(&mut self, (core_issue, matrix): (String, DecisionMatrix)) {
        if !core_issue.trim().is_empty() {
            self.core_issue = core_issue;
        }
        self.user_weights.retain(|id, _| matrix.contains(id));
        self.matrix = matrix;
    }

    // =========================================================================
    // LOCAL MATRIX EDITS
    // =========================================================================

    /// Remove a criterion and its weight. No collaborator call.
    pub fn remove_criterion(&mut self, id: &str) -> bool {
        let before = self.matrix.criteria.len();
        self.matrix.criteria.retain(|c| c.id != id);
        self.user_weights.remove(id);
        self.matrix.criteria.len() != before
    }

    pub fn set_weight(&mut self, id: &str, weight: u8) -> bool {
        if !self.matrix.contains(id) {
            return false;
        }
        self.user_weights.insert(id.to_string(), weight.min(MAX_WEIGHT));
        true
    }

    pub fn weight(&self, id: &str) -> u8 {
        self.user_weights.get(id).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn weighted_score(&self) -> WeightedScore {
        let (mut total_a, mut total_b, mut max_possible) = (0.0, 0.0, 0.0);
        for criterion in &self.matrix.criteria {
            let weight = f64::from(self.weight(&criterion.id));
            total_a += criterion.score_a * weight;
            total_b += criterion.score_b * weight;
            max_possible += MAX_CRITERION_SCORE * weight;
        }
        let percent = |total: f64| {
            if max_possible > 0.0 {
                (100.0 * total / max_possible).round().max(0.0) as u32
            } else {
                0
            }
        };
        let (percent_a, percent_b) = (percent(total_a), percent(total_b));
        let verdict = if percent_a.abs_diff(percent_b) <= BALANCED_SPREAD {
            Verdict::Balanced
        } else if percent_a > percent_b {
            Verdict::FavorsA
        } else {
            Verdict::FavorsB
        };
        WeightedScore {
            total_a,
            total_b,
            max_possible,
            percent_a,
            percent_b,
            verdict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    FavorsA,
    FavorsB,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScore {
    pub total_a: f64,
    pub total_b: f64,
    pub max_possible: f64,
    pub percent_a: u32,
    pub percent_b: u32,
    pub verdict: Verdict,
}
