//! Session / refinement controller
//!
//! Owns the dilemma, the current analysis snapshot and the refinement log.
//! The first accepted summon freezes `original_summary`; refinements replace
//! the snapshot but never touch it. Only `reset` clears it.

use std::sync::Arc;

use council_types::validation::validate_additional_context;
use council_types::{AnalysisRequest, AnalysisResult, CognitiveStyle, ReflectionFocus};
use serde::{Deserialize, Serialize};

use crate::error::{CouncilError, Result};
use crate::roster::{derive_advisors, derive_tension_pairs, Advisor, TensionPair};
use crate::tasks::Ticket;

/// Starting values for a fresh session (and after restart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub advisor_count: u8,
    pub reflection_focus: ReflectionFocus,
    pub cognitive_style: Option<CognitiveStyle>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            advisor_count: 4,
            reflection_focus: ReflectionFocus::DecisionMaking,
            cognitive_style: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Summon,
    Refine,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: Ticket,
    kind: AnalysisKind,
    request: AnalysisRequest,
}

/// What happened to an analysis result handed back to the session
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// No matching request is outstanding; the result was dropped
    Stale,
    Accepted(AnalysisKind),
    Failed {
        kind: AnalysisKind,
        error: CouncilError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    defaults: SessionDefaults,
    pub dilemma_text: String,
    pub analysis: Option<Arc<AnalysisResult>>,
    pub original_summary: Option<String>,
    pub accumulated_context_summary: Option<String>,
    pub refinement_history: Vec<String>,
    pub selected_cognitive_style: Option<CognitiveStyle>,
    pub advisor_count: u8,
    pub reflection_focus: ReflectionFocus,
    advisors: Vec<Advisor>,
    tension_pairs: Vec<TensionPair>,
    in_flight: Option<InFlight>,
}

impl SessionState {
    pub fn new(defaults: SessionDefaults) -> Self {
        let mut session = Self {
            defaults,
            ..Default::default()
        };
        session.reset();
        session
    }

    /// Back to an empty session. Any outstanding request becomes stale.
    pub fn reset(&mut self) {
        let defaults = self.defaults.clone();
        *self = Self {
            advisor_count: defaults.advisor_count,
            reflection_focus: defaults.reflection_focus,
            selected_cognitive_style: defaults.cognitive_style.clone(),
            defaults,
            ..Default::default()
        };
    }

    pub fn has_analysis(&self) -> bool {
        self.analysis.is_some()
    }

    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    pub fn advisor(&self, id: &str) -> Option<&Advisor> {
        self.advisors.iter().find(|a| a.id == id)
    }

    pub fn tension_pairs(&self) -> &[TensionPair] {
        &self.tension_pairs
    }

    pub fn in_flight(&self) -> Option<AnalysisKind> {
        self.in_flight.as_ref().map(|f| f.kind)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate and claim the analysis slot for a first summoning.
    ///
    /// Returns `Ok(None)` when another analysis is already outstanding.
    /// Nothing in the session changes until the result is accepted.
    pub fn begin_summon(
        &mut self,
        ticket: Ticket,
        dilemma_text: &str,
        style: Option<CognitiveStyle>,
        advisor_count: u8,
        focus: ReflectionFocus,
    ) -> Result<Option<AnalysisRequest>> {
        if self.is_busy() {
            tracing::debug!(%ticket, "summon ignored, analysis in flight");
            return Ok(None);
        }
        let request = AnalysisRequest::summon(dilemma_text.trim(), style, advisor_count, focus);
        request.validate()?;
        self.in_flight = Some(InFlight {
            ticket,
            kind: AnalysisKind::Summon,
            request: request.clone(),
        });
        Ok(Some(request))
    }

    /// Log a refinement attempt and claim the analysis slot.
    ///
    /// Blank text or no prior analysis is a no-op. The attempt is appended to
    /// `refinement_history` before the call resolves and stays there even if
    /// the call fails.
    pub fn begin_refine(&mut self, ticket: Ticket, extra: &str) -> Result<Option<AnalysisRequest>> {
        let extra = extra.trim();
        if extra.is_empty() || !self.has_analysis() {
            return Ok(None);
        }
        if self.is_busy() {
            tracing::debug!(%ticket, "refine ignored, analysis in flight");
            return Ok(None);
        }
        validate_additional_context(extra)?;

        let previous = self
            .accumulated_context_summary
            .clone()
            .or_else(|| self.original_summary.clone());
        let request = AnalysisRequest::summon(
            self.dilemma_text.clone(),
            self.selected_cognitive_style.clone(),
            self.advisor_count,
            self.reflection_focus,
        )
        .with_refinement(previous, extra);
        request.validate()?;

        self.refinement_history.push(extra.to_string());
        self.in_flight = Some(InFlight {
            ticket,
            kind: AnalysisKind::Refine,
            request: request.clone(),
        });
        Ok(Some(request))
    }

    /// Apply (or reject) the collaborator's answer for `ticket`
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<AnalysisResult, String>,
    ) -> AnalysisOutcome {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.ticket == ticket => flight,
            other => {
                self.in_flight = other;
                tracing::debug!(%ticket, "stale analysis result discarded");
                return AnalysisOutcome::Stale;
            }
        };
        let kind = flight.kind;

        let result = match result {
            Ok(result) => result,
            Err(message) => {
                tracing::warn!(%ticket, ?kind, %message, "analysis failed");
                return AnalysisOutcome::Failed {
                    kind,
                    error: CouncilError::Collaborator(message),
                };
            }
        };
        if let Err(shape) = result.check_shape() {
            tracing::warn!(%ticket, ?kind, %shape, "analysis rejected");
            return AnalysisOutcome::Failed {
                kind,
                error: CouncilError::Collaborator(shape.to_string()),
            };
        }

        match kind {
            AnalysisKind::Summon => self.accept_summon(flight.request, result),
            AnalysisKind::Refine => self.accept_refinement(result),
        }
        tracing::info!(
            %ticket,
            ?kind,
            counselors = self.advisors.len(),
            tensions = self.tension_pairs.len(),
            "analysis accepted"
        );
        AnalysisOutcome::Accepted(kind)
    }

    fn accept_summon(&mut self, request: AnalysisRequest, result: AnalysisResult) {
        self.dilemma_text = request.dilemma_text;
        self.selected_cognitive_style = request.cognitive_style;
        self.advisor_count = request.advisor_count;
        self.reflection_focus = request.reflection_focus.unwrap_or_default();
        self.original_summary = Some(result.summary.clone());
        self.accumulated_context_summary = result.context_summary.clone();
        self.refinement_history.clear();
        self.install(result);
    }

    fn accept_refinement(&mut self, result: AnalysisResult) {
        if let Some(summary) = &result.context_summary {
            self.accumulated_context_summary = Some(summary.clone());
        }
        self.install(result);
    }

    /// Swap in a new snapshot and rebuild everything derived from it
    fn install(&mut self, result: AnalysisResult) {
        self.advisors = derive_advisors(&result);
        self.tension_pairs = derive_tension_pairs(&result, &self.advisors);
        self.analysis = Some(Arc::new(result));
    }

    /// Drop the outstanding request so its result is discarded on arrival
    pub fn abandon_in_flight(&mut self) {
        self.in_flight = None;
    }

    /// Ensure an advisor named by an overlay still exists
    pub fn require_advisor(&self, id: &str) -> Result<&Advisor> {
        self.advisor(id)
            .ok_or_else(|| CouncilError::not_found("advisor", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TicketIssuer;
    use crate::test_support::analysis;
    use pretty_assertions::assert_eq;

    const DILEMMA: &str = "I was offered a new job in another city but my partner can't move";

    fn summoned(issuer: &mut TicketIssuer) -> SessionState {
        let mut session = SessionState::new(SessionDefaults::default());
        let ticket = issuer.issue();
        session
            .begin_summon(ticket, DILEMMA, None, 4, ReflectionFocus::DecisionMaking)
            .unwrap()
            .unwrap();
        let outcome = session.complete(ticket, Ok(analysis(&["mirror", "shadow", "sage", "pragmatist"])));
        assert_eq!(outcome, AnalysisOutcome::Accepted(AnalysisKind::Summon));
        session
    }

    #[test]
    fn summon_validation_makes_no_call() {
        let mut session = SessionState::new(SessionDefaults::default());
        let err = session
            .begin_summon(TicketIssuer::default().issue(), "   ", None, 4, ReflectionFocus::default())
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!session.is_busy());
    }

    #[test]
    fn summon_freezes_original_summary() {
        let mut issuer = TicketIssuer::default();
        let session = summoned(&mut issuer);
        assert_eq!(session.advisors().len(), 4);
        assert_eq!(session.original_summary.as_deref(), Some("summary of mirror, shadow, sage, pragmatist"));
        assert_eq!(session.dilemma_text, DILEMMA);
    }

    #[test]
    fn refine_logs_attempt_and_keeps_original_summary() {
        let mut issuer = TicketIssuer::default();
        let mut session = summoned(&mut issuer);
        let original = session.original_summary.clone();

        let ticket = issuer.issue();
        let request = session
            .begin_refine(ticket, "My partner found a job lead there too")
            .unwrap()
            .unwrap();
        assert_eq!(request.additional_context.as_deref(), Some("My partner found a job lead there too"));
        assert_eq!(request.previous_context_summary, original);
        assert_eq!(session.refinement_history, vec!["My partner found a job lead there too"]);

        let mut next = analysis(&["mirror", "sage", "futureself"]);
        next.summary = "a different summary".into();
        next.context_summary = Some("partner also has options".into());
        session.complete(ticket, Ok(next));

        assert_eq!(session.original_summary, original);
        assert_eq!(session.accumulated_context_summary.as_deref(), Some("partner also has options"));
        assert_eq!(session.advisors().len(), 3);
    }

    #[test]
    fn failed_refinement_keeps_history_entry() {
        let mut issuer = TicketIssuer::default();
        let mut session = summoned(&mut issuer);
        let before = session.analysis.clone();

        let ticket = issuer.issue();
        session.begin_refine(ticket, "more context").unwrap();
        let outcome = session.complete(ticket, Err("HTTP 502".into()));

        assert!(matches!(outcome, AnalysisOutcome::Failed { kind: AnalysisKind::Refine, .. }));
        assert_eq!(session.refinement_history, vec!["more context"]);
        assert_eq!(session.analysis, before);
    }

    #[test]
    fn refinement_without_context_summary_keeps_previous() {
        let mut issuer = TicketIssuer::default();
        let mut session = summoned(&mut issuer);
        session.accumulated_context_summary = Some("kept".into());
        let ticket = issuer.issue();
        session.begin_refine(ticket, "one more thing").unwrap();
        session.complete(ticket, Ok(analysis(&["mirror", "sage", "shadow"])));
        assert_eq!(session.accumulated_context_summary.as_deref(), Some("kept"));
    }

    #[test]
    fn blank_refine_or_no_analysis_is_noop() {
        let mut issuer = TicketIssuer::default();
        let mut fresh = SessionState::new(SessionDefaults::default());
        assert_eq!(fresh.begin_refine(issuer.issue(), "context").unwrap(), None);

        let mut session = summoned(&mut issuer);
        assert_eq!(session.begin_refine(issuer.issue(), "   ").unwrap(), None);
        assert!(session.refinement_history.is_empty());
    }

    #[test]
    fn failed_summon_leaves_state_untouched() {
        let mut issuer = TicketIssuer::default();
        let mut session = summoned(&mut issuer);
        let before = session.original_summary.clone();
        let ticket = issuer.issue();
        session
            .begin_summon(ticket, "A completely different dilemma", None, 5, ReflectionFocus::Relationships)
            .unwrap();
        session.complete(ticket, Err("timeout".into()));
        assert_eq!(session.original_summary, before);
        assert_eq!(session.dilemma_text, DILEMMA);
        assert_eq!(session.reflection_focus, ReflectionFocus::DecisionMaking);
    }

    #[test]
    fn malformed_result_is_rejected_whole() {
        let mut session = SessionState::new(SessionDefaults::default());
        let ticket = TicketIssuer::default().issue();
        session
            .begin_summon(ticket, DILEMMA, None, 4, ReflectionFocus::default())
            .unwrap();
        let mut bad = analysis(&["mirror", "sage", "shadow"]);
        bad.counselors.clear();
        assert!(matches!(
            session.complete(ticket, Ok(bad)),
            AnalysisOutcome::Failed { kind: AnalysisKind::Summon, .. }
        ));
        assert!(!session.has_analysis());
    }

    #[test]
    fn result_after_reset_is_stale() {
        let mut session = SessionState::new(SessionDefaults::default());
        let ticket = TicketIssuer::default().issue();
        session
            .begin_summon(ticket, DILEMMA, None, 4, ReflectionFocus::default())
            .unwrap();
        session.reset();
        assert_eq!(
            session.complete(ticket, Ok(analysis(&["mirror", "sage", "shadow"]))),
            AnalysisOutcome::Stale
        );
        assert!(!session.has_analysis());
    }

    #[test]
    fn reset_restores_defaults() {
        let defaults = SessionDefaults {
            advisor_count: 6,
            reflection_focus: ReflectionFocus::Relationships,
            cognitive_style: Some("ENFP".parse().unwrap()),
        };
        let mut session = SessionState::new(defaults.clone());
        session.advisor_count = 3;
        session.reset();
        assert_eq!(session.advisor_count, 6);
        assert_eq!(session.selected_cognitive_style, defaults.cognitive_style);
        assert!(session.original_summary.is_none());
    }
}
