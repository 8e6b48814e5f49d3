//! Council application controller
//!
//! Same shape as an immediate-mode app loop, minus the painting:
//!
//! ```text
//!   input ──► AppEvent ──► handle_event ──► state mutation
//!                               │
//!                               └──► AppCommand (IO) ──► runner ──► AppEvent (result)
//!
//!   tick(now) ──► resize flush + due timeline steps
//! ```
//!
//! The controller never performs IO and never reads a clock. Every entry
//! point takes `now` in milliseconds, so tests fast-forward the timeline.

use std::collections::HashSet;

use council_layout::{compute_layout, hit_test, LayoutValues, Point, ResizeThrottle, SphereHit};
use council_types::validation::clamp_advisor_count;
use council_types::{
    AnalysisRequest, AnalysisResult, CognitiveStyle, DebateInjectionRequest,
    DebateInjectionResponse, ReflectionFocus,
};

use crate::debate::{DebateOutcome, DebateSession, WeightedScore};
use crate::error::CouncilError;
use crate::overlay::{HitTarget, Overlay, OverlayState, PointerRouting};
use crate::roster::TensionKey;
use crate::session::{AnalysisKind, AnalysisOutcome, SessionDefaults, SessionState};
use crate::tasks::{Ticket, TicketIssuer};
use crate::timeline::{
    HighlightTarget, Millis, TimedAction, Timeline, TimerKey, ENTRANCE_ANIMATION_MS,
    HIGHLIGHT_PULSE_MS, PANEL_CLOSE_HIGHLIGHT_DELAY_MS,
};
use crate::view::{build_sphere, SphereView};

// =============================================================================
// APP EVENT - User Intent
// =============================================================================

#[derive(Debug, Clone)]
pub enum AppEvent {
    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------
    EditDilemma(String),
    EditRefinement(String),
    SetAdvisorCount(u8),
    SetReflectionFocus(ReflectionFocus),

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------
    Summon,
    Refine,
    Restart,

    // -------------------------------------------------------------------------
    // Cognitive style overlay
    // -------------------------------------------------------------------------
    OpenStyleSelection,
    /// Raw style code from the picker; `None` clears the style
    ConfirmStyle(Option<String>),
    CancelStyleSelection,

    // -------------------------------------------------------------------------
    // Sphere
    // -------------------------------------------------------------------------
    /// Raw pointer press, routed through the capture phase first
    Pointer(HitTarget),
    SelectAdvisor(String),
    SelectCenter,
    SelectTension(TensionKey),
    ViewFullPanel,
    CloseOverlay,

    // -------------------------------------------------------------------------
    // Debate
    // -------------------------------------------------------------------------
    SendDebateMessage(String),
    AddCriterion(String),
    RemoveCriterion(String),
    SetCriterionWeight { id: String, weight: u8 },

    // -------------------------------------------------------------------------
    // Container
    // -------------------------------------------------------------------------
    Resize { width: f64, height: f64 },

    // -------------------------------------------------------------------------
    // Task results
    // -------------------------------------------------------------------------
    AnalysisCompleted {
        ticket: Ticket,
        result: Result<AnalysisResult, String>,
    },
    DebateReplyReceived {
        ticket: Ticket,
        result: Result<DebateInjectionResponse, String>,
    },
}

// =============================================================================
// APP COMMAND - IO for the runner
// =============================================================================

#[derive(Debug, Clone)]
pub enum AppCommand {
    RequestAnalysis {
        ticket: Ticket,
        request: AnalysisRequest,
    },
    InjectDebate {
        ticket: Ticket,
        request: DebateInjectionRequest,
    },
}

impl AppCommand {
    pub fn ticket(&self) -> Ticket {
        match self {
            AppCommand::RequestAnalysis { ticket, .. } | AppCommand::InjectDebate { ticket, .. } => {
                *ticket
            }
        }
    }
}

// =============================================================================
// FEEDBACK - per-control errors
// =============================================================================

/// A control that can start a collaborator call or reject input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Summon,
    Refine,
    DebateSend,
    AddCriterion,
    Style,
}

impl From<AnalysisKind> for Control {
    fn from(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Summon => Control::Summon,
            AnalysisKind::Refine => Control::Refine,
        }
    }
}

/// Latest error per control. Cleared when the control is triggered again.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    summon: Option<CouncilError>,
    refine: Option<CouncilError>,
    debate_send: Option<CouncilError>,
    add_criterion: Option<CouncilError>,
    style: Option<CouncilError>,
}

impl Feedback {
    fn slot(&mut self, control: Control) -> &mut Option<CouncilError> {
        match control {
            Control::Summon => &mut self.summon,
            Control::Refine => &mut self.refine,
            Control::DebateSend => &mut self.debate_send,
            Control::AddCriterion => &mut self.add_criterion,
            Control::Style => &mut self.style,
        }
    }

    pub fn get(&self, control: Control) -> Option<&CouncilError> {
        match control {
            Control::Summon => self.summon.as_ref(),
            Control::Refine => self.refine.as_ref(),
            Control::DebateSend => self.debate_send.as_ref(),
            Control::AddCriterion => self.add_criterion.as_ref(),
            Control::Style => self.style.as_ref(),
        }
    }

    fn set(&mut self, control: Control, error: CouncilError) {
        *self.slot(control) = Some(error);
    }

    fn clear(&mut self, control: Control) {
        *self.slot(control) = None;
    }
}

/// Summon form inputs, committed to the session only when a summon succeeds
#[derive(Debug, Clone, PartialEq)]
pub struct SummonForm {
    pub dilemma: String,
    pub cognitive_style: Option<CognitiveStyle>,
    pub advisor_count: u8,
    pub reflection_focus: ReflectionFocus,
}

impl From<&SessionDefaults> for SummonForm {
    fn from(defaults: &SessionDefaults) -> Self {
        Self {
            dilemma: String::new(),
            cognitive_style: defaults.cognitive_style.clone(),
            advisor_count: clamp_advisor_count(defaults.advisor_count),
            reflection_focus: defaults.reflection_focus,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct CouncilApp {
    defaults: SessionDefaults,
    session: SessionState,
    overlay: OverlayState,
    debate: Option<DebateSession>,
    timeline: Timeline,
    tickets: TicketIssuer,
    throttle: ResizeThrottle,
    layout: LayoutValues,
    form: SummonForm,
    refinement_draft: String,
    entrance: bool,
    highlights: HashSet<HighlightTarget>,
    feedback: Feedback,
    commands: Vec<AppCommand>,
}

impl CouncilApp {
    pub fn new(defaults: SessionDefaults, width: f64, height: f64) -> Self {
        Self {
            session: SessionState::new(defaults.clone()),
            form: SummonForm::from(&defaults),
            defaults,
            overlay: OverlayState::new(),
            debate: None,
            timeline: Timeline::new(),
            tickets: TicketIssuer::default(),
            throttle: ResizeThrottle::default(),
            layout: compute_layout(width, height),
            refinement_draft: String::new(),
            entrance: false,
            highlights: HashSet::new(),
            feedback: Feedback::default(),
            commands: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn overlay(&self) -> &Overlay {
        self.overlay.active()
    }

    pub fn overlay_state(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn debate(&self) -> Option<&DebateSession> {
        self.debate.as_ref()
    }

    pub fn layout(&self) -> &LayoutValues {
        &self.layout
    }

    pub fn form(&self) -> &SummonForm {
        &self.form
    }

    pub fn refinement_draft(&self) -> &str {
        &self.refinement_draft
    }

    pub fn is_entrance_active(&self) -> bool {
        self.entrance
    }

    pub fn is_highlighted(&self, target: HighlightTarget) -> bool {
        self.highlights.contains(&target)
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Whether a control should render disabled because its call is in flight
    pub fn is_busy(&self, control: Control) -> bool {
        match control {
            Control::Summon => self.session.in_flight() == Some(AnalysisKind::Summon),
            Control::Refine => self.session.in_flight() == Some(AnalysisKind::Refine),
            Control::DebateSend => self.debate.as_ref().is_some_and(DebateSession::is_sending),
            Control::AddCriterion => self
                .debate
                .as_ref()
                .is_some_and(DebateSession::is_adding_criterion),
            Control::Style => false,
        }
    }

    pub fn weighted_score(&self) -> Option<WeightedScore> {
        self.debate.as_ref().map(DebateSession::weighted_score)
    }

    pub fn sphere(&self) -> SphereView {
        build_sphere(
            &self.layout,
            self.session.advisors(),
            self.session.tension_pairs(),
            self.overlay.active(),
            self.overlay.mounted_panels(),
            self.entrance,
        )
    }

    /// Geometric hit test for a pointer inside the sphere.
    ///
    /// Panels and tension links are resolved by whoever draws them; this only
    /// knows about the node circles.
    pub fn hit_target(&self, pointer: Point) -> HitTarget {
        let advisors = self.session.advisors();
        let nodes = self.layout.positions(advisors.len());
        match hit_test(pointer, &self.layout, &nodes) {
            Some(SphereHit::Node(i)) => advisors
                .get(i)
                .map_or(HitTarget::Elsewhere, |a| HitTarget::AdvisorNode(a.id.clone())),
            Some(SphereHit::Center) => HitTarget::CenterNode,
            None => HitTarget::Elsewhere,
        }
    }

    /// Drain the IO the last events asked for
    pub fn take_commands(&mut self) -> Vec<AppCommand> {
        std::mem::take(&mut self.commands)
    }

    // -------------------------------------------------------------------------
    // Event handling
    // -------------------------------------------------------------------------

    pub fn handle_event(&mut self, event: AppEvent, now: Millis) {
        match event {
            AppEvent::EditDilemma(text) => self.form.dilemma = text,
            AppEvent::EditRefinement(text) => self.refinement_draft = text,
            AppEvent::SetAdvisorCount(count) => self.form.advisor_count = clamp_advisor_count(count),
            AppEvent::SetReflectionFocus(focus) => self.form.reflection_focus = focus,

            AppEvent::Summon => self.start_summon(),
            AppEvent::Refine => self.start_refine(),
            AppEvent::Restart => self.restart_at(now),

            AppEvent::OpenStyleSelection => {
                self.feedback.clear(Control::Style);
                self.overlay.open_style_selection(&mut self.timeline);
            }
            AppEvent::ConfirmStyle(code) => self.confirm_style(code),
            AppEvent::CancelStyleSelection => {
                if self.overlay.active() == &Overlay::CognitiveStyleSelection {
                    self.feedback.clear(Control::Style);
                    self.overlay.close(&mut self.timeline);
                }
            }

            AppEvent::Pointer(target) => self.route_pointer(target, now),
            AppEvent::SelectAdvisor(id) => self.select_advisor(&id, now),
            AppEvent::SelectCenter => {
                if self.session.has_analysis() {
                    self.overlay.open_history(&mut self.timeline);
                }
            }
            AppEvent::SelectTension(key) => self.open_debate(key),
            AppEvent::ViewFullPanel => {
                self.overlay.expand_advisor();
            }
            AppEvent::CloseOverlay => self.close_overlay(now),

            AppEvent::SendDebateMessage(text) => self.send_debate_message(&text),
            AppEvent::AddCriterion(label) => self.start_add_criterion(&label),
            AppEvent::RemoveCriterion(id) => {
                if let Some(debate) = &mut self.debate {
                    debate.remove_criterion(&id);
                }
            }
            AppEvent::SetCriterionWeight { id, weight } => {
                if let Some(debate) = &mut self.debate {
                    debate.set_weight(&id, weight);
                }
            }

            AppEvent::Resize { width, height } => {
                if let Some((w, h)) = self.throttle.observe(width, height, now) {
                    self.relayout(w, h);
                }
            }

            AppEvent::AnalysisCompleted { ticket, result } => {
                self.on_analysis_completed(ticket, result, now)
            }
            AppEvent::DebateReplyReceived { ticket, result } => {
                self.on_debate_reply(ticket, result)
            }
        }
    }

    /// Advance to `now`: flush a throttled resize, then fire due steps in order
    pub fn tick(&mut self, now: Millis) {
        if let Some((w, h)) = self.throttle.on_frame(now) {
            self.relayout(w, h);
        }
        while let Some((due, action)) = self.timeline.pop_due(now) {
            tracing::debug!(due, ?action, "timeline step");
            match action {
                TimedAction::CompleteAdvisorSwap { next } => {
                    let next = next.filter(|id| {
                        let present = self.session.advisor(id).is_some();
                        if !present {
                            tracing::debug!(advisor = %id, "swap target no longer on the council");
                        }
                        present
                    });
                    self.overlay.complete_swap(next);
                }
                TimedAction::EndEntrance => self.entrance = false,
                TimedAction::StartHighlight(target) => {
                    self.highlights.insert(target);
                    self.timeline.schedule(
                        due,
                        HIGHLIGHT_PULSE_MS,
                        TimerKey::Highlight(target),
                        TimedAction::EndHighlight(target),
                    );
                }
                TimedAction::EndHighlight(target) => {
                    self.highlights.remove(&target);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Convenience entry points
    // -------------------------------------------------------------------------

    pub fn summon(
        &mut self,
        dilemma: &str,
        style: Option<CognitiveStyle>,
        advisor_count: u8,
        focus: ReflectionFocus,
        now: Millis,
    ) {
        self.form.dilemma = dilemma.to_string();
        self.form.cognitive_style = style;
        self.form.advisor_count = clamp_advisor_count(advisor_count);
        self.form.reflection_focus = focus;
        self.handle_event(AppEvent::Summon, now);
    }

    pub fn refine(&mut self, text: &str, now: Millis) {
        self.refinement_draft = text.to_string();
        self.handle_event(AppEvent::Refine, now);
    }

    pub fn restart(&mut self, now: Millis) {
        self.handle_event(AppEvent::Restart, now);
    }

    pub fn send_message(&mut self, text: &str, now: Millis) {
        self.handle_event(AppEvent::SendDebateMessage(text.to_string()), now);
    }

    pub fn add_criterion(&mut self, label: &str, now: Millis) {
        self.handle_event(AppEvent::AddCriterion(label.to_string()), now);
    }

    pub fn remove_criterion(&mut self, id: &str, now: Millis) {
        self.handle_event(AppEvent::RemoveCriterion(id.to_string()), now);
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    fn start_summon(&mut self) {
        self.feedback.clear(Control::Summon);
        let ticket = self.tickets.issue();
        let form = &self.form;
        match self.session.begin_summon(
            ticket,
            &form.dilemma,
            form.cognitive_style.clone(),
            form.advisor_count,
            form.reflection_focus,
        ) {
            Ok(Some(request)) => {
                tracing::info!(%ticket, advisors = request.advisor_count, "summoning council");
                self.commands
                    .push(AppCommand::RequestAnalysis { ticket, request });
            }
            Ok(None) => {}
            Err(err) => self.feedback.set(Control::Summon, err),
        }
    }

    fn start_refine(&mut self) {
        self.feedback.clear(Control::Refine);
        let ticket = self.tickets.issue();
        match self.session.begin_refine(ticket, &self.refinement_draft) {
            Ok(Some(request)) => {
                tracing::info!(%ticket, "refining dilemma");
                self.commands
                    .push(AppCommand::RequestAnalysis { ticket, request });
            }
            Ok(None) => {}
            Err(err) => self.feedback.set(Control::Refine, err),
        }
    }

    fn restart_at(&mut self, now: Millis) {
        tracing::info!("restarting council");
        self.session.reset();
        self.overlay.close(&mut self.timeline);
        self.debate = None;
        self.timeline.clear();
        self.entrance = false;
        self.highlights.clear();
        self.form = SummonForm::from(&self.defaults);
        self.refinement_draft.clear();
        self.feedback = Feedback::default();
        self.timeline.schedule(
            now,
            PANEL_CLOSE_HIGHLIGHT_DELAY_MS,
            TimerKey::Highlight(HighlightTarget::DilemmaInput),
            TimedAction::StartHighlight(HighlightTarget::DilemmaInput),
        );
    }

    fn on_analysis_completed(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, String>,
        now: Millis,
    ) {
        match self.session.complete(ticket, result) {
            AnalysisOutcome::Stale => {}
            AnalysisOutcome::Accepted(kind) => {
                if kind == AnalysisKind::Refine {
                    self.refinement_draft.clear();
                }
                // new snapshot: overlay targets and debate state refer to the old one
                self.overlay.close(&mut self.timeline);
                self.debate = None;
                self.entrance = true;
                self.timeline.schedule(
                    now,
                    ENTRANCE_ANIMATION_MS,
                    TimerKey::Entrance,
                    TimedAction::EndEntrance,
                );
            }
            AnalysisOutcome::Failed { kind, error } => {
                self.feedback.set(Control::from(kind), error);
            }
        }
    }

    fn confirm_style(&mut self, code: Option<String>) {
        if self.overlay.active() != &Overlay::CognitiveStyleSelection {
            return;
        }
        let parsed = code
            .map(|c| c.parse::<CognitiveStyle>())
            .transpose();
        match parsed {
            Ok(style) => {
                self.feedback.clear(Control::Style);
                self.form.cognitive_style = style;
                self.overlay.close(&mut self.timeline);
            }
            Err(err) => self.feedback.set(Control::Style, err.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Overlays
    // -------------------------------------------------------------------------

    fn route_pointer(&mut self, target: HitTarget, now: Millis) {
        if self.overlay.capture_pointer(&target, &mut self.timeline, now) == PointerRouting::Consumed {
            return;
        }
        match target {
            HitTarget::AdvisorNode(id) => self.select_advisor(&id, now),
            HitTarget::CenterNode => self.handle_event(AppEvent::SelectCenter, now),
            HitTarget::TensionLink(key) => self.open_debate(key),
            HitTarget::InsightBar | HitTarget::Elsewhere => {}
        }
    }

    fn select_advisor(&mut self, id: &str, now: Millis) {
        if let Err(err) = self.session.require_advisor(id) {
            tracing::debug!(%err, "advisor selection ignored");
            return;
        }
        self.overlay.select_advisor(id, &mut self.timeline, now);
    }

    fn open_debate(&mut self, key: TensionKey) {
        let Some(analysis) = self.session.analysis.clone() else {
            return;
        };
        if !self.overlay.is_idle() {
            return;
        }
        let known = self.session.tension_pairs().iter().any(|p| p.key() == key);
        let opened = if known {
            DebateSession::open(&analysis, &key)
        } else {
            Err(CouncilError::not_found("tension", format!("{key:?}")))
        };
        match opened {
            Ok(debate) => {
                if self.overlay.open_debate(key, &mut self.timeline) {
                    self.feedback.clear(Control::DebateSend);
                    self.feedback.clear(Control::AddCriterion);
                    self.debate = Some(debate);
                }
            }
            Err(err) => tracing::warn!(%err, "tension not available"),
        }
    }

    fn close_overlay(&mut self, now: Millis) {
        if self.overlay.active() == &Overlay::DilemmaHistory {
            self.overlay.close_history(&mut self.timeline, now);
        } else if !self.overlay.close(&mut self.timeline).is_none() {
            // in-flight debate replies become stale with the session
            self.debate = None;
        }
    }

    // -------------------------------------------------------------------------
    // Debate
    // -------------------------------------------------------------------------

    fn send_debate_message(&mut self, text: &str) {
        let Some(debate) = &mut self.debate else {
            return;
        };
        self.feedback.clear(Control::DebateSend);
        let ticket = self.tickets.issue();
        match debate.begin_send(
            ticket,
            text,
            &self.session.dilemma_text,
            self.session.advisors(),
        ) {
            Ok(Some(request)) => {
                self.commands.push(AppCommand::InjectDebate { ticket, request });
            }
            Ok(None) => {}
            Err(err) => self.feedback.set(Control::DebateSend, err),
        }
    }

    fn start_add_criterion(&mut self, label: &str) {
        let Some(debate) = &mut self.debate else {
            return;
        };
        self.feedback.clear(Control::AddCriterion);
        let ticket = self.tickets.issue();
        match debate.begin_add_criterion(
            ticket,
            label,
            &self.session.dilemma_text,
            self.session.advisors(),
        ) {
            Ok(Some(request)) => {
                self.commands.push(AppCommand::InjectDebate { ticket, request });
            }
            Ok(None) => {}
            Err(err) => self.feedback.set(Control::AddCriterion, err),
        }
    }

    fn on_debate_reply(&mut self, ticket: Ticket, result: Result<DebateInjectionResponse, String>) {
        let Some(debate) = &mut self.debate else {
            tracing::debug!(%ticket, "debate reply with no open debate discarded");
            return;
        };
        match debate.complete(ticket, result) {
            DebateOutcome::SendReverted(err) => self.feedback.set(Control::DebateSend, err),
            DebateOutcome::CriterionFailed(err) => self.feedback.set(Control::AddCriterion, err),
            DebateOutcome::SendApplied { .. } | DebateOutcome::CriterionAdded | DebateOutcome::Stale => {}
        }
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    fn relayout(&mut self, width: f64, height: f64) {
        self.layout = compute_layout(width, height);
        tracing::debug!(width, height, breakpoint = ?self.layout.breakpoint, "relayout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::analysis;
    use crate::timeline::{ADVISOR_SWITCH_DELAY_MS, PANEL_EXIT_ANIMATION_MS};
    use council_types::{DialogueTurn, MatrixUpdate};
    use pretty_assertions::assert_eq;

    const DILEMMA: &str = "I was offered a new job in another city but my partner can't move";

    fn app() -> CouncilApp {
        CouncilApp::new(SessionDefaults::default(), 1440.0, 900.0)
    }

    /// Summon and answer with a council of `ids`
    fn summoned(ids: &[&str]) -> CouncilApp {
        let mut app = app();
        app.summon(DILEMMA, None, ids.len() as u8, ReflectionFocus::DecisionMaking, 0);
        let commands = app.take_commands();
        assert_eq!(commands.len(), 1);
        app.handle_event(
            AppEvent::AnalysisCompleted {
                ticket: commands[0].ticket(),
                result: Ok(analysis(ids)),
            },
            10,
        );
        app.tick(10_000);
        app
    }

    fn single_ticket(app: &mut CouncilApp) -> Ticket {
        let commands = app.take_commands();
        assert_eq!(commands.len(), 1, "expected exactly one command");
        commands[0].ticket()
    }

    #[test]
    fn blank_summon_surfaces_validation_without_command() {
        let mut app = app();
        app.summon("   ", None, 4, ReflectionFocus::DecisionMaking, 0);
        assert!(app.take_commands().is_empty());
        assert!(app
            .feedback()
            .get(Control::Summon)
            .is_some_and(CouncilError::is_validation));
    }

    #[test]
    fn summon_runs_entrance_for_800ms() {
        let mut app = app();
        app.summon(DILEMMA, None, 4, ReflectionFocus::DecisionMaking, 0);
        assert!(app.is_busy(Control::Summon));
        let ticket = single_ticket(&mut app);
        app.handle_event(
            AppEvent::AnalysisCompleted {
                ticket,
                result: Ok(analysis(&["mirror", "shadow", "sage", "pragmatist"])),
            },
            1000,
        );
        assert!(app.is_entrance_active());
        app.tick(1799);
        assert!(app.is_entrance_active());
        app.tick(1800);
        assert!(!app.is_entrance_active());
        assert_eq!(app.session().advisors().len(), 4);
        assert!(!app.is_busy(Control::Summon));
    }

    #[test]
    fn switching_advisors_never_mounts_two_interactive_panels() {
        let mut app = summoned(&["mirror", "shadow", "sage", "pragmatist"]);
        app.handle_event(AppEvent::SelectAdvisor("mirror".into()), 20_000);
        app.handle_event(AppEvent::SelectAdvisor("sage".into()), 20_100);

        let end = 20_100 + ADVISOR_SWITCH_DELAY_MS;
        for now in (20_100..=end + 32).step_by(8) {
            app.tick(now);
            let panels = app.sphere().panels;
            let interactive: Vec<_> = panels.iter().filter(|p| p.interactive).collect();
            assert!(interactive.len() <= 1, "two interactive panels at {now}ms");
            if now < end {
                assert!(interactive.is_empty(), "panel mounted early at {now}ms");
            }
        }
        assert_eq!(app.overlay(), &Overlay::AdvisorInsightBar("sage".into()));
    }

    #[test]
    fn pointer_outside_bar_is_consumed_not_forwarded() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::Pointer(HitTarget::AdvisorNode("mirror".into())), 20_000);
        assert_eq!(app.overlay(), &Overlay::AdvisorInsightBar("mirror".into()));

        // center click dismisses the bar and must not open the history
        app.handle_event(AppEvent::Pointer(HitTarget::CenterNode), 20_500);
        app.tick(20_800);
        assert_eq!(app.overlay(), &Overlay::None);
        assert!(app.overlay_state().mounted_panels().is_empty());
    }

    #[test]
    fn center_opens_history_and_close_highlights_refinement() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::Pointer(HitTarget::CenterNode), 20_000);
        assert_eq!(app.overlay(), &Overlay::DilemmaHistory);

        // the panel runs its exit animation before invoking close
        let closed_at = 20_000 + PANEL_EXIT_ANIMATION_MS;
        app.handle_event(AppEvent::CloseOverlay, closed_at);
        assert_eq!(app.overlay(), &Overlay::None);

        app.tick(closed_at + 399);
        assert!(!app.is_highlighted(HighlightTarget::RefinementInput));
        app.tick(closed_at + 400);
        assert!(app.is_highlighted(HighlightTarget::RefinementInput));
        app.tick(closed_at + 2399);
        assert!(app.is_highlighted(HighlightTarget::RefinementInput));
        app.tick(closed_at + 2400);
        assert!(!app.is_highlighted(HighlightTarget::RefinementInput));
    }

    #[test]
    fn restart_clears_everything_then_pulses_dilemma_input() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::SelectAdvisor("mirror".into()), 20_000);
        app.restart(30_000);

        assert!(!app.session().has_analysis());
        assert!(app.session().original_summary.is_none());
        assert_eq!(app.overlay(), &Overlay::None);

        app.tick(30_399);
        assert!(!app.is_highlighted(HighlightTarget::DilemmaInput));
        app.tick(30_400);
        assert!(app.is_highlighted(HighlightTarget::DilemmaInput));
        app.tick(32_400);
        assert!(!app.is_highlighted(HighlightTarget::DilemmaInput));
    }

    #[test]
    fn restart_then_summon_then_refine_keeps_original_summary() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.restart(20_000);
        app.summon(DILEMMA, None, 3, ReflectionFocus::Relationships, 21_000);
        let ticket = single_ticket(&mut app);
        let mut fresh = analysis(&["sage", "shadow", "futureself"]);
        fresh.summary = "the second council".into();
        app.handle_event(AppEvent::AnalysisCompleted { ticket, result: Ok(fresh) }, 21_100);
        assert_eq!(app.session().original_summary.as_deref(), Some("the second council"));

        app.refine("My partner found a job lead there too", 22_000);
        let ticket = single_ticket(&mut app);
        let mut refined = analysis(&["sage", "shadow", "futureself"]);
        refined.summary = "refined".into();
        app.handle_event(AppEvent::AnalysisCompleted { ticket, result: Ok(refined) }, 22_100);

        assert_eq!(app.session().original_summary.as_deref(), Some("the second council"));
        assert_eq!(app.session().refinement_history, vec!["My partner found a job lead there too"]);
        assert_eq!(app.refinement_draft(), "");
    }

    #[test]
    fn refine_success_closes_overlays() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::SelectTension(TensionKey::new("mirror", "shadow")), 20_000);
        assert!(app.debate().is_some());

        app.refine("Some more context", 20_100);
        let ticket = single_ticket(&mut app);
        app.handle_event(
            AppEvent::AnalysisCompleted {
                ticket,
                result: Ok(analysis(&["mirror", "shadow", "sage"])),
            },
            20_200,
        );
        assert_eq!(app.overlay(), &Overlay::None);
        assert!(app.debate().is_none());
        assert!(app.is_entrance_active());
    }

    #[test]
    fn late_analysis_after_restart_is_ignored() {
        let mut app = app();
        app.summon(DILEMMA, None, 4, ReflectionFocus::DecisionMaking, 0);
        let ticket = single_ticket(&mut app);
        app.restart(50);
        app.handle_event(
            AppEvent::AnalysisCompleted {
                ticket,
                result: Ok(analysis(&["mirror", "shadow", "sage"])),
            },
            100,
        );
        assert!(!app.session().has_analysis());
    }

    #[test]
    fn debate_reply_after_close_is_discarded() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        let key = TensionKey::new("mirror", "shadow");
        app.handle_event(AppEvent::SelectTension(key.clone()), 20_000);
        app.send_message("What about the kids?", 20_100);
        let ticket = single_ticket(&mut app);
        app.handle_event(AppEvent::CloseOverlay, 20_200);

        app.handle_event(AppEvent::SelectTension(key), 20_300);
        let reply = DebateInjectionResponse {
            dialogue: vec![DialogueTurn::new("mirror", "late answer")],
            matrix_update: None,
        };
        app.handle_event(AppEvent::DebateReplyReceived { ticket, result: Ok(reply) }, 20_400);

        let debate = app.debate().unwrap();
        assert_eq!(debate.transcript().len(), 1);
    }

    #[test]
    fn second_add_criterion_in_flight_issues_one_call() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::SelectTension(TensionKey::new("mirror", "shadow")), 20_000);
        let before = app.debate().unwrap().matrix().clone();

        app.add_criterion("Financial runway", 20_100);
        app.add_criterion("Financial runway", 20_150);
        assert_eq!(app.take_commands().len(), 1);
        assert!(app.is_busy(Control::AddCriterion));
        assert_eq!(app.debate().unwrap().matrix(), &before);
    }

    #[test]
    fn add_criterion_failure_lands_on_its_control() {
        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::SelectTension(TensionKey::new("mirror", "shadow")), 20_000);
        app.add_criterion("Career growth", 20_100);
        let ticket = single_ticket(&mut app);
        app.handle_event(
            AppEvent::DebateReplyReceived {
                ticket,
                result: Ok(DebateInjectionResponse {
                    dialogue: vec![DialogueTurn::new("mirror", "hm")],
                    matrix_update: Some(MatrixUpdate {
                        core_issue: String::new(),
                        criteria: vec![],
                    }),
                }),
            },
            20_200,
        );
        assert!(app.feedback().get(Control::AddCriterion).is_none());
        assert!(app.debate().unwrap().matrix().is_empty());

        app.add_criterion("Career growth", 20_300);
        let ticket = single_ticket(&mut app);
        app.handle_event(AppEvent::DebateReplyReceived { ticket, result: Err("boom".into()) }, 20_400);
        assert!(app.feedback().get(Control::AddCriterion).is_some());
        assert!(app.feedback().get(Control::DebateSend).is_none());
    }

    #[test]
    fn style_selection_confirm_and_reject() {
        let mut app = app();
        app.handle_event(AppEvent::OpenStyleSelection, 0);
        app.handle_event(AppEvent::ConfirmStyle(Some("xxxx".into())), 10);
        assert_eq!(app.overlay(), &Overlay::CognitiveStyleSelection);
        assert!(app.feedback().get(Control::Style).is_some());

        app.handle_event(AppEvent::ConfirmStyle(Some("infj".into())), 20);
        assert_eq!(app.overlay(), &Overlay::None);
        assert_eq!(app.form().cognitive_style.as_ref().map(|s| s.as_str()), Some("INFJ"));
        assert!(app.feedback().get(Control::Style).is_none());
    }

    #[test]
    fn selection_needs_analysis_and_known_advisor() {
        let mut app = app();
        app.handle_event(AppEvent::SelectAdvisor("mirror".into()), 0);
        app.handle_event(AppEvent::SelectCenter, 0);
        assert_eq!(app.overlay(), &Overlay::None);

        let mut app = summoned(&["mirror", "shadow", "sage"]);
        app.handle_event(AppEvent::SelectAdvisor("oracle".into()), 20_000);
        assert_eq!(app.overlay(), &Overlay::None);
    }

    #[test]
    fn resize_is_throttled() {
        let mut app = app();
        app.handle_event(AppEvent::Resize { width: 390.0, height: 844.0 }, 0);
        assert!(app.layout().is_mobile());
        app.handle_event(AppEvent::Resize { width: 1600.0, height: 1000.0 }, 30);
        assert!(app.layout().is_mobile());
        app.tick(100);
        assert!(app.layout().is_desktop());
    }

    #[test]
    fn hit_target_maps_nodes_to_advisors() {
        let app = summoned(&["mirror", "shadow", "sage"]);
        let sphere = app.sphere();
        let first = sphere.nodes[0].position.point();
        assert_eq!(app.hit_target(first), HitTarget::AdvisorNode("mirror".into()));
        assert_eq!(app.hit_target(sphere.center), HitTarget::CenterNode);
        assert_eq!(app.hit_target(Point::new(1.0, 1.0)), HitTarget::Elsewhere);
    }
}
