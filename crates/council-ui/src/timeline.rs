//! Deterministic timeline for timed UI choreography
//!
//! Cross-fades, entrance animations and highlight pulses are expressed as
//! `(delay, action)` steps on an explicit timeline instead of wall-clock
//! timers. The owner feeds it timestamps via `tick(now)`, so a test can
//! fast-forward through every transition without sleeping.
//!
//! Each step has a [`TimerKey`]; scheduling a key that is already pending
//! replaces the earlier step. Unrelated keys run independently.

use council_types::CounselorId;

/// Milliseconds on the caller's clock
pub type Millis = u64;

/// Active advisor is cleared, then the next one is mounted after this delay
pub const ADVISOR_SWITCH_DELAY_MS: Millis = 350;

/// Outside-click dismissal of the insight bar
pub const ADVISOR_DISMISS_DELAY_MS: Millis = 300;

/// Panel closes, then the follow-up input highlight starts after this delay
pub const PANEL_CLOSE_HIGHLIGHT_DELAY_MS: Millis = 400;

/// Panels run their own exit animation for about this long before closing
pub const PANEL_EXIT_ANIMATION_MS: Millis = 400;

/// One-shot entrance animation after a summon or refinement
pub const ENTRANCE_ANIMATION_MS: Millis = 800;

/// Length of a highlight pulse on an input
pub const HIGHLIGHT_PULSE_MS: Millis = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightTarget {
    DilemmaInput,
    RefinementInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    AdvisorSwap,
    Entrance,
    Highlight(HighlightTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedAction {
    /// Finish a cross-fade: clear the outgoing advisor and mount `next`
    CompleteAdvisorSwap { next: Option<CounselorId> },
    EndEntrance,
    StartHighlight(HighlightTarget),
    EndHighlight(HighlightTarget),
}

#[derive(Debug, Clone)]
struct Step {
    due: Millis,
    seq: u64,
    key: TimerKey,
    action: TimedAction,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: Vec<Step>,
    seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at `now + delay_ms`, replacing any step with the same key
    pub fn schedule(&mut self, now: Millis, delay_ms: Millis, key: TimerKey, action: TimedAction) {
        self.cancel(key);
        self.seq += 1;
        self.steps.push(Step {
            due: now.saturating_add(delay_ms),
            seq: self.seq,
            key,
            action,
        });
    }

    pub fn cancel(&mut self, key: TimerKey) {
        self.steps.retain(|s| s.key != key);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn is_scheduled(&self, key: TimerKey) -> bool {
        self.steps.iter().any(|s| s.key == key)
    }

    pub fn pending(&self, key: TimerKey) -> Option<(Millis, &TimedAction)> {
        self.steps
            .iter()
            .find(|s| s.key == key)
            .map(|s| (s.due, &s.action))
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.steps.iter().map(|s| s.due).min()
    }

    /// Remove and return the earliest step due at or before `now`.
    ///
    /// Ties fire in scheduling order. The returned timestamp is the step's
    /// due time, which follow-up steps should be scheduled from.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, TimedAction)> {
        let index = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)?;
        let step = self.steps.swap_remove(index);
        Some((step.due, step.action))
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
