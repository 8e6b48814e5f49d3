//! Overlay state machine
//!
//! A single tag says which panel owns the screen. Using an enum rather than
//! a set of booleans makes "two overlays at once" unrepresentable.
//!
//! ```text
//!            ┌──────────── CognitiveStyleSelection
//!            │
//!   None ────┼──── AdvisorInsightBar(A) ──► AdvisorFullPanel(A)
//!            │        │  ▲
//!            │        └──┘ switch A→B: clear, 350ms, mount B
//!            ├──── DebateDialogue(pair)
//!            └──── DilemmaHistory ──close──► None, 400ms, highlight refine input
//! ```
//!
//! The only extra state is the `outgoing` advisor: the panel animating out
//! while the active slot is empty. It is never interactive.

use council_types::CounselorId;
use serde::Serialize;

use crate::roster::TensionKey;
use crate::timeline::{
    HighlightTarget, Millis, TimedAction, Timeline, TimerKey, ADVISOR_DISMISS_DELAY_MS,
    ADVISOR_SWITCH_DELAY_MS, PANEL_CLOSE_HIGHLIGHT_DELAY_MS,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    CognitiveStyleSelection,
    AdvisorInsightBar(CounselorId),
    AdvisorFullPanel(CounselorId),
    DebateDialogue(TensionKey),
    DilemmaHistory,
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Overlay::None)
    }

    pub fn advisor(&self) -> Option<&str> {
        match self {
            Overlay::AdvisorInsightBar(id) | Overlay::AdvisorFullPanel(id) => Some(id),
            _ => None,
        }
    }

    pub fn tension(&self) -> Option<&TensionKey> {
        match self {
            Overlay::DebateDialogue(key) => Some(key),
            _ => None,
        }
    }
}

/// Explicit marker on whatever the pointer landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    InsightBar,
    AdvisorNode(CounselorId),
    CenterNode,
    TensionLink(TensionKey),
    Elsewhere,
}

/// What the capture phase did with a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRouting {
    /// Swallowed as an outside-click dismissal; the target never sees it
    Consumed,
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelKind {
    InsightBar,
    FullPanel,
}

/// An advisor panel currently mounted in the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountedPanel {
    pub advisor: CounselorId,
    pub kind: PanelKind,
    pub interactive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    active: Overlay,
    outgoing: Option<CounselorId>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &Overlay {
        &self.active
    }

    pub fn outgoing(&self) -> Option<&str> {
        self.outgoing.as_deref()
    }

    /// A cross-fade or dismissal is still animating
    pub fn is_transitioning(&self) -> bool {
        self.outgoing.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Claim the screen for a non-advisor overlay. Only legal from `None`;
    /// an animating outgoing advisor is cut short.
    fn open_from_none(&mut self, overlay: Overlay, timeline: &mut Timeline) -> bool {
        if !self.active.is_none() {
            tracing::debug!(active = ?self.active, requested = ?overlay, "overlay busy");
            return false;
        }
        timeline.cancel(TimerKey::AdvisorSwap);
        self.outgoing = None;
        self.active = overlay;
        true
    }

    pub fn open_style_selection(&mut self, timeline: &mut Timeline) -> bool {
        self.open_from_none(Overlay::CognitiveStyleSelection, timeline)
    }

    pub fn open_debate(&mut self, key: TensionKey, timeline: &mut Timeline) -> bool {
        self.open_from_none(Overlay::DebateDialogue(key), timeline)
    }

    pub fn open_history(&mut self, timeline: &mut Timeline) -> bool {
        self.open_from_none(Overlay::DilemmaHistory, timeline)
    }

    /// Select an advisor node.
    ///
    /// From `None` the bar mounts immediately. From another advisor's bar
    /// the active slot is cleared first and the new advisor mounts after
    /// [`ADVISOR_SWITCH_DELAY_MS`]. Selecting during a running cross-fade
    /// re-targets it.
    pub fn select_advisor(&mut self, id: &str, timeline: &mut Timeline, now: Millis) -> bool {
        match &self.active {
            Overlay::None if self.outgoing.is_none() => {
                self.active = Overlay::AdvisorInsightBar(id.to_string());
                true
            }
            Overlay::None => {
                Self::schedule_swap(timeline, now, ADVISOR_SWITCH_DELAY_MS, Some(id));
                true
            }
            Overlay::AdvisorInsightBar(current) if current == id => false,
            Overlay::AdvisorInsightBar(current) => {
                self.outgoing = Some(current.clone());
                self.active = Overlay::None;
                Self::schedule_swap(timeline, now, ADVISOR_SWITCH_DELAY_MS, Some(id));
                true
            }
            other => {
                tracing::debug!(active = ?other, advisor = id, "advisor select ignored");
                false
            }
        }
    }

    /// Outside-click dismissal of the insight bar, animated like a switch
    pub fn dismiss_advisor(&mut self, timeline: &mut Timeline, now: Millis) -> bool {
        let Overlay::AdvisorInsightBar(current) = &self.active else {
            return false;
        };
        self.outgoing = Some(current.clone());
        self.active = Overlay::None;
        Self::schedule_swap(timeline, now, ADVISOR_DISMISS_DELAY_MS, None);
        true
    }

    fn schedule_swap(timeline: &mut Timeline, now: Millis, delay: Millis, next: Option<&str>) {
        timeline.schedule(
            now,
            delay,
            TimerKey::AdvisorSwap,
            TimedAction::CompleteAdvisorSwap {
                next: next.map(str::to_string),
            },
        );
    }

    /// Second half of a switch/dismiss, fired by the timeline
    pub fn complete_swap(&mut self, next: Option<CounselorId>) {
        self.outgoing = None;
        match next {
            Some(id) if self.active.is_none() => {
                self.active = Overlay::AdvisorInsightBar(id);
            }
            Some(id) => {
                tracing::debug!(active = ?self.active, advisor = %id, "swap target dropped");
            }
            None => {}
        }
    }

    /// "View full" on the insight bar; the advisor carries over
    pub fn expand_advisor(&mut self) -> bool {
        match &self.active {
            Overlay::AdvisorInsightBar(id) => {
                self.active = Overlay::AdvisorFullPanel(id.clone());
                true
            }
            _ => false,
        }
    }

    /// Explicit close. Immediate from the state machine's point of view.
    /// Returns the overlay that was active.
    pub fn close(&mut self, timeline: &mut Timeline) -> Overlay {
        timeline.cancel(TimerKey::AdvisorSwap);
        self.outgoing = None;
        std::mem::take(&mut self.active)
    }

    /// Close the dilemma history and point the user at the refinement input
    pub fn close_history(&mut self, timeline: &mut Timeline, now: Millis) -> bool {
        if self.active != Overlay::DilemmaHistory {
            return false;
        }
        self.close(timeline);
        timeline.schedule(
            now,
            PANEL_CLOSE_HIGHLIGHT_DELAY_MS,
            TimerKey::Highlight(HighlightTarget::RefinementInput),
            TimedAction::StartHighlight(HighlightTarget::RefinementInput),
        );
        true
    }

    /// Capture phase for pointer events.
    ///
    /// With the insight bar open, anything that is neither the bar nor an
    /// advisor node dismisses it and is swallowed before the target's own
    /// handler runs.
    pub fn capture_pointer(
        &mut self,
        target: &HitTarget,
        timeline: &mut Timeline,
        now: Millis,
    ) -> PointerRouting {
        let bar_open = matches!(self.active, Overlay::AdvisorInsightBar(_));
        let inside = matches!(target, HitTarget::InsightBar | HitTarget::AdvisorNode(_));
        if bar_open && !inside {
            self.dismiss_advisor(timeline, now);
            PointerRouting::Consumed
        } else {
            PointerRouting::PassThrough
        }
    }

    /// Advisor panels currently mounted. At most one is interactive.
    pub fn mounted_panels(&self) -> Vec<MountedPanel> {
        let mut panels = Vec::with_capacity(2);
        if let Some(id) = &self.outgoing {
            panels.push(MountedPanel {
                advisor: id.clone(),
                kind: PanelKind::InsightBar,
                interactive: false,
            });
        }
        match &self.active {
            Overlay::AdvisorInsightBar(id) => panels.push(MountedPanel {
                advisor: id.clone(),
                kind: PanelKind::InsightBar,
                interactive: true,
            }),
            Overlay::AdvisorFullPanel(id) => panels.push(MountedPanel {
                advisor: id.clone(),
                kind: PanelKind::FullPanel,
                interactive: true,
            }),
            _ => {}
        }
        panels
    }
}
