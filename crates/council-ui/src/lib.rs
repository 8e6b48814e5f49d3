//! Council UI State
//!
//! Headless view-state for the council sphere. Everything a renderer needs
//! to draw a frame, with none of the drawing:
//!
//! - [`app`]: event/command controller (`handle_event`, `tick`, `take_commands`)
//! - [`overlay`]: single-active-overlay state machine with timed cross-fades
//! - [`session`]: dilemma, analysis snapshot, refinement log
//! - [`debate`]: per-tension transcript and weighted decision matrix
//! - [`roster`]: role metadata and the advisor / tension-pair view models
//! - [`view`]: sphere view model (positions, curves, mounted panels)
//! - [`timeline`]: deterministic `(delay, action)` scheduler
//!
//! # State ownership
//!
//! ```text
//! CouncilApp
//!   ├── SessionState     (lives until restart)
//!   ├── OverlayState     (current interaction)
//!   ├── DebateSession?   (only while a DebateDialogue is open)
//!   └── Timeline         (pending transitions, fast-forwardable)
//! ```
//!
//! No IO happens here. Collaborator calls leave as [`AppCommand`]s and come
//! back as [`AppEvent`]s carrying the ticket they were issued with.

pub mod app;
pub mod debate;
pub mod error;
pub mod overlay;
pub mod roster;
pub mod session;
pub mod tasks;
pub mod timeline;
pub mod view;

pub use app::{AppCommand, AppEvent, Control, CouncilApp, Feedback, SummonForm};
pub use debate::{DebateOutcome, DebateSession, Verdict, WeightedScore};
pub use error::CouncilError;
pub use overlay::{HitTarget, MountedPanel, Overlay, OverlayState, PanelKind, PointerRouting};
pub use roster::{derive_advisors, derive_tension_pairs, Advisor, TensionKey, TensionPair, ROLES};
pub use session::{AnalysisKind, AnalysisOutcome, SessionDefaults, SessionState};
pub use tasks::Ticket;
pub use timeline::{HighlightTarget, Millis};
pub use view::{build_sphere, SphereLink, SphereNode, SphereView};

#[cfg(test)]
pub(crate) mod test_support {
    use council_types::{
        AnalysisResult, CounselorInsight, Criterion, DecisionMatrix, DialogueTurn, Tension,
        TensionKind,
    };

    pub fn criterion(id: &str, label: &str, score_a: f64, score_b: f64) -> Criterion {
        Criterion {
            id: id.to_string(),
            label: label.to_string(),
            score_a,
            score_b,
            reasoning: format!("{label} weighs differently for each side"),
        }
    }

    /// A well-formed analysis for `ids`, with a tension between each
    /// consecutive pair of counselors.
    pub fn analysis(ids: &[&str]) -> AnalysisResult {
        let counselors = ids
            .iter()
            .map(|id| CounselorInsight {
                id: id.to_string(),
                impression: format!("{id} sees a hard trade-off. The rest is detail."),
                assessment: format!("{id} thinks the stakes are real"),
                action_plan: vec!["Write down both futures".into(), "Sleep on it".into()],
                reflection_question: "What would you regret more?".into(),
            })
            .collect();
        let tensions = ids
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                Tension {
                    pair_id: format!("{a}-{b}"),
                    counselor_ids: [a.to_string(), b.to_string()],
                    kind: TensionKind::Conflict,
                    core_issue: format!("{a} versus {b}"),
                    dialogue: vec![DialogueTurn::new(a, format!("{b}, you are ignoring the risk."))],
                    matrix: DecisionMatrix {
                        criteria: vec![
                            criterion(&format!("{a}-{b}-security"), "Security", 6.0, 4.0),
                            criterion(&format!("{a}-{b}-growth"), "Growth", 3.0, 8.0),
                        ],
                    },
                }
            })
            .collect();
        AnalysisResult {
            summary: format!("summary of {}", ids.join(", ")),
            counselors,
            tensions,
            context_summary: None,
        }
    }
}
