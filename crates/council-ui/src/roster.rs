//! Council roster: static role metadata and the view models derived from an
//! analysis snapshot.
//!
//! Advisors and tension pairs are never mutated in place. They are rebuilt
//! wholesale from the current `AnalysisResult` whenever it changes.

use council_types::{AdvisorDescriptor, AnalysisResult, CounselorId, TensionKind};
use serde::Serialize;

/// Maximum length of an advisor's one-line highlight
pub const HIGHLIGHT_MAX_CHARS: usize = 90;

// =============================================================================
// ROLE METADATA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMetadata {
    pub id: &'static str,
    pub display_name: &'static str,
    pub role_label: &'static str,
    pub icon: &'static str,
    pub color_key: &'static str,
    pub description: &'static str,
}

pub const ROLES: [RoleMetadata; 7] = [
    RoleMetadata {
        id: "mirror",
        display_name: "The Mirror",
        role_label: "Reflector",
        icon: "mirror",
        color_key: "silver",
        description: "Reflects back what you are actually saying, without judgement.",
    },
    RoleMetadata {
        id: "alterego",
        display_name: "The Alter Ego",
        role_label: "Contrarian",
        icon: "mask",
        color_key: "violet",
        description: "Argues for the path you are leaning away from.",
    },
    RoleMetadata {
        id: "shadow",
        display_name: "The Shadow",
        role_label: "Hidden Motives",
        icon: "moon",
        color_key: "slate",
        description: "Names the fears and wants you would rather not look at.",
    },
    RoleMetadata {
        id: "sage",
        display_name: "The Sage",
        role_label: "Long View",
        icon: "owl",
        color_key: "amber",
        description: "Weighs the decision against who you want to be in ten years.",
    },
    RoleMetadata {
        id: "pragmatist",
        display_name: "The Pragmatist",
        role_label: "Practical Steps",
        icon: "compass",
        color_key: "green",
        description: "Cares about money, logistics and what you can do this week.",
    },
    RoleMetadata {
        id: "innerchild",
        display_name: "The Inner Child",
        role_label: "Joy & Play",
        icon: "balloon",
        color_key: "coral",
        description: "Asks what would feel alive, fun or safe.",
    },
    RoleMetadata {
        id: "futureself",
        display_name: "The Future Self",
        role_label: "Hindsight",
        icon: "hourglass",
        color_key: "teal",
        description: "Speaks from the other side of the decision.",
    },
];

pub fn role(id: &str) -> Option<&'static RoleMetadata> {
    ROLES.iter().find(|r| r.id == id)
}

// =============================================================================
// ADVISORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisor {
    pub id: CounselorId,
    pub display_name: String,
    pub role_label: String,
    pub icon: String,
    pub color_key: String,
    pub description: String,
    pub short_highlight: String,
}

impl Advisor {
    fn from_role(id: &str, impression: &str) -> Self {
        let short_highlight = short_highlight(impression);
        match role(id) {
            Some(meta) => Self {
                id: id.to_string(),
                display_name: meta.display_name.to_string(),
                role_label: meta.role_label.to_string(),
                icon: meta.icon.to_string(),
                color_key: meta.color_key.to_string(),
                description: meta.description.to_string(),
                short_highlight,
            },
            None => Self {
                id: id.to_string(),
                display_name: fallback_name(id),
                role_label: "Advisor".to_string(),
                icon: "spark".to_string(),
                color_key: "neutral".to_string(),
                description: String::new(),
                short_highlight,
            },
        }
    }

    pub fn descriptor(&self) -> AdvisorDescriptor {
        AdvisorDescriptor {
            id: self.id.clone(),
            name: self.display_name.clone(),
            role: self.role_label.clone(),
            description: self.description.clone(),
        }
    }
}

fn fallback_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Advisor".to_string(),
    }
}

/// First sentence of the impression, cut on a char boundary
fn short_highlight(impression: &str) -> String {
    let trimmed = impression.trim();
    let first = trimmed
        .find(|c: char| matches!(c, '.' | '!' | '?'))
        .map_or(trimmed, |end| &trimmed[..=end]);
    if first.chars().count() <= HIGHLIGHT_MAX_CHARS {
        return first.to_string();
    }
    let mut cut: String = first.chars().take(HIGHLIGHT_MAX_CHARS - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// One advisor per counselor, in response order
pub fn derive_advisors(analysis: &AnalysisResult) -> Vec<Advisor> {
    analysis
        .counselors
        .iter()
        .map(|c| Advisor::from_role(&c.id, &c.impression))
        .collect()
}

// =============================================================================
// TENSION PAIRS
// =============================================================================

/// Unordered identity of a tension pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TensionKey {
    low: CounselorId,
    high: CounselorId,
}

impl TensionKey {
    pub fn new(a: impl Into<CounselorId>, b: impl Into<CounselorId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }

    pub fn involves(&self, id: &str) -> bool {
        self.low == id || self.high == id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionPair {
    pub advisor_id_a: CounselorId,
    pub advisor_id_b: CounselorId,
    pub kind: TensionKind,
}

impl TensionPair {
    pub fn key(&self) -> TensionKey {
        TensionKey::new(self.advisor_id_a.clone(), self.advisor_id_b.clone())
    }
}

/// One pair per tension whose advisors are both on the council.
///
/// Pairs naming an advisor that is not present are dropped: advisor sets can
/// shrink between refreshes.
pub fn derive_tension_pairs(analysis: &AnalysisResult, advisors: &[Advisor]) -> Vec<TensionPair> {
    let present = |id: &str| advisors.iter().any(|a| a.id == id);
    analysis
        .tensions
        .iter()
        .filter_map(|t| {
            let [a, b] = &t.counselor_ids;
            if present(a) && present(b) {
                Some(TensionPair {
                    advisor_id_a: a.clone(),
                    advisor_id_b: b.clone(),
                    kind: t.kind,
                })
            } else {
                tracing::warn!(pair = %t.pair_id, "dropping tension with unknown advisor");
                None
            }
        })
        .collect()
}
