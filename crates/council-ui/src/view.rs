//! Sphere view model: what a renderer draws for the current frame.
//!
//! Rebuilt from the layout, the derived advisors/pairs and the overlay on
//! every call. Holds no state of its own.

use council_layout::{tension_curve, LayoutValues, OrbitPoint, Point, TensionCurve};
use council_types::{CounselorId, TensionKind};
use serde::Serialize;

use crate::overlay::{MountedPanel, Overlay};
use crate::roster::{Advisor, TensionKey, TensionPair};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SphereNode {
    pub advisor: Advisor,
    pub position: OrbitPoint,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SphereLink {
    pub key: TensionKey,
    pub advisor_id_a: CounselorId,
    pub advisor_id_b: CounselorId,
    pub kind: TensionKind,
    pub curve: TensionCurve,
    pub label_anchor: Point,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SphereView {
    pub layout: LayoutValues,
    pub center: Point,
    pub nodes: Vec<SphereNode>,
    pub links: Vec<SphereLink>,
    pub panels: Vec<MountedPanel>,
    /// One-shot entrance animation is running
    pub entrance: bool,
}

impl SphereView {
    pub fn node(&self, id: &str) -> Option<&SphereNode> {
        self.nodes.iter().find(|n| n.advisor.id == id)
    }
}

pub fn build_sphere(
    layout: &LayoutValues,
    advisors: &[Advisor],
    pairs: &[TensionPair],
    overlay: &Overlay,
    panels: Vec<MountedPanel>,
    entrance: bool,
) -> SphereView {
    let center = layout.center();
    let selected = overlay.advisor();
    let nodes: Vec<SphereNode> = advisors
        .iter()
        .zip(layout.positions(advisors.len()))
        .map(|(advisor, position)| SphereNode {
            selected: selected == Some(advisor.id.as_str()),
            advisor: advisor.clone(),
            position,
        })
        .collect();

    let position_of = |id: &str| {
        nodes
            .iter()
            .find(|n| n.advisor.id == id)
            .map(|n| n.position.point())
    };
    let links = pairs
        .iter()
        .filter_map(|pair| {
            let a = position_of(&pair.advisor_id_a)?;
            let b = position_of(&pair.advisor_id_b)?;
            let curve = tension_curve(a, b, center);
            let key = pair.key();
            Some(SphereLink {
                active: overlay.tension() == Some(&key),
                key,
                advisor_id_a: pair.advisor_id_a.clone(),
                advisor_id_b: pair.advisor_id_b.clone(),
                kind: pair.kind,
                label_anchor: curve.label_anchor(),
                curve,
            })
        })
        .collect();

    SphereView {
        layout: *layout,
        center,
        nodes,
        links,
        panels,
        entrance,
    }
}
