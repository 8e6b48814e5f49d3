//! Pointer hit testing against the sphere nodes

use crate::layout::LayoutValues;
use crate::orbit::OrbitPoint;
use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphereHit {
    Center,
    /// Index into the orbit positions
    Node(usize),
}

/// Resolve a pointer position to a sphere node.
///
/// Advisor nodes are drawn above the center node, so they win on overlap.
pub fn hit_test(pointer: Point, layout: &LayoutValues, nodes: &[OrbitPoint]) -> Option<SphereHit> {
    let node_radius = layout.node_size / 2.0;
    if let Some(index) = nodes
        .iter()
        .position(|n| n.point().distance(pointer) <= node_radius)
    {
        return Some(SphereHit::Node(index));
    }
    if layout.center().distance(pointer) <= layout.center_size / 2.0 {
        return Some(SphereHit::Center);
    }
    None
}
