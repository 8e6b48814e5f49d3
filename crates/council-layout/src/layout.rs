//! Container-aware sizing for the sphere
//!
//! Breakpoints step node/center sizes and the orbit radius up with the
//! container. The orbit radius is always clamped so advisor nodes neither
//! overlap the center node nor spill past the container edge.

use serde::Serialize;

use crate::orbit::{orbit_positions, OrbitPoint};
use crate::Point;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Widths at or below this are mobile
pub const MOBILE_MAX_WIDTH: f64 = 430.0;

/// Widths at or below this (and above mobile) are tablet
pub const TABLET_MAX_WIDTH: f64 = 1279.0;

/// Below either of these, supplementary panels render as bottom drawers
pub const CONSTRAINED_WIDTH: f64 = 900.0;
pub const CONSTRAINED_HEIGHT: f64 = 600.0;

/// Clearance between the center node and the advisor nodes
pub const CENTER_GAP: f64 = 30.0;

/// Clearance between advisor nodes and the container edge
pub const EDGE_MARGIN: f64 = 24.0;

// =============================================================================
// BREAKPOINTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: f64) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    fn profile(self) -> &'static SizeProfile {
        match self {
            Breakpoint::Mobile => &MOBILE,
            Breakpoint::Tablet => &TABLET,
            Breakpoint::Desktop => &DESKTOP,
        }
    }
}

/// Scale factors and clamps for one breakpoint
struct SizeProfile {
    node: Clamp,
    center: Clamp,
    orbit_scale: f64,
    node_font: f64,
    center_font: f64,
    icon: f64,
}

struct Clamp {
    scale: f64,
    floor: f64,
    ceiling: f64,
}

impl Clamp {
    fn apply(&self, min_dimension: f64) -> f64 {
        (min_dimension * self.scale).max(self.floor).min(self.ceiling)
    }
}

const MOBILE: SizeProfile = SizeProfile {
    node: Clamp { scale: 0.12, floor: 60.0, ceiling: 80.0 },
    center: Clamp { scale: 0.25, floor: 140.0, ceiling: 180.0 },
    orbit_scale: 0.34,
    node_font: 10.0,
    center_font: 13.0,
    icon: 20.0,
};

const TABLET: SizeProfile = SizeProfile {
    node: Clamp { scale: 0.12, floor: 80.0, ceiling: 100.0 },
    center: Clamp { scale: 0.26, floor: 180.0, ceiling: 220.0 },
    orbit_scale: 0.36,
    node_font: 11.0,
    center_font: 14.0,
    icon: 24.0,
};

const DESKTOP: SizeProfile = SizeProfile {
    node: Clamp { scale: 0.14, floor: 100.0, ceiling: 140.0 },
    center: Clamp { scale: 0.30, floor: 200.0, ceiling: 280.0 },
    orbit_scale: 0.38,
    node_font: 12.0,
    center_font: 16.0,
    icon: 28.0,
};

// =============================================================================
// LAYOUT VALUES
// =============================================================================

/// Everything the sphere needs to place itself in a container
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutValues {
    pub width: f64,
    pub height: f64,
    pub breakpoint: Breakpoint,
    /// Supplementary panels render as drawers instead of inline overlays
    pub is_constrained: bool,
    pub is_landscape: bool,
    pub min_dimension: f64,
    pub node_size: f64,
    pub center_size: f64,
    pub orbit_radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// True when the breakpoint floors did not fit and sizes were scaled down
    pub compact: bool,
    pub node_font_size: f64,
    pub center_font_size: f64,
    pub icon_size: f64,
}

impl LayoutValues {
    pub fn is_mobile(&self) -> bool {
        self.breakpoint == Breakpoint::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.breakpoint == Breakpoint::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        self.breakpoint == Breakpoint::Desktop
    }

    /// Pixel center of the container
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Orbit positions for `count` advisors in this layout
    pub fn positions(&self, count: usize) -> Vec<OrbitPoint> {
        orbit_positions(count, self.center(), self.orbit_radius)
    }
}

fn radius_bounds(node_size: f64, center_size: f64, min_dimension: f64) -> (f64, f64) {
    let min_radius = center_size / 2.0 + node_size / 2.0 + CENTER_GAP;
    let max_radius = min_dimension / 2.0 - node_size / 2.0 - EDGE_MARGIN;
    (min_radius, max_radius)
}

/// Compute the responsive layout for a container.
///
/// Pure function of the two dimensions: no hidden state, no hysteresis.
/// When the breakpoint floors cannot fit (very short or narrow containers),
/// node and center sizes are scaled down together until
/// `min_radius == max_radius`, so the radius bounds still hold.
pub fn compute_layout(width: f64, height: f64) -> LayoutValues {
    let breakpoint = Breakpoint::from_width(width);
    let profile = breakpoint.profile();
    let min_dimension = width.min(height);

    let mut node_size = profile.node.apply(min_dimension);
    let mut center_size = profile.center.apply(min_dimension);
    let (mut min_radius, mut max_radius) = radius_bounds(node_size, center_size, min_dimension);

    let compact = min_radius > max_radius;
    if compact {
        // s * (center/2 + node) = minDim/2 - gap - margin
        let available = (min_dimension / 2.0 - CENTER_GAP - EDGE_MARGIN).max(0.0);
        let scale = available / (center_size / 2.0 + node_size);
        node_size *= scale;
        center_size *= scale;
        (min_radius, max_radius) = radius_bounds(node_size, center_size, min_dimension);
        tracing::debug!(width, height, scale, "sphere layout compacted to fit container");
    }

    let orbit_radius = (min_dimension * profile.orbit_scale)
        .max(min_radius)
        .min(max_radius);

    LayoutValues {
        width,
        height,
        breakpoint,
        is_constrained: width < CONSTRAINED_WIDTH || height < CONSTRAINED_HEIGHT,
        is_landscape: width > height,
        min_dimension,
        node_size,
        center_size,
        orbit_radius,
        min_radius,
        max_radius,
        compact,
        node_font_size: profile.node_font,
        center_font_size: profile.center_font,
        icon_size: profile.icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn breakpoint_edges() {
        assert_eq!(Breakpoint::from_width(430.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(431.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1279.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1280.0), Breakpoint::Desktop);
    }

    #[test]
    fn desktop_layout_values() {
        let layout = compute_layout(1600.0, 1000.0);
        assert!(layout.is_desktop());
        assert!(layout.is_landscape);
        assert!(!layout.is_constrained);
        assert!(!layout.compact);
        // 1000 * 0.14 = 140 (ceiling), 1000 * 0.30 = 300 → 280
        assert_eq!(layout.node_size, 140.0);
        assert_eq!(layout.center_size, 280.0);
        // target 380, bounds [240, 406]
        assert_eq!(layout.min_radius, 240.0);
        assert_eq!(layout.max_radius, 406.0);
        assert!((layout.orbit_radius - 380.0).abs() < EPS);
        assert_eq!(layout.center(), Point::new(800.0, 500.0));
    }

    #[test]
    fn tablet_portrait_is_constrained() {
        let layout = compute_layout(800.0, 1100.0);
        assert!(layout.is_tablet());
        assert!(!layout.is_landscape);
        assert!(layout.is_constrained);
        // 800 * 0.12 = 96; 800 * 0.26 = 208
        assert!((layout.node_size - 96.0).abs() < EPS);
        assert!((layout.center_size - 208.0).abs() < EPS);
        assert!((layout.orbit_radius - 288.0).abs() < EPS);
    }

    #[test]
    fn mobile_sizes_sit_on_their_floors() {
        let layout = compute_layout(390.0, 844.0);
        assert!(layout.is_mobile());
        assert_eq!(layout.node_size, 60.0);
        assert_eq!(layout.center_size, 140.0);
        // bounds [130, 141], target 132.6
        assert_eq!(layout.min_radius, 130.0);
        assert_eq!(layout.max_radius, 141.0);
        assert!((layout.orbit_radius - 390.0 * 0.34).abs() < EPS);
    }

    #[test]
    fn mobile_radius_clamped_up_to_min() {
        // 430x380: bounds [130, 136], target 129.2
        let layout = compute_layout(430.0, 380.0);
        assert!(layout.is_mobile());
        assert!(!layout.compact);
        assert!((layout.orbit_radius - 130.0).abs() < EPS);
    }

    #[test]
    fn short_desktop_window_is_compacted() {
        let layout = compute_layout(1920.0, 300.0);
        assert!(layout.compact);
        assert!(layout.node_size > 0.0 && layout.node_size < 100.0);
        assert!(layout.min_radius <= layout.orbit_radius + EPS);
        assert!(layout.orbit_radius <= layout.max_radius + EPS);
    }

    #[test]
    fn fonts_are_discrete_per_breakpoint() {
        assert_eq!(compute_layout(400.0, 800.0).icon_size, 20.0);
        assert_eq!(compute_layout(1000.0, 800.0).icon_size, 24.0);
        assert_eq!(compute_layout(2000.0, 1200.0).icon_size, 28.0);
        assert_eq!(compute_layout(2000.0, 1200.0).center_font_size, 16.0);
    }

    #[test]
    fn recompute_is_pure() {
        assert_eq!(compute_layout(1024.0, 768.0), compute_layout(1024.0, 768.0));
    }

    proptest! {
        #[test]
        fn radius_stays_within_bounds(w in 200.0f64..4000.0, h in 200.0f64..4000.0) {
            let layout = compute_layout(w, h);
            prop_assert!(layout.node_size > 0.0);
            prop_assert!(layout.center_size > 0.0);
            prop_assert!(layout.min_radius <= layout.orbit_radius + EPS,
                "radius {} below min {}", layout.orbit_radius, layout.min_radius);
            prop_assert!(layout.orbit_radius <= layout.max_radius + EPS,
                "radius {} above max {}", layout.orbit_radius, layout.max_radius);
        }

        #[test]
        fn nodes_stay_inside_container(w in 200.0f64..4000.0, h in 200.0f64..4000.0) {
            let layout = compute_layout(w, h);
            for p in layout.positions(7) {
                prop_assert!(p.x - layout.node_size / 2.0 >= -EPS);
                prop_assert!(p.x + layout.node_size / 2.0 <= w + EPS);
                prop_assert!(p.y - layout.node_size / 2.0 >= -EPS);
                prop_assert!(p.y + layout.node_size / 2.0 <= h + EPS);
            }
        }
    }
}
