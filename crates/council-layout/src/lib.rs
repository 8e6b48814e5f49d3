//! Council Sphere Layout
//!
//! Pure geometry for the sphere view: advisors orbit a central dilemma node.
//! No UI toolkit, no I/O. Every function here is a pure function of its
//! inputs so the view can recompute freely on resize.
//!
//! - [`compute_layout`]: container size → breakpoint flags and sizes
//! - [`orbit_positions`]: N evenly spaced nodes, starting at 12 o'clock
//! - [`tension_curve`]: outward-bowing quadratic bezier between two nodes
//! - [`hit_test`]: pointer → center node / advisor node
//! - [`ResizeThrottle`]: rate-limits the resize *trigger*, never the math

pub mod hit;
pub mod layout;
pub mod orbit;
pub mod throttle;

pub use hit::{hit_test, SphereHit};
pub use layout::{compute_layout, Breakpoint, LayoutValues};
pub use orbit::{orbit_positions, tension_curve, OrbitPoint, TensionCurve, CURVE_OUTWARD_PULL};
pub use throttle::{ResizeThrottle, RESIZE_THROTTLE_MS};

use serde::Serialize;

/// A point in container pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
