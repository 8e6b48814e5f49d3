//! Orbit placement and tension-link geometry

use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::Point;

/// How far past the chord midpoint the bezier control point is pushed,
/// as a fraction of the midpoint's offset from the sphere center
pub const CURVE_OUTWARD_PULL: f64 = 0.2;

/// An advisor slot on the orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitPoint {
    pub x: f64,
    pub y: f64,
    /// Radians; the first slot sits at -π/2 (12 o'clock)
    pub angle: f64,
}

impl OrbitPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Evenly spaced points on a circle, clockwise from 12 o'clock.
///
/// Screen y grows downward, so increasing the angle walks clockwise.
pub fn orbit_positions(count: usize, center: Point, radius: f64) -> Vec<OrbitPoint> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = -FRAC_PI_2 + step * i as f64;
            OrbitPoint {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
                angle,
            }
        })
        .collect()
}

/// Quadratic bezier for a tension link between two advisors
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TensionCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl TensionCurve {
    /// Evaluate the curve at `t` (clamped to 0..=1)
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Where the link label goes: the outward peak of the curve
    pub fn label_anchor(&self) -> Point {
        self.point_at(0.5)
    }
}

/// Curve between `a` and `b` bowed away from `center` so it clears the
/// center node.
pub fn tension_curve(a: Point, b: Point, center: Point) -> TensionCurve {
    let mid = a.midpoint(b);
    let control = Point::new(
        mid.x + CURVE_OUTWARD_PULL * (mid.x - center.x),
        mid.y + CURVE_OUTWARD_PULL * (mid.y - center.y),
    );
    TensionCurve {
        start: a,
        control,
        end: b,
    }
}
