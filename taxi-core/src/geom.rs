//! Small geometric helpers shared by the flight model and level authoring.

use crate::constants::TAU;

/// Euclidean distance between two points.
#[inline]
pub fn dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Angle of point (px, py) on a circle centered at (cx, cy), in [0, 2pi).
#[inline]
pub fn angle(px: f64, py: f64, cx: f64, cy: f64) -> f64 {
    let a = (py - cy).atan2(px - cx);
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Wrap an arbitrary angle into [0, 2pi).
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    a.rem_euclid(TAU)
}
