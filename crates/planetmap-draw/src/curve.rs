//! Flattening curves into polylines.

use std::f64::consts::TAU;

use glam::DVec2;

/// Longest polyline step, in pixels, when flattening.
const FLATTEN_STEP: f64 = 2.0;
const MAX_STEPS: usize = 512;

fn steps_for(length: f64) -> usize {
    ((length / FLATTEN_STEP).ceil() as usize).clamp(4, MAX_STEPS)
}

/// Flatten a cubic Bézier into a polyline, endpoints included.
#[must_use]
pub fn flatten_cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Vec<DVec2> {
    let hull = p0.distance(p1) + p1.distance(p2) + p2.distance(p3);
    let n = steps_for(hull);
    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}

/// Flatten a quadratic Bézier into a polyline, excluding the start point.
#[must_use]
pub fn flatten_quad_tail(p0: DVec2, p1: DVec2, p2: DVec2) -> Vec<DVec2> {
    let n = steps_for(p0.distance(p1) + p1.distance(p2));
    (1..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let u = 1.0 - t;
            p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
        })
        .collect()
}

/// Closed polygon approximating an axis-aligned ellipse. The first point
/// is not repeated at the end.
#[must_use]
pub fn ellipse_points(centre: DVec2, radii: DVec2) -> Vec<DVec2> {
    let circumference = TAU * radii.x.abs().max(radii.y.abs());
    let n = steps_for(circumference).max(16);
    (0..n)
        .map(|i| {
            let a = TAU * i as f64 / n as f64;
            centre + DVec2::new(radii.x * a.cos(), radii.y * a.sin())
        })
        .collect()
}
