//! Chart frames and latitude/longitude lines.

use std::f64::consts::SQRT_2;

use glam::DVec2;
use planetmap_cubesphere::{Chart, MercatorProjection};
use planetmap_draw::{DrawCommand, Paint};

use crate::palette::GRID;

/// Frame and graticule commands for a chart of the given size.
///
/// The Mercator chart has no frame and needs its projection for the
/// graticule; without one only face charts get lines.
#[must_use]
pub fn graticule(chart: Chart, width: u32, height: u32, mercator: Option<&MercatorProjection>) -> Vec<DrawCommand> {
    let (w, h) = (f64::from(width), f64::from(height));
    match chart {
        Chart::Face(face) => {
            let mut commands = vec![frame(w, h)];
            if face.is_polar() {
                commands.extend(polar_lines(w));
            } else {
                commands.extend(equatorial_lines(w));
            }
            commands
        }
        Chart::Mercator => mercator.map(|p| mercator_lines(p, w, h)).unwrap_or_default(),
    }
}

fn line(from: DVec2, to: DVec2) -> DrawCommand {
    DrawCommand::Line { from, to, stroke: GRID }
}

fn frame(w: f64, h: f64) -> DrawCommand {
    DrawCommand::Polygon {
        points: vec![DVec2::ZERO, DVec2::new(w, 0.0), DVec2::new(w, h), DVec2::new(0.0, h)],
        paint: Paint::Stroke(GRID),
    }
}

/// Latitude circles at 75°, 60° and 45° and meridians every 15° around
/// the pole.
fn polar_lines(w: f64) -> Vec<DrawCommand> {
    let mid = (w / 2.0).floor();
    let mut commands: Vec<DrawCommand> = [75.0f64, 60.0, 45.0]
        .iter()
        .map(|lat| {
            let r = (90.0 - lat).to_radians().tan() * w / 2.0;
            DrawCommand::Ellipse {
                centre: DVec2::splat(mid),
                radii: DVec2::splat(r),
                paint: Paint::Stroke(GRID),
            }
        })
        .collect();
    for lon in [-30.0f64, -15.0, 0.0, 15.0, 30.0, 45.0] {
        let t = lon.to_radians().tan() * w;
        commands.push(line(DVec2::new(mid - t, mid - w), DVec2::new(mid + t, mid + w)));
        commands.push(line(DVec2::new(mid - w, mid + t), DVec2::new(mid + w, mid - t)));
    }
    commands
}

/// Meridians as vertical lines and parallels as curves bending towards
/// the face corners, every 15° up to ±60°.
fn equatorial_lines(w: f64) -> Vec<DrawCommand> {
    let mid = (w / 2.0).floor();
    let steps = [-60.0f64, -45.0, -30.0, -15.0, 0.0, 15.0, 30.0, 45.0, 60.0];
    let mut commands = Vec::new();
    for lon in steps {
        let x = mid - lon.to_radians().tan() * w / 2.0;
        commands.push(line(DVec2::new(x, mid - w), DVec2::new(x, mid + w)));
    }
    for lat in steps {
        let t = lat.to_radians().tan() * w / 2.0;
        for (edge, c1, c2) in [(0.0, 0.25, 0.787), (2.0, 1.75, 1.213)] {
            commands.push(DrawCommand::Bezier {
                start: DVec2::new(mid * edge, mid + t * SQRT_2),
                ctrl1: DVec2::new(mid * c1, mid + t * 1.06),
                ctrl2: DVec2::new(mid * c2, mid + t),
                end: DVec2::new(mid, mid + t),
                stroke: GRID,
            });
        }
    }
    commands
}

/// Meridians every 15° and parallels every 15° up to ±75°.
fn mercator_lines(projection: &MercatorProjection, w: f64, h: f64) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let per_degree = projection.lon_scale.to_radians();
    let min_lon_deg = projection.min_lon.to_degrees();
    let mut x = (-min_lon_deg).rem_euclid(15.0) * per_degree;
    while x < w {
        commands.push(line(DVec2::new(x, 0.0), DVec2::new(x, h)));
        x += 15.0 * per_degree;
    }
    let mid = (h / 2.0).floor();
    for lat in [-75.0f64, -60.0, -45.0, -30.0, -15.0, 0.0, 15.0, 30.0, 45.0, 60.0, 75.0] {
        let y = lat.to_radians().tan() * projection.lat_scale + mid;
        commands.push(line(DVec2::new(0.0, y), DVec2::new(w, y)));
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetmap_cubesphere::{CubeFace, PIXELS_PER_DEGREE};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_faces_get_frame_and_lines() {
        let polar = graticule(Chart::Face(CubeFace::Up), 256, 256, None);
        assert_eq!(polar.len(), 1 + 3 + 12);
        let equatorial = graticule(Chart::Face(CubeFace::Front), 256, 256, None);
        assert_eq!(equatorial.len(), 1 + 9 + 18);
        assert!(matches!(equatorial[0], DrawCommand::Polygon { .. }));
    }

    #[test]
    fn test_equator_is_straight_through_centre() {
        let lines = equatorial_lines(256.0);
        let DrawCommand::Bezier { start, end, .. } = lines[9 + 8] else {
            panic!("expected the equator curve");
        };
        assert!((start.y - 128.0).abs() < EPSILON && (end.y - 128.0).abs() < EPSILON);
    }

    #[test]
    fn test_mercator_meridians_land_on_multiples_of_15() {
        let p = MercatorProjection::from_degrees(-100.0, 100.0, false);
        let (w, h) = p.sheet_size(60.0);
        let lines = graticule(Chart::Mercator, w, h, Some(&p));
        let DrawCommand::Line { from, .. } = lines[0] else {
            panic!("expected a meridian");
        };
        assert!((from.x - 10.0 * PIXELS_PER_DEGREE).abs() < 1e-6, "first meridian at -90°: {from:?}");
        assert!(graticule(Chart::Mercator, w, h, None).is_empty());
    }
}
