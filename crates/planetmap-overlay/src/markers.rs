//! Point-of-interest markers and ten-minute ticks.

use glam::DVec2;
use image::Rgba;
use planetmap_draw::{DrawCommand, Paint};
use planetmap_waypoint::{MarkerShape, SegmentFilter};

use crate::palette;
use crate::track::{TrackPoint, Visibility};

/// Points drawn between ticks before another tick is placed.
const TICK_SPACING: u32 = 6;

fn triangle(centre: DVec2, half: f64, inverted: bool, color: Rgba<u8>) -> DrawCommand {
    let tip = if inverted { half } else { -half };
    DrawCommand::Polygon {
        points: vec![
            centre + DVec2::new(0.0, tip),
            centre + DVec2::new(half, -tip),
            centre + DVec2::new(-half, -tip),
        ],
        paint: Paint::Fill(color),
    }
}

/// Marker commands for the points of interest of one track.
#[must_use]
pub fn poi_markers(track: &[TrackPoint], visibility: &Visibility) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for point in track {
        let record = &point.record;
        let d = &record.directives;
        if !visibility.admits(record) {
            continue;
        }
        if d.auxiliary {
            if !visibility.shows_auxiliary(record) {
                continue;
            }
            if d.poi_primary {
                commands.push(DrawCommand::disc(point.pos, palette::MARKER_RADIUS, palette::POI_PRIMARY));
            } else if d.poi_secondary {
                commands.push(DrawCommand::disc(point.pos, palette::MARKER_RADIUS, palette::POI_SECONDARY));
            }
        } else if d.poi_primary {
            commands.push(DrawCommand::disc(point.pos, palette::MARKER_RADIUS, palette::POI_PRIMARY));
        } else if d.secondary_marker() {
            let color = if d.bot { palette::POI_BOT } else { palette::POI_SECONDARY };
            commands.push(match d.marker {
                MarkerShape::Triangle => triangle(point.pos, palette::BASE_MARKER_SIZE, false, color),
                MarkerShape::InvertedTriangle => {
                    triangle(point.pos, palette::EMPLACEMENT_MARKER_SIZE, true, color)
                }
                MarkerShape::Circle => DrawCommand::disc(point.pos, palette::MARKER_RADIUS, color),
            });
        }
    }
    commands
}

/// Tick marks along one track.
///
/// A tick is placed where the track enters a new segment or a new
/// ten-minute bucket, provided enough points were passed since the last
/// tick.
#[must_use]
pub fn tick_marks(track: &[TrackPoint], segments: &SegmentFilter) -> Vec<DrawCommand> {
    let Some((first, rest)) = track.split_first() else {
        return Vec::new();
    };
    let bucket = |p: &TrackPoint| p.record.start().map_or(0, |s| s.ten_minute_bucket());
    let mut segment = first.record.start_part();
    let mut time = bucket(first);
    let mut since_last = 0;
    let mut commands = Vec::new();

    for point in rest {
        let d = &point.record.directives;
        if !segments.admits(&point.record) || d.poi_secondary || d.no_line || d.auxiliary {
            continue;
        }
        since_last += 1;
        let point_time = bucket(point);
        if point.record.start_part() != segment || point_time != time {
            if since_last >= TICK_SPACING {
                commands.push(DrawCommand::disc(point.pos, palette::TICK_RADIUS, palette::TICK));
                since_last = 0;
            }
            segment = point.record.start_part();
            time = point_time;
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use planetmap_waypoint::WaypointRecord;
    use std::sync::Arc;

    fn point(name: &str, description: &str, x: f64) -> TrackPoint {
        TrackPoint {
            record: Arc::new(WaypointRecord::new("me", true, name, DVec3::ZERO, description)),
            pos: DVec2::new(x, 10.0),
        }
    }

    fn fill_of(cmd: &DrawCommand) -> Rgba<u8> {
        match cmd {
            DrawCommand::Ellipse { paint: Paint::Fill(c), .. } | DrawCommand::Polygon { paint: Paint::Fill(c), .. } => *c,
            other => panic!("unexpected marker {other:?}"),
        }
    }

    #[test]
    fn test_marker_colours_and_shapes() {
        let track = vec![
            point("P01.00.00.00%", "", 0.0),
            point("P01.00.00.05$", "", 10.0),
            point("P01.00.00.10$", "[Bot] drone", 20.0),
            point("P01.00.00.15 [Base]", "", 30.0),
            point("P01.00.00.20 [Empl]", "", 40.0),
            point("P01.00.00.25", "", 50.0),
        ];
        let all = SegmentFilter::all();
        let markers = poi_markers(&track, &Visibility::new(&all, false));
        assert_eq!(markers.len(), 5, "plain path points have no marker");
        assert_eq!(fill_of(&markers[0]), palette::POI_PRIMARY);
        assert_eq!(fill_of(&markers[1]), palette::POI_SECONDARY);
        assert_eq!(fill_of(&markers[2]), palette::POI_BOT);

        let DrawCommand::Polygon { points, .. } = &markers[3] else {
            panic!("base marker is a triangle");
        };
        assert_eq!(points[0], DVec2::new(30.0, 10.0 - palette::BASE_MARKER_SIZE));
        let DrawCommand::Polygon { points, .. } = &markers[4] else {
            panic!("emplacement marker is a triangle");
        };
        assert_eq!(points[0], DVec2::new(40.0, 10.0 + palette::EMPLACEMENT_MARKER_SIZE));
    }

    #[test]
    fn test_auxiliary_markers_need_option() {
        let track = vec![point("P01.00.00.00%@", "", 0.0), point("P01.00.00.05@", "", 5.0)];
        let all = SegmentFilter::all();
        assert!(poi_markers(&track, &Visibility::new(&all, false)).is_empty());
        let shown = poi_markers(&track, &Visibility::new(&all, true));
        assert_eq!(shown.len(), 1, "only %/$ auxiliary points get markers");
    }

    #[test]
    fn test_ticks_need_six_points() {
        let mut track = vec![point("P01.00.00.00", "", 0.0)];
        for i in 1..=5 {
            track.push(point(&format!("P01.00.0{i}.00"), "", f64::from(i)));
        }
        track.push(point("P01.00.10.00", "", 6.0));
        track.push(point("P01.00.11.00", "", 7.0));
        track.push(point("P01.00.20.00", "", 8.0));
        let ticks = tick_marks(&track, &SegmentFilter::all());
        assert_eq!(ticks.len(), 1, "the second bucket change comes too soon");
        let DrawCommand::Ellipse { centre, .. } = &ticks[0] else {
            panic!("ticks are discs");
        };
        assert_eq!(centre.x, 6.0);
    }

    #[test]
    fn test_ticks_skip_off_path_points() {
        let mut track = vec![point("P01.00.00.00", "", 0.0)];
        for i in 1..=5 {
            track.push(point(&format!("P01.00.0{i}.00$"), "", f64::from(i)));
        }
        track.push(point("P01.00.10.00", "", 6.0));
        assert!(tick_marks(&track, &SegmentFilter::all()).is_empty());
    }
}
