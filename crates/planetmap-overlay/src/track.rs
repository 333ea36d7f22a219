//! Tracks in image space and the visibility rules shared by every layer.

use std::sync::Arc;

use glam::DVec2;
use planetmap_cubesphere::Orientation;
use planetmap_waypoint::{ProjectedWaypoint, SegmentFilter, WaypointRecord};

/// A waypoint placed in chart image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackPoint {
    pub record: Arc<WaypointRecord>,
    pub pos: DVec2,
}

/// Orient a chart point given relative to the chart centre and move it to
/// image coordinates.
#[must_use]
pub fn image_point(point: DVec2, orientation: Orientation, width: u32, height: u32) -> DVec2 {
    orientation.apply_point(point) + DVec2::new(f64::from(width / 2), f64::from(height / 2))
}

/// [`image_point`] for a whole projected track.
#[must_use]
pub fn image_track(
    track: &[ProjectedWaypoint],
    orientation: Orientation,
    width: u32,
    height: u32,
) -> Vec<TrackPoint> {
    track
        .iter()
        .map(|w| TrackPoint {
            record: Arc::clone(&w.record),
            pos: image_point(w.point, orientation, width, height),
        })
        .collect()
}

/// Which waypoints a render pass shows.
#[derive(Clone, Copy, Debug)]
pub struct Visibility<'a> {
    pub segments: &'a SegmentFilter,
    /// Auxiliary tracks are shown everywhere. Only honoured without a
    /// segment filter.
    pub include_aux: bool,
}

impl<'a> Visibility<'a> {
    #[must_use]
    pub fn new(segments: &'a SegmentFilter, include_aux_tracks: bool) -> Self {
        Self {
            segments,
            include_aux: include_aux_tracks && !segments.is_active(),
        }
    }

    /// Whether a point belongs to the pass at all.
    #[must_use]
    pub fn admits(&self, record: &WaypointRecord) -> bool {
        self.segments.admits(record)
    }

    /// Whether an auxiliary point of this pass is shown.
    #[must_use]
    pub fn shows_auxiliary(&self, record: &WaypointRecord) -> bool {
        self.include_aux || self.segments.covers(record)
    }

    /// Whether a leg ending at `record` is drawn.
    #[must_use]
    pub fn draws_leg_to(&self, record: &WaypointRecord) -> bool {
        if record.directives.auxiliary {
            self.include_aux || self.segments.covers_start(record)
        } else {
            !self.segments.is_active() || self.segments.covers_start(record)
        }
    }

    /// Whether the record's label is drawn.
    #[must_use]
    pub fn shows_label(&self, record: &WaypointRecord) -> bool {
        if !record.has_label_text() {
            return false;
        }
        let unfiltered = !self.segments.is_active() && (self.include_aux || !record.directives.auxiliary);
        unfiltered || self.segments.covers(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use planetmap_cubesphere::Chart;
    use planetmap_cubesphere::CubeFace;

    fn record(name: &str, description: &str) -> WaypointRecord {
        WaypointRecord::new("me", true, name, DVec3::ZERO, description)
    }

    #[test]
    fn test_image_track_orients_about_centre() {
        let projected = vec![ProjectedWaypoint {
            record: Arc::new(record("P01.00.00.00", "")),
            chart: Chart::Face(CubeFace::Front),
            point: DVec2::new(10.0, 0.0),
        }];
        let track = image_track(&projected, Orientation::Rotate180, 64, 64);
        assert_eq!(track[0].pos, DVec2::new(22.0, 32.0));
    }

    #[test]
    fn test_aux_only_without_filter() {
        let filter = SegmentFilter::single("P02");
        let vis = Visibility::new(&filter, true);
        assert!(!vis.include_aux, "a segment filter overrides the aux option");
        let aux = record("P02.00.00.00@", "");
        assert!(vis.draws_leg_to(&aux));
        assert!(!vis.draws_leg_to(&record("P01.00.00.00@", "")));
    }

    #[test]
    fn test_labels_follow_filter() {
        let all = SegmentFilter::all();
        let vis = Visibility::new(&all, false);
        assert!(vis.shows_label(&record("P01.00.00.00", "^> Camp")));
        assert!(!vis.shows_label(&record("P01.00.00.00@", "^> Camp")));
        assert!(!vis.shows_label(&record("P01.00.00.00", "Current position")));
        assert!(!vis.shows_label(&record("P01.00.00.00", "   ")));

        let p2 = SegmentFilter::single("P02");
        let vis = Visibility::new(&p2, false);
        assert!(vis.shows_label(&record("P01.00.10.00-P02.00.00.00", "^> A / B")));
        assert!(!vis.shows_label(&record("P01.00.10.00", "^> A")));
    }
}
