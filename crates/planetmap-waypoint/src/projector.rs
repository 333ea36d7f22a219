//! Projecting waypoint tracks onto every chart.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::DVec2;
use planetmap_cubesphere::{
    Chart, ChartFrame, CubeFace, MercatorProjection, PlanetFrame, project_to_face,
};

use crate::record::WaypointRecord;

/// A waypoint placed on one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedWaypoint {
    /// The source record, shared by every chart it lands on.
    pub record: Arc<WaypointRecord>,
    /// Chart the point was projected onto.
    pub chart: Chart,
    /// Chart coordinate relative to the chart centre.
    pub point: DVec2,
}

/// Per-chart tracks: one inner list per owner, in name order.
pub type ChartTracks = BTreeMap<Chart, Vec<Vec<ProjectedWaypoint>>>;

/// Projects planet waypoints onto the face charts and, optionally, the
/// Mercator sheet.
#[derive(Clone, Debug)]
pub struct WaypointProjector {
    frame: PlanetFrame,
    face_scale: f64,
    chart_frame: ChartFrame,
    mercator: Option<MercatorProjection>,
}

impl WaypointProjector {
    /// A projector for faces `face_size` pixels wide.
    #[must_use]
    pub fn new(frame: PlanetFrame, face_size: usize, rotate45: bool) -> Self {
        Self {
            frame,
            face_scale: face_size as f64 * 0.5,
            chart_frame: if rotate45 {
                ChartFrame::Rotated45
            } else {
                ChartFrame::Aligned
            },
            mercator: None,
        }
    }

    /// Also project onto a Mercator sheet.
    #[must_use]
    pub fn with_mercator(mut self, projection: MercatorProjection) -> Self {
        self.mercator = Some(projection);
        self
    }

    /// Charts this projector produces tracks for.
    pub fn charts(&self) -> impl Iterator<Item = Chart> + '_ {
        CubeFace::ALL
            .into_iter()
            .map(Chart::Face)
            .chain(self.mercator.map(|_| Chart::Mercator))
    }

    /// Project one record onto one chart.
    ///
    /// Returns `None` if the point is not on that face, or lies on the
    /// polar axis for the Mercator chart.
    #[must_use]
    pub fn project_record(&self, record: &WaypointRecord, chart: Chart) -> Option<DVec2> {
        let local = self.frame.to_local(record.position);
        match chart {
            Chart::Face(face) => project_to_face(local, face, self.face_scale, self.chart_frame),
            Chart::Mercator => self.mercator?.project(local),
        }
    }

    /// Project every track onto every chart, dropping points that fall
    /// off a chart. Track order and per-track point order are preserved.
    #[must_use]
    pub fn project(&self, tracks: &[Vec<Arc<WaypointRecord>>]) -> ChartTracks {
        self.charts()
            .map(|chart| {
                let projected: Vec<Vec<ProjectedWaypoint>> = tracks
                    .iter()
                    .map(|track| {
                        track
                            .iter()
                            .filter_map(|record| {
                                let point = self.project_record(record, chart);
                                if point.is_none() {
                                    tracing::trace!(name = %record.name, %chart, "waypoint off chart");
                                }
                                point.map(|point| ProjectedWaypoint {
                                    record: Arc::clone(record),
                                    chart,
                                    point,
                                })
                            })
                            .collect()
                    })
                    .collect();
                (chart, projected)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use planetmap_cubesphere::unproject_face;

    use crate::record::path_tracks;

    const EPSILON: f64 = 1e-9;

    fn at(name: &str, pos: DVec3) -> WaypointRecord {
        WaypointRecord::new("me", true, name, pos, "")
    }

    #[test]
    fn test_point_projects_onto_its_face() {
        let centre = DVec3::new(1000.0, 0.0, 0.0);
        let projector = WaypointProjector::new(PlanetFrame::new(centre, [0.0, 0.0, 0.0, 1.0]), 8, false);
        let dir = unproject_face(CubeFace::Front, 1.5, -2.5, 4.0, ChartFrame::Aligned);
        let tracks = path_tracks(vec![at("P01.00.00.00", centre + dir * 100.0)]);
        let charts = projector.project(&tracks);
        assert_eq!(charts.len(), 6);
        for (chart, lists) in &charts {
            assert_eq!(lists.len(), 1, "one list per owner on {chart}");
            match chart {
                Chart::Face(CubeFace::Front) => {
                    let p = lists[0][0].point;
                    assert!((p - DVec2::new(1.5, -2.5)).length() < EPSILON, "got {p:?}");
                    assert!(Arc::ptr_eq(&lists[0][0].record, &tracks[0][0]));
                }
                Chart::Face(CubeFace::Back) | Chart::Face(CubeFace::Left) | Chart::Face(CubeFace::Down) => {
                    assert!(lists[0].is_empty(), "{chart} faces away from the point");
                }
                _ => {
                    // Adjacent faces see the point folded past their edge.
                    let p = lists[0][0].point;
                    assert!(p.abs().max_element() > 4.0, "{chart} got {p:?}");
                }
            }
        }
    }

    #[test]
    fn test_mercator_chart_is_optional() {
        let projector = WaypointProjector::new(PlanetFrame::default(), 8, false)
            .with_mercator(MercatorProjection::from_degrees(-180.0, 180.0, false));
        let tracks = path_tracks(vec![
            at("P01.00.00.00", DVec3::new(0.0, 0.0, 50.0)),
            at("P01.00.00.10", DVec3::new(0.0, 50.0, 0.0)),
        ]);
        let charts = projector.project(&tracks);
        let sheet = &charts[&Chart::Mercator][0];
        assert_eq!(sheet.len(), 1, "the pole point is dropped");
        assert!(sheet[0].point.length() < EPSILON);
    }

    #[test]
    fn test_owners_stay_separate() {
        let projector = WaypointProjector::new(PlanetFrame::default(), 8, false);
        let tracks = path_tracks(vec![
            WaypointRecord::new("a", true, "P01.00.00.00", DVec3::new(0.0, 0.0, -10.0), ""),
            WaypointRecord::new("b", true, "P01.00.00.01", DVec3::new(0.0, 0.0, -10.0), ""),
        ]);
        let charts = projector.project(&tracks);
        let total: usize = charts.values().map(|lists| lists.len()).sum();
        assert_eq!(total, 12);
        let points: usize = charts.values().flatten().map(Vec::len).sum();
        assert_eq!(points, 2);
    }
}
