//! Travel paths: legs between consecutive waypoints, smoothed into cubic
//! Béziers.
//!
//! Each owner's track is walked in name order. Legs into auxiliary (`@`)
//! points start from the last auxiliary position and form their own
//! chain; every other leg starts from the last main position. Reset
//! points (`^`) move the pen without a leg, and `$`/`=` points are not on
//! the path at all.

use glam::DVec2;
use planetmap_draw::{DrawCommand, Stroke};
use planetmap_waypoint::{SegmentStamp, WaypointRecord};

use crate::palette;
use crate::track::{TrackPoint, Visibility};

/// Chords shorter than this keep the endpoint as the control point.
const MIN_CHORD: f64 = 0.2;

/// One leg of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leg {
    /// False for legs filtered out or wrapping across the chart.
    pub visible: bool,
    /// False only for legs filtered out. Wrapping legs still bound the chart.
    pub bounded: bool,
    pub stroke: Stroke,
    pub start: DVec2,
    pub ctrl1: DVec2,
    pub ctrl2: DVec2,
    pub end: DVec2,
}

impl Leg {
    /// The draw command for the leg. Legs whose control geometry collapses
    /// are drawn straight.
    #[must_use]
    pub fn command(&self) -> DrawCommand {
        let collapsed = |a: DVec2, b: DVec2| a.distance_squared(b) < 1.0;
        if collapsed(self.start, self.end) || collapsed(self.start, self.ctrl1) || collapsed(self.end, self.ctrl2) {
            DrawCommand::Line {
                from: self.start,
                to: self.end,
                stroke: self.stroke,
            }
        } else {
            DrawCommand::Bezier {
                start: self.start,
                ctrl1: self.ctrl1,
                ctrl2: self.ctrl2,
                end: self.end,
                stroke: self.stroke,
            }
        }
    }
}

/// Pen for a leg ending at `record`. `time` is the stamp of the last main
/// point, which alternates plain travel pens by minute.
fn pen_for(record: &WaypointRecord, time: Option<&SegmentStamp>) -> Stroke {
    let d = &record.directives;
    if d.projectile {
        palette::PROJECTILE
    } else if !record.is_player {
        palette::BOT
    } else if d.auxiliary {
        palette::AUXILIARY
    } else if d.proximity {
        palette::PROXIMITY
    } else if time.map_or(0, SegmentStamp::minute_of_hour) % 2 == 0 {
        palette::TRAVEL_EVEN
    } else {
        palette::TRAVEL
    }
}

/// Control point at `point` for the curve heading towards `fwd`, given the
/// previous point `rev`.
#[must_use]
pub fn control_point(rev: DVec2, point: DVec2, fwd: DVec2) -> DVec2 {
    let back = point - rev;
    let ahead = point - fwd;
    let (d1, d2) = (back.length(), ahead.length());
    if d1 < MIN_CHORD || d2 < MIN_CHORD {
        return point;
    }
    let dm = d1.min(d2);
    point + (back * (dm / d1) - ahead * (dm / d2)) / 4.0
}

/// Fill in control points that collapsed onto their endpoint so path ends
/// curve into the neighbouring leg instead of kinking.
#[must_use]
pub fn extend_controls(start: DVec2, ctrl1: DVec2, ctrl2: DVec2, end: DVec2) -> (DVec2, DVec2) {
    match (ctrl1 == start, ctrl2 == end) {
        (true, true) => ((start * 3.0 + end) / 4.0, (end * 3.0 + start) / 4.0),
        (true, false) => {
            let reflected = ctrl2 * 2.0 - end;
            ((start * 3.0 + reflected) / 4.0, ctrl2)
        }
        (false, true) => {
            let reflected = ctrl1 * 2.0 - start;
            (ctrl1, (end * 3.0 + reflected) / 4.0)
        }
        (false, false) => (ctrl1, ctrl2),
    }
}

#[derive(Clone, Copy)]
struct Chord {
    visible: bool,
    bounded: bool,
    stroke: Stroke,
    start: DVec2,
    end: DVec2,
}

fn smooth(chords: &[Chord]) -> impl Iterator<Item = Leg> + '_ {
    chords.iter().enumerate().map(move |(i, c)| {
        let prev = if i == 0 { c } else { &chords[i - 1] };
        let next = chords.get(i + 1).unwrap_or(c);
        let ctrl1 = if prev.end == c.start {
            control_point(prev.start, c.start, c.end)
        } else {
            c.start
        };
        let ctrl2 = if next.start == c.end {
            control_point(next.end, c.end, c.start)
        } else {
            c.end
        };
        let (ctrl1, ctrl2) = extend_controls(c.start, ctrl1, ctrl2, c.end);
        Leg {
            visible: c.visible,
            bounded: c.bounded,
            stroke: c.stroke,
            start: c.start,
            ctrl1,
            ctrl2,
            end: c.end,
        }
    })
}

/// Smoothed legs of one track on a `size` chart, auxiliary legs first.
#[must_use]
pub fn track_legs(track: &[TrackPoint], visibility: &Visibility, size: DVec2) -> Vec<Leg> {
    let Some((first, rest)) = track.split_first() else {
        return Vec::new();
    };
    let mut point = first.pos;
    let mut aux_point = first.pos;
    let mut time = first.record.latest_stamp();
    let mut main = Vec::new();
    let mut aux = Vec::new();

    for p in rest {
        let record = &*p.record;
        let d = &record.directives;
        if !d.on_path() {
            continue;
        }
        let stroke = pen_for(record, time);
        if !d.reset {
            let from = if d.auxiliary { aux_point } else { point };
            let delta = (p.pos - from).abs();
            let bounded = visibility.draws_leg_to(record);
            let chord = Chord {
                visible: delta.x < size.x && delta.y < size.y && bounded,
                bounded,
                stroke,
                start: from,
                end: p.pos,
            };
            if d.auxiliary {
                aux.push(chord);
            } else {
                main.push(chord);
            }
        }
        if d.auxiliary {
            aux_point = p.pos;
        } else {
            point = p.pos;
            aux_point = p.pos;
            time = record.latest_stamp();
        }
    }

    smooth(&aux).chain(smooth(&main)).collect()
}
