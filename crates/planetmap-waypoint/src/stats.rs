//! Travel statistics and the point-of-interest listing.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;

use crate::directive::BOT_PREFIX;
use crate::record::WaypointRecord;
use crate::segments::SegmentFilter;

/// Distances in metres accumulated over the player's track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TravelStats {
    /// Straight-line distance between consecutive points.
    pub travelled: f64,
    /// Distance with each leg flattened onto its mean radius.
    pub over_ground: f64,
    /// Total absolute radius change.
    pub elevation_change: f64,
    /// Distance of legs ending on a proximity (`~`) point.
    pub flying: f64,
}

impl fmt::Display for TravelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distance travelled: {:.2}km", self.travelled / 1000.0)?;
        writeln!(f, "Distance over ground: {:.2}km", self.over_ground / 1000.0)?;
        writeln!(f, "Elevation change: {:.2}km", self.elevation_change / 1000.0)?;
        writeln!(f, "Distance flying: {:.2}km", self.flying / 1000.0)
    }
}

/// Player path points admitted by `filter`, ordered by name.
fn player_points<'a>(
    tracks: &'a [Vec<Arc<WaypointRecord>>],
    filter: &SegmentFilter,
    keep: impl Fn(&WaypointRecord) -> bool,
) -> Vec<&'a WaypointRecord> {
    let mut points: Vec<&WaypointRecord> = tracks
        .iter()
        .flatten()
        .map(Arc::as_ref)
        .filter(|r| r.is_player && r.directives.on_path() && !r.directives.auxiliary)
        .filter(|r| keep(r) && filter.admits(r))
        .collect();
    points.sort_by(|a, b| a.name.cmp(&b.name));
    points.dedup_by(|a, b| a == b);
    points
}

fn over_ground(a: DVec3, b: DVec3) -> f64 {
    let (r1, r2) = (a.length(), b.length());
    if r1 == 0.0 || r2 == 0.0 {
        return a.distance(b);
    }
    let mean = (r1 + r2) * 0.5;
    (b * (mean / r2)).distance(a * (mean / r1))
}

/// Accumulate the travel statistics of every player track.
///
/// `centre` is the planet centre in world coordinates.
#[must_use]
pub fn travel_stats(tracks: &[Vec<Arc<WaypointRecord>>], filter: &SegmentFilter, centre: DVec3) -> TravelStats {
    let mut stats = TravelStats::default();

    let ground = player_points(tracks, filter, |r| !r.directives.proximity);
    for leg in ground.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        if to.directives.reset {
            continue;
        }
        let (a, b) = (from.position - centre, to.position - centre);
        stats.travelled += from.position.distance(to.position);
        stats.over_ground += over_ground(a, b);
        stats.elevation_change += (b.length() - a.length()).abs();
    }

    let flown = player_points(tracks, filter, |_| true);
    for leg in flown.windows(2) {
        if leg[1].directives.proximity {
            stats.flying += leg[0].position.distance(leg[1].position);
        }
    }
    stats
}

// --- POI listing ---

/// Waypoint name with trailing directive characters removed.
fn timestamp(name: &str) -> &str {
    name.trim_end_matches(['%', '=', '@', '$', '^'])
}

/// Split label text into sections on ` / ` or a `----` line.
#[must_use]
pub fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    loop {
        let next = [" / ", "\n----\n"]
            .iter()
            .filter_map(|sep| rest.find(sep).map(|at| (at, sep.len())))
            .min_by_key(|(at, _)| *at);
        match next {
            Some((at, len)) => {
                sections.push(&rest[..at]);
                rest = &rest[at + len..];
            }
            None => {
                sections.push(rest);
                return sections;
            }
        }
    }
}

/// One listing line for a waypoint, or `None` if it is not listed.
fn listing_line(name: &str, description: &str, filter: &SegmentFilter) -> Option<String> {
    if description.trim().is_empty() || description == "Current position" {
        return None;
    }
    let starts = filter.name_starts_in(name);
    let ends = filter.name_ends_in(name);
    if filter.is_active() && !starts && !ends {
        return None;
    }
    let hide_first = filter.is_active() && !starts;
    let hide_second = filter.is_active() && !ends;

    let text = description
        .strip_prefix(BOT_PREFIX)
        .map_or(description, str::trim_start);
    let (_, body) = text.split_once(' ')?;
    let mut sections: Vec<&str> = split_sections(body).into_iter().map(str::trim).collect();
    if hide_first && !hide_second && sections.len() > 1 {
        sections.remove(0);
    } else if hide_second && !hide_first {
        sections.truncate(1);
    }
    let joined = sections.join(" / ").replace('\n', " ").replace("  ", " ");
    Some(format!("[{}] {joined}", timestamp(name)))
}

/// The listing of labelled waypoints admitted by `filter`, one line each,
/// ordered by name.
#[must_use]
pub fn poi_listing(tracks: &[Vec<Arc<WaypointRecord>>], filter: &SegmentFilter) -> Vec<String> {
    let mut entries: Vec<(&str, &str)> = tracks
        .iter()
        .flatten()
        .map(|r| (r.name.as_str(), r.description.as_str()))
        .collect();
    entries.sort_unstable();
    entries.dedup();
    entries
        .into_iter()
        .filter_map(|(name, description)| listing_line(name, description, filter))
        .collect()
}
