//! Segment filters: which path segments a render pass covers.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::record::WaypointRecord;

/// A named set of segment identifiers. An empty set covers everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentFilter {
    /// Output name of the pass; empty for the unfiltered pass.
    pub name: String,
    /// Segment identifiers the pass covers.
    pub prefixes: Vec<String>,
}

impl SegmentFilter {
    /// The unfiltered pass.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A pass covering exactly one segment.
    #[must_use]
    pub fn single(segment: &str) -> Self {
        Self {
            name: segment.to_string(),
            prefixes: vec![segment.to_string()],
        }
    }

    /// Whether any segment restriction applies.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.prefixes.is_empty()
    }

    /// Whether the record's start segment is covered.
    #[must_use]
    pub fn covers_start(&self, record: &WaypointRecord) -> bool {
        record
            .start_part()
            .is_some_and(|s| self.prefixes.iter().any(|p| p == s))
    }

    /// Whether the record's end segment is covered.
    #[must_use]
    pub fn covers_end(&self, record: &WaypointRecord) -> bool {
        record
            .end_part()
            .is_some_and(|s| self.prefixes.iter().any(|p| p == s))
    }

    /// Whether either of the record's segments is covered.
    #[must_use]
    pub fn covers(&self, record: &WaypointRecord) -> bool {
        self.covers_start(record) || self.covers_end(record)
    }

    /// `covers`, or true when the filter is inactive.
    #[must_use]
    pub fn admits(&self, record: &WaypointRecord) -> bool {
        !self.is_active() || self.covers(record)
    }

    /// Whether a waypoint name starts with a covered segment.
    #[must_use]
    pub fn name_starts_in(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Whether a waypoint name opens a covered segment.
    #[must_use]
    pub fn name_ends_in(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.contains(&format!("-{p}")))
    }

    /// Which label sections to hide for a record: `(first, second)`.
    ///
    /// With an active filter, the inbound section is hidden when the
    /// record's start segment is not covered and the outbound one when its
    /// end segment is not covered.
    #[must_use]
    pub fn hidden_sections(&self, record: &WaypointRecord) -> (bool, bool) {
        if !self.is_active() {
            return (false, false);
        }
        (!self.covers_start(record), !self.covers_end(record))
    }
}

/// Parse a chapter name `Pab-cd` into its inclusive segment bounds.
fn chapter_bounds(chapter: &str) -> Option<(String, String)> {
    fn code(s: &str) -> Option<usize> {
        let b = s.as_bytes();
        if b.len() < 2 || !b[0].is_ascii_digit() || !b[1].is_ascii_digit() {
            return None;
        }
        let extra = s[2..]
            .chars()
            .next()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .map_or(0, char::len_utf8);
        Some(2 + extra)
    }
    let start = chapter.find('P')?;
    let rest = &chapter[start + 1..];
    let first = code(rest)?;
    let after = rest[first..].strip_prefix('-')?;
    let second = code(after)?;
    Some((format!("P{}", &rest[..first]), format!("P{}", &after[..second])))
}

/// Every filter to render: the unfiltered pass, one per segment seen in
/// the tracks, and one per recognised chapter name.
#[must_use]
pub fn segment_filters(tracks: &[Vec<Arc<WaypointRecord>>], chapters: &[String]) -> Vec<SegmentFilter> {
    let segments: BTreeSet<&str> = tracks
        .iter()
        .flatten()
        .flat_map(|r| [r.start_part(), r.end_part()])
        .flatten()
        .collect();

    let mut filters = vec![SegmentFilter::all()];
    filters.extend(segments.iter().map(|s| SegmentFilter::single(s)));
    for chapter in chapters {
        let Some((lo, hi)) = chapter_bounds(chapter) else {
            tracing::warn!(chapter = %chapter, "ignoring malformed chapter name");
            continue;
        };
        filters.push(SegmentFilter {
            name: chapter.clone(),
            prefixes: segments
                .iter()
                .filter(|s| **s >= lo.as_str() && **s <= hi.as_str())
                .map(|s| s.to_string())
                .collect(),
        });
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::path_tracks;
    use glam::DVec3;

    fn rec(name: &str) -> WaypointRecord {
        WaypointRecord::new("me", true, name, DVec3::ONE, "")
    }

    #[test]
    fn test_inactive_filter_admits_everything() {
        let filter = SegmentFilter::all();
        assert!(filter.admits(&rec("P01.00.00.00")));
        assert_eq!(filter.hidden_sections(&rec("P01.00.00.00-P02.00.00.00")), (false, false));
    }

    #[test]
    fn test_junction_covered_by_either_segment() {
        let junction = rec("P01.00.10.00-P02.00.00.00");
        let first = SegmentFilter::single("P01");
        let second = SegmentFilter::single("P02");
        assert!(first.covers(&junction) && second.covers(&junction));
        assert_eq!(first.hidden_sections(&junction), (false, true));
        assert_eq!(second.hidden_sections(&junction), (true, false));
        assert!(!SegmentFilter::single("P03").admits(&junction));
    }

    #[test]
    fn test_name_matching() {
        let filter = SegmentFilter::single("P02");
        assert!(filter.name_starts_in("P02.00.00.00"));
        assert!(filter.name_ends_in("P01.00.10.00-P02.00.00.00"));
        assert!(!filter.name_starts_in("P01.00.10.00-P02.00.00.00"));
    }

    #[test]
    fn test_filters_include_segments_and_chapters() {
        let tracks = path_tracks(vec![
            rec("P01.00.00.00"),
            rec("P01.00.10.00-P02.00.00.00"),
            rec("P03a.00.00.00"),
            rec("P04.00.00.00"),
        ]);
        let filters = segment_filters(&tracks, &["P02-03a".to_string(), "nonsense".to_string()]);
        let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["", "P01", "P02", "P03a", "P04", "P02-03a"]);
        assert_eq!(filters[5].prefixes, ["P02", "P03a"]);
    }
}
