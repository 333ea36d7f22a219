//! Waypoint records and the JSON document they are read from.

use std::path::Path;
use std::sync::Arc;

use glam::DVec3;
use planetmap_cubesphere::PlanetFrame;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::directive::Directives;
use crate::error::WaypointError;
use crate::name::{SegmentName, SegmentStamp, parse_segment_name};

/// One recorded waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointRecord {
    /// Identity that owns the waypoint.
    pub owner: String,
    /// Whether the owner is a player character.
    pub is_player: bool,
    /// Display name, carrying the segment stamp and directive characters.
    pub name: String,
    /// World position.
    pub position: DVec3,
    /// Free-text description, carrying the label directive.
    pub description: String,
    /// Whether the waypoint is shown on the in-game HUD.
    pub show_on_hud: bool,
    /// Parsed segment stamps, for path waypoints.
    pub segment: Option<SegmentName>,
    /// Parsed rendering directives.
    pub directives: Directives,
}

impl WaypointRecord {
    /// Build a record, parsing its name and description.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        is_player: bool,
        name: impl Into<String>,
        position: DVec3,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let description = description.into();
        Self {
            owner: owner.into(),
            is_player,
            segment: parse_segment_name(&name),
            directives: Directives::parse(&name, &description),
            name,
            position,
            description,
            show_on_hud: true,
        }
    }

    /// Segment the waypoint belongs to.
    #[must_use]
    pub fn start_part(&self) -> Option<&str> {
        self.segment.as_ref().map(|s| s.start.segment.as_str())
    }

    /// Segment the waypoint opens, for junction points.
    #[must_use]
    pub fn end_part(&self) -> Option<&str> {
        self.segment
            .as_ref()
            .and_then(|s| s.end.as_ref())
            .map(|e| e.segment.as_str())
    }

    /// Start stamp, if the name is structured.
    #[must_use]
    pub fn start(&self) -> Option<&SegmentStamp> {
        self.segment.as_ref().map(|s| &s.start)
    }

    /// The end stamp if present, else the start stamp.
    #[must_use]
    pub fn latest_stamp(&self) -> Option<&SegmentStamp> {
        let segment = self.segment.as_ref()?;
        Some(segment.end.as_ref().unwrap_or(&segment.start))
    }

    /// Whether the name carries a segment stamp.
    #[must_use]
    pub fn is_path_point(&self) -> bool {
        self.segment.is_some()
    }

    /// Whether the label text is worth drawing or listing.
    #[must_use]
    pub fn has_label_text(&self) -> bool {
        !self.description.trim().is_empty() && self.description != "Current position"
    }
}

// --- Document ---

/// Planet placement as stored in the waypoint document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetPlacement {
    /// Planet centre in world coordinates.
    pub centre: [f64; 3],
    /// Planet orientation quaternion as `(x, y, z, w)`.
    pub rotation: [f64; 4],
}

impl PlanetPlacement {
    /// The planet frame described by this placement.
    #[must_use]
    pub fn frame(&self) -> PlanetFrame {
        PlanetFrame::new(DVec3::from_array(self.centre), self.rotation)
    }
}

/// A waypoint as stored in the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWaypoint {
    /// Owning identity.
    pub owner: String,
    /// Whether the owner is a player character.
    #[serde(default = "default_true")]
    pub player: bool,
    /// Display name.
    pub name: String,
    /// World position.
    pub position: [f64; 3],
    /// Description text.
    #[serde(default)]
    pub description: String,
    /// HUD visibility.
    #[serde(default = "default_true")]
    pub show_on_hud: bool,
}

fn default_true() -> bool {
    true
}

impl From<RawWaypoint> for WaypointRecord {
    fn from(raw: RawWaypoint) -> Self {
        let mut record = WaypointRecord::new(
            raw.owner,
            raw.player,
            raw.name,
            DVec3::from_array(raw.position),
            raw.description,
        );
        record.show_on_hud = raw.show_on_hud;
        record
    }
}

/// The parsed contents of a waypoint document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointDocument {
    /// Placement of the mapped planet.
    pub planet: PlanetPlacement,
    /// Every waypoint of every owner.
    pub waypoints: Vec<RawWaypoint>,
}

impl WaypointDocument {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, WaypointError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self, WaypointError> {
        let text = std::fs::read_to_string(path)?;
        let doc = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            waypoints = doc.waypoints.len(),
            "loaded waypoint document"
        );
        Ok(doc)
    }

    /// Convert every raw waypoint into a record.
    #[must_use]
    pub fn records(&self) -> Vec<WaypointRecord> {
        self.waypoints.iter().cloned().map(WaypointRecord::from).collect()
    }
}

// --- Tracks ---

/// Group path waypoints into per-owner tracks ordered by name.
///
/// Records whose names carry no segment stamp are dropped. Owners keep the
/// order in which they first appear.
#[must_use]
pub fn path_tracks(records: Vec<WaypointRecord>) -> Vec<Vec<Arc<WaypointRecord>>> {
    let mut slots: FxHashMap<String, usize> = FxHashMap::default();
    let mut tracks: Vec<Vec<Arc<WaypointRecord>>> = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        if !record.is_path_point() {
            tracing::debug!(name = %record.name, "skipping waypoint without segment stamp");
            skipped += 1;
            continue;
        }
        let slot = *slots.entry(record.owner.clone()).or_insert_with(|| {
            tracks.push(Vec::new());
            tracks.len() - 1
        });
        tracks[slot].push(Arc::new(record));
    }
    for track in &mut tracks {
        track.sort_by(|a, b| a.name.cmp(&b.name));
    }
    tracing::debug!(owners = tracks.len(), skipped, "grouped waypoint tracks");
    tracks
}

/// Name of the newest waypoint on any track owned by a player.
#[must_use]
pub fn latest_player_waypoint(tracks: &[Vec<Arc<WaypointRecord>>]) -> Option<&str> {
    tracks
        .iter()
        .filter(|track| track.iter().any(|r| r.is_player))
        .filter_map(|track| track.last())
        .map(|r| r.name.as_str())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, name: &str) -> WaypointRecord {
        WaypointRecord::new(owner, true, name, DVec3::ZERO, "")
    }

    #[test]
    fn test_tracks_group_by_owner_and_sort() {
        let tracks = path_tracks(vec![
            record("b", "P01.00.00.10"),
            record("a", "P01.00.00.05"),
            record("b", "P01.00.00.00"),
            record("a", "Home"),
        ]);
        assert_eq!(tracks.len(), 2);
        let names: Vec<&str> = tracks[0].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["P01.00.00.00", "P01.00.00.10"]);
        assert_eq!(tracks[1].len(), 1);
    }

    #[test]
    fn test_latest_player_waypoint_ignores_bot_tracks() {
        let mut bot = record("bot", "P09.00.00.00");
        bot.is_player = false;
        let tracks = path_tracks(vec![
            record("a", "P01.00.00.00"),
            record("b", "P02.00.00.00"),
            bot,
        ]);
        assert_eq!(latest_player_waypoint(&tracks), Some("P02.00.00.00"));
    }

    #[test]
    fn test_document_from_json() {
        let doc = WaypointDocument::from_json(
            r#"{
                "planet": { "centre": [1.0, 2.0, 3.0], "rotation": [0.0, 0.0, 0.0, 1.0] },
                "waypoints": [
                    { "owner": "me", "name": "P01.00.00.00%", "position": [4.0, 5.0, 6.0],
                      "description": "^> Crash site" }
                ]
            }"#,
        )
        .unwrap();
        let records = doc.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_player && records[0].show_on_hud);
        assert!(records[0].directives.poi_primary);
        assert_eq!(records[0].start_part(), Some("P01"));
        let local = doc.planet.frame().to_local(records[0].position);
        assert!((local - DVec3::splat(3.0)).length() < 1e-12);
    }

    #[test]
    fn test_document_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypoints.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(WaypointDocument::load(&path), Err(WaypointError::Parse(_))));
        assert!(matches!(
            WaypointDocument::load(&dir.path().join("missing.json")),
            Err(WaypointError::Io(_))
        ));
    }

    #[test]
    fn test_label_text_filter() {
        let mut r = record("a", "P01.00.00.00");
        assert!(!r.has_label_text());
        r.description = "Current position".into();
        assert!(!r.has_label_text());
        r.description = "^> Hill".into();
        assert!(r.has_label_text());
    }
}
