//! Waypoint records, their rendering directives, and chart projection.
//!
//! Waypoints arrive as a JSON document of per-owner records. Path
//! waypoints carry a segment stamp in their name; they are grouped into
//! per-owner tracks ordered by name and projected onto each cube face and
//! the Mercator sheet. Also provides segment filters for per-segment render
//! passes, travel statistics, and the point-of-interest listing.

mod directive;
mod error;
mod name;
mod projector;
mod record;
mod segments;
mod stats;

pub use directive::{BOT_PREFIX, Directives, MarkerShape};
pub use error::WaypointError;
pub use name::{SegmentName, SegmentStamp, parse_segment_name};
pub use projector::{ChartTracks, ProjectedWaypoint, WaypointProjector};
pub use record::{
    PlanetPlacement, RawWaypoint, WaypointDocument, WaypointRecord, latest_player_waypoint,
    path_tracks,
};
pub use segments::{SegmentFilter, segment_filters};
pub use stats::{TravelStats, poi_listing, split_sections, travel_stats};
