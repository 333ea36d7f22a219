//! Waypoint overlays for planet charts.
//!
//! Turns projected waypoint tracks into draw commands: graticules, travel
//! paths, point-of-interest markers, ten-minute ticks and anchored labels.
//! [`ChartRenderer`] puts them together for one chart in a fixed drawing
//! order and reports the bounds of what it drew.

mod chart;
mod graticule;
mod label;
mod markers;
pub mod palette;
mod path;
mod track;

pub use chart::{ChartLayers, ChartRenderer, OverlayOptions};
pub use graticule::graticule;
pub use label::{LabelPlacer, PlacedLabel, is_anchor_directive};
pub use markers::{poi_markers, tick_marks};
pub use path::{Leg, control_point, extend_controls, track_legs};
pub use track::{TrackPoint, Visibility, image_point, image_track};
