//! Rendering directives carried in waypoint names and descriptions.
//!
//! Parsed once when a record is built so drawing code never rescans the
//! name string.

/// Description prefix marking a non-player (bot) waypoint.
pub const BOT_PREFIX: &str = "[Bot]";

/// Shape of a point-of-interest marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MarkerShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Upward triangle (`[Base]`).
    Triangle,
    /// Inverted triangle (`[Empl]`).
    InvertedTriangle,
}

/// Directive flags of one waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Directives {
    /// `%`: primary point of interest.
    pub poi_primary: bool,
    /// `$`: secondary point of interest, never part of a path.
    pub poi_secondary: bool,
    /// `@`: point on the auxiliary track.
    pub auxiliary: bool,
    /// `~`: close-proximity leg.
    pub proximity: bool,
    /// `>`: projectile track.
    pub projectile: bool,
    /// `^`: path reset; no line is drawn into this point.
    pub reset: bool,
    /// `=`: never part of a path.
    pub no_line: bool,
    /// Description begins with `[Bot]`.
    pub bot: bool,
    /// Marker shape from `[Base]`/`[Empl]` tags in the name.
    pub marker: MarkerShape,
}

impl Directives {
    /// Parse the directives of a waypoint.
    #[must_use]
    pub fn parse(name: &str, description: &str) -> Self {
        let marker = if name.contains("[Base]") {
            MarkerShape::Triangle
        } else if name.contains("[Empl]") {
            MarkerShape::InvertedTriangle
        } else {
            MarkerShape::Circle
        };
        Self {
            poi_primary: name.contains('%'),
            poi_secondary: name.contains('$'),
            auxiliary: name.contains('@'),
            proximity: name.contains('~'),
            projectile: name.contains('>'),
            reset: name.contains('^'),
            no_line: name.contains('='),
            bot: description.starts_with(BOT_PREFIX),
            marker,
        }
    }

    /// Whether the point takes part in path drawing at all.
    #[must_use]
    pub fn on_path(&self) -> bool {
        !self.poi_secondary && !self.no_line
    }

    /// Whether the point is drawn as a marker with the secondary colour.
    #[must_use]
    pub fn secondary_marker(&self) -> bool {
        self.poi_secondary || self.marker != MarkerShape::Circle
    }
}
