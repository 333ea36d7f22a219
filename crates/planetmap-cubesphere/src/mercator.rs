//! Cylindrical longitude sheet projection.
//!
//! The horizontal axis is longitude about the polar (Y) axis, centred on the
//! middle of the configured longitude range. The vertical axis is the
//! tangent ratio `y / horizontal_length` rather than a true Mercator
//! latitude, which keeps it consistent with the cube faces' perspective
//! divide and pushes the poles to infinity without a singular row.

use std::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};

/// Sheet pixels per degree of longitude, matching a 2048-pixel face
/// spanning 90°.
pub const PIXELS_PER_DEGREE: f64 = 2048.0 / 90.0;

/// A configured cylindrical projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorProjection {
    /// Western edge of the sheet in radians.
    pub min_lon: f64,
    /// Eastern edge of the sheet in radians.
    pub max_lon: f64,
    /// Pixels per unit of the vertical tangent ratio.
    pub lat_scale: f64,
    /// Pixels per radian of longitude.
    pub lon_scale: f64,
    /// Flip both axes so north is towards negative image `y`.
    pub north_is_negative_y: bool,
}

impl MercatorProjection {
    /// Build a projection from a longitude range in degrees, using the
    /// default face-matched scale for both axes.
    #[must_use]
    pub fn from_degrees(min_lon_deg: f64, max_lon_deg: f64, north_is_negative_y: bool) -> Self {
        let per_radian = PIXELS_PER_DEGREE * 180.0 / PI;
        Self {
            min_lon: min_lon_deg.to_radians(),
            max_lon: max_lon_deg.to_radians(),
            lat_scale: per_radian,
            lon_scale: per_radian,
            north_is_negative_y,
        }
    }

    /// Longitude at the horizontal centre of the sheet.
    #[must_use]
    pub fn centre_lon(&self) -> f64 {
        (self.min_lon + self.max_lon) * 0.5
    }

    /// Project a planet-local direction to sheet coordinates centred on the
    /// sheet middle. Returns `None` only for directions along the polar axis.
    #[must_use]
    pub fn project(&self, dir: DVec3) -> Option<DVec2> {
        let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
        if horizontal == 0.0 || !horizontal.is_finite() {
            return None;
        }
        let mut y = dir.y / horizontal;
        let mut lon = (-dir.x).atan2(dir.z) - self.centre_lon();
        if self.north_is_negative_y {
            lon = -lon;
            y = -y;
        }
        let lon = (lon + PI).rem_euclid(TAU) - PI;
        Some(DVec2::new(lon * self.lon_scale, y * self.lat_scale))
    }

    /// Inverse of [`MercatorProjection::project`]: a direction whose
    /// horizontal component has unit length.
    #[must_use]
    pub fn unproject(&self, p: DVec2) -> DVec3 {
        let mut lon = p.x / self.lon_scale;
        let mut y = p.y / self.lat_scale;
        if self.north_is_negative_y {
            lon = -lon;
            y = -y;
        }
        let lon = lon + self.centre_lon();
        DVec3::new(-lon.sin(), y, lon.cos())
    }

    /// Sheet size in pixels (without halo) covering the longitude range and
    /// latitudes up to `max_lat_deg` either side of the equator.
    #[must_use]
    pub fn sheet_size(&self, max_lat_deg: f64) -> (u32, u32) {
        let width = ((self.max_lon - self.min_lon) * self.lon_scale).round().max(1.0);
        let half = (max_lat_deg.clamp(0.0, 89.0).to_radians().tan() * self.lat_scale).ceil();
        (width as u32, (half * 2.0).max(1.0) as u32)
    }
}
