//! World-to-planet-local transform.

use glam::{DQuat, DVec3};

/// Position and orientation of a planet in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetFrame {
    /// Planet centre in world coordinates.
    pub centre: DVec3,
    /// Rotation taking world offsets into the planet's local axes.
    pub rotation: DQuat,
}

impl Default for PlanetFrame {
    fn default() -> Self {
        Self {
            centre: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }
}

impl PlanetFrame {
    /// Build a frame from a centre and a quaternion stored as `(x, y, z, w)`.
    ///
    /// A zero or non-finite quaternion is treated as the identity.
    #[must_use]
    pub fn new(centre: DVec3, rotation_xyzw: [f64; 4]) -> Self {
        let [x, y, z, w] = rotation_xyzw;
        let q = DQuat::from_xyzw(x, y, z, w);
        let rotation = if q.length_squared() > 0.0 && q.is_finite() {
            q.normalize()
        } else {
            DQuat::IDENTITY
        };
        Self { centre, rotation }
    }

    /// Offset of a world position from the planet centre, in planet axes.
    #[inline]
    #[must_use]
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.rotation * (world - self.centre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_frame_only_translates() {
        let frame = PlanetFrame::new(DVec3::new(10.0, 20.0, 30.0), [0.0, 0.0, 0.0, 1.0]);
        let local = frame.to_local(DVec3::new(11.0, 20.0, 30.0));
        assert!((local - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let half = std::f64::consts::FRAC_PI_4;
        let frame = PlanetFrame::new(DVec3::ZERO, [0.0, half.sin(), 0.0, half.cos()]);
        let local = frame.to_local(DVec3::X);
        assert!((local - DVec3::NEG_Z).length() < 1e-12, "got {local:?}");
    }

    #[test]
    fn test_degenerate_quaternion_is_identity() {
        let frame = PlanetFrame::new(DVec3::ZERO, [0.0; 4]);
        assert_eq!(frame.rotation, DQuat::IDENTITY);
    }
}
