//! Cube-sphere chart geometry for planet maps.
//!
//! Maps planet-local 3D directions to and from the six cube-face charts
//! (optionally rotated 45° about the polar axis) and to a cylindrical
//! Mercator-style sheet. Also carries the rotate/flip orientations applied
//! to finished face images and the planet frame used to localise positions.

mod cube_face;
mod mercator;
mod orientation;
mod planet_frame;
mod projection;

pub use cube_face::{Chart, CubeFace, ParseChartError};
pub use mercator::{MercatorProjection, PIXELS_PER_DEGREE};
pub use orientation::{Orientation, ParseOrientationError};
pub use planet_frame::PlanetFrame;
pub use projection::{ChartFrame, MIN_FACE_DEPTH, project_to_cube, project_to_face, unproject_face};
