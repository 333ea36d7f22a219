//! The six cube-face charts, the Mercator chart, and their basis vectors.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The six faces of the cube that forms the planet map.
///
/// Faces are named from the point of view of a map reader: `Up` is the
/// +Y pole, `Left` the +X side, `Back` the +Z side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face
    Up = 0,
    /// −Y face
    Down = 1,
    /// +X face
    Left = 2,
    /// −X face
    Right = 3,
    /// −Z face
    Front = 4,
    /// +Z face
    Back = 5,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Up,
        CubeFace::Down,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Front,
        CubeFace::Back,
    ];

    /// Index into [`CubeFace::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite face (e.g., `Up` → `Down`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::Up => CubeFace::Down,
            CubeFace::Down => CubeFace::Up,
            CubeFace::Left => CubeFace::Right,
            CubeFace::Right => CubeFace::Left,
            CubeFace::Front => CubeFace::Back,
            CubeFace::Back => CubeFace::Front,
        }
    }

    /// Whether this face is centred on a pole.
    #[must_use]
    pub fn is_polar(self) -> bool {
        matches!(self, CubeFace::Up | CubeFace::Down)
    }

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::Up => DVec3::Y,
            CubeFace::Down => DVec3::NEG_Y,
            CubeFace::Left => DVec3::X,
            CubeFace::Right => DVec3::NEG_X,
            CubeFace::Front => DVec3::NEG_Z,
            CubeFace::Back => DVec3::Z,
        }
    }

    /// Direction of increasing chart `x` (image columns) on this face.
    #[must_use]
    pub fn tangent(self) -> DVec3 {
        match self {
            CubeFace::Up => DVec3::NEG_X,
            CubeFace::Down => DVec3::X,
            CubeFace::Left => DVec3::NEG_Z,
            CubeFace::Right => DVec3::Z,
            CubeFace::Front => DVec3::NEG_X,
            CubeFace::Back => DVec3::X,
        }
    }

    /// Direction of increasing chart `y` (image rows) on this face.
    #[must_use]
    pub fn bitangent(self) -> DVec3 {
        match self {
            CubeFace::Up | CubeFace::Down => DVec3::NEG_Z,
            _ => DVec3::NEG_Y,
        }
    }

    /// The file-stem name used for this face's rasters and outputs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CubeFace::Up => "Up",
            CubeFace::Down => "Down",
            CubeFace::Left => "Left",
            CubeFace::Right => "Right",
            CubeFace::Front => "Front",
            CubeFace::Back => "Back",
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 2D coordinate chart that waypoints and terrain can be drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chart {
    /// One of the six cube faces.
    Face(CubeFace),
    /// The cylindrical longitude/latitude sheet.
    Mercator,
}

impl Chart {
    /// The six face charts followed by the Mercator chart.
    pub const ALL: [Chart; 7] = [
        Chart::Face(CubeFace::Up),
        Chart::Face(CubeFace::Down),
        Chart::Face(CubeFace::Left),
        Chart::Face(CubeFace::Right),
        Chart::Face(CubeFace::Front),
        Chart::Face(CubeFace::Back),
        Chart::Mercator,
    ];

    /// The cube face, if this chart is one.
    #[must_use]
    pub fn face(self) -> Option<CubeFace> {
        match self {
            Chart::Face(face) => Some(face),
            Chart::Mercator => None,
        }
    }

    /// The file-stem name used for this chart's outputs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Chart::Face(face) => face.name(),
            Chart::Mercator => "Mercator",
        }
    }
}

impl From<CubeFace> for Chart {
    fn from(face: CubeFace) -> Self {
        Chart::Face(face)
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chart name that is not one of the six faces or `Mercator`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseChartError(pub String);

impl fmt::Display for ParseChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chart name `{}`", self.0)
    }
}

impl std::error::Error for ParseChartError {}

impl FromStr for CubeFace {
    type Err = ParseChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CubeFace::ALL
            .into_iter()
            .find(|face| face.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseChartError(s.to_string()))
    }
}

impl FromStr for Chart {
    type Err = ParseChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mercator") {
            return Ok(Chart::Mercator);
        }
        s.parse::<CubeFace>().map(Chart::Face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_are_unit_length() {
        for face in CubeFace::ALL {
            let n = face.normal();
            assert!(
                (n.length() - 1.0).abs() < 1e-12,
                "Normal for {face:?} is not unit length: {}",
                n.length()
            );
        }
    }

    #[test]
    fn test_opposite_face_normals_are_antiparallel() {
        for face in CubeFace::ALL {
            let n = face.normal();
            let opp_n = face.opposite().normal();
            assert!(
                (n + opp_n).length() < 1e-12,
                "Normals for {face:?} and {:?} are not antiparallel",
                face.opposite()
            );
        }
    }

    #[test]
    fn test_basis_is_orthonormal() {
        for face in CubeFace::ALL {
            let t = face.tangent();
            let b = face.bitangent();
            let n = face.normal();
            assert!(t.dot(n).abs() < 1e-12, "Tangent not perpendicular for {face:?}");
            assert!(b.dot(n).abs() < 1e-12, "Bitangent not perpendicular for {face:?}");
            assert!(t.dot(b).abs() < 1e-12, "Tangent/bitangent not perpendicular for {face:?}");
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, face) in CubeFace::ALL.into_iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_parse_names_case_insensitively() {
        assert_eq!("front".parse::<CubeFace>(), Ok(CubeFace::Front));
        assert_eq!(" UP ".parse::<Chart>(), Ok(Chart::Face(CubeFace::Up)));
        assert_eq!("Mercator".parse::<Chart>(), Ok(Chart::Mercator));
        assert!("sideways".parse::<Chart>().is_err());
    }

    #[test]
    fn test_only_up_and_down_are_polar() {
        let polar: Vec<_> = CubeFace::ALL.into_iter().filter(|f| f.is_polar()).collect();
        assert_eq!(polar, vec![CubeFace::Up, CubeFace::Down]);
    }
}
