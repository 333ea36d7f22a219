//! Rotate/flip orientations applied to finished face charts.
//!
//! The same orientation is applied to a face's contour grid (index remap)
//! and to every waypoint projected onto that face (point transform about
//! the chart centre), so overlays stay registered with the terrain.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One of the eight axis-aligned rotate/flip combinations.
///
/// Rotations are clockwise in image space (`y` down). Flips mirror the
/// `x` axis after rotating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Identity.
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipX,
    Rotate90FlipX,
    Rotate180FlipX,
    Rotate270FlipX,
}

impl Orientation {
    /// All eight orientations.
    pub const ALL: [Orientation; 8] = [
        Orientation::None,
        Orientation::Rotate90,
        Orientation::Rotate180,
        Orientation::Rotate270,
        Orientation::FlipX,
        Orientation::Rotate90FlipX,
        Orientation::Rotate180FlipX,
        Orientation::Rotate270FlipX,
    ];

    /// Destination `(column, row)` of source cell `(column, row)` in a
    /// square grid of side `n`.
    #[inline]
    #[must_use]
    pub fn map_index(self, col: usize, row: usize, n: usize) -> (usize, usize) {
        let last = n - 1;
        match self {
            Orientation::None => (col, row),
            Orientation::Rotate90 => (last - row, col),
            Orientation::Rotate180 => (last - col, last - row),
            Orientation::Rotate270 => (row, last - col),
            Orientation::FlipX => (last - col, row),
            Orientation::Rotate90FlipX => (row, col),
            Orientation::Rotate180FlipX => (col, last - row),
            Orientation::Rotate270FlipX => (last - row, last - col),
        }
    }

    /// Transform a chart point given relative to the chart centre.
    #[inline]
    #[must_use]
    pub fn apply_point(self, p: DVec2) -> DVec2 {
        match self {
            Orientation::None => p,
            Orientation::Rotate90 => DVec2::new(-p.y, p.x),
            Orientation::Rotate180 => DVec2::new(-p.x, -p.y),
            Orientation::Rotate270 => DVec2::new(p.y, -p.x),
            Orientation::FlipX => DVec2::new(-p.x, p.y),
            Orientation::Rotate90FlipX => DVec2::new(p.y, p.x),
            Orientation::Rotate180FlipX => DVec2::new(p.x, -p.y),
            Orientation::Rotate270FlipX => DVec2::new(-p.y, -p.x),
        }
    }

    /// The orientation that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Orientation {
        match self {
            Orientation::Rotate90 => Orientation::Rotate270,
            Orientation::Rotate270 => Orientation::Rotate90,
            other => other,
        }
    }

    /// Whether this orientation swaps the grid's width and height.
    #[must_use]
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::Rotate90
                | Orientation::Rotate270
                | Orientation::Rotate90FlipX
                | Orientation::Rotate270FlipX
        )
    }
}

/// An orientation string that is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOrientationError(pub String);

impl fmt::Display for ParseOrientationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown orientation `{}`", self.0)
    }
}

impl std::error::Error for ParseOrientationError {}

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    /// Accepts `0`, `90`/`cw`, `180`, `270`/`ccw`, each optionally followed
    /// by `flip` (e.g. `cwflip`, `180-flip`), or a bare `flip`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (rotation, flip) = match lower.strip_suffix("flip") {
            Some(rest) => (rest.trim_end_matches(['-', '+', ' ']), true),
            None => (lower.as_str(), false),
        };
        let base = match rotation {
            "" | "0" | "none" => Orientation::None,
            "90" | "cw" => Orientation::Rotate90,
            "180" => Orientation::Rotate180,
            "270" | "ccw" => Orientation::Rotate270,
            _ => return Err(ParseOrientationError(s.to_string())),
        };
        if !flip {
            if rotation.is_empty() {
                return Err(ParseOrientationError(s.to_string()));
            }
            return Ok(base);
        }
        Ok(match base {
            Orientation::None => Orientation::FlipX,
            Orientation::Rotate90 => Orientation::Rotate90FlipX,
            Orientation::Rotate180 => Orientation::Rotate180FlipX,
            _ => Orientation::Rotate270FlipX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Centre of cell `(col, row)` relative to the centre of an `n` grid.
    fn centred(col: usize, row: usize, n: usize) -> DVec2 {
        let half = n as f64 * 0.5;
        DVec2::new(col as f64 + 0.5 - half, row as f64 + 0.5 - half)
    }

    #[test]
    fn test_index_map_is_a_permutation() {
        let n = 5;
        for o in Orientation::ALL {
            let mut seen = vec![false; n * n];
            for row in 0..n {
                for col in 0..n {
                    let (c, r) = o.map_index(col, row, n);
                    assert!(!seen[r * n + c], "{o:?} maps two cells to ({c}, {r})");
                    seen[r * n + c] = true;
                }
            }
        }
    }

    #[test]
    fn test_index_map_agrees_with_point_transform() {
        let n = 6;
        for o in Orientation::ALL {
            for row in 0..n {
                for col in 0..n {
                    let (c, r) = o.map_index(col, row, n);
                    let expected = o.apply_point(centred(col, row, n));
                    let got = centred(c, r, n);
                    assert!(
                        (expected - got).length() < 1e-12,
                        "{o:?}: ({col}, {row}) -> ({c}, {r}) but point went to {expected:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_inverse_undoes_orientation() {
        let n = 4;
        for o in Orientation::ALL {
            for row in 0..n {
                for col in 0..n {
                    let (c, r) = o.map_index(col, row, n);
                    assert_eq!(o.inverse().map_index(c, r, n), (col, row), "{o:?}");
                }
            }
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("cw".parse::<Orientation>(), Ok(Orientation::Rotate90));
        assert_eq!("CCW".parse::<Orientation>(), Ok(Orientation::Rotate270));
        assert_eq!("180".parse::<Orientation>(), Ok(Orientation::Rotate180));
        assert_eq!("0".parse::<Orientation>(), Ok(Orientation::None));
        assert_eq!("flip".parse::<Orientation>(), Ok(Orientation::FlipX));
        assert_eq!("cw-flip".parse::<Orientation>(), Ok(Orientation::Rotate90FlipX));
        assert!("sideways".parse::<Orientation>().is_err());
        assert!("".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_quarter_turns_swap_axes() {
        assert!(Orientation::Rotate90.swaps_axes());
        assert!(!Orientation::Rotate180.swaps_axes());
        assert!(!Orientation::FlipX.swaps_axes());
    }
}
