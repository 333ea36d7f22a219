//! Arrangement of face images in the mosaic.
//!
//! Written as rows separated by `,` and cells separated by `:`, e.g.
//! `":Down::,Back:Right:Front:Left,:Up::"`. Empty cells and `None` leave
//! the slot blank.

use std::fmt;
use std::str::FromStr;

use planetmap_cubesphere::CubeFace;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// A tile layout string that names something other than a cube face.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid tile layout cell `{cell}` in `{layout}`")]
pub struct LayoutError {
    /// The offending cell.
    pub cell: String,
    /// The whole layout string.
    pub layout: String,
}

// ---------------------------------------------------------------------------
// TileLayout
// ---------------------------------------------------------------------------

/// Grid of face slots, row-major, each face tile the same size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TileLayout {
    rows: Vec<Vec<Option<CubeFace>>>,
}

impl Default for TileLayout {
    /// The unfolded cube: Down above Right, the four equatorial faces in a
    /// row, Up below Right.
    fn default() -> Self {
        use CubeFace::*;
        Self::new(vec![
            vec![None, Some(Down), None, None],
            vec![Some(Back), Some(Right), Some(Front), Some(Left)],
            vec![None, Some(Up), None, None],
        ])
    }
}

impl TileLayout {
    #[must_use]
    pub fn new(rows: Vec<Vec<Option<CubeFace>>>) -> Self {
        Self { rows }
    }

    /// Widest row.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Every placed face as `(column, row, face)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CubeFace)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().filter_map(move |(x, cell)| cell.map(|f| (x, y, f))))
    }

    /// Slot of `face`, if placed.
    #[must_use]
    pub fn position(&self, face: CubeFace) -> Option<(usize, usize)> {
        self.cells().find(|&(_, _, f)| f == face).map(|(x, y, _)| (x, y))
    }
}

impl FromStr for TileLayout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(',')
            .map(|row| {
                row.split(':')
                    .map(|cell| match cell.trim() {
                        "" => Ok(None),
                        c if c.eq_ignore_ascii_case("none") => Ok(None),
                        c => c.parse::<CubeFace>().map(Some).map_err(|_| LayoutError {
                            cell: c.to_owned(),
                            layout: s.to_owned(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rows))
    }
}

impl fmt::Display for TileLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                f.write_str(",")?;
            }
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(":")?;
                }
                if let Some(face) = cell {
                    f.write_str(face.name())?;
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for TileLayout {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TileLayout> for String {
    fn from(layout: TileLayout) -> Self {
        layout.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_and_blank_cells() {
        let layout: TileLayout = "Up:Down,None::Front".parse().expect("valid layout");
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.columns(), 3);
        let cells: Vec<_> = layout.cells().collect();
        assert_eq!(
            cells,
            vec![(0, 0, CubeFace::Up), (1, 0, CubeFace::Down), (2, 1, CubeFace::Front)]
        );
        assert_eq!(layout.position(CubeFace::Front), Some((2, 1)));
        assert_eq!(layout.position(CubeFace::Back), None);
    }

    #[test]
    fn test_unknown_face_is_an_error() {
        let err = "Up:Sideways".parse::<TileLayout>().unwrap_err();
        assert_eq!(err.cell, "Sideways");
    }

    #[test]
    fn test_default_places_all_faces_once() {
        let layout = TileLayout::default();
        assert_eq!((layout.columns(), layout.rows()), (4, 3));
        for face in CubeFace::ALL {
            assert!(layout.position(face).is_some(), "{face} missing from the default layout");
        }
        assert_eq!(layout.to_string(), ":Down::,Back:Right:Front:Left,:Up::");
    }

    #[test]
    fn test_ron_uses_layout_string() {
        let text = ron::to_string(&TileLayout::default()).expect("serialize");
        assert_eq!(text, "\":Down::,Back:Right:Front:Left,:Up::\"");
        let back: TileLayout = ron::from_str(&text).expect("deserialize");
        assert_eq!(back, TileLayout::default());
    }
}
