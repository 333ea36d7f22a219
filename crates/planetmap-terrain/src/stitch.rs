//! Halo stitching across the twelve cube edges.
//!
//! Each of the twelve shared edges is copied in both directions, giving
//! twenty-four one-way links. Stitching reads only from the unstitched
//! input grids and writes into fresh copies, so link order never matters.

use planetmap_cubesphere::CubeFace;

use crate::face_grid::CubeGrids;

/// A grid index expressed relative to the interior size `w`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ix {
    /// Leading halo (0).
    Halo,
    /// First interior sample (1).
    First,
    /// Last interior sample (`w`).
    Last,
    /// Trailing halo (`w + 1`).
    HaloEnd,
}

impl Ix {
    #[inline]
    fn resolve(self, w: usize) -> isize {
        (match self {
            Ix::Halo => 0,
            Ix::First => 1,
            Ix::Last => w,
            Ix::HaloEnd => w + 1,
        }) as isize
    }
}

/// A run of `w` samples: start `(x, y)` and unit step `(dx, dy)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// Starting column.
    pub x: Ix,
    /// Starting row.
    pub y: Ix,
    /// Column step per sample.
    pub dx: i8,
    /// Row step per sample.
    pub dy: i8,
}

impl Run {
    const fn new(x: Ix, y: Ix, dx: i8, dy: i8) -> Self {
        Self { x, y, dx, dy }
    }

    /// Halo-inclusive `(x, y)` of the `i`th sample of the run.
    #[inline]
    #[must_use]
    pub fn at(&self, i: usize, w: usize) -> (usize, usize) {
        let i = i as isize;
        let x = self.x.resolve(w) + self.dx as isize * i;
        let y = self.y.resolve(w) + self.dy as isize * i;
        (x as usize, y as usize)
    }
}

/// Copy a boundary run of `source` into a halo run of `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeLink {
    /// Face whose halo is written.
    pub target: CubeFace,
    /// Halo run in the target.
    pub halo: Run,
    /// Face the samples come from.
    pub source: CubeFace,
    /// Interior boundary run in the source.
    pub boundary: Run,
}

const fn link(target: CubeFace, halo: Run, source: CubeFace, boundary: Run) -> EdgeLink {
    EdgeLink {
        target,
        halo,
        source,
        boundary,
    }
}

use CubeFace::{Back, Down, Front, Left, Right, Up};
use Ix::{First, Halo, HaloEnd, Last};

/// All twenty-four halo links of the cube.
pub const EDGE_LINKS: [EdgeLink; 24] = [
    // Equatorial ring.
    link(Front, Run::new(Halo, First, 0, 1), Left, Run::new(Last, First, 0, 1)),
    link(Left, Run::new(HaloEnd, First, 0, 1), Front, Run::new(First, First, 0, 1)),
    link(Left, Run::new(Halo, First, 0, 1), Back, Run::new(Last, First, 0, 1)),
    link(Back, Run::new(HaloEnd, First, 0, 1), Left, Run::new(First, First, 0, 1)),
    link(Back, Run::new(Halo, First, 0, 1), Right, Run::new(Last, First, 0, 1)),
    link(Right, Run::new(HaloEnd, First, 0, 1), Back, Run::new(First, First, 0, 1)),
    link(Right, Run::new(Halo, First, 0, 1), Front, Run::new(Last, First, 0, 1)),
    link(Front, Run::new(HaloEnd, First, 0, 1), Right, Run::new(First, First, 0, 1)),
    // Up cap.
    link(Up, Run::new(First, HaloEnd, 1, 0), Front, Run::new(First, First, 1, 0)),
    link(Up, Run::new(Halo, First, 0, 1), Left, Run::new(First, First, 1, 0)),
    link(Up, Run::new(Last, Halo, -1, 0), Back, Run::new(First, First, 1, 0)),
    link(Up, Run::new(HaloEnd, Last, 0, -1), Right, Run::new(First, First, 1, 0)),
    link(Front, Run::new(First, Halo, 1, 0), Up, Run::new(First, Last, 1, 0)),
    link(Left, Run::new(First, Halo, 1, 0), Up, Run::new(First, First, 0, 1)),
    link(Back, Run::new(First, Halo, 1, 0), Up, Run::new(Last, First, -1, 0)),
    link(Right, Run::new(First, Halo, 1, 0), Up, Run::new(Last, Last, 0, -1)),
    // Down cap.
    link(Down, Run::new(First, Halo, 1, 0), Back, Run::new(First, Last, 1, 0)),
    link(Down, Run::new(Halo, Last, 0, -1), Right, Run::new(First, Last, 1, 0)),
    link(Down, Run::new(Last, HaloEnd, -1, 0), Front, Run::new(First, Last, 1, 0)),
    link(Down, Run::new(HaloEnd, First, 0, 1), Left, Run::new(First, Last, 1, 0)),
    link(Back, Run::new(First, HaloEnd, 1, 0), Down, Run::new(First, First, 1, 0)),
    link(Right, Run::new(First, HaloEnd, 1, 0), Down, Run::new(First, Last, 0, -1)),
    link(Front, Run::new(First, HaloEnd, 1, 0), Down, Run::new(Last, Last, -1, 0)),
    link(Left, Run::new(First, HaloEnd, 1, 0), Down, Run::new(Last, First, 0, 1)),
];

/// Fill every face's halo from its neighbours.
///
/// Returns new grids; the input is only read. Halo corners are not part of
/// any edge and keep their input values.
#[must_use]
pub fn stitch_edges(grids: &CubeGrids) -> CubeGrids {
    let w = grids.size();
    let mut stitched = grids.clone();
    for link in &EDGE_LINKS {
        let source = grids.face(link.source);
        let target = stitched.face_mut(link.target);
        for i in 0..w {
            let (sx, sy) = link.boundary.at(i, w);
            let (tx, ty) = link.halo.at(i, w);
            let height = source.heights().get(sx, sy);
            let material = source.materials().get(sx, sy);
            target.heights_mut().set(tx, ty, height);
            target.materials_mut().set(tx, ty, material);
        }
    }
    tracing::debug!(size = w, links = EDGE_LINKS.len(), "stitched cube edges");
    stitched
}
