//! Planet terrain grids and contour shading.
//!
//! Loads per-face height and material rasters into haloed grids, stitches
//! the halo rings from neighbouring faces, optionally resamples the cube
//! into a 45°-rotated frame or a Mercator sheet, and shades grids into
//! contour map images.

mod contour;
mod error;
mod face_grid;
mod grid;
mod material;
mod resample;
mod stitch;

pub use contour::{BandScale, ContourOptions, ShadingMode, render_contour};
pub use error::TerrainError;
pub use face_grid::{CubeGrids, FaceGrid, HeightRaster};
pub use grid::BorderedGrid;
pub use material::MaterialSample;
pub use resample::{resample_45, resample_mercator, sample_cube};
pub use stitch::{EDGE_LINKS, EdgeLink, stitch_edges};
