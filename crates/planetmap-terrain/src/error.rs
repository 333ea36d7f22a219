//! Terrain loading error types.

use planetmap_cubesphere::Chart;

/// Errors that can occur when loading face rasters into grids.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A raster could not be opened or decoded.
    #[error("failed to read {chart} raster {path}: {source}")]
    Image {
        /// Chart the raster belongs to.
        chart: Chart,
        /// Raster path.
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Height and material rasters disagree in size.
    #[error(
        "{chart} rasters differ in size: height {height_w}x{height_h}, material {material_w}x{material_h}"
    )]
    SizeMismatch {
        /// Chart the rasters belong to.
        chart: Chart,
        /// Height raster width.
        height_w: u32,
        /// Height raster height.
        height_h: u32,
        /// Material raster width.
        material_w: u32,
        /// Material raster height.
        material_h: u32,
    },

    /// Cube faces must be square and all the same size.
    #[error("{chart} is {width}x{height}, expected a square {expected}x{expected} face")]
    BadFaceSize {
        /// Offending chart.
        chart: Chart,
        /// Actual width.
        width: usize,
        /// Actual height.
        height: usize,
        /// Expected side length.
        expected: usize,
    },

    /// A raster with no pixels.
    #[error("{0} raster is empty")]
    EmptyRaster(Chart),
}
