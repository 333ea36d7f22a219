//! Height and material grids for one chart, and the set of six cube faces.

use std::path::Path;

use image::{ImageBuffer, Luma, RgbImage};
use planetmap_cubesphere::{Chart, CubeFace, Orientation};
use rayon::prelude::*;

use crate::error::TerrainError;
use crate::grid::BorderedGrid;
use crate::material::MaterialSample;

/// 16-bit single-channel height raster.
pub type HeightRaster = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Height and material samples for one chart, each with a one-sample halo.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceGrid {
    chart: Chart,
    heights: BorderedGrid<u16>,
    materials: BorderedGrid<MaterialSample>,
}

impl FaceGrid {
    pub(crate) fn from_grids(
        chart: Chart,
        heights: BorderedGrid<u16>,
        materials: BorderedGrid<MaterialSample>,
    ) -> Self {
        debug_assert_eq!(heights.width(), materials.width());
        debug_assert_eq!(heights.height(), materials.height());
        Self {
            chart,
            heights,
            materials,
        }
    }

    /// Build a grid from row-major interior samples. The halo starts zeroed.
    ///
    /// Returns `None` if either slice is not `width * height` long.
    #[must_use]
    pub fn from_samples(
        chart: Chart,
        width: usize,
        height: usize,
        heights: &[u16],
        materials: &[MaterialSample],
    ) -> Option<Self> {
        Some(Self::from_grids(
            chart,
            BorderedGrid::from_interior(width, height, heights)?,
            BorderedGrid::from_interior(width, height, materials)?,
        ))
    }

    /// Build a grid from decoded rasters of identical size.
    pub fn from_rasters(
        chart: Chart,
        heights: &HeightRaster,
        materials: &RgbImage,
    ) -> Result<Self, TerrainError> {
        if heights.dimensions() != materials.dimensions() {
            return Err(TerrainError::SizeMismatch {
                chart,
                height_w: heights.width(),
                height_h: heights.height(),
                material_w: materials.width(),
                material_h: materials.height(),
            });
        }
        let (w, h) = heights.dimensions();
        if w == 0 || h == 0 {
            return Err(TerrainError::EmptyRaster(chart));
        }
        let (w, h) = (w as usize, h as usize);
        let mats: Vec<MaterialSample> = materials
            .pixels()
            .map(|p| MaterialSample::from_rgb(p.0))
            .collect();

        // Both lengths are fixed by the checked dimensions.
        let heights = BorderedGrid::from_interior(w, h, heights.as_raw())
            .ok_or(TerrainError::EmptyRaster(chart))?;
        let materials =
            BorderedGrid::from_interior(w, h, &mats).ok_or(TerrainError::EmptyRaster(chart))?;
        Ok(Self::from_grids(chart, heights, materials))
    }

    /// Load a height raster and a material raster from disk.
    ///
    /// The height raster is read as 16-bit grey (8-bit inputs are widened),
    /// the material raster as 8-bit RGB.
    pub fn load(chart: Chart, height_path: &Path, material_path: &Path) -> Result<Self, TerrainError> {
        let open = |path: &Path| {
            image::open(path).map_err(|source| TerrainError::Image {
                chart,
                path: path.display().to_string(),
                source,
            })
        };
        let heights = open(height_path)?.into_luma16();
        let materials = open(material_path)?.into_rgb8();
        let grid = Self::from_rasters(chart, &heights, &materials)?;
        tracing::debug!(
            chart = %chart,
            width = grid.width(),
            height = grid.height(),
            "loaded face rasters"
        );
        Ok(grid)
    }

    /// Chart this grid belongs to.
    #[must_use]
    pub fn chart(&self) -> Chart {
        self.chart
    }

    /// Interior width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.heights.width()
    }

    /// Interior height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.heights.height()
    }

    /// Height samples.
    #[must_use]
    pub fn heights(&self) -> &BorderedGrid<u16> {
        &self.heights
    }

    /// Material samples.
    #[must_use]
    pub fn materials(&self) -> &BorderedGrid<MaterialSample> {
        &self.materials
    }

    pub(crate) fn heights_mut(&mut self) -> &mut BorderedGrid<u16> {
        &mut self.heights
    }

    pub(crate) fn materials_mut(&mut self) -> &mut BorderedGrid<MaterialSample> {
        &mut self.materials
    }

    /// A copy with both grids reoriented.
    #[must_use]
    pub fn oriented(&self, orientation: Orientation) -> Self {
        Self {
            chart: self.chart,
            heights: self.heights.oriented(orientation),
            materials: self.materials.oriented(orientation),
        }
    }
}

/// The six square face grids of a cube, all the same size.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeGrids {
    faces: Vec<FaceGrid>,
}

impl CubeGrids {
    /// Collect six face grids, in any order.
    ///
    /// Every face must be present exactly once, square, and the same size.
    pub fn new(grids: Vec<FaceGrid>) -> Result<Self, TerrainError> {
        let mut slots: Vec<Option<FaceGrid>> = vec![None; 6];
        for grid in grids {
            if let Some(face) = grid.chart().face() {
                slots[face.index()] = Some(grid);
            }
        }
        let mut faces = Vec::with_capacity(6);
        for (face, slot) in CubeFace::ALL.into_iter().zip(slots) {
            let grid = slot.ok_or(TerrainError::EmptyRaster(Chart::Face(face)))?;
            faces.push(grid);
        }

        let expected = faces[0].width();
        for grid in &faces {
            if grid.width() != expected || grid.height() != expected || expected == 0 {
                return Err(TerrainError::BadFaceSize {
                    chart: grid.chart(),
                    width: grid.width(),
                    height: grid.height(),
                    expected,
                });
            }
        }
        Ok(Self { faces })
    }

    /// Load `<face>.png` heights and `<face>_mat.png` materials for all six
    /// faces from `dir`, in parallel.
    pub fn load_dir(dir: &Path) -> Result<Self, TerrainError> {
        let grids = CubeFace::ALL
            .par_iter()
            .map(|&face| {
                let stem = face.name().to_ascii_lowercase();
                FaceGrid::load(
                    Chart::Face(face),
                    &dir.join(format!("{stem}.png")),
                    &dir.join(format!("{stem}_mat.png")),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let cube = Self::new(grids)?;
        tracing::info!(size = cube.size(), dir = %dir.display(), "loaded cube face rasters");
        Ok(cube)
    }

    /// Side length of every face.
    #[must_use]
    pub fn size(&self) -> usize {
        self.faces[0].width()
    }

    /// Grid for `face`.
    #[must_use]
    pub fn face(&self, face: CubeFace) -> &FaceGrid {
        &self.faces[face.index()]
    }

    pub(crate) fn face_mut(&mut self, face: CubeFace) -> &mut FaceGrid {
        &mut self.faces[face.index()]
    }

    /// All six grids in [`CubeFace::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &FaceGrid> {
        self.faces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(face: CubeFace, size: usize, value: u16) -> FaceGrid {
        FaceGrid::from_samples(
            Chart::Face(face),
            size,
            size,
            &vec![value; size * size],
            &vec![MaterialSample::default(); size * size],
        )
        .unwrap()
    }

    #[test]
    fn test_mismatched_rasters_fail() {
        let heights = HeightRaster::new(4, 4);
        let materials = RgbImage::new(4, 5);
        let err = FaceGrid::from_rasters(Chart::Face(CubeFace::Up), &heights, &materials);
        assert!(matches!(err, Err(TerrainError::SizeMismatch { .. })));
    }

    #[test]
    fn test_rasters_fill_interior_only() {
        let heights = HeightRaster::from_pixel(3, 3, Luma([500]));
        let materials = RgbImage::from_pixel(3, 3, image::Rgb([82, 1, 2]));
        let grid = FaceGrid::from_rasters(Chart::Face(CubeFace::Up), &heights, &materials).unwrap();
        assert_eq!(grid.heights().get(2, 2), 500);
        assert_eq!(grid.heights().get(0, 2), 0);
        assert!(grid.materials().get(1, 1).is_ice());
        assert_eq!(grid.materials().get(4, 4), MaterialSample::default());
    }

    #[test]
    fn test_load_from_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let h = dir.path().join("front.png");
        let m = dir.path().join("front_mat.png");
        HeightRaster::from_pixel(2, 2, Luma([40000])).save(&h).unwrap();
        RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0])).save(&m).unwrap();
        let grid = FaceGrid::load(Chart::Face(CubeFace::Front), &h, &m).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.heights().get(1, 1), 40000);
    }

    #[test]
    fn test_missing_raster_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CubeGrids::load_dir(dir.path());
        assert!(matches!(result, Err(TerrainError::Image { .. })));
    }

    #[test]
    fn test_cube_requires_all_faces() {
        let grids: Vec<_> = CubeFace::ALL[..5].iter().map(|&f| flat(f, 4, 0)).collect();
        assert!(CubeGrids::new(grids).is_err());
    }

    #[test]
    fn test_cube_rejects_mixed_sizes() {
        let mut grids: Vec<_> = CubeFace::ALL.iter().map(|&f| flat(f, 4, 0)).collect();
        grids[3] = flat(CubeFace::ALL[3], 8, 0);
        assert!(matches!(
            CubeGrids::new(grids),
            Err(TerrainError::BadFaceSize { .. })
        ));
    }

    #[test]
    fn test_cube_orders_faces() {
        let grids: Vec<_> = CubeFace::ALL.iter().rev().map(|&f| flat(f, 4, f as u16)).collect();
        let cube = CubeGrids::new(grids).unwrap();
        for face in CubeFace::ALL {
            assert_eq!(cube.face(face).chart(), Chart::Face(face));
            assert_eq!(cube.face(face).heights().get(1, 1), face as u16);
        }
    }
}
