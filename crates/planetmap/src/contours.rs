//! Terrain images for every chart.

use image::RgbaImage;
use planetmap_config::Config;
use planetmap_cubesphere::{Chart, CubeFace, Orientation};
use planetmap_terrain::{
    BandScale, ContourOptions, CubeGrids, render_contour, resample_45, resample_mercator, stitch_edges,
};
use rayon::prelude::*;

/// Contour images of the six faces and, when enabled, the Mercator sheet.
#[derive(Clone, Debug)]
pub struct ContourMaps {
    face_size: usize,
    images: Vec<(Chart, RgbaImage)>,
}

impl ContourMaps {
    /// Shade `grids` per the render, planet and Mercator settings.
    ///
    /// Faces are stitched before shading. With `rotate45` the stitched cube
    /// is resampled into the rotated frame and stitched again. The Mercator
    /// sheet always samples the aligned cube.
    #[must_use]
    pub fn render(grids: &CubeGrids, config: &Config) -> Self {
        let options = ContourOptions {
            shading: config.render.shading,
            contour_lines: config.render.contour_lines,
            bands: BandScale::from_planet(
                config.planet.sea_level,
                config.planet.min_radius,
                config.planet.max_radius,
            ),
        };

        let aligned = stitch_edges(grids);
        let rotated = config.render.rotate45.then(|| stitch_edges(&resample_45(&aligned)));
        let faces = rotated.as_ref().unwrap_or(&aligned);

        let mut images: Vec<(Chart, RgbaImage)> = CubeFace::ALL
            .par_iter()
            .map(|&face| {
                let orientation = config.render.face_orientations.get(face);
                (Chart::Face(face), render_contour(faces.face(face), orientation, &options))
            })
            .collect();

        if let Some(projection) = config.mercator.projection() {
            let sheet = resample_mercator(&aligned, &projection, config.mercator.max_lat_deg);
            images.push((Chart::Mercator, render_contour(&sheet, Orientation::None, &options)));
        }

        tracing::info!(
            planet = %config.planet.name,
            size = grids.size(),
            charts = images.len(),
            shading = ?options.shading,
            "Contour maps rendered"
        );
        Self {
            face_size: grids.size(),
            images,
        }
    }

    /// Build from images rendered elsewhere.
    #[must_use]
    pub fn from_images(face_size: usize, images: Vec<(Chart, RgbaImage)>) -> Self {
        Self { face_size, images }
    }

    /// Side length of a face grid.
    #[must_use]
    pub fn face_size(&self) -> usize {
        self.face_size
    }

    /// Charts with an image, faces first.
    pub fn charts(&self) -> impl Iterator<Item = Chart> + '_ {
        self.images.iter().map(|(chart, _)| *chart)
    }

    #[must_use]
    pub fn get(&self, chart: Chart) -> Option<&RgbaImage> {
        self.images.iter().find(|(c, _)| *c == chart).map(|(_, image)| image)
    }

    /// Whether a Mercator sheet was rendered.
    #[must_use]
    pub fn has_mercator(&self) -> bool {
        self.get(Chart::Mercator).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetmap_terrain::{FaceGrid, MaterialSample};

    fn flat_cube(w: usize, height: u16) -> CubeGrids {
        let grids = CubeFace::ALL
            .iter()
            .map(|&face| {
                FaceGrid::from_samples(
                    Chart::Face(face),
                    w,
                    w,
                    &vec![height; w * w],
                    &vec![MaterialSample::default(); w * w],
                )
                .unwrap()
            })
            .collect();
        CubeGrids::new(grids).unwrap()
    }

    #[test]
    fn test_faces_only_by_default() {
        let maps = ContourMaps::render(&flat_cube(8, 1000), &Config::default());
        assert_eq!(maps.face_size(), 8);
        assert_eq!(maps.charts().count(), 6);
        assert!(!maps.has_mercator());
        for chart in maps.charts() {
            let image = maps.get(chart).unwrap();
            assert_eq!(image.dimensions(), (8, 8), "{chart} image size");
        }
    }

    #[test]
    fn test_mercator_sheet_when_enabled() {
        let mut config = Config::default();
        config.mercator.enabled = true;
        let maps = ContourMaps::render(&flat_cube(8, 1000), &config);
        assert_eq!(maps.charts().count(), 7);
        assert_eq!(maps.charts().last(), Some(Chart::Mercator));
        let projection = config.mercator.projection().unwrap();
        let (w, h) = projection.sheet_size(config.mercator.max_lat_deg);
        assert_eq!(maps.get(Chart::Mercator).unwrap().dimensions(), (w, h));
    }

    #[test]
    fn test_rotated_flat_cube_matches_aligned() {
        let aligned = ContourMaps::render(&flat_cube(8, 1000), &Config::default());
        let mut config = Config::default();
        config.render.rotate45 = true;
        let rotated = ContourMaps::render(&flat_cube(8, 1000), &config);
        let front = Chart::Face(CubeFace::Front);
        assert_eq!(
            aligned.get(front).unwrap().get_pixel(4, 4),
            rotated.get(front).unwrap().get_pixel(4, 4),
            "a flat planet looks the same from either frame"
        );
    }
}
