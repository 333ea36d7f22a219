//! Contour-shaded terrain images.
//!
//! Every pixel looks at its 3×3 height neighbourhood. Heights are grouped
//! into 100 m "bands"; a pixel whose centre band differs (in groups of
//! four) from the neighbourhood maximum gets a contour tint.

use std::f64::consts::FRAC_2_PI;

use image::RgbaImage;
use planetmap_cubesphere::{Chart, Orientation};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::face_grid::FaceGrid;
use crate::material::MaterialSample;

/// Steepest neighbourhood height range (raw units) at which ice material
/// is still drawn as an ice sheet.
const ICE_MAX_SLOPE: i32 = 16;
/// Highest raw height at which default material may be drawn as sea ice.
const SEA_ICE_MAX_HEIGHT: u16 = 16;
/// Softness of the relief-shading gradient clamp.
const RELIEF_SOFTNESS: f64 = 192.0;
/// The band sea level maps to.
const SEA_LEVEL_BAND: f64 = 8.0;
/// Band offset used when the planet has no sea.
const DEFAULT_BAND_OFFSET: f64 = 2.0;

const ICE: [u8; 3] = [127, 255, 212];
const ICE_BRIGHT: [u8; 3] = [0, 255, 255];

/// How terrain heights are turned into colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Interleaved modulo bands of height.
    #[default]
    Banded,
    /// Brightness from neighbourhood slope: flatter is brighter.
    Slope,
    /// Pseudo hill-shade from a diagonal gradient estimate.
    Relief,
}

/// Mapping from raw 16-bit heights to 100 m contour bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    /// Bands spanned by the full 16-bit height range.
    pub scale: f64,
    /// Band of raw height zero.
    pub offset: f64,
    /// Raw height of sea level, if the planet has a sea.
    pub sea_level: Option<f64>,
}

impl Default for BandScale {
    fn default() -> Self {
        Self::from_planet(0.0, 59_400.0, 67_200.0)
    }
}

impl BandScale {
    /// Derive the band mapping from planet radii in metres.
    ///
    /// A `sea_level` of zero or less means the planet has no sea; otherwise
    /// the offset is chosen so sea level sits exactly on band 8.
    #[must_use]
    pub fn from_planet(sea_level: f64, min_radius: f64, max_radius: f64) -> Self {
        let range = (max_radius - min_radius).max(1.0);
        let scale = range / 100.0;
        if sea_level > 0.0 {
            Self {
                scale,
                offset: SEA_LEVEL_BAND - (sea_level - min_radius) / 100.0,
                sea_level: Some((sea_level - min_radius) / range * 65536.0),
            }
        } else {
            Self {
                scale,
                offset: DEFAULT_BAND_OFFSET,
                sea_level: None,
            }
        }
    }

    /// Fractional band of a raw height.
    #[inline]
    #[must_use]
    pub fn band_f(&self, h: u16) -> f64 {
        h as f64 * self.scale / 65536.0 + self.offset
    }

    /// Whole band of a raw height.
    #[inline]
    #[must_use]
    pub fn band(&self, h: u16) -> i32 {
        self.band_f(h).floor() as i32
    }

    /// Whether a raw height lies below the configured sea level.
    #[inline]
    #[must_use]
    pub fn is_below_sea(&self, h: u16) -> bool {
        self.sea_level.is_some_and(|sea| (h as f64) < sea)
    }

    /// Coarse band tone shared by every shading mode.
    fn tone(&self, h: u16) -> i32 {
        (self.band_f(h) / 4.0 * 6.0).floor() as i32
    }

    /// Fine modulo band used by banded shading.
    fn stripe(&self, h: u16) -> i32 {
        let fine = (h as f64 * self.scale / 1024.0).floor() + self.offset * 64.0;
        ((fine / 4.0).floor() as i64).rem_euclid(64) as i32
    }
}

/// Settings for [`render_contour`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ContourOptions {
    /// Base shading mode.
    pub shading: ShadingMode,
    /// Tint pixels where the terrain crosses a band group.
    pub contour_lines: bool,
    /// Height to band mapping.
    pub bands: BandScale,
}

/// Whether a default-material cell near sea level on an equatorial chart
/// falls inside the elliptical region drawn as sea ice.
fn plausibly_sea_ice(chart: Chart, x: i64, y: i64, width: i64, height: i64) -> bool {
    if chart.face().is_some_and(|face| face.is_polar()) {
        return false;
    }
    let dy = y - height / 2;
    let dx = x - width / 2;
    dy * dy * 3 < (width / 2) * (width / 2) + dx * dx
}

fn to_u8(v: i32) -> u8 {
    v.clamp(0, u8::MAX as i32) as u8
}

/// Tint toward one of six palette colours at half weight.
fn contour_tint([r, g, b]: [i32; 3], mid: i32, hi: i32) -> [i32; 3] {
    let add = if mid < 8 {
        [32, 64, 48]
    } else if hi >= 72 {
        [127, 0, 0]
    } else if hi >= 48 {
        [112, 16, 0]
    } else if hi >= 32 {
        [96, 32, 0]
    } else if hi >= 24 {
        [64, 32, 0]
    } else {
        [32, 64, 32]
    };
    [r / 2 + add[0], g / 2 + add[1], b / 2 + add[2]]
}

/// Colour from a tone and a brightness term, shared by slope and relief.
fn shaded(tone: i32, bright: i32) -> [i32; 3] {
    [
        tone + bright * 3 / 4 + 32,
        bright + 128,
        bright * 3 / 4 + 96 - tone / 2,
    ]
}

/// Shade one chart into an RGBA image.
///
/// The grid is reoriented first, so the image and its relief lighting are
/// in final map orientation. Sea-ice placement is evaluated in the chart's
/// own coordinates. The halo must already be stitched.
#[must_use]
pub fn render_contour(grid: &FaceGrid, orientation: Orientation, options: &ContourOptions) -> RgbaImage {
    let oriented = grid.oriented(orientation);
    let heights = oriented.heights();
    let materials = oriented.materials();
    let (w, h) = (oriented.width(), oriented.height());
    let inverse = orientation.inverse();
    let square = w == h;
    let bands = &options.bands;
    let ice = match options.shading {
        ShadingMode::Banded => ICE,
        ShadingMode::Slope | ShadingMode::Relief => ICE_BRIGHT,
    };

    let mut buf = vec![0u8; w * h * 4];
    buf.par_chunks_mut((w * 4).max(1))
        .enumerate()
        .for_each(|(i, out)| {
            let up = heights.row(i);
            let row = heights.row(i + 1);
            let down = heights.row(i + 2);
            for j in 0..w {
                let window = [
                    up[j], up[j + 1], up[j + 2], row[j], row[j + 1], row[j + 2], down[j],
                    down[j + 1], down[j + 2],
                ];
                let min = window.iter().copied().min().unwrap_or(0);
                let max = window.iter().copied().max().unwrap_or(0);
                let centre = row[j + 1];
                let hi = bands.band(max);
                let mid = bands.band(centre);
                let slope = max as i32 - min as i32;
                let material = materials.get(j + 1, i + 1);
                let below_sea = bands.is_below_sea(centre);

                let (sx, sy) = if square {
                    inverse.map_index(j, i, w)
                } else {
                    (j, i)
                };
                let ice_sheet = material.complex == MaterialSample::ICE_COMPLEX && slope < ICE_MAX_SLOPE;
                let sea_ice = material.complex == MaterialSample::DEFAULT_COMPLEX
                    && centre <= SEA_ICE_MAX_HEIGHT
                    && plausibly_sea_ice(grid.chart(), sx as i64, sy as i64, w as i64, h as i64);

                let mut rgb = if !below_sea && (ice_sheet || sea_ice) {
                    ice.map(i32::from)
                } else {
                    let tone = bands.tone(centre);
                    let mut rgb = match options.shading {
                        ShadingMode::Slope => {
                            let bright = 127 - (slope as f64 / 6.0).min(127.0) as i32;
                            shaded(tone, bright)
                        }
                        ShadingMode::Relief => {
                            let fwd = (row[j + 2] as i32 * 4
                                + up[j + 2] as i32 * 2
                                + up[j + 1] as i32
                                + down[j + 2] as i32)
                                / 8;
                            let back = (row[j] as i32 * 4
                                + down[j] as i32 * 2
                                + down[j + 1] as i32
                                + up[j] as i32)
                                / 8;
                            let soft = ((fwd - back) as f64 / RELIEF_SOFTNESS).atan() * FRAC_2_PI;
                            let bright = 127 - (63.5 + 63.5 * soft).round().clamp(0.0, 127.0) as i32;
                            shaded(tone, bright)
                        }
                        ShadingMode::Banded => {
                            let stripe = bands.stripe(centre);
                            [tone + stripe + 64, stripe + 160, stripe + 128 - tone / 2]
                        }
                    };
                    if below_sea {
                        rgb[0] /= 2;
                        rgb[1] /= 2;
                    }
                    rgb
                };

                if options.contour_lines && mid.div_euclid(4) != hi.div_euclid(4) {
                    rgb = contour_tint(rgb, mid, hi);
                }

                out[j * 4..j * 4 + 4].copy_from_slice(&[to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]), 255]);
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, buf).expect("pixel buffer sized from the image dimensions")
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetmap_cubesphere::CubeFace;

    fn grid(chart: CubeFace, size: usize, heights: &[u16], complex: u8) -> FaceGrid {
        let materials = vec![
            MaterialSample {
                complex,
                ..MaterialSample::default()
            };
            size * size
        ];
        FaceGrid::from_samples(Chart::Face(chart), size, size, heights, &materials).unwrap()
    }

    fn options(shading: ShadingMode) -> ContourOptions {
        ContourOptions {
            shading,
            contour_lines: true,
            bands: BandScale::default(),
        }
    }

    fn rgb(image: &RgbaImage, x: u32, y: u32) -> [u8; 3] {
        let p = image.get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    }

    #[test]
    fn test_flat_ice_is_ice_in_every_mode() {
        let g = grid(CubeFace::Up, 3, &[0; 9], MaterialSample::ICE_COMPLEX);
        for mode in [ShadingMode::Banded, ShadingMode::Slope, ShadingMode::Relief] {
            let image = render_contour(&g, Orientation::None, &options(mode));
            let expected = if mode == ShadingMode::Banded { ICE } else { ICE_BRIGHT };
            assert_eq!(rgb(&image, 1, 1), expected, "{mode:?}");
        }
    }

    #[test]
    fn test_steep_ice_material_is_not_ice() {
        let mut heights = [0u16; 9];
        heights[4] = 100;
        let g = grid(CubeFace::Up, 3, &heights, MaterialSample::ICE_COMPLEX);
        let image = render_contour(&g, Orientation::None, &options(ShadingMode::Banded));
        assert_ne!(rgb(&image, 1, 1), ICE);
    }

    #[test]
    fn test_default_scale_matches_reference_bands() {
        let bands = BandScale::default();
        assert!((bands.scale - 78.0).abs() < 1e-9);
        assert_eq!(bands.band(0), 2);
        assert_eq!(bands.band(65535), 79);
        assert_eq!(bands.band(40000), 40000 * 78 / 65536 + 2);
        assert_eq!(bands.stripe(40000), ((40000 * 78 / 1024 + 128) / 4) % 64);
    }

    #[test]
    fn test_banded_colour_at_zero_height() {
        // Default material on a polar face is never sea ice.
        let g = grid(CubeFace::Up, 3, &[0; 9], MaterialSample::DEFAULT_COMPLEX);
        let image = render_contour(&g, Orientation::None, &options(ShadingMode::Banded));
        assert_eq!(rgb(&image, 1, 1), [99, 192, 159]);
    }

    #[test]
    fn test_low_default_material_on_equator_is_sea_ice() {
        let g = grid(CubeFace::Front, 3, &[0; 9], MaterialSample::DEFAULT_COMPLEX);
        let image = render_contour(&g, Orientation::None, &options(ShadingMode::Banded));
        assert_eq!(rgb(&image, 1, 1), ICE);
    }

    #[test]
    fn test_flat_slope_shading_is_brightest() {
        let g = grid(CubeFace::Up, 3, &[0; 9], MaterialSample::DEFAULT_COMPLEX);
        let image = render_contour(&g, Orientation::None, &options(ShadingMode::Slope));
        assert_eq!(rgb(&image, 1, 1), [3 + 95 + 32, 255, 95 + 96 - 1]);
    }

    #[test]
    fn test_relief_lights_rising_ground_differently() {
        let rising: Vec<u16> = (0..25).map(|i| (i % 5) as u16 * 3000).collect();
        let falling: Vec<u16> = (0..25).map(|i| (4 - i % 5) as u16 * 3000).collect();
        let opts = ContourOptions {
            contour_lines: false,
            ..options(ShadingMode::Relief)
        };
        let a = render_contour(&grid(CubeFace::Up, 5, &rising, 1), Orientation::None, &opts);
        let b = render_contour(&grid(CubeFace::Up, 5, &falling, 1), Orientation::None, &opts);
        assert!(rgb(&a, 2, 2)[1] < rgb(&b, 2, 2)[1]);
    }

    #[test]
    fn test_band_crossing_draws_contour() {
        let mut heights = vec![20000u16; 9];
        heights[2] = 40000;
        let g = grid(CubeFace::Up, 3, &heights, 1);
        let with = render_contour(&g, Orientation::None, &options(ShadingMode::Banded));
        let without = render_contour(
            &g,
            Orientation::None,
            &ContourOptions {
                contour_lines: false,
                ..options(ShadingMode::Banded)
            },
        );
        assert_ne!(rgb(&with, 1, 1), rgb(&without, 1, 1));
        // Pixels whose neighbourhood stays inside one band group are untouched.
        assert_eq!(rgb(&with, 0, 2), rgb(&without, 0, 2));
    }

    #[test]
    fn test_below_sea_level_is_darkened_and_never_ice() {
        let bands = BandScale::from_planet(60_000.0, 59_400.0, 67_200.0);
        assert!((bands.band_f(0) - 2.0).abs() < 1e-9);
        assert!(bands.is_below_sea(0));
        let g = grid(CubeFace::Up, 3, &[0; 9], MaterialSample::ICE_COMPLEX);
        let opts = ContourOptions {
            bands,
            ..options(ShadingMode::Banded)
        };
        let image = render_contour(&g, Orientation::None, &opts);
        assert_eq!(rgb(&image, 1, 1), [99 / 2, 192 / 2, 159]);
    }

    #[test]
    fn test_orientation_rotates_output() {
        let heights: Vec<u16> = (0..16).map(|i| i as u16 * 4000).collect();
        let g = grid(CubeFace::Up, 4, &heights, 1);
        let opts = ContourOptions {
            contour_lines: false,
            ..options(ShadingMode::Banded)
        };
        let plain = render_contour(&g, Orientation::None, &opts);
        let turned = render_contour(&g, Orientation::Rotate180, &opts);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(rgb(&plain, x, y), rgb(&turned, 3 - x, 3 - y));
            }
        }
    }

    #[test]
    fn test_output_is_opaque_and_unhaloed() {
        let g = grid(CubeFace::Back, 4, &[1000; 16], 1);
        let image = render_contour(&g, Orientation::Rotate90, &options(ShadingMode::Banded));
        assert_eq!(image.dimensions(), (4, 4));
        assert!(image.pixels().all(|p| p.0[3] == 255));
    }
}
