//! Mosaic assembly and texture slicing.

use glam::DVec2;
use image::RgbaImage;
use planetmap_cubesphere::CubeFace;
use planetmap_draw::Rect;
use serde::{Deserialize, Serialize};

use crate::layout::TileLayout;

/// Margin around the content union under [`CropMode::Content`].
pub const CONTENT_MARGIN: f64 = 64.0;

// ---------------------------------------------------------------------------
// TileError
// ---------------------------------------------------------------------------

/// Errors returned while assembling a mosaic.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    /// Face images in one mosaic must share a size.
    #[error("{face} image is {width}x{height}, expected {expected_w}x{expected_h}")]
    MismatchedTile {
        face: CubeFace,
        width: u32,
        height: u32,
        expected_w: u32,
        expected_h: u32,
    },

    /// Texture tiles need a positive size.
    #[error("texture size must be positive")]
    ZeroTextureSize,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// How the mosaic canvas is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropMode {
    /// The full layout grid.
    #[default]
    None,
    /// The content union plus [`CONTENT_MARGIN`].
    Content,
    /// Whole texture tiles centred over the content union.
    TextureGrid,
}

/// One face image and the bounds of what was drawn on it.
#[derive(Clone, Copy, Debug)]
pub struct FaceTile<'a> {
    pub face: CubeFace,
    pub image: &'a RgbaImage,
    pub bounds: Option<Rect>,
}

/// Integer canvas rectangle in mosaic coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Canvas {
    x: i64,
    y: i64,
    width: u32,
    height: u32,
}

impl Canvas {
    fn crop_content(union: Rect) -> Self {
        Self {
            x: (union.min.x - CONTENT_MARGIN).floor() as i64,
            y: (union.min.y - CONTENT_MARGIN).floor() as i64,
            width: (union.width() + 2.0 * CONTENT_MARGIN).ceil() as u32,
            height: (union.height() + 2.0 * CONTENT_MARGIN).ceil() as u32,
        }
    }

    fn crop_texture_grid(union: Rect, texture_size: u32) -> Self {
        let ts = f64::from(texture_size);
        let cols = (union.width() / ts).ceil().max(1.0);
        let rows = (union.height() / ts).ceil().max(1.0);
        let x_margin = ((cols * ts - union.width()) / 2.0).floor();
        let y_margin = ((rows * ts - union.height()) / 2.0).floor();
        Self {
            x: (union.min.x - x_margin).floor() as i64,
            y: (union.min.y - y_margin).floor() as i64,
            width: cols as u32 * texture_size,
            height: rows as u32 * texture_size,
        }
    }
}

/// Union of every placed face's bounds, in mosaic coordinates.
#[must_use]
pub fn content_union(layout: &TileLayout, tiles: &[FaceTile], tile_w: u32, tile_h: u32) -> Option<Rect> {
    layout
        .cells()
        .filter_map(|(x, y, face)| {
            let tile = tiles.iter().find(|t| t.face == face)?;
            let offset = DVec2::new((x as u32 * tile_w) as f64, (y as u32 * tile_h) as f64);
            tile.bounds.map(|b| b.translate(offset))
        })
        .reduce(|a, b| a.union(&b))
}

/// Place face images on a canvas per `layout`.
///
/// Blank slots and faces without an image stay transparent. Without any
/// content bounds every crop mode yields the full grid.
///
/// # Errors
///
/// Returns [`TileError::MismatchedTile`] if the face images differ in size
/// and [`TileError::ZeroTextureSize`] for a texture-grid crop with a zero
/// texture size.
pub fn assemble(
    layout: &TileLayout,
    tiles: &[FaceTile],
    crop: CropMode,
    texture_size: u32,
) -> Result<RgbaImage, TileError> {
    let Some(first) = tiles.first() else {
        return Ok(RgbaImage::new(0, 0));
    };
    let (tile_w, tile_h) = first.image.dimensions();
    if let Some(odd) = tiles.iter().find(|t| t.image.dimensions() != (tile_w, tile_h)) {
        return Err(TileError::MismatchedTile {
            face: odd.face,
            width: odd.image.width(),
            height: odd.image.height(),
            expected_w: tile_w,
            expected_h: tile_h,
        });
    }

    let full = Canvas {
        x: 0,
        y: 0,
        width: tile_w * layout.columns() as u32,
        height: tile_h * layout.rows() as u32,
    };
    let union = content_union(layout, tiles, tile_w, tile_h);
    let canvas = match (crop, union) {
        (CropMode::Content, Some(u)) => Canvas::crop_content(u),
        (CropMode::TextureGrid, Some(u)) => {
            if texture_size == 0 {
                return Err(TileError::ZeroTextureSize);
            }
            Canvas::crop_texture_grid(u, texture_size)
        }
        _ => full,
    };

    let mut mosaic = RgbaImage::new(canvas.width, canvas.height);
    for (x, y, face) in layout.cells() {
        let Some(tile) = tiles.iter().find(|t| t.face == face) else {
            continue;
        };
        let px = i64::from(tile_w) * x as i64 - canvas.x;
        let py = i64::from(tile_h) * y as i64 - canvas.y;
        image::imageops::replace(&mut mosaic, tile.image, px, py);
    }
    tracing::debug!(
        ?crop,
        width = canvas.width,
        height = canvas.height,
        x = canvas.x,
        y = canvas.y,
        "assembled mosaic"
    );
    Ok(mosaic)
}

// ---------------------------------------------------------------------------
// Slicing
// ---------------------------------------------------------------------------

/// One square texture cut from a mosaic.
#[derive(Clone, Debug)]
pub struct TextureTile {
    /// 1-based column.
    pub column: u32,
    /// 1-based row.
    pub row: u32,
    pub image: RgbaImage,
}

impl TextureTile {
    /// `<basename>+<column>+<row>.png`
    #[must_use]
    pub fn file_name(&self, basename: &str) -> String {
        format!("{basename}+{}+{}.png", self.column, self.row)
    }
}

/// Cut `mosaic` into `texture_size` squares, row-major. Edge tiles keep
/// the full size; the part past the mosaic stays transparent.
///
/// # Errors
///
/// Returns [`TileError::ZeroTextureSize`] if `texture_size` is zero.
pub fn slice(mosaic: &RgbaImage, texture_size: u32) -> Result<Vec<TextureTile>, TileError> {
    if texture_size == 0 {
        return Err(TileError::ZeroTextureSize);
    }
    let cols = mosaic.width().div_ceil(texture_size);
    let rows = mosaic.height().div_ceil(texture_size);
    let mut tiles = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for column in 0..cols {
            let mut image = RgbaImage::new(texture_size, texture_size);
            let x = -i64::from(column * texture_size);
            let y = -i64::from(row * texture_size);
            image::imageops::replace(&mut image, mosaic, x, y);
            tiles.push(TextureTile {
                column: column + 1,
                row: row + 1,
                image,
            });
        }
    }
    tracing::debug!(count = tiles.len(), texture_size, "sliced mosaic into textures");
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(size: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([value, value, value, 255]))
    }

    fn two_faces() -> TileLayout {
        "Up:Down".parse().expect("valid layout")
    }

    #[test]
    fn test_full_grid_places_faces() {
        let (up, down) = (solid(16, 10), solid(16, 20));
        let tiles = [
            FaceTile { face: CubeFace::Up, image: &up, bounds: None },
            FaceTile { face: CubeFace::Down, image: &down, bounds: None },
        ];
        let mosaic = assemble(&two_faces(), &tiles, CropMode::Content, 8).expect("same sizes");
        assert_eq!(mosaic.dimensions(), (32, 16), "no bounds means no crop");
        assert_eq!(mosaic.get_pixel(3, 3)[0], 10);
        assert_eq!(mosaic.get_pixel(20, 3)[0], 20);
    }

    #[test]
    fn test_blank_cells_stay_transparent() {
        let layout: TileLayout = "Up:".parse().expect("valid layout");
        let up = solid(8, 10);
        let tiles = [FaceTile { face: CubeFace::Up, image: &up, bounds: None }];
        let mosaic = assemble(&layout, &tiles, CropMode::None, 8).expect("one tile");
        assert_eq!(mosaic.dimensions(), (16, 8));
        assert_eq!(mosaic.get_pixel(12, 4)[3], 0);
    }

    #[test]
    fn test_content_crop_adds_margin() {
        let (up, down) = (solid(256, 10), solid(256, 20));
        let bounds = Rect::new(DVec2::new(100.0, 100.0), DVec2::new(120.0, 110.0));
        let tiles = [
            FaceTile { face: CubeFace::Up, image: &up, bounds: None },
            FaceTile { face: CubeFace::Down, image: &down, bounds: Some(bounds) },
        ];
        let union = content_union(&two_faces(), &tiles, 256, 256).expect("one bounded face");
        assert_eq!(union.min, DVec2::new(356.0, 100.0));

        let mosaic = assemble(&two_faces(), &tiles, CropMode::Content, 64).expect("same sizes");
        assert_eq!(mosaic.dimensions(), (20 + 128, 10 + 128));
        // Canvas origin (292, 36): the Down face starts at mosaic x 256.
        assert_eq!(mosaic.get_pixel(0, 0)[0], 20);
    }

    #[test]
    fn test_texture_grid_crop_is_whole_tiles_centred() {
        let up = solid(256, 10);
        let bounds = Rect::new(DVec2::new(50.0, 60.0), DVec2::new(150.0, 90.0));
        let tiles = [FaceTile { face: CubeFace::Up, image: &up, bounds: Some(bounds) }];
        let layout: TileLayout = "Up".parse().expect("valid layout");
        let mosaic = assemble(&layout, &tiles, CropMode::TextureGrid, 64).expect("same sizes");
        assert_eq!(mosaic.dimensions(), (128, 64));
        let canvas = Canvas::crop_texture_grid(bounds, 64);
        assert_eq!((canvas.x, canvas.y), (36, 43));
    }

    #[test]
    fn test_mismatched_sizes_rejected() {
        let (up, down) = (solid(16, 10), solid(8, 20));
        let tiles = [
            FaceTile { face: CubeFace::Up, image: &up, bounds: None },
            FaceTile { face: CubeFace::Down, image: &down, bounds: None },
        ];
        let err = assemble(&two_faces(), &tiles, CropMode::None, 8).unwrap_err();
        assert!(matches!(err, TileError::MismatchedTile { face: CubeFace::Down, .. }));
    }

    #[test]
    fn test_slice_keeps_edge_tiles_full_size() {
        let mosaic = solid(100, 50);
        let textures = slice(&mosaic, 64).expect("positive size");
        assert_eq!(textures.len(), 4);
        let last = &textures[3];
        assert_eq!((last.column, last.row), (2, 2));
        assert_eq!(last.image.dimensions(), (64, 64));
        assert_eq!(last.image.get_pixel(35, 35)[3], 255);
        assert_eq!(last.image.get_pixel(36, 36)[3], 0, "past the mosaic edge");
        assert_eq!(textures[1].file_name("texture"), "texture+2+1.png");
        assert!(slice(&mosaic, 0).is_err());
    }
}
