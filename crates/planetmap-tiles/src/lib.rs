//! Tile map compositing.
//!
//! Face images are placed in a [`TileLayout`] grid and assembled into one
//! mosaic, optionally cropped to the drawn content. Mosaics can be cut
//! into square textures.

mod compose;
mod layout;

pub use compose::{CONTENT_MARGIN, CropMode, FaceTile, TextureTile, TileError, assemble, content_union, slice};
pub use layout::{LayoutError, TileLayout};
