//! 2D drawing for map overlays.
//!
//! Overlays are described as lists of [`DrawCommand`]s in image
//! coordinates, painted by a [`Rasterizer`] and measured with a
//! [`BoundsAccumulator`]. Text goes through [`TextMetrics`], which turns
//! strings into filled [`Outline`]s so labels can be stroked and filled
//! like any other shape.

mod block_font;
mod bounds;
mod command;
mod curve;
mod error;
mod outline;
mod raster;
mod text;

pub use bounds::{BoundsAccumulator, Rect};
pub use command::{DrawCommand, Paint, Stroke};
pub use curve::{ellipse_points, flatten_cubic};
pub use error::DrawError;
pub use outline::Outline;
pub use raster::{RasterCanvas, Rasterizer};
pub use text::{Align, BlockMetrics, FontMetrics, TextMetrics, layout_block};
