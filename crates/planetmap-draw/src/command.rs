//! The closed set of drawing primitives.

use glam::DVec2;
use image::Rgba;

use crate::bounds::Rect;
use crate::curve::flatten_cubic;
use crate::outline::Outline;

/// A round-capped stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    /// Line width in pixels.
    pub width: f64,
}

impl Stroke {
    #[must_use]
    pub const fn new(color: Rgba<u8>, width: f64) -> Self {
        Self { color, width }
    }
}

/// How a closed shape is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Fill the interior.
    Fill(Rgba<u8>),
    /// Stroke the boundary.
    Stroke(Stroke),
}

impl Paint {
    /// Half the stroke width, or zero for fills.
    fn reach(&self) -> f64 {
        match self {
            Paint::Fill(_) => 0.0,
            Paint::Stroke(stroke) => stroke.width * 0.5,
        }
    }
}

/// One drawing primitive in image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: DVec2,
        to: DVec2,
        stroke: Stroke,
    },
    Bezier {
        start: DVec2,
        ctrl1: DVec2,
        ctrl2: DVec2,
        end: DVec2,
        stroke: Stroke,
    },
    /// Closed polygon; the first point is not repeated.
    Polygon {
        points: Vec<DVec2>,
        paint: Paint,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        centre: DVec2,
        radii: DVec2,
        paint: Paint,
    },
    /// Glyph outlines, such as a laid-out label.
    Glyphs {
        outline: Outline,
        paint: Paint,
    },
}

impl DrawCommand {
    /// Filled circle.
    #[must_use]
    pub fn disc(centre: DVec2, radius: f64, color: Rgba<u8>) -> Self {
        DrawCommand::Ellipse {
            centre,
            radii: DVec2::splat(radius),
            paint: Paint::Fill(color),
        }
    }

    /// Image-space extent of what the command paints, stroke included.
    #[must_use]
    pub fn extent(&self) -> Option<Rect> {
        match self {
            DrawCommand::Line { from, to, stroke } => {
                Some(Rect::new(*from, *to).expand_by(stroke.width * 0.5))
            }
            DrawCommand::Bezier {
                start,
                ctrl1,
                ctrl2,
                end,
                stroke,
            } => Rect::enclosing(flatten_cubic(*start, *ctrl1, *ctrl2, *end))
                .map(|r| r.expand_by(stroke.width * 0.5)),
            DrawCommand::Polygon { points, paint } => {
                Rect::enclosing(points.iter().copied()).map(|r| r.expand_by(paint.reach()))
            }
            DrawCommand::Ellipse {
                centre,
                radii,
                paint,
            } => Some(Rect::new(*centre - radii.abs(), *centre + radii.abs()).expand_by(paint.reach())),
            DrawCommand::Glyphs { outline, paint } => {
                outline.bounds().map(|r| r.expand_by(paint.reach()))
            }
        }
    }
}
