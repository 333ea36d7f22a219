//! The raster backend: paints draw commands onto an RGBA image.
//!
//! Fills use the nonzero winding rule with four sub-scanlines per pixel
//! row and exact horizontal span coverage. Strokes are unions of
//! round-capped capsules, so joins are round and overlapping pieces of one
//! stroke never blend twice. Hairlines go straight to `imageproc`.

use glam::DVec2;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{Blend, Canvas, draw_line_segment_mut};
use rustc_hash::FxHashMap;

use crate::command::{DrawCommand, Paint, Stroke};
use crate::curve::{ellipse_points, flatten_cubic};

/// Sub-scanlines per pixel row when filling.
const SUBSAMPLES: usize = 4;

/// Something draw commands can be painted onto.
pub trait Rasterizer {
    /// Canvas size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Paint one command.
    fn draw(&mut self, command: &DrawCommand);

    /// Paint commands in order.
    fn draw_all(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.draw(command);
        }
    }
}

/// An RGBA image that blends every painted pixel over what is there.
pub struct RasterCanvas {
    canvas: Blend<RgbaImage>,
}

impl RasterCanvas {
    /// A fully transparent canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    /// Draw on top of an existing image.
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            canvas: Blend(image),
        }
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.canvas.0
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba<u8>, coverage: f64) {
        let alpha = (f64::from(color.0[3]) * coverage.clamp(0.0, 1.0)).round() as u8;
        if alpha == 0 {
            return;
        }
        let [r, g, b, _] = color.0;
        self.canvas.draw_pixel(x, y, Rgba([r, g, b, alpha]));
    }

    /// Fill closed contours with the nonzero winding rule.
    fn fill(&mut self, contours: &[Vec<DVec2>], color: Rgba<u8>) {
        let (width, height) = self.dimensions();
        let Some((x0, y0, x1, y1)) = pixel_span(contours.iter().flatten().copied(), 0.0, width, height) else {
            return;
        };
        let span = (x1 - x0) as usize;
        let mut coverage = vec![0.0f64; span];
        let mut crossings: Vec<(f64, i32)> = Vec::new();

        for y in y0..y1 {
            coverage.fill(0.0);
            for sub in 0..SUBSAMPLES {
                let sy = f64::from(y) + (sub as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                for contour in contours {
                    let n = contour.len();
                    for i in 0..n {
                        let (p, q) = (contour[i], contour[(i + 1) % n]);
                        if (p.y <= sy && sy < q.y) || (q.y <= sy && sy < p.y) {
                            let x = p.x + (sy - p.y) * (q.x - p.x) / (q.y - p.y);
                            crossings.push((x, if q.y > p.y { 1 } else { -1 }));
                        }
                    }
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    if winding != 0 {
                        add_span(&mut coverage, pair[0].0 - f64::from(x0), pair[1].0 - f64::from(x0));
                    }
                }
            }
            for (i, c) in coverage.iter().enumerate() {
                if *c > 0.0 {
                    self.blend(x0 + i as u32, y, color, *c / SUBSAMPLES as f64);
                }
            }
        }
    }

    /// Stroke a polyline with round caps and joins.
    fn stroke(&mut self, points: &[DVec2], closed: bool, stroke: Stroke) {
        if points.is_empty() || stroke.width <= 0.0 {
            return;
        }
        let (width, height) = self.dimensions();
        let radius = (stroke.width * 0.5).max(0.5);
        let mut segments: Vec<(DVec2, DVec2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed && points.len() > 2 {
            segments.push((points[points.len() - 1], points[0]));
        }
        if segments.is_empty() {
            segments.push((points[0], points[0]));
        }

        let mut coverage: FxHashMap<(u32, u32), f64> = FxHashMap::default();
        for (a, b) in segments {
            let Some((x0, y0, x1, y1)) = pixel_span([a, b], radius + 1.0, width, height) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    let centre = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                    let c = (radius + 0.5 - distance_to_segment(centre, a, b)).clamp(0.0, 1.0);
                    if c > 0.0 {
                        let slot = coverage.entry((x, y)).or_insert(0.0);
                        *slot = slot.max(c);
                    }
                }
            }
        }
        for ((x, y), c) in coverage {
            self.blend(x, y, stroke.color, c);
        }
    }
}

impl Rasterizer for RasterCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.canvas.0.dimensions()
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Line { from, to, stroke } if stroke.width <= 1.0 => {
                draw_line_segment_mut(
                    &mut self.canvas,
                    (from.x as f32, from.y as f32),
                    (to.x as f32, to.y as f32),
                    stroke.color,
                );
            }
            DrawCommand::Line { from, to, stroke } => self.stroke(&[*from, *to], false, *stroke),
            DrawCommand::Bezier {
                start,
                ctrl1,
                ctrl2,
                end,
                stroke,
            } => self.stroke(&flatten_cubic(*start, *ctrl1, *ctrl2, *end), false, *stroke),
            DrawCommand::Polygon { points, paint } => match paint {
                Paint::Fill(color) => self.fill(std::slice::from_ref(points), *color),
                Paint::Stroke(stroke) => self.stroke(points, true, *stroke),
            },
            DrawCommand::Ellipse {
                centre,
                radii,
                paint,
            } => {
                let points = ellipse_points(*centre, *radii);
                match paint {
                    Paint::Fill(color) => self.fill(&[points], *color),
                    Paint::Stroke(stroke) => self.stroke(&points, true, *stroke),
                }
            }
            DrawCommand::Glyphs { outline, paint } => match paint {
                Paint::Fill(color) => self.fill(outline.contours(), *color),
                Paint::Stroke(stroke) => {
                    for contour in outline.contours() {
                        self.stroke(contour, true, *stroke);
                    }
                }
            },
        }
    }
}

/// Pixel range `[x0, x1) × [y0, y1)` touched by points grown by `margin`,
/// clipped to the canvas. `None` when nothing is on the canvas.
fn pixel_span(
    points: impl IntoIterator<Item = DVec2>,
    margin: f64,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for p in points {
        if !p.is_finite() {
            continue;
        }
        min = min.min(p);
        max = max.max(p);
    }
    if min.x > max.x {
        return None;
    }
    let x0 = (min.x - margin).floor().max(0.0);
    let y0 = (min.y - margin).floor().max(0.0);
    let x1 = (max.x + margin).ceil().min(f64::from(width));
    let y1 = (max.y + margin).ceil().min(f64::from(height));
    (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Add the horizontal coverage of `[a, b)` to each pixel of `row`.
fn add_span(row: &mut [f64], a: f64, b: f64) {
    let a = a.max(0.0);
    let b = b.min(row.len() as f64);
    if b <= a {
        return;
    }
    let first = a.floor() as usize;
    let last = (b.ceil() as usize).min(row.len());
    for (i, slot) in row.iter_mut().enumerate().take(last).skip(first) {
        let lo = a.max(i as f64);
        let hi = b.min(i as f64 + 1.0);
        if hi > lo {
            *slot += hi - lo;
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Outline;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn square(min: f64, max: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ]
    }

    #[test]
    fn test_fill_covers_exact_pixels() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.draw(&DrawCommand::Polygon {
            points: square(2.0, 5.0),
            paint: Paint::Fill(RED),
        });
        let img = canvas.image();
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..5).contains(&x) && (2..5).contains(&y);
                let alpha = img.get_pixel(x, y).0[3];
                assert_eq!(alpha == 255, inside, "pixel ({x}, {y}) alpha {alpha}");
                if !inside {
                    assert_eq!(alpha, 0, "pixel ({x}, {y}) leaked");
                }
            }
        }
    }

    #[test]
    fn test_half_covered_pixels_blend_half() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.draw(&DrawCommand::Polygon {
            points: vec![
                DVec2::new(0.5, 0.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(4.0, 4.0),
                DVec2::new(0.5, 4.0),
            ],
            paint: Paint::Fill(RED),
        });
        let alpha = canvas.image().get_pixel(0, 1).0[3];
        assert!((120..=135).contains(&alpha), "alpha {alpha}");
    }

    #[test]
    fn test_nonzero_fill_keeps_overlaps_solid() {
        let mut outline = Outline::new();
        outline.push_contour(square(1.0, 5.0));
        outline.push_contour(square(3.0, 7.0));
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.draw(&DrawCommand::Glyphs {
            outline,
            paint: Paint::Fill(RED),
        });
        assert_eq!(canvas.image().get_pixel(4, 4).0[3], 255, "overlap must not cancel");
    }

    #[test]
    fn test_stroke_joins_blend_once() {
        let translucent = Rgba([0, 0, 0, 64]);
        let mut canvas = RasterCanvas::new(16, 16);
        canvas.draw(&DrawCommand::Bezier {
            start: DVec2::new(1.0, 8.0),
            ctrl1: DVec2::new(5.0, 8.0),
            ctrl2: DVec2::new(10.0, 8.0),
            end: DVec2::new(15.0, 8.0),
            stroke: Stroke::new(translucent, 2.0),
        });
        for x in 2..14 {
            let alpha = canvas.image().get_pixel(x, 8).0[3];
            assert_eq!(alpha, 64, "pixel ({x}, 8) blended {alpha}");
        }
    }

    #[test]
    fn test_disc_and_off_canvas_shapes() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.draw(&DrawCommand::disc(DVec2::new(5.0, 5.0), 3.5, RED));
        canvas.draw(&DrawCommand::disc(DVec2::new(-50.0, 5.0), 3.5, RED));
        assert_eq!(canvas.image().get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(canvas.image().get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_hairline_uses_thin_line() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.draw(&DrawCommand::Line {
            from: DVec2::new(0.0, 3.0),
            to: DVec2::new(9.0, 3.0),
            stroke: Stroke::new(RED, 1.0),
        });
        assert_eq!(canvas.image().get_pixel(4, 3).0[3], 255);
        assert_eq!(canvas.image().get_pixel(4, 5).0[3], 0);
    }
}
