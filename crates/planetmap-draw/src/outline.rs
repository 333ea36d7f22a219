//! Filled outlines made of closed polyline contours.

use glam::DVec2;

use crate::bounds::Rect;
use crate::curve::{flatten_cubic, flatten_quad_tail};

/// A set of closed contours filled with the nonzero winding rule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    contours: Vec<Vec<DVec2>>,
}

impl Outline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The closed contours. The first point of each is not repeated.
    #[must_use]
    pub fn contours(&self) -> &[Vec<DVec2>] {
        &self.contours
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Add a closed contour. Contours with fewer than three points are
    /// ignored.
    pub fn push_contour(&mut self, mut points: Vec<DVec2>) {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 3 {
            self.contours.push(points);
        }
    }

    /// Add a rectangle, wound clockwise in image space.
    pub fn push_rect(&mut self, rect: Rect) {
        self.push_contour(vec![
            rect.min,
            DVec2::new(rect.max.x, rect.min.y),
            rect.max,
            DVec2::new(rect.min.x, rect.max.y),
        ]);
    }

    /// Add a straight bar of `width` from `from` to `to`, with square ends.
    pub fn push_bar(&mut self, from: DVec2, to: DVec2, width: f64) {
        let dir = (to - from).normalize_or_zero();
        if dir == DVec2::ZERO {
            return;
        }
        let n = dir.perp() * (width * 0.5);
        self.push_contour(vec![from - n, to - n, to + n, from + n]);
    }

    /// Append every contour of `other`.
    pub fn extend(&mut self, other: Outline) {
        self.contours.extend(other.contours);
    }

    /// Move every contour by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: DVec2) -> Self {
        for p in self.contours.iter_mut().flatten() {
            *p += offset;
        }
        self
    }

    /// Bounding rectangle of every contour point.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::enclosing(self.contours.iter().flatten().copied())
    }
}

/// Collects glyph outlines, flattening their curves.
#[derive(Debug, Default)]
pub(crate) struct OutlineSink {
    outline: Outline,
    current: Vec<DVec2>,
}

impl OutlineSink {
    fn last(&self) -> DVec2 {
        self.current.last().copied().unwrap_or(DVec2::ZERO)
    }

    fn flush(&mut self) {
        let contour = std::mem::take(&mut self.current);
        self.outline.push_contour(contour);
    }

    pub(crate) fn finish(mut self) -> Outline {
        self.flush();
        self.outline
    }
}

impl rusttype::OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.current.push(DVec2::new(f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.push(DVec2::new(f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.last();
        let p1 = DVec2::new(f64::from(x1), f64::from(y1));
        let p2 = DVec2::new(f64::from(x), f64::from(y));
        self.current.extend(flatten_quad_tail(p0, p1, p2));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p0 = self.last();
        let p1 = DVec2::new(f64::from(x1), f64::from(y1));
        let p2 = DVec2::new(f64::from(x2), f64::from(y2));
        let p3 = DVec2::new(f64::from(x), f64::from(y));
        self.current.extend(flatten_cubic(p0, p1, p2, p3).into_iter().skip(1));
    }

    fn close(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusttype::OutlineBuilder;

    #[test]
    fn test_short_contours_are_dropped() {
        let mut outline = Outline::new();
        outline.push_contour(vec![DVec2::ZERO, DVec2::X]);
        outline.push_contour(vec![DVec2::ZERO, DVec2::X, DVec2::ZERO]);
        assert!(outline.is_empty());
    }

    #[test]
    fn test_bar_and_rect_bounds() {
        let mut outline = Outline::new();
        outline.push_bar(DVec2::ZERO, DVec2::new(10.0, 0.0), 2.0);
        outline.push_rect(Rect::new(DVec2::new(0.0, 5.0), DVec2::new(3.0, 6.0)));
        let b = outline.bounds().unwrap();
        assert_eq!(b, Rect::new(DVec2::new(0.0, -1.0), DVec2::new(10.0, 6.0)));
        let moved = outline.translated(DVec2::new(1.0, 1.0)).bounds().unwrap();
        assert_eq!(moved.min, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_sink_flattens_curves_into_contours() {
        let mut sink = OutlineSink::default();
        sink.move_to(0.0, 0.0);
        sink.line_to(10.0, 0.0);
        sink.quad_to(10.0, 10.0, 0.0, 10.0);
        sink.close();
        sink.move_to(20.0, 0.0);
        sink.curve_to(25.0, 0.0, 25.0, 5.0, 20.0, 5.0);
        let outline = sink.finish();
        assert_eq!(outline.contours().len(), 2);
        assert!(outline.contours()[0].len() > 3);
        let b = outline.bounds().unwrap();
        assert!(b.max.x <= 25.0 && b.max.y <= 10.0);
    }
}
