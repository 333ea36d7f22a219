//! Image-space rectangles and the drawn-extent accumulator.

use glam::DVec2;

/// An axis-aligned rectangle in image space.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub min: DVec2,
    /// Bottom-right corner.
    pub max: DVec2,
}

impl Rect {
    /// Create a rectangle from two corners, in any order.
    #[must_use]
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Rectangle from a position and size.
    #[must_use]
    pub fn from_origin_size(origin: DVec2, size: DVec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Smallest rectangle containing every point, or `None` for no points.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |r, p| Self::new(r.min.min(p), r.max.max(p))))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns true if the rectangle has zero width or height.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlap of both rectangles, if they overlap at all.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.x <= max.x && min.y <= max.y).then_some(Rect { min, max })
    }

    /// Grow outward by `margin` on every side.
    #[must_use]
    pub fn expand_by(&self, margin: f64) -> Rect {
        Rect {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    #[must_use]
    pub fn translate(&self, offset: DVec2) -> Rect {
        Rect {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns true if `other` lies inside or on the boundary.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Returns true if the point lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Min/max rectangle grown by every drawn primitive.
///
/// Starts invalid (`min > max`) and only ever grows. When built with a clip
/// rectangle, each contribution is clipped first and contributions that
/// clip to zero area are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsAccumulator {
    min: DVec2,
    max: DVec2,
    clip: Option<Rect>,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
            clip: None,
        }
    }
}

impl BoundsAccumulator {
    /// An empty accumulator with no clipping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty accumulator clipping contributions to a `width × height`
    /// image.
    #[must_use]
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            clip: Some(Rect::new(DVec2::ZERO, DVec2::new(f64::from(width), f64::from(height)))),
            ..Self::default()
        }
    }

    /// Grow to include `rect`.
    pub fn include_rect(&mut self, rect: Rect) {
        let rect = match self.clip {
            Some(clip) => match clip.intersection(&rect) {
                Some(r) if !r.is_degenerate() => r,
                _ => return,
            },
            None => rect,
        };
        self.min = self.min.min(rect.min);
        self.max = self.max.max(rect.max);
    }

    /// Grow to include a square of half-size `half` around `centre`.
    pub fn include_box(&mut self, centre: DVec2, half: f64) {
        self.include_rect(Rect::new(centre - DVec2::splat(half), centre + DVec2::splat(half)));
    }

    /// Returns true if nothing has been included yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// The accumulated rectangle, or `None` if nothing with area was
    /// included.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        let rect = (!self.is_empty()).then_some(Rect {
            min: self.min,
            max: self.max,
        })?;
        (!rect.is_degenerate()).then_some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_accumulator_is_empty() {
        let acc = BoundsAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.rect().is_none());
    }

    #[test]
    fn test_growth_is_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xb0_0d5);
        let mut acc = BoundsAccumulator::for_image(256, 256);
        let mut previous: Option<Rect> = None;
        for _ in 0..500 {
            let a = DVec2::new(rng.random_range(-64.0..320.0), rng.random_range(-64.0..320.0));
            let size = DVec2::new(rng.random_range(0.0..40.0), rng.random_range(0.0..40.0));
            acc.include_rect(Rect::from_origin_size(a, size));
            let current = acc.rect();
            if let Some(prev) = previous {
                let cur = current.expect("bounds never shrink back to empty");
                assert!(cur.contains_rect(&prev), "{cur:?} lost part of {prev:?}");
            }
            previous = current.or(previous);
        }
    }

    #[test]
    fn test_clip_discards_off_image_contributions() {
        let mut acc = BoundsAccumulator::for_image(100, 50);
        acc.include_rect(Rect::new(DVec2::new(-30.0, 10.0), DVec2::new(-5.0, 40.0)));
        assert!(acc.is_empty(), "entirely off-image rect must be ignored");
        acc.include_rect(Rect::new(DVec2::new(90.0, 40.0), DVec2::new(120.0, 70.0)));
        let r = acc.rect().unwrap();
        assert_eq!(r, Rect::new(DVec2::new(90.0, 40.0), DVec2::new(100.0, 50.0)));
    }

    #[test]
    fn test_degenerate_bounds_have_no_rect() {
        let mut acc = BoundsAccumulator::new();
        acc.include_rect(Rect::new(DVec2::new(1.0, 1.0), DVec2::new(1.0, 5.0)));
        assert!(!acc.is_empty());
        assert!(acc.rect().is_none());
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::enclosing([DVec2::new(3.0, 1.0), DVec2::new(-1.0, 4.0)]).unwrap();
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 3.0);
        assert!(r.expand_by(1.0).contains_rect(&r));
        assert!(r.translate(DVec2::X).contains_point(DVec2::new(4.0, 4.0)));
        assert!(Rect::enclosing(std::iter::empty()).is_none());
    }
}
