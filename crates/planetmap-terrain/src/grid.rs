//! Row-major grid with a one-sample halo ring.

use planetmap_cubesphere::Orientation;

/// A `width × height` grid surrounded by a one-sample halo.
///
/// Coordinates passed to accessors are halo-inclusive: `(0, 0)` is the
/// top-left halo corner and the interior spans `1..=width`, `1..=height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderedGrid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> BorderedGrid<T> {
    /// A grid whose interior and halo are all `T::default()`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); (width + 2) * (height + 2)],
        }
    }

    /// Build a grid from interior samples in row-major order, leaving the
    /// halo at `T::default()`. Returns `None` if the sample count is wrong.
    #[must_use]
    pub fn from_interior(width: usize, height: usize, interior: &[T]) -> Option<Self> {
        if interior.len() != width * height {
            return None;
        }
        let mut grid = Self::new(width, height);
        for (row, src) in interior.chunks_exact(width.max(1)).enumerate() {
            let start = grid.offset(1, row + 1);
            grid.data[start..start + width].copy_from_slice(src);
        }
        Some(grid)
    }

    /// Build a grid by evaluating `f(x, y)` at every halo-inclusive cell.
    #[must_use]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let stride = width + 2;
        let data = (0..(width + 2) * (height + 2))
            .map(|i| f(i % stride, i / stride))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Interior width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row length including the halo.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width + 2
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride() + x
    }

    /// Sample at halo-inclusive `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x > width + 1` or `y > height + 1`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.offset(x, y)]
    }

    /// Halo-inclusive row `y`.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride();
        &self.data[start..start + self.stride()]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.offset(x, y);
        self.data[idx] = value;
    }

    /// Reorient a square grid, halo included.
    ///
    /// Non-square grids only support [`Orientation::None`] and are returned
    /// unchanged for any orientation.
    #[must_use]
    pub fn oriented(&self, orientation: Orientation) -> Self {
        if orientation == Orientation::None || self.width != self.height {
            return self.clone();
        }
        let n = self.stride();
        let mut out = Self::new(self.width, self.height);
        for row in 0..n {
            for col in 0..n {
                let (x, y) = orientation.map_index(col, row, n);
                out.set(x, y, self.get(col, row));
            }
        }
        out
    }
}
