//! Text measurement and glyph outlines.
//!
//! [`TextMetrics`] is the seam between label layout and a concrete font.
//! [`FontMetrics`] wraps a TrueType font loaded with `rusttype`;
//! [`BlockMetrics`] is a built-in bitmap font that needs no files.

use std::path::Path;

use glam::DVec2;
use rusttype::{Font, Scale, point};

use crate::block_font;
use crate::bounds::Rect;
use crate::error::DrawError;
use crate::outline::{Outline, OutlineSink};

/// Where text sits relative to its anchor along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// Text starts at the anchor.
    Near,
    /// Text is centred on the anchor.
    Center,
    /// Text ends at the anchor.
    Far,
}

impl Align {
    /// Alignment for a fractional position in `[0, 1]`: a quarter or less
    /// is near, three quarters or more is far.
    #[must_use]
    pub fn from_fraction(f: f64) -> Self {
        if f <= 0.25 {
            Align::Near
        } else if f >= 0.75 {
            Align::Far
        } else {
            Align::Center
        }
    }

    /// Offset of the start of a run of `extent` from the anchor.
    fn offset(self, extent: f64) -> f64 {
        match self {
            Align::Near => 0.0,
            Align::Center => -extent * 0.5,
            Align::Far => -extent,
        }
    }
}

/// Measures text and produces glyph outlines for one font at one size.
pub trait TextMetrics {
    /// Distance between consecutive baselines.
    fn line_height(&self) -> f64;

    /// Horizontal advance of a single line.
    fn advance(&self, text: &str) -> f64;

    /// Outline of a single line whose line box starts at `origin`.
    fn glyph_outline(&self, text: &str, origin: DVec2) -> Outline;
}

/// Lay out `lines` as one block anchored at the origin.
///
/// Each line is aligned horizontally on its own; the block as a whole is
/// aligned vertically. Empty lines take up space but draw nothing.
pub fn layout_block<M: TextMetrics + ?Sized>(metrics: &M, lines: &[String], horizontal: Align, vertical: Align) -> Outline {
    let line_height = metrics.line_height();
    let top = vertical.offset(line_height * lines.len() as f64);
    let mut outline = Outline::new();
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let x = horizontal.offset(metrics.advance(line));
        let y = top + line_height * i as f64;
        outline.extend(metrics.glyph_outline(line, DVec2::new(x, y)));
    }
    outline
}

// --- TrueType ---

/// A TrueType or OpenType font at a fixed pixel size.
pub struct FontMetrics {
    font: Font<'static>,
    scale: Scale,
}

impl FontMetrics {
    /// Wrap font file contents.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::InvalidFont`] if the data is not a font.
    pub fn from_bytes(data: Vec<u8>, size: f64, origin: &Path) -> Result<Self, DrawError> {
        let font = Font::try_from_vec(data).ok_or_else(|| DrawError::InvalidFont(origin.to_path_buf()))?;
        Ok(Self {
            font,
            scale: Scale::uniform(size as f32),
        })
    }

    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::FontRead`] if the file cannot be read and
    /// [`DrawError::InvalidFont`] if it is not a font.
    pub fn load(path: &Path, size: f64) -> Result<Self, DrawError> {
        let data = std::fs::read(path).map_err(|source| DrawError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let metrics = Self::from_bytes(data, size, path)?;
        tracing::info!(path = %path.display(), size, "loaded label font");
        Ok(metrics)
    }

    fn ascent(&self) -> f64 {
        f64::from(self.font.v_metrics(self.scale).ascent)
    }
}

impl TextMetrics for FontMetrics {
    fn line_height(&self) -> f64 {
        let v = self.font.v_metrics(self.scale);
        f64::from(v.ascent - v.descent + v.line_gap)
    }

    fn advance(&self, text: &str) -> f64 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map_or(0.0, |g| {
                f64::from(g.position().x + g.unpositioned().h_metrics().advance_width)
            })
    }

    fn glyph_outline(&self, text: &str, origin: DVec2) -> Outline {
        let start = point(origin.x as f32, (origin.y + self.ascent()) as f32);
        let mut sink = OutlineSink::default();
        for glyph in self.font.layout(text, self.scale, start) {
            glyph.build_outline(&mut sink);
        }
        sink.finish()
    }
}

// --- Built-in bitmap font ---

/// The built-in 5×7 bitmap font scaled to a pixel size.
///
/// Every character advances by six cells; characters outside printable
/// ASCII draw as `?`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMetrics {
    cell: f64,
}

impl BlockMetrics {
    /// A font whose cell grid is `size` pixels tall.
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self {
            cell: size / block_font::ROWS as f64,
        }
    }
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl TextMetrics for BlockMetrics {
    fn line_height(&self) -> f64 {
        self.cell * (block_font::ROWS + 1) as f64
    }

    fn advance(&self, text: &str) -> f64 {
        self.cell * ((block_font::COLUMNS + 1) * text.chars().count()) as f64
    }

    fn glyph_outline(&self, text: &str, origin: DVec2) -> Outline {
        let mut outline = Outline::new();
        let step = self.cell * (block_font::COLUMNS + 1) as f64;
        for (i, c) in text.chars().enumerate() {
            let left = origin.x + step * i as f64;
            for (col, bits) in block_font::glyph(c).iter().enumerate() {
                let x = left + self.cell * col as f64;
                // One rectangle per vertical run of set bits.
                let mut row = 0;
                while row < block_font::ROWS {
                    if bits & (1 << row) == 0 {
                        row += 1;
                        continue;
                    }
                    let first = row;
                    while row < block_font::ROWS && bits & (1 << row) != 0 {
                        row += 1;
                    }
                    let y0 = origin.y + self.cell * first as f64;
                    let y1 = origin.y + self.cell * row as f64;
                    outline.push_rect(Rect::new(DVec2::new(x, y0), DVec2::new(x + self.cell, y1)));
                }
            }
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EPSILON: f64 = 1e-9;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_fraction_thresholds() {
        assert_eq!(Align::from_fraction(0.0), Align::Near);
        assert_eq!(Align::from_fraction(0.25), Align::Near);
        assert_eq!(Align::from_fraction(0.5), Align::Center);
        assert_eq!(Align::from_fraction(0.75), Align::Far);
        assert_eq!(Align::from_fraction(1.0), Align::Far);
    }

    #[test]
    fn test_block_metrics_measure_cells() {
        let m = BlockMetrics::new(8.0);
        assert!((m.advance("abc") - 18.0).abs() < EPSILON);
        assert!((m.line_height() - 9.0).abs() < EPSILON);
        let space = m.advance("| |") - m.advance("||");
        assert!((space - 6.0).abs() < EPSILON, "space width {space}");
    }

    #[test]
    fn test_block_glyph_runs() {
        let m = BlockMetrics::new(8.0);
        let bar = m.glyph_outline("|", DVec2::new(10.0, 20.0));
        assert_eq!(bar.contours().len(), 1, "a bar is one vertical run");
        assert_eq!(
            bar.bounds().unwrap(),
            Rect::new(DVec2::new(12.0, 20.0), DVec2::new(13.0, 27.0))
        );
        assert!(m.glyph_outline(" ", DVec2::ZERO).is_empty());
    }

    #[test]
    fn test_layout_alignment() {
        let m = BlockMetrics::new(8.0);
        let text = lines(&["HH", "H"]);

        let near = layout_block(&m, &text, Align::Near, Align::Near).bounds().unwrap();
        assert!(near.min.x >= 0.0 && near.min.y >= 0.0, "{near:?}");

        let far = layout_block(&m, &text, Align::Far, Align::Far).bounds().unwrap();
        assert!(far.max.x <= 0.0 && far.max.y <= 0.0, "{far:?}");

        let centre = layout_block(&m, &text, Align::Center, Align::Center).bounds().unwrap();
        assert!(centre.min.x < 0.0 && centre.max.x > 0.0, "{centre:?}");
        assert!((centre.min.y + 9.0).abs() < EPSILON, "block of two lines starts one line up: {centre:?}");
    }

    #[test]
    fn test_blank_lines_take_space() {
        let m = BlockMetrics::new(8.0);
        let b = layout_block(&m, &lines(&["", "H"]), Align::Near, Align::Near).bounds().unwrap();
        assert!((b.min.y - 9.0).abs() < EPSILON, "{b:?}");
    }

    #[test]
    fn test_font_load_errors() {
        let missing = std::env::temp_dir().join("planetmap-no-such-font.ttf");
        assert!(matches!(FontMetrics::load(&missing, 12.0), Err(DrawError::FontRead { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();
        assert!(matches!(
            FontMetrics::load(file.path(), 12.0),
            Err(DrawError::InvalidFont(_))
        ));
    }
}
