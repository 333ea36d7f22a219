//! Waypoint labels.
//!
//! A label description starts with a two-character anchor directive
//! followed by the label body, e.g. `"^> Landing site"`. The directive says
//! on which side of the waypoint the text is attached and how the text
//! block is aligned there. Bodies may hold two sections separated by
//! `" / "` or a `----` line: the inbound and outbound commentary at a
//! segment junction. Lines are separated by a newline or by two spaces,
//! and a lone `|` stands for a blank divider line.

use glam::DVec2;
use image::Rgba;
use planetmap_draw::{Align, DrawCommand, Outline, Paint, Rect, TextMetrics, layout_block};
use planetmap_waypoint::{BOT_PREFIX, split_sections};

use crate::palette;

/// Distance from the waypoint to the attached text.
const MARGIN: f64 = 10.0;
/// Horizontal reach of the leader line for side-attached labels.
const LEADER_TO_MARGIN: f64 = 8.0;
/// Distance from the waypoint where the leader line starts.
const LEADER_FROM_MARGIN: f64 = 5.0;

/// Where a label sits relative to its waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LabelAnchor {
    /// Unit offset of the attach point from the waypoint.
    attach: DVec2,
    /// Position of the attach point within the text block, as fractions of
    /// its width and height.
    align: DVec2,
}

const TOP: DVec2 = DVec2::new(0.0, -1.0);
const LEFT: DVec2 = DVec2::new(-1.0, 0.0);
const RIGHT: DVec2 = DVec2::new(1.0, 0.0);
const BOTTOM: DVec2 = DVec2::new(0.0, 1.0);

impl LabelAnchor {
    const fn new(attach: DVec2, align_x: f64, align_y: f64) -> Self {
        Self {
            attach,
            align: DVec2::new(align_x, align_y),
        }
    }

    fn lookup(directive: &str) -> Option<Self> {
        let anchor = match directive {
            "^>" => Self::new(TOP, 0.0, 1.0),
            "¯>" => Self::new(RIGHT, 0.0, 0.0),
            "->" => Self::new(RIGHT, 0.0, 0.5),
            "_>" => Self::new(RIGHT, 0.0, 1.0),
            "v>" => Self::new(BOTTOM, 0.0, 0.0),
            "<^" => Self::new(TOP, 1.0, 1.0),
            "<¯" => Self::new(LEFT, 1.0, 0.0),
            "<-" => Self::new(LEFT, 1.0, 0.5),
            "<_" => Self::new(LEFT, 1.0, 1.0),
            "<v" => Self::new(BOTTOM, 1.0, 0.0),
            "^^" => Self::new(TOP, 0.5, 1.0),
            "vv" => Self::new(BOTTOM, 0.5, 0.0),
            "xx" => Self::new(DVec2::ZERO, 0.5, 0.5),
            _ => return None,
        };
        Some(anchor)
    }
}

/// Whether `directive` is a recognised anchor directive.
#[must_use]
pub fn is_anchor_directive(directive: &str) -> bool {
    LabelAnchor::lookup(directive).is_some()
}

/// A label outline in image coordinates, ready to stroke and fill.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLabel {
    pub outline: Outline,
    pub color: Rgba<u8>,
}

impl PlacedLabel {
    /// The white outline drawn behind every label.
    #[must_use]
    pub fn halo(&self) -> DrawCommand {
        DrawCommand::Glyphs {
            outline: self.outline.clone(),
            paint: Paint::Stroke(palette::LABEL_OUTLINE),
        }
    }

    /// The label body.
    #[must_use]
    pub fn body(&self) -> DrawCommand {
        DrawCommand::Glyphs {
            outline: self.outline.clone(),
            paint: Paint::Fill(self.color),
        }
    }

    /// Extent of the label including its outline.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.outline
            .bounds()
            .map(|r| r.expand_by(palette::LABEL_OUTLINE.width))
    }
}

/// Lays out waypoint labels with one set of text metrics.
pub struct LabelPlacer<'m, M: TextMetrics + ?Sized> {
    metrics: &'m M,
}

impl<'m, M: TextMetrics + ?Sized> LabelPlacer<'m, M> {
    #[must_use]
    pub fn new(metrics: &'m M) -> Self {
        Self { metrics }
    }

    /// Place the label of a waypoint description at `pos`, colouring bot
    /// labels differently.
    #[must_use]
    pub fn place_description(
        &self,
        description: &str,
        pos: DVec2,
        hide_first: bool,
        hide_second: bool,
    ) -> Option<PlacedLabel> {
        let (text, color) = match description.strip_prefix(BOT_PREFIX) {
            Some(rest) => (rest.trim_start(), palette::LABEL_BOT_TEXT),
            None => (description, palette::LABEL_TEXT),
        };
        let outline = self.place(text, pos, hide_first, hide_second)?;
        Some(PlacedLabel { outline, color })
    }

    /// Lay out `text` for a waypoint at `pos`.
    ///
    /// Returns `None` when the directive is unknown or nothing is left to
    /// draw. `hide_first`/`hide_second` drop the inbound or outbound
    /// section of a two-section body.
    #[must_use]
    pub fn place(&self, text: &str, pos: DVec2, hide_first: bool, hide_second: bool) -> Option<Outline> {
        let (directive, body) = text.split_once(' ').unwrap_or((text, ""));
        let anchor = LabelAnchor::lookup(directive)?;
        let font_height = self.metrics.line_height();
        let space_width = self.metrics.advance("| |") - self.metrics.advance("||");
        let halign = Align::from_fraction(anchor.align.x);
        let valign = Align::from_fraction(anchor.align.y);

        let mut sections: Vec<Vec<String>> = split_sections(body).into_iter().map(section_lines).collect();
        if sections.len() == 2 {
            if hide_first && !hide_second {
                let mut kept: Vec<String> = sections[0].iter().take_while(|l| *l == "|").cloned().collect();
                kept.extend(sections.swap_remove(1));
                sections = vec![kept];
            } else if hide_second && !hide_first {
                let second = sections.swap_remove(1);
                let dividers = second.iter().rev().take_while(|l| *l == "|").count();
                sections[0].extend(second[second.len() - dividers..].iter().cloned());
            }
        }

        let mut rules: Vec<f64> = sections.iter().map(|s| s.len() as f64).collect();
        let mut lines: Vec<String> = sections.into_iter().flatten().map(|l| expand_divider(&l)).collect();

        let mut attach_point = anchor.attach * MARGIN;
        let mut leader_to = DVec2::new(anchor.attach.x * LEADER_TO_MARGIN, anchor.attach.y * MARGIN);

        // Labels made only of padded lines are pulled in by the padding.
        if lines.iter().all(|l| l.is_empty() || l.starts_with("  ") || l.ends_with("  ")) {
            let shift = (anchor.align.x - 0.5) * space_width * 4.0;
            leader_to.x -= shift;
            attach_point.x -= shift;
            for line in &mut lines {
                *line = line.trim().to_owned();
            }
        }

        let blank = match valign {
            Align::Near => {
                let leading = lines.iter().take_while(|l| l.is_empty()).count();
                for rule in &mut rules {
                    *rule -= leading as f64;
                }
                leading
            }
            Align::Far => lines.iter().rev().take_while(|l| l.is_empty()).count(),
            Align::Center => 0,
        };
        let blank_shift = font_height * blank as f64 * (anchor.align.y - 0.5) * 2.0;
        attach_point.y -= blank_shift;
        leader_to.y -= blank_shift;

        let first = lines.iter().position(|l| !l.is_empty())?;
        let last = lines.iter().rposition(|l| !l.is_empty())?;
        let lines = &lines[first..=last];

        let mut outline = layout_block(self.metrics, lines, halign, valign);
        let text_rect = outline.bounds()?;

        let mut rule_y = text_rect.min.y;
        for rule in rules.iter().take(rules.len().saturating_sub(1)) {
            rule_y += rule * font_height;
            outline.push_rect(Rect::from_origin_size(
                DVec2::new(text_rect.min.x, rule_y - 2.5),
                DVec2::new(text_rect.width(), 1.0),
            ));
        }

        if halign != Align::Center || valign != Align::Center {
            if attach_point.x == 0.0 {
                leader_to.x -= (anchor.align.x - 0.5) * space_width * 2.0;
            } else {
                leader_to.y -= (anchor.align.y - 0.5) * font_height * lines.len() as f64 * 0.5;
            }
            if let Some(leader_from) = leader_start(leader_to) {
                outline.push_bar(leader_from - attach_point, leader_to - attach_point, 1.0);
            }
        }

        Some(outline.translated(pos + attach_point))
    }
}

/// Split one section into trimmed, non-empty lines.
fn section_lines(section: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = section.trim_matches(' ');
    loop {
        let next = ["  ", "\n"]
            .iter()
            .filter_map(|sep| rest.find(sep).map(|at| (at, sep.len())))
            .min_by_key(|(at, _)| *at);
        let (line, tail) = match next {
            Some((at, len)) => (&rest[..at], Some(&rest[at + len..])),
            None => (rest, None),
        };
        if !line.is_empty() {
            lines.push(line.trim_matches(' ').to_owned());
        }
        match tail {
            Some(tail) => rest = tail,
            None => return lines,
        }
    }
}

/// Turn divider markup into blank space: `|` is an empty line, `| x`
/// indents and `x |` pads.
fn expand_divider(line: &str) -> String {
    if line == "|" {
        String::new()
    } else if let Some(rest) = line.strip_prefix("| ") {
        format!("  {rest}")
    } else if let Some(rest) = line.strip_suffix(" |") {
        format!("{rest}  ")
    } else {
        line.to_owned()
    }
}

/// Start of the leader line: a fixed distance from the waypoint along the
/// dominant axis of `to`.
fn leader_start(to: DVec2) -> Option<DVec2> {
    if to.x.abs() > to.y.abs() {
        Some(DVec2::new(to.x.signum() * LEADER_FROM_MARGIN, to.y / to.x.abs() * LEADER_FROM_MARGIN))
    } else if to.y != 0.0 {
        Some(DVec2::new(to.x / to.y.abs() * LEADER_FROM_MARGIN, to.y.signum() * LEADER_FROM_MARGIN))
    } else {
        None
    }
}
