//! One chart's layers.
//!
//! The graticule goes onto the terrain base. Tracks go onto a transparent
//! overlay in a fixed order: every label halo, then markers, then paths,
//! then ticks, then every label body. Halos never cover another label's
//! text this way. The combined layer is the overlay blended over the base.

use glam::DVec2;
use image::RgbaImage;
use planetmap_cubesphere::{Chart, MercatorProjection, Orientation};
use planetmap_draw::{BoundsAccumulator, DrawCommand, RasterCanvas, Rasterizer, Rect, TextMetrics};
use planetmap_waypoint::{ProjectedWaypoint, SegmentFilter};

use crate::graticule::graticule;
use crate::label::{LabelPlacer, PlacedLabel};
use crate::markers::{poi_markers, tick_marks};
use crate::path::track_legs;
use crate::track::{TrackPoint, Visibility, image_point, image_track};

/// Per-pass drawing switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Draw auxiliary tracks when no segment filter is active.
    pub include_aux_tracks: bool,
    /// Bound the chart by the end waypoint only.
    pub crop_to_end: bool,
}

/// The images and content bounds of one drawn chart.
#[derive(Clone, Debug)]
pub struct ChartLayers {
    /// Terrain with the graticule.
    pub base: RgbaImage,
    /// Tracks, markers and labels on transparency.
    pub overlay: RgbaImage,
    /// `overlay` blended over `base`.
    pub combined: RgbaImage,
    /// Region holding drawn content, clipped to the image.
    pub bounds: Option<Rect>,
}

/// Draws the waypoint layers of a single chart.
pub struct ChartRenderer<'m, M: TextMetrics + ?Sized> {
    chart: Chart,
    orientation: Orientation,
    mercator: Option<MercatorProjection>,
    labels: LabelPlacer<'m, M>,
    options: OverlayOptions,
}

impl<'m, M: TextMetrics + ?Sized> ChartRenderer<'m, M> {
    #[must_use]
    pub fn new(chart: Chart, orientation: Orientation, metrics: &'m M, options: OverlayOptions) -> Self {
        Self {
            chart,
            orientation,
            mercator: None,
            labels: LabelPlacer::new(metrics),
            options,
        }
    }

    /// Use `projection` for the Mercator graticule.
    #[must_use]
    pub fn with_mercator(mut self, projection: MercatorProjection) -> Self {
        self.mercator = Some(projection);
        self
    }

    /// Draw `tracks` over the `contour` terrain image.
    ///
    /// Tracks with fewer than two points draw nothing. Computer-controlled
    /// tracks are drawn underneath player tracks. Legs wrapping across the
    /// chart are not drawn but still grow the bounds. `end_name` is the
    /// waypoint the bounds shrink to under [`OverlayOptions::crop_to_end`].
    #[must_use]
    pub fn render(
        &self,
        contour: &RgbaImage,
        tracks: &[Vec<ProjectedWaypoint>],
        segments: &SegmentFilter,
        end_name: Option<&str>,
    ) -> ChartLayers {
        let (width, height) = contour.dimensions();
        let grid = graticule(self.chart, width, height, self.mercator.as_ref());

        let mut base = RasterCanvas::from_image(contour.clone());
        base.draw_all(&grid);
        let base = base.into_image();

        let mut drawn: Vec<Vec<TrackPoint>> = tracks
            .iter()
            .filter(|t| t.len() >= 2)
            .map(|t| image_track(t, self.orientation, width, height))
            .collect();
        drawn.sort_by_key(|t| t.first().is_some_and(|p| p.record.is_player));

        let visibility = Visibility::new(segments, self.options.include_aux_tracks);
        let mut overlay = RasterCanvas::new(width, height);
        if !drawn.is_empty() {
            overlay.draw_all(&grid);
        }

        let labels = self.place_labels(&drawn, &visibility);
        for label in &labels {
            overlay.draw(&label.halo());
        }

        let size = DVec2::new(f64::from(width), f64::from(height));
        let mut content: Vec<DrawCommand> = drawn.iter().flat_map(|t| poi_markers(t, &visibility)).collect();
        let mut hidden = Vec::new();
        for track in &drawn {
            for leg in track_legs(track, &visibility, size) {
                if leg.visible {
                    content.push(leg.command());
                } else if leg.bounded {
                    hidden.push(leg.command());
                }
            }
        }
        overlay.draw_all(&content);
        for track in &drawn {
            overlay.draw_all(&tick_marks(track, segments));
        }
        for label in &labels {
            overlay.draw(&label.body());
        }
        let overlay = overlay.into_image();

        let mut bounds = BoundsAccumulator::for_image(width, height);
        if self.options.crop_to_end {
            let image_rect = Rect::new(DVec2::ZERO, size);
            let end = end_name.and_then(|name| {
                tracks
                    .iter()
                    .flatten()
                    .find(|w| w.record.name == name)
                    .map(|w| image_point(w.point, self.orientation, width, height))
            });
            if let Some(pos) = end.filter(|p| image_rect.contains_point(*p)) {
                bounds.include_box(pos, 1.0);
            }
        } else {
            for rect in content.iter().chain(&hidden).filter_map(DrawCommand::extent) {
                bounds.include_rect(rect);
            }
            for rect in labels.iter().filter_map(PlacedLabel::bounds) {
                bounds.include_rect(rect);
            }
        }

        let mut combined = base.clone();
        image::imageops::overlay(&mut combined, &overlay, 0, 0);

        let bounds = bounds.rect();
        tracing::debug!(
            chart = %self.chart,
            tracks = drawn.len(),
            labels = labels.len(),
            ?bounds,
            "Chart layers drawn"
        );
        ChartLayers {
            base,
            overlay,
            combined,
            bounds,
        }
    }

    fn place_labels(&self, tracks: &[Vec<TrackPoint>], visibility: &Visibility) -> Vec<PlacedLabel> {
        tracks
            .iter()
            .flatten()
            .filter(|p| visibility.shows_label(&p.record))
            .filter_map(|p| {
                let (hide_first, hide_second) = visibility.segments.hidden_sections(&p.record);
                self.labels
                    .place_description(&p.record.description, p.pos, hide_first, hide_second)
            })
            .collect()
    }
}
