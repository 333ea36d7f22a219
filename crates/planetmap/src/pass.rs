//! One render pass: every chart drawn for one segment filter, then the
//! mosaics, textures and POI listing written to the pass directory.

use std::path::PathBuf;
use std::sync::Arc;

use glam::DVec3;
use image::RgbaImage;
use planetmap_config::Config;
use planetmap_cubesphere::{Chart, MercatorProjection, Orientation};
use planetmap_draw::{Rect, TextMetrics};
use planetmap_overlay::{ChartLayers, ChartRenderer, OverlayOptions};
use planetmap_tiles::{CropMode, FaceTile, assemble, slice};
use planetmap_waypoint::{ChartTracks, SegmentFilter, TravelStats, WaypointRecord, poi_listing, travel_stats};
use rayon::prelude::*;

use crate::contours::ContourMaps;
use crate::error::RenderError;
use crate::output::OutputDir;

/// The face tiles of `layers`, each showing the layer `pick` selects.
fn face_tiles(layers: &[(Chart, ChartLayers)], pick: fn(&ChartLayers) -> &RgbaImage) -> Vec<FaceTile<'_>> {
    layers
        .iter()
        .filter_map(|(chart, l)| {
            chart.face().map(|face| FaceTile {
                face,
                image: pick(l),
                bounds: l.bounds,
            })
        })
        .collect()
}

/// Text metrics shared by every chart renderer.
pub type Metrics = dyn TextMetrics + Send + Sync;

/// What one pass produced.
#[derive(Clone, Debug)]
pub struct PassSummary {
    /// Filter name; empty for the unfiltered pass.
    pub name: String,
    pub dir: PathBuf,
    pub stats: TravelStats,
    /// Content bounds of every chart, in chart image pixels.
    pub bounds: Vec<(Chart, Option<Rect>)>,
    /// Every file written, in order.
    pub files: Vec<PathBuf>,
}

/// Everything a pass reads. Shared by all passes of a run.
pub struct PassContext<'a> {
    pub config: &'a Config,
    pub contours: &'a ContourMaps,
    pub tracks: &'a [Vec<Arc<WaypointRecord>>],
    pub chart_tracks: &'a ChartTracks,
    /// Newest player waypoint, for crop-to-end bounds.
    pub end_name: Option<&'a str>,
    /// Planet centre in world coordinates.
    pub centre: DVec3,
    pub metrics: &'a Metrics,
    pub mercator: Option<MercatorProjection>,
}

impl PassContext<'_> {
    fn orientation(&self, chart: Chart) -> Orientation {
        chart
            .face()
            .map_or(Orientation::None, |face| self.config.render.face_orientations.get(face))
    }

    fn draw_charts(&self, filter: &SegmentFilter, options: OverlayOptions) -> Vec<(Chart, ChartLayers)> {
        let charts: Vec<Chart> = self.contours.charts().collect();
        charts
            .par_iter()
            .filter_map(|&chart| {
                let contour = self.contours.get(chart)?;
                let tracks = self.chart_tracks.get(&chart).map_or(&[][..], Vec::as_slice);
                let mut renderer = ChartRenderer::new(chart, self.orientation(chart), self.metrics, options);
                if let (Chart::Mercator, Some(projection)) = (chart, self.mercator) {
                    renderer = renderer.with_mercator(projection);
                }
                Some((chart, renderer.render(contour, tracks, filter, self.end_name)))
            })
            .collect()
    }

    /// Texture size of a pass: single-segment passes use the episode size.
    fn texture_size(&self, filter: &SegmentFilter) -> u32 {
        if filter.prefixes.len() == 1 {
            self.config.render.episode_texture_size
        } else {
            self.config.render.full_map_texture_size
        }
    }

    /// Render and write one pass.
    ///
    /// The unfiltered pass writes to the output root, every other pass to
    /// a subdirectory named after its filter.
    pub fn run(&self, filter: &SegmentFilter) -> Result<PassSummary, RenderError> {
        let render = &self.config.render;
        let root = &self.config.paths.output_dir;
        let dir = if filter.name.is_empty() {
            root.clone()
        } else {
            root.join(&filter.name)
        };
        let mut out = OutputDir::create(dir)?;

        let stats = travel_stats(self.tracks, filter, self.centre);
        tracing::info!(
            "Processing segment {} (Total {:.2}km / Ground {:.2}km / Elev {:.2}km)",
            if filter.name.is_empty() { "<all>" } else { filter.name.as_str() },
            stats.travelled / 1000.0,
            stats.over_ground / 1000.0,
            stats.elevation_change / 1000.0,
        );

        let options = OverlayOptions {
            include_aux_tracks: render.include_aux_tracks,
            crop_to_end: render.crop_to_end,
        };
        let layers = self.draw_charts(filter, options);

        for (chart, chart_layers) in &layers {
            match chart {
                Chart::Face(_) => {
                    if !render.crop_to_end {
                        out.save_image(&format!("{chart}.png"), &chart_layers.combined)?;
                    }
                    out.save_image(&format!("{chart}_base.png"), &chart_layers.base)?;
                    out.save_image(&format!("{chart}_overlay.png"), &chart_layers.overlay)?;
                }
                Chart::Mercator => out.save_image("mercator.png", &chart_layers.combined)?,
            }
        }

        let layout = &render.tile_layout;
        let base = assemble(layout, &face_tiles(&layers, |l| &l.base), CropMode::None, 0)?;
        out.save_image("tilemap_base.png", &base)?;
        let overlay = assemble(layout, &face_tiles(&layers, |l| &l.overlay), CropMode::None, 0)?;
        out.save_image("tilemap_overlay.png", &overlay)?;

        let combined = face_tiles(&layers, |l| &l.combined);
        if render.crop_to_end {
            if combined.iter().any(|t| t.bounds.is_some()) {
                let endmap = assemble(layout, &combined, CropMode::TextureGrid, render.end_texture_size)?;
                out.save_image("endmap.png", &endmap)?;
                if render.save_textures {
                    out.save_textures("endmap", &slice(&endmap, render.end_texture_size)?)?;
                }
            } else {
                tracing::warn!(end = ?self.end_name, "end waypoint is on no face, skipping endmap");
            }
        } else {
            let texture_size = self.texture_size(filter);
            let tilemap = assemble(layout, &combined, render.crop, texture_size)?;
            out.save_image("tilemap.png", &tilemap)?;
            if render.save_textures {
                out.save_textures("texture", &slice(&tilemap, texture_size)?)?;
            }
        }

        let mut poi = stats.to_string();
        for line in poi_listing(self.tracks, filter) {
            poi.push_str(&line);
            poi.push('\n');
        }
        out.save_text("poi.txt", &poi)?;

        let dir = out.path().to_path_buf();
        let files = out.into_files();
        tracing::debug!(pass = %filter.name, dir = %dir.display(), files = files.len(), "pass written");
        Ok(PassSummary {
            name: filter.name.clone(),
            dir,
            stats,
            bounds: layers.iter().map(|(chart, l)| (*chart, l.bounds)).collect(),
            files,
        })
    }
}
