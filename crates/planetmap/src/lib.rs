//! Planet map rendering pipeline.
//!
//! Loads the six face rasters and the waypoint document, shades every
//! chart once, then runs one pass per segment filter. Each pass draws the
//! waypoint overlays, assembles the face mosaics and writes everything to
//! its output directory.

mod contours;
mod error;
mod output;
mod pass;

use glam::DVec3;
use planetmap_config::Config;
use planetmap_draw::{BlockMetrics, FontMetrics};
use planetmap_terrain::CubeGrids;
use planetmap_waypoint::{
    SegmentFilter, WaypointDocument, WaypointProjector, latest_player_waypoint, path_tracks, segment_filters,
};

pub use contours::ContourMaps;
pub use error::RenderError;
pub use output::OutputDir;
pub use pass::{Metrics, PassContext, PassSummary};

/// Renders map sets for one configuration.
pub struct Pipeline<'c> {
    config: &'c Config,
    metrics: Box<Metrics>,
}

impl<'c> Pipeline<'c> {
    /// A pipeline labelling with the configured font.
    ///
    /// Falls back to block glyphs if no font is configured or it fails to
    /// load.
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        let size = config.font.size;
        let metrics: Box<Metrics> = match &config.font.path {
            Some(path) => match FontMetrics::load(path, size) {
                Ok(font) => Box::new(font),
                Err(e) => {
                    tracing::warn!("{e}; using block glyphs");
                    Box::new(BlockMetrics::new(size))
                }
            },
            None => Box::new(BlockMetrics::new(size)),
        };
        Self { config, metrics }
    }

    /// Load the inputs named by the config and render every pass.
    pub fn run(&self) -> Result<Vec<PassSummary>, RenderError> {
        let grids = CubeGrids::load_dir(&self.config.paths.face_dir)?;
        let document = WaypointDocument::load(&self.config.paths.waypoints)?;
        let contours = ContourMaps::render(&grids, self.config);
        self.render(&contours, &document)
    }

    /// Render every pass over already shaded charts.
    ///
    /// With crop-to-end only the unfiltered pass runs.
    pub fn render(
        &self,
        contours: &ContourMaps,
        document: &WaypointDocument,
    ) -> Result<Vec<PassSummary>, RenderError> {
        let render = &self.config.render;
        let mercator = self.config.mercator.projection().filter(|_| contours.has_mercator());

        let mut projector = WaypointProjector::new(document.planet.frame(), contours.face_size(), render.rotate45);
        if let Some(projection) = mercator {
            projector = projector.with_mercator(projection);
        }
        let tracks = path_tracks(document.records());
        let chart_tracks = projector.project(&tracks);

        let filters = if render.crop_to_end {
            vec![SegmentFilter::all()]
        } else {
            segment_filters(&tracks, &render.chapters)
        };
        let context = PassContext {
            config: self.config,
            contours,
            tracks: &tracks,
            chart_tracks: &chart_tracks,
            end_name: latest_player_waypoint(&tracks),
            centre: DVec3::from_array(document.planet.centre),
            metrics: self.metrics.as_ref(),
            mercator,
        };
        tracing::info!(
            tracks = tracks.len(),
            passes = filters.len(),
            output = %self.config.paths.output_dir.display(),
            "Rendering map passes"
        );

        let summaries = filters
            .iter()
            .map(|filter| context.run(filter))
            .collect::<Result<Vec<_>, _>>()?;
        let files: usize = summaries.iter().map(|s| s.files.len()).sum();
        tracing::info!(passes = summaries.len(), files, "Maps written");
        Ok(summaries)
    }
}
