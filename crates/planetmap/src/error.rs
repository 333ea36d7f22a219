//! Pipeline error types.

use std::path::PathBuf;

use planetmap_terrain::TerrainError;
use planetmap_tiles::TileError;
use planetmap_waypoint::WaypointError;

/// Errors that abort a render run.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Face rasters could not be loaded.
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// The waypoint document could not be loaded.
    #[error(transparent)]
    Waypoint(#[from] WaypointError),

    /// A mosaic could not be assembled.
    #[error(transparent)]
    Tiles(#[from] TileError),

    /// An output directory or text file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output image could not be encoded.
    #[error("failed to save {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
