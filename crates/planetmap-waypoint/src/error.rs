//! Waypoint loading error types.

/// Errors that can occur when reading a waypoint document.
#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    /// The document could not be read from disk.
    #[error("failed to read waypoints: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid waypoint JSON.
    #[error("failed to parse waypoints: {0}")]
    Parse(#[from] serde_json::Error),
}
