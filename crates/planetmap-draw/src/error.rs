//! Drawing backend error types.

use std::path::PathBuf;

/// Errors that can occur when setting up text rendering.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// The font file could not be read.
    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        /// Font file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The font file is not a usable TrueType/OpenType font.
    #[error("invalid font file {}", .0.display())]
    InvalidFont(PathBuf),
}
