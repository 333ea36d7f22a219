//! Output directory writer.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use planetmap_tiles::TextureTile;

use crate::error::RenderError;

/// One pass's output directory and the files written to it so far.
#[derive(Debug)]
pub struct OutputDir {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl OutputDir {
    /// Create `dir` and any missing parents.
    pub fn create(dir: PathBuf) -> Result<Self, RenderError> {
        std::fs::create_dir_all(&dir).map_err(|source| RenderError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, files: Vec::new() })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Encode `image` as `name`; the format follows the extension.
    pub fn save_image(&mut self, name: &str, image: &RgbaImage) -> Result<(), RenderError> {
        let path = self.dir.join(name);
        image
            .save(&path)
            .map_err(|source| RenderError::Image { path: path.clone(), source })?;
        tracing::trace!(path = %path.display(), width = image.width(), height = image.height(), "saved image");
        self.files.push(path);
        Ok(())
    }

    /// Save each texture as `<basename>+<column>+<row>.png`.
    pub fn save_textures(&mut self, basename: &str, textures: &[TextureTile]) -> Result<(), RenderError> {
        for texture in textures {
            self.save_image(&texture.file_name(basename), &texture.image)?;
        }
        Ok(())
    }

    pub fn save_text(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        let path = self.dir.join(name);
        std::fs::write(&path, text).map_err(|source| RenderError::Io { path: path.clone(), source })?;
        self.files.push(path);
        Ok(())
    }

    /// Every file written, in order.
    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}
