//! Command-line argument parsing for the planet map renderer.

use std::path::PathBuf;

use clap::Parser;
use planetmap_cubesphere::{CubeFace, Orientation};
use planetmap_terrain::ShadingMode;
use planetmap_tiles::{CropMode, TileLayout};

use crate::{Config, ConfigError};

/// Planet map renderer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetmap", about = "Render cube-sphere planet maps with travel overlays")]
pub struct CliArgs {
    /// Directory holding the face height and material rasters.
    #[arg(long)]
    pub faces: Option<PathBuf>,

    /// JSON waypoint document.
    #[arg(long)]
    pub waypoints: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Draw contour lines (true/false).
    #[arg(long)]
    pub contour_lines: Option<bool>,

    /// Shade by slope.
    #[arg(long, conflicts_with = "relief_shading")]
    pub slope_shading: bool,

    /// Shade by pseudo hill-shade.
    #[arg(long)]
    pub relief_shading: bool,

    /// Render the cube turned 45° about the polar axis.
    #[arg(long)]
    pub rotate45: bool,

    /// Crop tile maps to their content.
    #[arg(long, conflicts_with = "crop_texture")]
    pub crop: bool,

    /// Crop tile maps to whole textures and save the textures.
    #[arg(long)]
    pub crop_texture: bool,

    /// Only render the full pass, plus a map of the end position.
    #[arg(long)]
    pub crop_to_end: bool,

    /// Draw auxiliary tracks in the full pass.
    #[arg(long)]
    pub include_aux: bool,

    /// Add a chapter pass `Pab-cd` (repeatable).
    #[arg(long = "chapter")]
    pub chapters: Vec<String>,

    /// Tile layout, rows split by `,` and cells by `:`, e.g. `:Up:,Left:Front:Right,:Down:`.
    #[arg(long)]
    pub tile_layout: Option<String>,

    /// Face orientations, e.g. `up=ccw,front=180flip`.
    #[arg(long)]
    pub rotate: Option<String>,

    /// Texture size of single-segment passes.
    #[arg(long)]
    pub texture_size: Option<u32>,

    /// Texture size of the other passes.
    #[arg(long)]
    pub full_map_texture_size: Option<u32>,

    /// Texture size of the end-position map.
    #[arg(long)]
    pub end_texture_size: Option<u32>,

    /// Cut tile maps into textures.
    #[arg(long)]
    pub save_textures: bool,

    /// Sea level radius in metres.
    #[arg(long)]
    pub sea_level: Option<f64>,

    /// Also render the Mercator sheet.
    #[arg(long)]
    pub mercator: bool,

    /// Label font file.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Re-render whenever the waypoint document changes.
    #[arg(long)]
    pub watch: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse `face=orientation` pairs separated by `,`.
fn parse_rotations(pairs: &str) -> Result<Vec<(CubeFace, Orientation)>, ConfigError> {
    pairs.split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (face, orientation) = pair
                .split_once(['=', ':'])
                .ok_or_else(|| ConfigError::InvalidOption(format!("rotation `{pair}` needs face=orientation")))?;
            let face = face
                .parse::<CubeFace>()
                .map_err(|e| ConfigError::InvalidOption(e.to_string()))?;
            let orientation = orientation
                .parse::<Orientation>()
                .map_err(|e| ConfigError::InvalidOption(e.to_string()))?;
            Ok((face, orientation))
        })
        .collect()
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an unparsable tile layout
    /// or rotation list; the config is left unchanged in that case.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<(), ConfigError> {
        let layout = args
            .tile_layout
            .as_deref()
            .map(str::parse::<TileLayout>)
            .transpose()
            .map_err(|e| ConfigError::InvalidOption(e.to_string()))?;
        let rotations = args.rotate.as_deref().map(parse_rotations).transpose()?;

        if let Some(ref dir) = args.faces {
            self.paths.face_dir = dir.clone();
        }
        if let Some(ref file) = args.waypoints {
            self.paths.waypoints = file.clone();
        }
        if let Some(ref dir) = args.output {
            self.paths.output_dir = dir.clone();
        }
        if let Some(lines) = args.contour_lines {
            self.render.contour_lines = lines;
        }
        if args.slope_shading {
            self.render.shading = ShadingMode::Slope;
        }
        if args.relief_shading {
            self.render.shading = ShadingMode::Relief;
        }
        if args.rotate45 {
            self.render.rotate45 = true;
        }
        if args.crop {
            self.render.crop = CropMode::Content;
        }
        if args.crop_texture {
            self.render.crop = CropMode::TextureGrid;
            self.render.save_textures = true;
        }
        if args.crop_to_end {
            self.render.crop_to_end = true;
        }
        if args.include_aux {
            self.render.include_aux_tracks = true;
        }
        self.render.chapters.extend(args.chapters.iter().cloned());
        if let Some(layout) = layout {
            self.render.tile_layout = layout;
        }
        for (face, orientation) in rotations.into_iter().flatten() {
            self.render.face_orientations.set(face, orientation);
        }
        if let Some(size) = args.texture_size {
            self.render.episode_texture_size = size;
        }
        if let Some(size) = args.full_map_texture_size {
            self.render.full_map_texture_size = size;
        }
        if let Some(size) = args.end_texture_size {
            self.render.end_texture_size = size;
        }
        if args.save_textures {
            self.render.save_textures = true;
        }
        if let Some(sea_level) = args.sea_level {
            self.planet.sea_level = sea_level;
        }
        if args.mercator {
            self.mercator.enabled = true;
        }
        if let Some(ref font) = args.font {
            self.font.path = Some(font.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("planetmap").chain(argv.iter().copied()))
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = args(&[
            "--output",
            "out",
            "--relief-shading",
            "--crop-texture",
            "--chapter",
            "P01-03",
            "--tile-layout",
            ":Up:,Left:Front:Right,:Down:",
            "--rotate",
            "up=0,front=cwflip",
        ]);
        config.apply_cli_overrides(&args).unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(config.render.shading, ShadingMode::Relief);
        assert_eq!(config.render.crop, CropMode::TextureGrid);
        assert!(config.render.save_textures);
        assert_eq!(config.render.chapters, vec!["P01-03".to_string()]);
        assert_eq!(config.render.tile_layout.columns(), 3);
        assert_eq!(config.render.face_orientations.up, Orientation::None);
        assert_eq!(config.render.face_orientations.front, Orientation::Rotate90FlipX);
        // Non-overridden fields retain defaults
        assert_eq!(config.render.face_orientations.down, Orientation::Rotate270);
        assert!(config.render.contour_lines);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&args(&[])).unwrap();
        assert_eq!(config, original);
    }

    #[test]
    fn test_contour_lines_can_be_disabled() {
        let mut config = Config::default();
        config.apply_cli_overrides(&args(&["--contour-lines", "false"])).unwrap();
        assert!(!config.render.contour_lines);
    }

    #[test]
    fn test_invalid_layout_leaves_config_unchanged() {
        let mut config = Config::default();
        let result = config.apply_cli_overrides(&args(&["--tile-layout", "Up:Nowhere", "--rotate45"]));
        assert!(matches!(result, Err(ConfigError::InvalidOption(_))));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        assert!(parse_rotations("up").is_err());
        assert!(parse_rotations("up=sideways").is_err());
        assert!(parse_rotations("sideways=cw").is_err());
        let parsed = parse_rotations("down=ccw, ").unwrap();
        assert_eq!(parsed, vec![(CubeFace::Down, Orientation::Rotate270)]);
    }
}
