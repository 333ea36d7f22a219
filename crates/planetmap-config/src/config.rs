//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use planetmap_cubesphere::{CubeFace, MercatorProjection, Orientation};
use planetmap_terrain::ShadingMode;
use planetmap_tiles::{CropMode, TileLayout};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level renderer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Map rendering settings.
    pub render: RenderConfig,
    /// Planet radii and sea level.
    pub planet: PlanetConfig,
    /// Mercator sheet settings.
    pub mercator: MercatorConfig,
    /// Label font.
    pub font: FontConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `<face>.png` height and `<face>_mat.png` material
    /// rasters.
    pub face_dir: PathBuf,
    /// JSON waypoint document.
    pub waypoints: PathBuf,
    /// Root directory for rendered maps.
    pub output_dir: PathBuf,
}

/// Rotate/flip applied to each face image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FaceOrientations {
    pub up: Orientation,
    pub down: Orientation,
    pub left: Orientation,
    pub right: Orientation,
    pub front: Orientation,
    pub back: Orientation,
}

impl FaceOrientations {
    #[must_use]
    pub fn get(&self, face: CubeFace) -> Orientation {
        match face {
            CubeFace::Up => self.up,
            CubeFace::Down => self.down,
            CubeFace::Left => self.left,
            CubeFace::Right => self.right,
            CubeFace::Front => self.front,
            CubeFace::Back => self.back,
        }
    }

    pub fn set(&mut self, face: CubeFace, orientation: Orientation) {
        let slot = match face {
            CubeFace::Up => &mut self.up,
            CubeFace::Down => &mut self.down,
            CubeFace::Left => &mut self.left,
            CubeFace::Right => &mut self.right,
            CubeFace::Front => &mut self.front,
            CubeFace::Back => &mut self.back,
        };
        *slot = orientation;
    }
}

/// Map rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Terrain shading mode.
    pub shading: ShadingMode,
    /// Tint terrain where it crosses a band group.
    pub contour_lines: bool,
    /// Render the cube turned 45° about the polar axis.
    pub rotate45: bool,
    /// Per-face image orientation.
    pub face_orientations: FaceOrientations,
    /// Placement of faces in the tile map.
    pub tile_layout: TileLayout,
    /// Tile map cropping.
    pub crop: CropMode,
    /// Only render the unfiltered pass and add an end-position map.
    pub crop_to_end: bool,
    /// Draw auxiliary tracks in the unfiltered pass.
    pub include_aux_tracks: bool,
    /// Chapter passes, each `Pab-cd` covering segments `Pab` to `Pcd`.
    pub chapters: Vec<String>,
    /// Texture size of the end-position map.
    pub end_texture_size: u32,
    /// Texture size of single-segment passes.
    pub episode_texture_size: u32,
    /// Texture size of every other pass.
    pub full_map_texture_size: u32,
    /// Cut tile maps into textures.
    pub save_textures: bool,
}

/// Planet radii and sea level, in metres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet name, for logging.
    pub name: String,
    /// Sea level radius. Zero means the planet has no sea.
    pub sea_level: f64,
    /// Radius of raw height zero.
    pub min_radius: f64,
    /// Radius of the highest raw height.
    pub max_radius: f64,
}

/// Mercator sheet settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MercatorConfig {
    /// Render the Mercator sheet.
    pub enabled: bool,
    /// Western edge in degrees.
    pub min_lon_deg: f64,
    /// Eastern edge in degrees.
    pub max_lon_deg: f64,
    /// Northern and southern reach in degrees.
    pub max_lat_deg: f64,
    /// Put north towards the top of the image.
    pub north_is_negative_y: bool,
}

impl MercatorConfig {
    /// The configured projection, if the sheet is enabled.
    #[must_use]
    pub fn projection(&self) -> Option<MercatorProjection> {
        self.enabled
            .then(|| MercatorProjection::from_degrees(self.min_lon_deg, self.max_lon_deg, self.north_is_negative_y))
    }
}

/// Label font.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType font file. Built-in block glyphs are used without one.
    pub path: Option<PathBuf>,
    /// Pixel size.
    pub size: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for the JSON log file in debug builds.
    pub log_dir: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            face_dir: PathBuf::from("planet"),
            waypoints: PathBuf::from("waypoints.json"),
            output_dir: PathBuf::from("maps"),
        }
    }
}

impl Default for FaceOrientations {
    fn default() -> Self {
        Self {
            up: Orientation::Rotate270,
            down: Orientation::Rotate270,
            left: Orientation::Rotate180,
            right: Orientation::Rotate180,
            front: Orientation::Rotate180,
            back: Orientation::Rotate180,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Banded,
            contour_lines: true,
            rotate45: false,
            face_orientations: FaceOrientations::default(),
            tile_layout: TileLayout::default(),
            crop: CropMode::None,
            crop_to_end: false,
            include_aux_tracks: false,
            chapters: Vec::new(),
            end_texture_size: 256,
            episode_texture_size: 512,
            full_map_texture_size: 1024,
            save_textures: false,
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            name: "EarthLike".to_string(),
            sea_level: 0.0,
            min_radius: 59_400.0,
            max_radius: 67_200.0,
        }
    }
}

impl Default for MercatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_lon_deg: -180.0,
            max_lon_deg: 180.0,
            max_lat_deg: 60.0,
            north_is_negative_y: false,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { path: None, size: 12.0 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// `<platform config dir>/planetmap`, or the working directory when the
/// platform has none.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(|| PathBuf::from("."), |d| d.join("planetmap"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
