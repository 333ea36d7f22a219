//! Configuration for the planet map renderer.
//!
//! Settings persist as `config.ron` and every field has a default, so
//! partial files keep working across versions. Command-line arguments
//! override the loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FaceOrientations, FontConfig, MercatorConfig, PathsConfig, PlanetConfig,
    RenderConfig, default_config_dir,
};
pub use error::ConfigError;
