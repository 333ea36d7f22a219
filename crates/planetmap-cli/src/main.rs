//! Planet map renderer entry point.
//!
//! Renders the maps once, or with `--watch` again every time the waypoint
//! document or `config.ron` is saved.
//!
//! Run with: `cargo run -p planetmap-cli -- --faces planet --waypoints waypoints.json`

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use clap::Parser;
use planetmap::{Pipeline, RenderError};
use planetmap_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info, warn};

/// How often `--watch` checks for changes.
const WATCH_INTERVAL: Duration = Duration::from_secs(5);

fn render(config: &Config) -> Result<(), RenderError> {
    let passes = Pipeline::new(config).run()?;
    for pass in &passes {
        info!(pass = %pass.name, files = pass.files.len(), dir = %pass.dir.display(), "pass done");
    }
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Render whenever the waypoint document or `config.ron` changes.
/// Failed renders are logged and the watch continues.
fn watch(args: &CliArgs, config_dir: &Path, mut file_config: Config, mut config: Config) -> ! {
    let mut seen = None;
    info!(path = %config.paths.waypoints.display(), "watching waypoint document");
    loop {
        match file_config.reload(config_dir) {
            Ok(Some(reloaded)) => {
                let mut updated = reloaded.clone();
                match updated.apply_cli_overrides(args) {
                    Ok(()) => {
                        file_config = reloaded;
                        config = updated;
                        seen = None;
                    }
                    Err(e) => warn!("ignoring reloaded config: {e}"),
                }
            }
            Ok(None) => {}
            Err(e) => warn!("config reload failed: {e}"),
        }

        let current = modified(&config.paths.waypoints);
        if current.is_some() && current != seen {
            seen = current;
            if let Err(e) = render(&config) {
                error!("render failed: {e}");
            }
        }
        std::thread::sleep(WATCH_INTERVAL);
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let file_config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = file_config.clone();
    if let Err(e) = config.apply_cli_overrides(&args) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let log_dir = config.debug.log_dir.clone().unwrap_or_else(|| config_dir.join("logs"));
    planetmap_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "Planet {}: faces {} | waypoints {} | output {}",
        config.planet.name,
        config.paths.face_dir.display(),
        config.paths.waypoints.display(),
        config.paths.output_dir.display(),
    );

    if args.watch {
        watch(&args, &config_dir, file_config, config);
    }
    match render(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
