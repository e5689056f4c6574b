//! Headless Strider demo.
//!
//! Loads `config.ron` (created with defaults on first run), applies CLI
//! overrides, and drives the scripted course for `simulation.demo_frames`
//! frames, logging the avatar's state once per simulated second.
//!
//! Run with `cargo run -p strider-app -- --frames 900 --gravity 20`.

use std::process::ExitCode;

use clap::Parser;
use strider_app::{Demo, FRAME_PATTERN, GameLoop, PlatformDirs, PlatformError, demo_script};
use strider_config::{CliArgs, Config, ConfigError};
use strider_player::SetupError;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("controller setup failed: {0}")]
    Setup(#[from] SetupError),
}

fn main() -> ExitCode {
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("strider: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::resolve_and_create(args.config.as_deref())?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    strider_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        config_dir = %dirs.config_dir.display(),
        frames = config.simulation.demo_frames,
        gravity = config.locomotion.gravity_intensity,
        jump_height = config.locomotion.jump_height,
        "Strider demo starting"
    );

    let mut demo = Demo::new(&config, demo_script())?;
    let mut game_loop = GameLoop::new(&config.simulation);

    let mut next_report = 1.0;
    for dt in FRAME_PATTERN
        .iter()
        .cycle()
        .take(config.simulation.demo_frames as usize)
    {
        game_loop.tick_with(*dt, |dt| demo.frame(dt));

        if demo.elapsed() >= next_report {
            next_report += 1.0;
            if let Some(r) = demo.readout() {
                info!(
                    t = format!("{:.2}", demo.elapsed()),
                    position = ?r.position,
                    grounded = r.grounded,
                    jump = ?r.jump_state,
                    camera_distance = ?r.camera_distance,
                    "avatar"
                );
            }
        }
    }

    info!(
        frames = game_loop.frame_count(),
        fixed_steps = game_loop.update_count(),
        seconds = format!("{:.2}", game_loop.total_time()),
        cues = ?demo.cues(),
        closest_camera = demo.closest_camera(),
        "Strider demo finished"
    );
    Ok(())
}
