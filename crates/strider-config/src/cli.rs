//! Command-line argument parsing for Strider.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strider command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strider", about = "Third-person character control demo")]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Downward acceleration while airborne (m/s²).
    #[arg(long)]
    pub gravity: Option<f32>,

    /// Jump apex height in meters.
    #[arg(long)]
    pub jump_height: Option<f32>,

    /// Number of frames the headless demo runs.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Invert the vertical look axis.
    #[arg(long)]
    pub invert_y: Option<bool>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Call [`Config::validate`] afterwards; overrides are not range-checked here.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(g) = args.gravity {
            self.locomotion.gravity_intensity = g;
        }
        if let Some(h) = args.jump_height {
            self.locomotion.jump_height = h;
        }
        if let Some(frames) = args.frames {
            self.simulation.demo_frames = frames;
        }
        if let Some(invert) = args.invert_y {
            self.input.invert_y = invert;
        }
    }
}
