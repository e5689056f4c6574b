//! Configuration system for Strider.
//!
//! Locomotion and camera tuning live in RON files on disk. Supports CLI
//! overrides via clap, forward/backward compatible
//! serialization, and range validation at load time.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, InputConfig, LocomotionConfig, SimulationConfig,
};
pub use error::ConfigError;
