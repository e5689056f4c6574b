//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fixed-step timing and demo run length.
    pub simulation: SimulationConfig,
    /// Character locomotion tuning.
    pub locomotion: LocomotionConfig,
    /// Follow camera tuning.
    pub camera: CameraConfig,
    /// Input scaling.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Simulation timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation step in seconds.
    pub fixed_dt: f64,
    /// Longest frame the loop will try to catch up on, in seconds.
    pub max_frame_time: f64,
    /// Number of frames the headless demo runs before exiting.
    pub demo_frames: u32,
}

/// Locomotion state machine tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Speed when the stick is only slightly tilted (m/s).
    pub walking_speed: f32,
    /// Speed when the stick is tilted past half (m/s).
    pub running_speed: f32,
    /// Speed while sprinting (m/s).
    pub sprinting_speed: f32,
    /// Slerp rate toward the desired facing, per second.
    pub rotation_speed: f32,
    /// Desired jump apex height in meters.
    pub jump_height: f32,
    /// Downward acceleration applied while not grounded (m/s²).
    pub gravity_intensity: f32,
    /// Degrees left and right the facing may deviate from the takeoff direction mid-air.
    pub air_rotation_limit: f32,
    /// Seconds in the air before full rotation control returns.
    pub air_control_duration: f32,
    /// Seconds the ground probe may miss before the character counts as airborne.
    pub ground_lost_threshold: f32,
    /// Fixed steps of jump wind-up before launch velocity is applied.
    pub jump_windup_frames: u32,
    /// Fixed steps after touchdown during which facing is locked.
    pub landing_lock_frames: u32,
    /// Probe length beyond the collider's half height (meters).
    pub ground_check_distance: f32,
    /// Half of the character collider's total height (meters).
    pub collider_half_height: f32,
    /// Radius of the character collider (meters).
    pub collider_radius: f32,
    /// Collision layers the ground probe considers terrain.
    pub terrain_layers: u32,
}

/// Follow camera tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Radius of the sphere swept from pivot to camera.
    pub collision_radius: f32,
    /// Clearance kept between the camera and a hit obstacle.
    pub collision_offset: f32,
    /// Closest the camera may get to the pivot.
    pub min_collision_offset: f32,
    /// Smooth-damp time constant for following the target (seconds).
    pub follow_speed: f32,
    /// Yaw degrees per unit of horizontal look input.
    pub look_speed: f32,
    /// Pitch degrees per unit of vertical look input.
    pub pivot_speed: f32,
    /// Lowest pitch in degrees.
    pub min_pivot_angle: f32,
    /// Highest pitch in degrees.
    pub max_pivot_angle: f32,
    /// Resting camera offset along the pivot's local Z (negative = behind).
    pub rest_distance: f32,
    /// Height of the pivot above the target anchor (the collider center).
    pub pivot_height: f32,
    /// Per-update blend factor toward the collision-resolved distance.
    pub collision_blend: f32,
    /// Collision layers that block the camera.
    pub collision_layers: u32,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Multiplier applied to raw look input.
    pub look_sensitivity: f32,
    /// Invert the vertical look axis.
    pub invert_y: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log every locomotion state transition at `debug`.
    pub trace_transitions: bool,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_time: 0.25,
            demo_frames: 600,
        }
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walking_speed: 2.0,
            running_speed: 5.0,
            sprinting_speed: 8.0,
            rotation_speed: 15.0,
            jump_height: 1.5,
            gravity_intensity: 30.0,
            air_rotation_limit: 35.0,
            air_control_duration: 1.5,
            ground_lost_threshold: 0.04,
            jump_windup_frames: 5,
            landing_lock_frames: 3,
            ground_check_distance: 0.1,
            collider_half_height: 0.9,
            collider_radius: 0.3,
            terrain_layers: 0b1,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            collision_radius: 0.2,
            collision_offset: 0.2,
            min_collision_offset: 0.2,
            follow_speed: 0.2,
            look_speed: 2.0,
            pivot_speed: 2.0,
            min_pivot_angle: -25.0,
            max_pivot_angle: 55.0,
            rest_distance: -3.0,
            pivot_height: 0.7,
            collision_blend: 0.4,
            collision_layers: 0b1,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: 1.0,
            invert_y: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_transitions: true,
        }
    }
}

// --- Validation ---

fn ensure(ok: bool, field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.into(),
        })
    }
}

impl Config {
    /// Reject values the controller cannot run with.
    ///
    /// The locomotion and camera cores trust their configuration, so every
    /// range check lives here rather than in the per-step code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        ensure(sim.fixed_dt > 0.0, "simulation.fixed_dt", "must be positive")?;
        ensure(
            sim.max_frame_time >= sim.fixed_dt,
            "simulation.max_frame_time",
            "must be at least one fixed step",
        )?;

        let loco = &self.locomotion;
        ensure(loco.walking_speed >= 0.0, "locomotion.walking_speed", "must not be negative")?;
        ensure(
            loco.running_speed >= loco.walking_speed,
            "locomotion.running_speed",
            "must be at least the walking speed",
        )?;
        ensure(
            loco.sprinting_speed >= loco.running_speed,
            "locomotion.sprinting_speed",
            "must be at least the running speed",
        )?;
        ensure(loco.rotation_speed > 0.0, "locomotion.rotation_speed", "must be positive")?;
        ensure(loco.jump_height >= 0.0, "locomotion.jump_height", "must not be negative")?;
        ensure(
            loco.gravity_intensity > 0.0,
            "locomotion.gravity_intensity",
            "must be positive",
        )?;
        ensure(
            (0.0..=180.0).contains(&loco.air_rotation_limit),
            "locomotion.air_rotation_limit",
            "must be within 0..=180 degrees",
        )?;
        ensure(
            loco.air_control_duration >= 0.0,
            "locomotion.air_control_duration",
            "must not be negative",
        )?;
        ensure(
            f64::from(loco.ground_lost_threshold) >= sim.fixed_dt,
            "locomotion.ground_lost_threshold",
            format!(
                "{} is shorter than one fixed step ({})",
                loco.ground_lost_threshold, sim.fixed_dt
            ),
        )?;
        ensure(
            loco.ground_check_distance >= 0.0,
            "locomotion.ground_check_distance",
            "must not be negative",
        )?;
        ensure(
            loco.collider_half_height > 0.0,
            "locomotion.collider_half_height",
            "must be positive",
        )?;
        ensure(
            loco.collider_radius > 0.0 && loco.collider_radius <= loco.collider_half_height,
            "locomotion.collider_radius",
            "must be positive and no larger than the half height",
        )?;

        let cam = &self.camera;
        ensure(
            cam.min_pivot_angle <= cam.max_pivot_angle,
            "camera.min_pivot_angle",
            format!(
                "{} is greater than max_pivot_angle {}",
                cam.min_pivot_angle, cam.max_pivot_angle
            ),
        )?;
        ensure(cam.collision_radius > 0.0, "camera.collision_radius", "must be positive")?;
        ensure(
            cam.collision_offset >= 0.0,
            "camera.collision_offset",
            "must not be negative",
        )?;
        ensure(
            cam.min_collision_offset > 0.0,
            "camera.min_collision_offset",
            "must be positive",
        )?;
        ensure(
            cam.rest_distance.abs() >= cam.min_collision_offset,
            "camera.rest_distance",
            "magnitude must be at least min_collision_offset",
        )?;
        ensure(cam.follow_speed >= 0.0, "camera.follow_speed", "must not be negative")?;
        ensure(
            cam.collision_blend > 0.0 && cam.collision_blend <= 1.0,
            "camera.collision_blend",
            "must be within (0, 1]",
        )?;

        ensure(
            self.input.look_sensitivity >= 0.0,
            "input.look_sensitivity",
            "must not be negative",
        )?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    ///
    /// Loaded values are validated; an out-of-range file is an error, not a
    /// silently clamped config.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
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

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
