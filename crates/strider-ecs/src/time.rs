//! Time resource for the ECS world.

use bevy_ecs::prelude::*;

/// Global time resource, refreshed by [`FrameSchedules::run`](crate::FrameSchedules::run).
#[derive(Resource, Debug, Clone)]
pub struct TimeRes {
    /// Wall-clock seconds elapsed since the previous frame.
    pub delta: f32,
    /// Length of one fixed simulation step in seconds.
    pub fixed_delta: f32,
    /// Fixed steps executed since the world was created.
    pub fixed_ticks: u64,
}

impl Default for TimeRes {
    fn default() -> Self {
        Self {
            delta: 0.0,
            fixed_delta: 1.0 / 60.0,
            fixed_ticks: 0,
        }
    }
}
