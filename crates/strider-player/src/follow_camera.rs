//! Follow camera: smooth follow, yaw/pitch look, and collision-aware distance.
//!
//! The rig is a three-level transform. The rig root trails the target and
//! carries the yaw. A pivot child sits `pivot_height` above the root and
//! carries the pitch. The camera sits `current_distance` along the pivot's
//! local Z and looks toward the pivot.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec2, Vec3};
use strider_config::{CameraConfig, InputConfig};
use strider_physics::WorldQuery;

use crate::camera_collision::{blend_distance, collision_target_distance, sweep_camera};
use crate::locomotion::CameraBasis;

/// Live state of one follow camera.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CameraRig {
    /// Smoothed rig root position.
    pub follow_position: Vec3,
    /// Smooth-damp velocity carried between updates.
    pub follow_velocity: Vec3,
    /// Accumulated yaw in degrees, unbounded.
    pub look_angle: f32,
    /// Accumulated pitch in degrees, clamped to the configured range.
    pub pivot_angle: f32,
    /// Resting offset along the pivot's local Z. Negative is behind the pivot.
    pub rest_distance: f32,
    /// Collision-adjusted offset currently in use.
    pub current_distance: f32,
    /// Offset the last collision pass aimed for.
    pub target_distance: f32,
}

impl CameraRig {
    /// A rig resting at `anchor` with no look input applied.
    pub fn new(anchor: Vec3, config: &CameraConfig) -> Self {
        Self {
            follow_position: anchor,
            follow_velocity: Vec3::ZERO,
            look_angle: 0.0,
            pivot_angle: 0.0_f32.clamp(config.min_pivot_angle, config.max_pivot_angle),
            rest_distance: config.rest_distance,
            current_distance: config.rest_distance,
            target_distance: config.rest_distance,
        }
    }

    /// Rig root orientation (yaw only).
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.look_angle.to_radians())
    }

    /// Pivot orientation relative to the rig root (pitch only).
    pub fn pivot_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pivot_angle.to_radians())
    }

    /// World orientation of the pivot and the camera.
    pub fn camera_rotation(&self) -> Quat {
        self.yaw_rotation() * self.pivot_rotation()
    }

    /// World position of the pivot.
    pub fn pivot_position(&self, pivot_height: f32) -> Vec3 {
        self.follow_position + Vec3::Y * pivot_height
    }

    /// World position of the camera.
    pub fn camera_position(&self, pivot_height: f32) -> Vec3 {
        self.pivot_position(pivot_height)
            + self.camera_rotation() * Vec3::new(0.0, 0.0, self.current_distance)
    }

    /// Horizontal movement axes for camera-relative locomotion.
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_yaw(self.look_angle.to_radians())
    }
}

/// Camera tuning, attached next to its [`CameraRig`].
#[derive(Component, Clone, Debug)]
pub struct FollowCamera {
    /// Follow, look, and collision parameters.
    pub config: CameraConfig,
    /// Multiplier on raw look input.
    pub look_sensitivity: f32,
    /// Flip the vertical look axis.
    pub invert_y: bool,
}

impl FollowCamera {
    /// Camera from its config sections.
    pub fn new(config: CameraConfig, input: &InputConfig) -> Self {
        Self {
            config,
            look_sensitivity: input.look_sensitivity,
            invert_y: input.invert_y,
        }
    }

    /// Chase `anchor` with a critically damped approach.
    pub fn follow(&self, rig: &mut CameraRig, anchor: Vec3, dt: f32) {
        rig.follow_position = smooth_damp(
            rig.follow_position,
            anchor,
            &mut rig.follow_velocity,
            self.config.follow_speed,
            dt,
        );
    }

    /// Accumulate yaw and pitch from a look delta.
    pub fn apply_look(&self, rig: &mut CameraRig, look: Vec2) {
        let look = look * self.look_sensitivity;
        let vertical = if self.invert_y { -look.y } else { look.y };
        rig.look_angle += look.x * self.config.look_speed;
        rig.pivot_angle = (rig.pivot_angle - vertical * self.config.pivot_speed)
            .clamp(self.config.min_pivot_angle, self.config.max_pivot_angle);
    }

    /// Sweep toward the resting offset and blend the live distance toward the
    /// resolved target.
    pub fn resolve_collision(&self, rig: &mut CameraRig, world: &impl WorldQuery) {
        let pivot = rig.pivot_position(self.config.pivot_height);
        let hit = sweep_camera(world, pivot, rig.camera_rotation(), &self.config);
        rig.target_distance = collision_target_distance(hit, &self.config);
        rig.current_distance = blend_distance(
            rig.current_distance,
            rig.target_distance,
            self.config.collision_blend,
        );
    }

    /// One late-frame update: follow, then look, then collision.
    pub fn tick(
        &self,
        rig: &mut CameraRig,
        anchor: Vec3,
        look: Vec2,
        dt: f32,
        world: &impl WorldQuery,
    ) {
        self.follow(rig, anchor, dt);
        self.apply_look(rig, look);
        self.resolve_collision(rig, world);
    }
}

/// Critically damped spring toward `target` with time constant `smooth_time`.
///
/// `velocity` carries the spring state between calls. The result never
/// overshoots the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }
    output
}
