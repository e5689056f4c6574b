//! Collision-aware camera distance.
//!
//! A sphere is swept from the pivot toward the resting camera offset. A hit
//! pulls the target distance in to just short of the obstacle; the live
//! distance then blends toward the target instead of popping.

use glam::{Quat, Vec3};
use strider_config::CameraConfig;
use strider_physics::{CollisionLayers, WorldQuery};

/// Target offset along the pivot's local Z for a sweep result.
///
/// On a hit at `hit_distance` the magnitude is
/// `max(hit_distance - collision_offset, min_collision_offset)`, never farther
/// than the resting offset. The sign always follows `rest_distance`.
pub fn collision_target_distance(hit_distance: Option<f32>, config: &CameraConfig) -> f32 {
    let rest = config.rest_distance;
    match hit_distance {
        Some(distance) => {
            let pulled_in = (distance - config.collision_offset)
                .max(config.min_collision_offset)
                .min(rest.abs().max(config.min_collision_offset));
            rest.signum() * pulled_in
        }
        None => rest,
    }
}

/// Linear blend of the live distance toward the target. A blend of 1 lands
/// exactly on `target`.
pub fn blend_distance(current: f32, target: f32, blend: f32) -> f32 {
    let blend = blend.clamp(0.0, 1.0);
    current * (1.0 - blend) + target * blend
}

/// Sweeps the camera sphere from `pivot` along the resting offset direction
/// of a camera oriented by `rotation`, returning the hit distance.
pub fn sweep_camera(
    world: &impl WorldQuery,
    pivot: Vec3,
    rotation: Quat,
    config: &CameraConfig,
) -> Option<f32> {
    let direction = rotation * Vec3::Z * config.rest_distance.signum();
    world
        .sweep_sphere(
            pivot,
            config.collision_radius,
            direction,
            config.rest_distance.abs(),
            CollisionLayers::from(config.collision_layers),
        )
        .map(|hit| hit.distance)
}
