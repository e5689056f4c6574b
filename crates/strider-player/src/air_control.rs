//! Yaw helpers for facing and the mid-air rotation cone.
//!
//! Facing is yaw-only. A direction `d` on the horizontal plane maps to the yaw
//! `atan2(d.x, d.z)`, so `Quat::from_rotation_y(yaw) * Vec3::Z == d`.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

/// Squared length below which a direction is treated as absent.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Projects `v` onto the horizontal plane and normalizes it, if it has any
/// horizontal length.
pub fn flatten(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    (flat.length_squared() > DEGENERATE_EPSILON).then(|| flat.normalize())
}

/// Yaw in radians of a horizontal direction.
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Facing that looks along `direction`, or `None` for a degenerate vector.
pub fn facing_toward(direction: Vec3) -> Option<Quat> {
    flatten(direction).map(|d| Quat::from_rotation_y(yaw_of(d)))
}

/// Horizontal forward vector of a facing.
pub fn forward_of(facing: Quat) -> Vec3 {
    flatten(facing * Vec3::Z).unwrap_or(Vec3::Z)
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Signed yaw from `from` to `to`, positive turning toward +X.
pub fn signed_yaw(from: Vec3, to: Vec3) -> f32 {
    wrap_angle(yaw_of(to) - yaw_of(from))
}

/// Rotates `reference` toward `desired`, but by no more than `limit` radians.
pub fn clamp_to_cone(reference: Vec3, desired: Vec3, limit: f32) -> Vec3 {
    let angle = signed_yaw(reference, desired).clamp(-limit, limit);
    Quat::from_rotation_y(angle) * reference
}

/// Pulls `facing` back inside the cone of half-angle `limit` around
/// `reference`.
pub fn clamp_facing_to_cone(facing: Quat, reference: Vec3, limit: f32) -> Quat {
    let angle = signed_yaw(reference, forward_of(facing)).clamp(-limit, limit);
    Quat::from_rotation_y(wrap_angle(yaw_of(reference) + angle))
}

/// Bounded interpolation toward `target`: `rate` is the fraction per second,
/// capped at a full snap when `rate * dt >= 1`.
pub fn turn_toward(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    let t = (rate * dt).clamp(0.0, 1.0);
    current.slerp(target, t).normalize()
}
