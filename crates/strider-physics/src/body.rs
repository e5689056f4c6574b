//! Character rigid body and static level geometry.
//!
//! The character is a dynamic capsule with rotations locked and gravity scale
//! zero: the solver resolves contacts, while locomotion owns the velocity.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;

use crate::{CollisionLayers, PhysicsWorld};

/// Handles of a character's body and capsule collider.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterBody {
    /// Handle to the dynamic rigid body.
    pub body: RigidBodyHandle,
    /// Handle to the capsule collider attached to the body.
    pub collider: ColliderHandle,
}

/// Spawns a character capsule whose center sits at `center`.
///
/// `half_height` is half of the capsule's total height, so the cylindrical
/// segment is `half_height - radius` on each side of the center.
pub fn spawn_character_body(
    physics: &mut PhysicsWorld,
    center: Vec3,
    half_height: f32,
    radius: f32,
) -> CharacterBody {
    let body = RigidBodyBuilder::dynamic()
        .translation(Vector::new(center.x, center.y, center.z))
        .gravity_scale(0.0)
        .lock_rotations()
        .can_sleep(false)
        .ccd_enabled(true)
        .build();
    let body_handle = physics.rigid_body_set.insert(body);

    let segment_half = (half_height - radius).max(0.0);
    let collider = ColliderBuilder::capsule_y(segment_half, radius)
        .friction(0.0)
        .user_data(CollisionLayers::CHARACTER.to_user_data())
        .build();
    let collider_handle =
        physics
            .collider_set
            .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set);

    tracing::debug!(?center, half_height, radius, "spawned character body");

    CharacterBody {
        body: body_handle,
        collider: collider_handle,
    }
}

/// Adds a fixed cuboid centered at `center` with the given half extents.
pub fn add_static_box(
    physics: &mut PhysicsWorld,
    center: Vec3,
    half_extents: Vec3,
    layers: CollisionLayers,
) -> ColliderHandle {
    let body = RigidBodyBuilder::fixed()
        .translation(Vector::new(center.x, center.y, center.z))
        .build();
    let body_handle = physics.rigid_body_set.insert(body);
    let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        .user_data(layers.to_user_data())
        .build();
    physics
        .collider_set
        .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set)
}

/// Overwrites the body's linear velocity, waking it up.
pub fn set_body_velocity(physics: &mut PhysicsWorld, body: RigidBodyHandle, velocity: Vec3) {
    if let Some(rb) = physics.rigid_body_set.get_mut(body) {
        rb.set_linvel(Vector::new(velocity.x, velocity.y, velocity.z), true);
    }
}

/// Current `(translation, linear velocity)` of a body, if it still exists.
pub fn body_state(physics: &PhysicsWorld, body: RigidBodyHandle) -> Option<(Vec3, Vec3)> {
    physics.rigid_body_set.get(body).map(|rb| {
        let t = rb.translation();
        let v = rb.linvel();
        (Vec3::new(t.x, t.y, t.z), Vec3::new(v.x, v.y, v.z))
    })
}
