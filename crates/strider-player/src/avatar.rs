//! Avatar and camera spawning, explicit wiring, and readouts.
//!
//! The avatar and its camera reference each other through [`CameraLink`] and
//! [`FollowTarget`]. Both links are set when spawning and checked by
//! [`validate_wiring`] before the first frame runs; a broken link refuses to
//! start rather than producing undefined motion.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use strider_config::Config;
use strider_physics::{CharacterBody, PhysicsWorld, spawn_character_body};
use thiserror::Error;

use crate::animator::AnimatorParams;
use crate::follow_camera::{CameraRig, FollowCamera};
use crate::ground::GroundProbe;
use crate::locomotion::{JumpState, LocomotionController, MotionState};

/// Marks the player-controlled character.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Avatar;

/// On a camera: the entity whose [`MotionState`] it follows.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowTarget(pub Entity);

/// On an avatar: the camera whose basis drives camera-relative movement.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraLink(pub Entity);

/// Wiring problems that keep the controller from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// The [`PhysicsWorld`] resource has not been inserted.
    #[error("physics world resource is missing")]
    MissingPhysics,
    /// Nothing carries the [`Avatar`] marker.
    #[error("no avatar entity found")]
    NoAvatar,
    /// The avatar has no [`CharacterBody`].
    #[error("avatar {0:?} has no character body")]
    MissingBody(Entity),
    /// The avatar's body handle is not in the physics world.
    #[error("avatar {0:?} refers to a body that is not in the physics world")]
    DanglingBody(Entity),
    /// The avatar has no [`CameraLink`].
    #[error("avatar {0:?} has no camera link")]
    MissingCameraLink(Entity),
    /// The linked camera has no rig.
    #[error("avatar {avatar:?} links camera {camera:?}, which has no camera rig")]
    MissingCamera {
        /// Avatar holding the link.
        avatar: Entity,
        /// Entity the link points at.
        camera: Entity,
    },
    /// A camera follows something without a motion state.
    #[error("camera {camera:?} follows {target:?}, which has no motion state")]
    MissingTarget {
        /// Camera holding the link.
        camera: Entity,
        /// Entity the link points at.
        target: Entity,
    },
}

/// Entities created by [`spawn_avatar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvatarHandles {
    /// The character.
    pub avatar: Entity,
    /// Its follow camera.
    pub camera: Entity,
}

/// Spawns the character body, the avatar entity, and its follow camera.
///
/// `center` is the collider center; the capsule's bottom sits
/// `collider_half_height` below it.
pub fn spawn_avatar(
    world: &mut World,
    center: Vec3,
    config: &Config,
) -> Result<AvatarHandles, SetupError> {
    let loco = &config.locomotion;
    let body = {
        let mut physics = world
            .get_resource_mut::<PhysicsWorld>()
            .ok_or(SetupError::MissingPhysics)?;
        spawn_character_body(
            &mut physics,
            center,
            loco.collider_half_height,
            loco.collider_radius,
        )
    };

    let mut controller = LocomotionController::new(loco.clone());
    controller.trace_transitions = config.debug.trace_transitions;

    let avatar = world
        .spawn((
            Avatar,
            MotionState::new(center),
            controller,
            AnimatorParams::grounded(),
            GroundProbe::default(),
            body,
        ))
        .id();
    let camera = world
        .spawn((
            FollowCamera::new(config.camera.clone(), &config.input),
            CameraRig::new(center, &config.camera),
            FollowTarget(avatar),
        ))
        .id();
    world.entity_mut(avatar).insert(CameraLink(camera));

    tracing::info!(?avatar, ?camera, ?center, "spawned avatar");
    Ok(AvatarHandles { avatar, camera })
}

/// Checks every avatar and camera link. Returns the number of avatars.
pub fn validate_wiring(world: &mut World) -> Result<usize, SetupError> {
    let avatars: Vec<(Entity, Option<CameraLink>, Option<CharacterBody>)> = world
        .query_filtered::<(Entity, Option<&CameraLink>, Option<&CharacterBody>), With<Avatar>>()
        .iter(world)
        .map(|(entity, link, body)| (entity, link.copied(), body.copied()))
        .collect();
    let cameras: Vec<(Entity, FollowTarget)> = world
        .query::<(Entity, &FollowTarget)>()
        .iter(world)
        .map(|(entity, target)| (entity, *target))
        .collect();

    if avatars.is_empty() {
        return Err(SetupError::NoAvatar);
    }
    let physics = world
        .get_resource::<PhysicsWorld>()
        .ok_or(SetupError::MissingPhysics)?;

    for (avatar, link, body) in &avatars {
        let body = body.ok_or(SetupError::MissingBody(*avatar))?;
        if physics.rigid_body_set.get(body.body).is_none() {
            return Err(SetupError::DanglingBody(*avatar));
        }
        let link = link.ok_or(SetupError::MissingCameraLink(*avatar))?;
        if world.get::<CameraRig>(link.0).is_none() {
            return Err(SetupError::MissingCamera {
                avatar: *avatar,
                camera: link.0,
            });
        }
    }

    for (camera, target) in &cameras {
        if world.get::<MotionState>(target.0).is_none() {
            return Err(SetupError::MissingTarget {
                camera: *camera,
                target: target.0,
            });
        }
    }

    Ok(avatars.len())
}

/// Snapshot of an avatar for the orchestration layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarReadout {
    /// Collider center.
    pub position: Vec3,
    /// World velocity.
    pub velocity: Vec3,
    /// Yaw-only facing.
    pub facing: Quat,
    /// Standing on terrain.
    pub grounded: bool,
    /// A jump is in progress (wind-up through touchdown).
    pub jumping: bool,
    /// A non-locomotive action is blocking movement.
    pub interacting: bool,
    /// Current jump phase.
    pub jump_state: JumpState,
    /// Camera world position, if the camera link resolves.
    pub camera_position: Option<Vec3>,
    /// Live camera offset, if the camera link resolves.
    pub camera_distance: Option<f32>,
}

/// Reads the avatar's state, or `None` if it has no [`MotionState`].
pub fn avatar_readout(world: &World, avatar: Entity) -> Option<AvatarReadout> {
    let motion = world.get::<MotionState>(avatar)?;
    let jumping = world
        .get::<AnimatorParams>(avatar)
        .map_or_else(|| motion.is_jumping(), |params| params.is_jumping);

    let camera = world.get::<CameraLink>(avatar).and_then(|link| {
        let rig = world.get::<CameraRig>(link.0)?;
        let cam = world.get::<FollowCamera>(link.0)?;
        Some((rig.camera_position(cam.config.pivot_height), rig.current_distance))
    });

    Some(AvatarReadout {
        position: motion.position,
        velocity: motion.velocity,
        facing: motion.facing,
        grounded: motion.is_grounded(),
        jumping,
        interacting: motion.interacting,
        jump_state: motion.jump_state,
        camera_position: camera.map(|(pos, _)| pos),
        camera_distance: camera.map(|(_, distance)| distance),
    })
}

/// Raises or clears the blocking-interaction flag on behalf of an external
/// action. Returns `false`, changing nothing, if the entity is not an avatar.
pub fn set_interacting(world: &mut World, avatar: Entity, interacting: bool) -> bool {
    if world.get::<MotionState>(avatar).is_none() || world.get::<AnimatorParams>(avatar).is_none()
    {
        return false;
    }
    if let Some(mut motion) = world.get_mut::<MotionState>(avatar) {
        motion.interacting = interacting;
    }
    if let Some(mut params) = world.get_mut::<AnimatorParams>(avatar) {
        params.is_interacting = interacting;
    }
    true
}
