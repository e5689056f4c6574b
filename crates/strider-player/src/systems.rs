//! ECS systems wiring the controller into the frame stages.
//!
//! | Stage | Set | System |
//! |---|---|---|
//! | PreUpdate | | [`publish_input_system`] |
//! | FixedUpdate | GroundProbe | [`ground_probe_system`] |
//! | FixedUpdate | Locomotion | [`locomotion_system`] |
//! | FixedUpdate | PhysicsStep | [`write_body_velocity_system`], `physics_step_system` |
//! | FixedUpdate | PhysicsSync | [`read_body_state_system`] |
//! | PostUpdate | Camera | [`camera_system`] |
//! | PostUpdate | AnimatorSync | [`animator_sync_system`] |

use bevy_ecs::prelude::*;
use strider_ecs::{
    ControlInput, FixedUpdateSet, FrameSchedules, FrameStage, PostUpdateSet, TimeRes,
    configure_fixedupdate_ordering, configure_postupdate_ordering,
};
use strider_physics::{
    CharacterBody, PhysicsWorld, body_state, physics_step_system, set_body_velocity,
};

use crate::animator::{AnimationCue, AnimatorParams};
use crate::avatar::{Avatar, CameraLink, FollowTarget};
use crate::follow_camera::{CameraRig, FollowCamera};
use crate::ground::{GroundProbe, cast_ground_probe};
use crate::locomotion::{LocomotionController, MotionState, StepInput};

/// Cues handed to the animator, oldest first. Optional; insert it to keep a
/// record of what played.
#[derive(Resource, Debug, Default)]
pub struct CueLog {
    /// Fixed tick, avatar, and cue for every drained trigger.
    pub entries: Vec<(u64, Entity, AnimationCue)>,
}

impl CueLog {
    /// Cues in the order they fired, without tick or entity.
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.entries.iter().map(|(_, _, cue)| *cue).collect()
    }
}

/// Publishes stick values to the animator and pulls the animator-owned
/// interaction flag into the motion state.
pub fn publish_input_system(
    input: Res<ControlInput>,
    mut avatars: Query<(&mut AnimatorParams, &mut MotionState), With<Avatar>>,
) {
    for (mut params, mut motion) in &mut avatars {
        params.move_amount = input.move_amount();
        params.is_sprinting = input.is_sprinting();
        motion.interacting = params.is_interacting;
    }
}

/// Casts each character's ground probe from its collider center.
pub fn ground_probe_system(
    physics: Res<PhysicsWorld>,
    mut avatars: Query<(
        &LocomotionController,
        &MotionState,
        &CharacterBody,
        &mut GroundProbe,
    )>,
) {
    for (controller, motion, body, mut probe) in &mut avatars {
        *probe = cast_ground_probe(
            physics.as_ref(),
            motion.position,
            &controller.config,
            Some(body.body),
        );
    }
}

/// Advances every character's locomotion by one fixed step.
///
/// The jump pulse is consumed here, so a press survives frames in which no
/// fixed step runs.
pub fn locomotion_system(
    time: Res<TimeRes>,
    mut input: ResMut<ControlInput>,
    cameras: Query<&CameraRig>,
    mut avatars: Query<(
        &LocomotionController,
        &mut MotionState,
        &mut AnimatorParams,
        &GroundProbe,
        &CameraLink,
    )>,
) {
    let jump_requested = input.take_jump();
    for (controller, mut motion, mut params, probe, link) in &mut avatars {
        let basis = cameras
            .get(link.0)
            .map(CameraRig::basis)
            .unwrap_or_default();
        let step = StepInput {
            move_axis: input.move_axis,
            sprint: input.sprint_held,
            jump_requested,
            basis,
            probe: *probe,
            dt: time.fixed_delta,
        };
        controller.step(&mut motion, &step, &mut params);
    }
}

/// Hands locomotion's velocity to the rigid bodies before the physics step.
pub fn write_body_velocity_system(
    mut physics: ResMut<PhysicsWorld>,
    avatars: Query<(&MotionState, &CharacterBody)>,
) {
    for (motion, body) in &avatars {
        set_body_velocity(&mut physics, body.body, motion.velocity);
    }
}

/// Reads positions and contact-resolved velocities back after the step.
pub fn read_body_state_system(
    physics: Res<PhysicsWorld>,
    mut avatars: Query<(&CharacterBody, &mut MotionState)>,
) {
    for (body, mut motion) in &mut avatars {
        if let Some((position, velocity)) = body_state(&physics, body.body) {
            motion.position = position;
            motion.velocity = velocity;
        }
    }
}

/// Late tick: follow, look, and collision for every camera.
pub fn camera_system(
    time: Res<TimeRes>,
    input: Res<ControlInput>,
    physics: Res<PhysicsWorld>,
    targets: Query<&MotionState>,
    mut cameras: Query<(&FollowCamera, &mut CameraRig, &FollowTarget)>,
) {
    for (camera, mut rig, target) in &mut cameras {
        let Ok(motion) = targets.get(target.0) else {
            continue;
        };
        camera.tick(
            &mut rig,
            motion.position,
            input.look_axis,
            time.delta,
            physics.as_ref(),
        );
    }
}

/// Mirrors the ground state to the animator and drains queued cues.
pub fn animator_sync_system(
    time: Res<TimeRes>,
    mut log: Option<ResMut<CueLog>>,
    mut avatars: Query<(Entity, &MotionState, &mut AnimatorParams)>,
) {
    for (entity, motion, mut params) in &mut avatars {
        params.is_grounded = motion.is_grounded();
        for cue in params.drain_cues() {
            tracing::debug!(?entity, cue = cue.name(), tick = time.fixed_ticks, "animation cue");
            if let Some(log) = log.as_mut() {
                log.entries.push((time.fixed_ticks, entity, cue));
            }
        }
    }
}

/// Registers all controller systems and their ordering on `schedules`.
pub fn add_player_systems(schedules: &mut FrameSchedules) {
    if let Some(schedule) = schedules.get_schedule_mut(&FrameStage::FixedUpdate) {
        configure_fixedupdate_ordering(schedule);
    }
    if let Some(schedule) = schedules.get_schedule_mut(&FrameStage::PostUpdate) {
        configure_postupdate_ordering(schedule);
    }

    schedules.add_system(FrameStage::PreUpdate, publish_input_system);
    schedules.add_system(
        FrameStage::FixedUpdate,
        ground_probe_system.in_set(FixedUpdateSet::GroundProbe),
    );
    schedules.add_system(
        FrameStage::FixedUpdate,
        locomotion_system.in_set(FixedUpdateSet::Locomotion),
    );
    schedules.add_system(
        FrameStage::FixedUpdate,
        (write_body_velocity_system, physics_step_system)
            .chain()
            .in_set(FixedUpdateSet::PhysicsStep),
    );
    schedules.add_system(
        FrameStage::FixedUpdate,
        read_body_state_system.in_set(FixedUpdateSet::PhysicsSync),
    );
    schedules.add_system(
        FrameStage::PostUpdate,
        camera_system.in_set(PostUpdateSet::Camera),
    );
    schedules.add_system(
        FrameStage::PostUpdate,
        animator_sync_system.in_set(PostUpdateSet::AnimatorSync),
    );
}
