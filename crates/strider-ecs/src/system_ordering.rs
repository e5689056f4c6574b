//! System set definitions and ordering constraints for frame stages.
//!
//! Each stage has named [`SystemSet`]s so that every piece of shared state has
//! exactly one writer per phase: probe before locomotion, locomotion before the
//! physics step, physics results read back before the late camera tick.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;

/// Sets for systems in the FixedUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedUpdateSet {
    /// Downward ground probe against world geometry.
    GroundProbe,
    /// Locomotion state machine: velocity and facing.
    Locomotion,
    /// Push velocity to bodies and step the physics engine.
    PhysicsStep,
    /// Read positions and velocities back from the physics engine.
    PhysicsSync,
}

/// Sets for systems in the PostUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostUpdateSet {
    /// Follow, look, and collision resolution for the camera rig.
    Camera,
    /// Exchange flags with the animation collaborator.
    AnimatorSync,
}

/// Configure ordering constraints for the FixedUpdate stage.
pub fn configure_fixedupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(
        (
            FixedUpdateSet::GroundProbe,
            FixedUpdateSet::Locomotion,
            FixedUpdateSet::PhysicsStep,
            FixedUpdateSet::PhysicsSync,
        )
            .chain(),
    );
}

/// Configure ordering constraints for the PostUpdate stage.
pub fn configure_postupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets((PostUpdateSet::Camera, PostUpdateSet::AnimatorSync).chain());
}
