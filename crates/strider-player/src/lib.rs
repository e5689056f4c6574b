//! Third-person character control: locomotion state machine and follow camera.
//!
//! The locomotion core ([`LocomotionController::step`]) and the camera core
//! ([`FollowCamera::tick`]) are plain functions over owned state, so they run
//! and test without a world. [`systems`] wires them into the frame stages and
//! [`avatar`] spawns and validates the entities they operate on.

pub mod air_control;
pub mod animator;
pub mod avatar;
pub mod camera_collision;
pub mod follow_camera;
pub mod ground;
pub mod locomotion;
pub mod systems;

pub use animator::{AnimationCue, AnimatorParams};
pub use avatar::{
    Avatar, AvatarHandles, AvatarReadout, CameraLink, FollowTarget, SetupError, avatar_readout,
    set_interacting, spawn_avatar, validate_wiring,
};
pub use camera_collision::{blend_distance, collision_target_distance};
pub use follow_camera::{CameraRig, FollowCamera, smooth_damp};
pub use ground::{GroundProbe, ProbeHit};
pub use locomotion::{
    CameraBasis, GroundState, JumpState, LocomotionController, MotionState, StepInput,
};
pub use systems::{CueLog, add_player_systems};
