//! Locomotion state machine: ground state, jump phases, movement, and facing.
//!
//! One call to [`LocomotionController::step`] advances a [`MotionState`] by a
//! single fixed simulation step. The step reads the latched control input, the
//! camera basis, and this step's ground probe, then writes velocity and facing.
//! Velocity is handed to the rigid body afterwards; position is read back from
//! the body once the physics step has run.
//!
//! Transition order within a step:
//!
//! 1. ground-loss hysteresis
//! 2. jump request (Idle and grounded → wind-up)
//! 3. landing (airborne, probe hit, descending → landing lock)
//! 4. walk-off fall (Idle, ground lost, descending, no jump flagged)
//! 5. wind-up countdown and launch
//! 6. ground state and air timer
//! 7. custom gravity
//! 8. horizontal movement and rotation, skipped while interacting on the ground
//! 9. landing-lock countdown

use bevy_ecs::prelude::*;
use glam::{Quat, Vec2, Vec3};
use strider_config::LocomotionConfig;

use crate::air_control::{
    clamp_facing_to_cone, clamp_to_cone, facing_toward, flatten, forward_of, turn_toward,
};
use crate::animator::{AnimationCue, AnimatorParams};
use crate::ground::{self, GroundProbe};

/// Stick deflection separating walking from running. Sprint needs more than this.
const HALF_TILT: f32 = 0.5;

/// Contact state derived from the probe and the jump phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundState {
    /// Standing on terrain.
    Grounded,
    /// In the air, or the probe has been missing past the threshold.
    Airborne,
}

/// Jump phase. Wind-up and landing lock carry their own step counters, so at
/// most one of them can be active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpState {
    /// No jump in progress.
    Idle,
    /// Jump requested; launch happens once the counter has run out.
    WindingUp {
        /// Unmodified steps left before launch.
        steps_remaining: u32,
    },
    /// Off the ground with horizontal velocity locked to the takeoff value.
    Airborne,
    /// Just touched down; facing is pinned to the air direction.
    LandingLock {
        /// Locked steps left, the current one included.
        steps_remaining: u32,
    },
}

/// Camera-relative movement axes, flattened onto the horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    /// Direction the stick's forward axis moves the character.
    pub forward: Vec3,
    /// Direction the stick's right axis moves the character.
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::Z,
            right: Vec3::X,
        }
    }
}

impl CameraBasis {
    /// Basis of a camera yawed by `yaw` radians.
    pub fn from_yaw(yaw: f32) -> Self {
        let rotation = Quat::from_rotation_y(yaw);
        Self {
            forward: rotation * Vec3::Z,
            right: rotation * Vec3::X,
        }
    }

    /// Normalized horizontal direction for a stick deflection, or `None` when
    /// the stick is centered.
    pub fn direction(&self, axis: Vec2) -> Option<Vec3> {
        let forward = flatten(self.forward).unwrap_or(Vec3::Z);
        let right = flatten(self.right).unwrap_or(Vec3::X);
        flatten(forward * axis.y + right * axis.x)
    }
}

/// Kinematic state of one character, owned and mutated by locomotion.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct MotionState {
    /// Collider center in world space.
    pub position: Vec3,
    /// World velocity; `y` is vertical speed under custom gravity.
    pub velocity: Vec3,
    /// Yaw-only orientation. Forward is local +Z.
    pub facing: Quat,
    /// Horizontal intent: camera-relative direction scaled by the speed tier.
    pub move_direction: Vec3,
    /// Grounded or airborne.
    pub ground_state: GroundState,
    /// Seconds the probe has been missing.
    pub ground_lost_timer: f32,
    /// Current jump phase.
    pub jump_state: JumpState,
    /// Unit horizontal direction captured on leaving the ground, or zero.
    pub air_direction: Vec3,
    /// Horizontal speed captured on leaving the ground.
    pub air_speed: f32,
    /// Seconds since becoming airborne.
    pub air_timer: f32,
    /// Facing at takeoff, the rotation-cone reference for a stationary jump.
    pub takeoff_forward: Vec3,
    /// A non-locomotive action blocks movement while grounded.
    pub interacting: bool,
}

impl MotionState {
    /// A grounded, idle character at `position` facing +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            facing: Quat::IDENTITY,
            move_direction: Vec3::ZERO,
            ground_state: GroundState::Grounded,
            ground_lost_timer: 0.0,
            jump_state: JumpState::Idle,
            air_direction: Vec3::ZERO,
            air_speed: 0.0,
            air_timer: 0.0,
            takeoff_forward: Vec3::Z,
            interacting: false,
        }
    }

    /// Whether the character stands on terrain.
    pub fn is_grounded(&self) -> bool {
        self.ground_state == GroundState::Grounded
    }

    /// Whether a jump is winding up or in flight.
    pub fn is_jumping(&self) -> bool {
        matches!(
            self.jump_state,
            JumpState::WindingUp { .. } | JumpState::Airborne
        )
    }

    /// Whether the post-touchdown rotation freeze is active.
    pub fn in_landing_lock(&self) -> bool {
        matches!(self.jump_state, JumpState::LandingLock { .. })
    }

    /// Velocity with the vertical component removed.
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    /// Horizontal forward vector of the current facing.
    pub fn forward(&self) -> Vec3 {
        forward_of(self.facing)
    }
}

/// Everything one locomotion step reads besides the motion state itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepInput {
    /// Movement stick, `x` right and `y` forward, each in `-1..=1`.
    pub move_axis: Vec2,
    /// Sprint held.
    pub sprint: bool,
    /// Jump pulse consumed by this step.
    pub jump_requested: bool,
    /// Camera-relative movement axes.
    pub basis: CameraBasis,
    /// This step's ground probe.
    pub probe: GroundProbe,
    /// Step length in seconds.
    pub dt: f32,
}

/// Tuning for one character's locomotion, attached next to its [`MotionState`].
#[derive(Component, Clone, Debug)]
pub struct LocomotionController {
    /// Speeds, timings, and collider dimensions.
    pub config: LocomotionConfig,
    /// Log jump-state transitions at `debug`.
    pub trace_transitions: bool,
}

impl LocomotionController {
    /// Controller with transition tracing enabled.
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            trace_transitions: true,
        }
    }

    /// Vertical launch speed reaching `jump_height` under `gravity_intensity`.
    pub fn launch_speed(&self) -> f32 {
        (2.0 * self.config.gravity_intensity.abs() * self.config.jump_height).sqrt()
    }

    /// Speed tier for a stick deflection.
    pub fn speed_for(&self, move_amount: f32, sprint: bool) -> f32 {
        if sprint && move_amount > HALF_TILT {
            self.config.sprinting_speed
        } else if move_amount >= HALF_TILT {
            self.config.running_speed
        } else {
            self.config.walking_speed
        }
    }

    /// Advance `state` by one fixed step.
    ///
    /// Cues and the jump flag are pushed to `animator`; its `is_jumping` is
    /// also read back to tell a jump ascent from a walk-off fall.
    pub fn step(&self, state: &mut MotionState, input: &StepInput, animator: &mut AnimatorParams) {
        let cfg = &self.config;
        let dt = input.dt;
        let probe_hit = input.probe.is_hit();

        ground::advance_lost_timer(&mut state.ground_lost_timer, probe_hit, dt);
        let probe_grounded =
            ground::within_threshold(state.ground_lost_timer, cfg.ground_lost_threshold);

        if input.jump_requested && probe_grounded && state.jump_state == JumpState::Idle {
            self.transition(
                state,
                JumpState::WindingUp {
                    steps_remaining: cfg.jump_windup_frames,
                },
            );
            animator.trigger(AnimationCue::Jump);
            animator.is_jumping = true;
        }

        if probe_hit && state.jump_state == JumpState::Airborne && state.velocity.y <= 0.0 {
            self.land(state, animator);
        }

        if state.jump_state == JumpState::Idle
            && !probe_grounded
            && state.velocity.y < 0.0
            && !animator.is_jumping
        {
            capture_air(state);
            self.transition(state, JumpState::Airborne);
            animator.trigger(AnimationCue::Falling);
        }

        let mut launched = false;
        if let JumpState::WindingUp { steps_remaining } = state.jump_state {
            if steps_remaining == 0 {
                capture_air(state);
                state.velocity.y = self.launch_speed();
                self.transition(state, JumpState::Airborne);
                launched = true;
            } else {
                state.jump_state = JumpState::WindingUp {
                    steps_remaining: steps_remaining - 1,
                };
            }
        }

        let ground_state = if state.jump_state == JumpState::Airborne || !probe_grounded {
            GroundState::Airborne
        } else {
            GroundState::Grounded
        };
        if ground_state != state.ground_state {
            if self.trace_transitions {
                tracing::debug!(from = ?state.ground_state, to = ?ground_state, "ground state");
            }
            state.ground_state = ground_state;
        }
        if ground_state == GroundState::Airborne {
            state.air_timer += dt;
            if !launched {
                state.velocity.y -= cfg.gravity_intensity * dt;
            }
        }

        if !(state.interacting && ground_state == GroundState::Grounded) {
            let desired = input.basis.direction(input.move_axis);
            self.apply_movement(state, input, desired);
            self.apply_rotation(state, desired, dt);
        }

        if let JumpState::LandingLock { steps_remaining } = state.jump_state {
            let remaining = steps_remaining.saturating_sub(1);
            if remaining == 0 {
                self.transition(state, JumpState::Idle);
            } else {
                state.jump_state = JumpState::LandingLock {
                    steps_remaining: remaining,
                };
            }
        }
    }

    fn land(&self, state: &mut MotionState, animator: &mut AnimatorParams) {
        state.velocity.x = 0.0;
        state.velocity.z = 0.0;
        state.air_speed = 0.0;
        state.interacting = false;
        animator.is_interacting = false;
        animator.is_jumping = false;
        animator.trigger(AnimationCue::Land);
        self.transition(
            state,
            JumpState::LandingLock {
                steps_remaining: self.config.landing_lock_frames,
            },
        );
    }

    fn apply_movement(&self, state: &mut MotionState, input: &StepInput, desired: Option<Vec3>) {
        let move_amount = (input.move_axis.x.abs() + input.move_axis.y.abs()).clamp(0.0, 1.0);
        let speed = self.speed_for(move_amount, input.sprint);
        state.move_direction = desired.map_or(Vec3::ZERO, |dir| dir * speed);

        let horizontal = match state.jump_state {
            JumpState::Airborne | JumpState::LandingLock { .. } => {
                state.air_direction * state.air_speed
            }
            JumpState::Idle | JumpState::WindingUp { .. } => state.move_direction,
        };
        state.velocity.x = horizontal.x;
        state.velocity.z = horizontal.z;
    }

    fn apply_rotation(&self, state: &mut MotionState, desired: Option<Vec3>, dt: f32) {
        let cfg = &self.config;
        match state.jump_state {
            JumpState::LandingLock { .. } => {
                let target = facing_toward(state.air_direction).unwrap_or(state.facing);
                state.facing = turn_toward(state.facing, target, cfg.rotation_speed, dt);
            }
            JumpState::Airborne if state.air_timer < cfg.air_control_duration => {
                let current = forward_of(state.facing);
                let reference = flatten(state.air_direction)
                    .or_else(|| flatten(state.takeoff_forward))
                    .unwrap_or(current);
                let limit = cfg.air_rotation_limit.to_radians();
                let nudged = clamp_to_cone(reference, desired.unwrap_or(current), limit);
                let target = facing_toward(nudged).unwrap_or(state.facing);
                let turned = turn_toward(state.facing, target, cfg.rotation_speed, dt);
                state.facing = clamp_facing_to_cone(turned, reference, limit);
            }
            _ => {
                if let Some(target) = desired.and_then(facing_toward) {
                    state.facing = turn_toward(state.facing, target, cfg.rotation_speed, dt);
                }
            }
        }
    }

    fn transition(&self, state: &mut MotionState, next: JumpState) {
        if self.trace_transitions {
            tracing::debug!(from = ?state.jump_state, to = ?next, "jump state");
        }
        state.jump_state = next;
    }
}

/// Lock the horizontal velocity reference at the moment of leaving the ground.
fn capture_air(state: &mut MotionState) {
    match flatten(state.move_direction) {
        Some(direction) => {
            state.air_direction = direction;
            state.air_speed = Vec3::new(state.move_direction.x, 0.0, state.move_direction.z).length();
        }
        None => {
            state.air_direction = Vec3::ZERO;
            state.air_speed = 0.0;
        }
    }
    state.air_timer = 0.0;
    state.takeoff_forward = forward_of(state.facing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_control::signed_yaw;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> LocomotionController {
        LocomotionController::new(LocomotionConfig::default())
    }

    fn on_ground(move_axis: Vec2) -> StepInput {
        StepInput {
            move_axis,
            probe: GroundProbe::hit(Vec3::ZERO, 0.9),
            dt: DT,
            ..Default::default()
        }
    }

    fn in_air(move_axis: Vec2) -> StepInput {
        StepInput {
            move_axis,
            probe: GroundProbe::miss(),
            dt: DT,
            ..Default::default()
        }
    }

    fn jump(input: StepInput) -> StepInput {
        StepInput {
            jump_requested: true,
            ..input
        }
    }

    /// Runs the jump request and wind-up until the launch step has executed.
    fn launch(
        ctrl: &LocomotionController,
        state: &mut MotionState,
        anim: &mut AnimatorParams,
        move_axis: Vec2,
    ) {
        ctrl.step(state, &jump(on_ground(move_axis)), anim);
        for _ in 0..ctrl.config.jump_windup_frames {
            ctrl.step(state, &on_ground(move_axis), anim);
        }
        assert_eq!(state.jump_state, JumpState::Airborne);
    }

    #[test]
    fn test_ground_loss_waits_for_threshold() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        // 1/60 and 2/60 are within the default 0.04 s, 3/60 is not
        ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        assert!(state.is_grounded());
        assert_eq!(state.velocity.y, 0.0);
        ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        assert!(state.is_grounded());
        assert_eq!(state.velocity.y, 0.0);
        ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        assert_eq!(state.ground_state, GroundState::Airborne);
    }

    #[test]
    fn test_single_missed_step_keeps_default_grounding() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        for _ in 0..5 {
            ctrl.step(&mut state, &on_ground(Vec2::new(0.0, 1.0)), &mut anim);
        }
        ctrl.step(&mut state, &in_air(Vec2::new(0.0, 1.0)), &mut anim);
        assert!(state.is_grounded());
        assert_eq!(state.velocity.y, 0.0);
        assert!(state.horizontal_velocity().distance(Vec3::Z * 5.0) < 1e-4);

        ctrl.step(&mut state, &on_ground(Vec2::new(0.0, 1.0)), &mut anim);
        assert!(state.is_grounded());
        assert_eq!(state.jump_state, JumpState::Idle);
        assert!(anim.pending_cues().is_empty());
    }

    #[test]
    fn test_probe_hit_between_misses_resets_hysteresis() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        for _ in 0..10 {
            ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
            ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
            ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
            assert!(state.is_grounded());
        }
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn test_windup_holds_velocity_then_launches() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &jump(on_ground(Vec2::ZERO)), &mut anim);
        assert_eq!(state.velocity.y, 0.0);
        assert!(matches!(state.jump_state, JumpState::WindingUp { .. }));
        assert_eq!(anim.pending_cues(), &[AnimationCue::Jump]);
        assert!(anim.is_jumping);

        for _ in 1..ctrl.config.jump_windup_frames {
            ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
            assert_eq!(state.velocity.y, 0.0);
        }

        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
        let expected = (2.0_f32 * 30.0 * 1.5).sqrt();
        assert!((state.velocity.y - expected).abs() < 1e-5);
        assert_eq!(state.jump_state, JumpState::Airborne);
        assert_eq!(state.ground_state, GroundState::Airborne);
    }

    #[test]
    fn test_jump_ignored_while_airborne_or_winding_up() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &jump(on_ground(Vec2::ZERO)), &mut anim);
        ctrl.step(&mut state, &jump(on_ground(Vec2::ZERO)), &mut anim);
        let expected_remaining = ctrl.config.jump_windup_frames - 2;
        assert_eq!(
            state.jump_state,
            JumpState::WindingUp {
                steps_remaining: expected_remaining
            }
        );
        assert_eq!(anim.drain_cues(), vec![AnimationCue::Jump]);

        let mut state = MotionState::new(Vec3::ZERO);
        state.ground_state = GroundState::Airborne;
        state.ground_lost_timer = 1.0;
        ctrl.step(&mut state, &jump(in_air(Vec2::ZERO)), &mut anim);
        assert_eq!(state.jump_state, JumpState::Idle);
        assert!(anim.pending_cues().is_empty());
    }

    #[test]
    fn test_gravity_only_while_airborne() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
        assert_eq!(state.velocity.y, 0.0);

        while state.is_grounded() {
            ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
            if state.is_grounded() {
                assert_eq!(state.velocity.y, 0.0);
            }
        }
        assert!((state.velocity.y + 30.0 * DT).abs() < 1e-5);
        ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        assert!((state.velocity.y + 2.0 * 30.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn test_speed_tiers() {
        let ctrl = controller();
        assert_eq!(ctrl.speed_for(0.3, false), 2.0);
        assert_eq!(ctrl.speed_for(0.3, true), 2.0);
        assert_eq!(ctrl.speed_for(0.5, false), 5.0);
        assert_eq!(ctrl.speed_for(0.5, true), 5.0);
        assert_eq!(ctrl.speed_for(1.0, true), 8.0);
        assert_eq!(ctrl.speed_for(1.0, false), 5.0);
    }

    #[test]
    fn test_grounded_velocity_follows_camera_relative_input() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        let input = StepInput {
            basis: CameraBasis::from_yaw(std::f32::consts::FRAC_PI_2),
            ..on_ground(Vec2::new(0.0, 1.0))
        };
        ctrl.step(&mut state, &input, &mut anim);

        assert!(state.horizontal_velocity().distance(Vec3::X * 5.0) < 1e-4);
        assert!(state.move_direction.distance(Vec3::X * 5.0) < 1e-4);
    }

    #[test]
    fn test_grounded_rotation_is_bounded_and_holds_without_input() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &on_ground(Vec2::new(1.0, 0.0)), &mut anim);
        let yaw = signed_yaw(Vec3::Z, state.forward());
        assert!(yaw > 0.0 && yaw < std::f32::consts::FRAC_PI_2, "no snap, got {yaw}");

        let before = state.facing;
        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
        assert_eq!(state.facing, before);
    }

    #[test]
    fn test_airborne_horizontal_speed_locked_at_takeoff() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::new(0.0, 1.0));
        assert!((state.air_speed - 5.0).abs() < 1e-5);

        for axis in [Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), Vec2::ZERO] {
            for _ in 0..5 {
                ctrl.step(&mut state, &in_air(axis), &mut anim);
                let h = state.horizontal_velocity();
                assert!((h.length() - state.air_speed).abs() < 1e-5);
                assert!(h.distance(Vec3::Z * 5.0) < 1e-4);
            }
        }
    }

    #[test]
    fn test_air_rotation_stays_within_limit_during_window() {
        let ctrl = controller();
        let limit = ctrl.config.air_rotation_limit.to_radians();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::new(0.0, 1.0));
        let air_direction = state.air_direction;

        let mut max_dev: f32 = 0.0;
        while state.air_timer + DT < ctrl.config.air_control_duration {
            ctrl.step(&mut state, &in_air(Vec2::new(0.0, -1.0)), &mut anim);
            let dev = signed_yaw(air_direction, state.forward()).abs();
            assert!(dev <= limit + 1e-4, "deviation {dev} exceeds {limit}");
            max_dev = max_dev.max(dev);
        }
        assert!(max_dev > limit * 0.5, "a nudge should still be possible");

        // Past the window the full camera-relative facing applies.
        for _ in 0..30 {
            ctrl.step(&mut state, &in_air(Vec2::new(0.0, -1.0)), &mut anim);
        }
        assert!(signed_yaw(air_direction, state.forward()).abs() > limit + 0.1);
    }

    #[test]
    fn test_landing_zeroes_horizontal_and_locks_rotation() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::new(0.0, 1.0));
        while state.velocity.y > 0.0 {
            ctrl.step(&mut state, &in_air(Vec2::new(0.0, 1.0)), &mut anim);
        }
        state.facing = Quat::IDENTITY;

        let sideways = Vec2::new(1.0, 0.0);
        let mut locked_steps = 0;
        ctrl.step(&mut state, &on_ground(sideways), &mut anim);
        assert_eq!(state.horizontal_velocity(), Vec3::ZERO);
        assert!(anim.pending_cues().contains(&AnimationCue::Land));
        assert!(!anim.is_jumping);
        locked_steps += 1;

        while state.in_landing_lock() {
            ctrl.step(&mut state, &on_ground(sideways), &mut anim);
            assert_eq!(state.horizontal_velocity(), Vec3::ZERO);
            locked_steps += 1;
        }
        assert_eq!(locked_steps, ctrl.config.landing_lock_frames);
        assert!(state.forward().distance(Vec3::Z) < 1e-4, "facing frozen");

        ctrl.step(&mut state, &on_ground(sideways), &mut anim);
        assert!(signed_yaw(Vec3::Z, state.forward()) > 0.0);
        assert!(state.horizontal_velocity().distance(Vec3::X * 5.0) < 1e-4);
    }

    #[test]
    fn test_rising_through_probe_does_not_land() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::ZERO);
        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
        assert_eq!(state.jump_state, JumpState::Airborne);
        assert!(!state.is_grounded());
    }

    #[test]
    fn test_landing_clears_interaction() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::ZERO);
        state.interacting = true;
        anim.is_interacting = true;
        state.velocity.y = -1.0;
        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);

        assert!(!state.interacting);
        assert!(!anim.is_interacting);
    }

    #[test]
    fn test_interacting_on_ground_blocks_movement_and_rotation() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        state.interacting = true;
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &on_ground(Vec2::new(1.0, 0.0)), &mut anim);
        assert_eq!(state.horizontal_velocity(), Vec3::ZERO);
        assert_eq!(state.facing, Quat::IDENTITY);
    }

    #[test]
    fn test_stationary_jump_is_purely_vertical() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::ZERO);
        assert_eq!(state.air_direction, Vec3::ZERO);
        assert_eq!(state.air_speed, 0.0);

        ctrl.step(&mut state, &in_air(Vec2::new(1.0, 1.0)), &mut anim);
        assert_eq!(state.horizontal_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_landing_after_standing_jump_holds_facing() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        state.facing = Quat::from_rotation_y(0.7);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::ZERO);
        while state.velocity.y > 0.0 {
            ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        }
        let takeoff = state.forward();
        assert!((signed_yaw(Vec3::Z, takeoff) - 0.7).abs() < 1e-4);

        let sideways = Vec2::new(-1.0, 0.0);
        ctrl.step(&mut state, &on_ground(sideways), &mut anim);
        assert!(state.in_landing_lock());
        while state.in_landing_lock() {
            assert!(signed_yaw(takeoff, state.forward()).abs() < 1e-4);
            ctrl.step(&mut state, &on_ground(sideways), &mut anim);
        }
        assert!(signed_yaw(takeoff, state.forward()).abs() < 1e-4);
        assert_eq!(state.horizontal_velocity(), Vec3::ZERO);

        ctrl.step(&mut state, &on_ground(sideways), &mut anim);
        assert!(signed_yaw(takeoff, state.forward()) < 0.0, "control resumed");
    }

    #[test]
    fn test_standing_jump_air_turn_limited_around_takeoff_facing() {
        let ctrl = controller();
        let limit = ctrl.config.air_rotation_limit.to_radians();
        let mut state = MotionState::new(Vec3::ZERO);
        state.facing = Quat::from_rotation_y(0.7);
        let mut anim = AnimatorParams::default();

        launch(&ctrl, &mut state, &mut anim, Vec2::ZERO);
        assert_eq!(state.air_direction, Vec3::ZERO);
        let takeoff = state.takeoff_forward;
        assert!(takeoff.distance(state.forward()) < 1e-5);

        let mut max_dev: f32 = 0.0;
        while state.air_timer + DT < ctrl.config.air_control_duration {
            ctrl.step(&mut state, &in_air(Vec2::new(0.0, -1.0)), &mut anim);
            let dev = signed_yaw(takeoff, state.forward()).abs();
            assert!(dev <= limit + 1e-4, "deviation {dev} exceeds {limit}");
            max_dev = max_dev.max(dev);
        }
        assert!(max_dev > limit * 0.5, "a nudge should still be possible");
        assert_eq!(state.horizontal_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_jump_flag_suppresses_walk_off_fall() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::ZERO);
        state.velocity.y = -1.0;
        state.ground_state = GroundState::Airborne;
        state.ground_lost_timer = 1.0;
        let mut anim = AnimatorParams::default();
        anim.is_jumping = true;

        ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
        assert_eq!(state.jump_state, JumpState::Idle);
        assert!(anim.pending_cues().is_empty());
    }

    #[test]
    fn test_scenario_standing_jump_full_cycle() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::new(0.0, 0.9, 0.0));
        let mut anim = AnimatorParams::default();

        ctrl.step(&mut state, &jump(on_ground(Vec2::ZERO)), &mut anim);
        let mut windup_steps = 1;
        while matches!(state.jump_state, JumpState::WindingUp { .. }) {
            assert_eq!(state.velocity.y, 0.0);
            ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
            windup_steps += 1;
        }
        // Five held steps, launch on the sixth.
        assert_eq!(windup_steps, 6);
        assert!((state.velocity.y - ctrl.launch_speed()).abs() < 1e-5);

        let mut air_steps = 0;
        while state.velocity.y > 0.0 {
            ctrl.step(&mut state, &in_air(Vec2::ZERO), &mut anim);
            air_steps += 1;
        }
        assert!(air_steps > 10);
        assert_eq!(state.jump_state, JumpState::Airborne);

        ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
        let mut lock_steps = 1;
        while state.in_landing_lock() {
            ctrl.step(&mut state, &on_ground(Vec2::ZERO), &mut anim);
            lock_steps += 1;
        }
        assert_eq!(lock_steps, 3);
        assert_eq!(state.jump_state, JumpState::Idle);
        assert!(state.is_grounded());
        assert_eq!(
            anim.drain_cues(),
            vec![AnimationCue::Jump, AnimationCue::Land]
        );

        ctrl.step(&mut state, &on_ground(Vec2::new(0.0, 1.0)), &mut anim);
        assert!(state.horizontal_velocity().length() > 0.0, "control resumed");
    }

    #[test]
    fn test_scenario_run_off_ledge_keeps_momentum() {
        let ctrl = controller();
        let mut state = MotionState::new(Vec3::new(0.0, 0.9, 0.0));
        let mut anim = AnimatorParams::default();
        let forward = Vec2::new(0.0, 1.0);

        for _ in 0..10 {
            ctrl.step(&mut state, &on_ground(forward), &mut anim);
        }
        assert!(state.horizontal_velocity().distance(Vec3::Z * 5.0) < 1e-4);

        // Probe stops hitting: hysteresis expires, then gravity drives the fall.
        let mut steps = 0;
        while state.jump_state != JumpState::Airborne {
            ctrl.step(&mut state, &in_air(forward), &mut anim);
            steps += 1;
            assert!(steps < 8, "walk-off fall not detected");
        }
        assert!(state.air_direction.distance(Vec3::Z) < 1e-5);
        assert!((state.air_speed - 5.0).abs() < 1e-5);
        assert_eq!(anim.pending_cues(), &[AnimationCue::Falling]);

        for _ in 0..20 {
            ctrl.step(&mut state, &in_air(Vec2::new(0.0, -1.0)), &mut anim);
            assert!(state.horizontal_velocity().distance(Vec3::Z * 5.0) < 1e-4);
            assert!(state.velocity.y < 0.0);
        }
    }
}
