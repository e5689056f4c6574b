//! Latched control input for the current frame.

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Stick tilt above which movement counts as running (and sprint may engage).
const HALF_TILT: f32 = 0.5;

/// Control state handed over by the input collaborator.
///
/// Axes are sampled once per frame and hold their value until overwritten.
/// The sprint flag follows press/release. The jump request is a pulse: it is
/// set on press and cleared by the locomotion step that consumes it.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct ControlInput {
    /// Movement stick: `x` strafes right, `y` moves forward. Each in `-1..=1`.
    pub move_axis: Vec2,
    /// Look delta: `x` yaws, `y` pitches.
    pub look_axis: Vec2,
    /// Sprint button currently held.
    pub sprint_held: bool,
    /// Jump pressed and not yet consumed.
    pub jump_pressed: bool,
}

impl ControlInput {
    /// Latch new movement axes, clamped to the unit range per axis.
    pub fn set_move(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Latch a new look delta.
    pub fn set_look(&mut self, axis: Vec2) {
        self.look_axis = axis;
    }

    /// Record a jump press. Repeated presses before consumption collapse into one.
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Consume the pending jump request, returning whether one was set.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    /// Overall stick deflection, `clamp01(|x| + |y|)`.
    pub fn move_amount(&self) -> f32 {
        (self.move_axis.x.abs() + self.move_axis.y.abs()).clamp(0.0, 1.0)
    }

    /// Sprint only counts while the stick is pushed past half tilt.
    pub fn is_sprinting(&self) -> bool {
        self.sprint_held && self.move_amount() > HALF_TILT
    }
}
