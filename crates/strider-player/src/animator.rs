//! Parameter block shared with the animation collaborator.

use bevy_ecs::prelude::*;

/// Discrete one-shot animation triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationCue {
    /// Jump wind-up started.
    Jump,
    /// Left the ground without jumping.
    Falling,
    /// Touched down from the air.
    Land,
}

impl AnimationCue {
    /// Name the animation collaborator knows this cue by.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jump => "Jump",
            Self::Falling => "Falling",
            Self::Land => "Land",
        }
    }
}

impl std::fmt::Display for AnimationCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Values exchanged with the animator each frame.
///
/// Locomotion pushes cues and mirrors its jump state in `is_jumping`; it also
/// reads `is_jumping` back to tell a jump ascent from a walk-off fall. The
/// animator owns `is_interacting` while a non-locomotive action plays.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct AnimatorParams {
    cues: Vec<AnimationCue>,
    /// A jump is in progress (wind-up through landing).
    pub is_jumping: bool,
    /// Mirrors the character's ground state.
    pub is_grounded: bool,
    /// A non-locomotive action blocks movement while grounded.
    pub is_interacting: bool,
    /// Stick deflection in `0..=1` for the locomotion blend.
    pub move_amount: f32,
    /// Sprint is engaged.
    pub is_sprinting: bool,
}

impl AnimatorParams {
    /// Parameters for a character spawned standing on terrain.
    pub fn grounded() -> Self {
        Self {
            is_grounded: true,
            ..Default::default()
        }
    }

    /// Queue a one-shot cue.
    pub fn trigger(&mut self, cue: AnimationCue) {
        self.cues.push(cue);
    }

    /// Cues queued since the last drain, oldest first.
    pub fn pending_cues(&self) -> &[AnimationCue] {
        &self.cues
    }

    /// Hand the queued cues to the animator and clear the queue.
    pub fn drain_cues(&mut self) -> Vec<AnimationCue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(AnimationCue::Jump.name(), "Jump");
        assert_eq!(AnimationCue::Falling.to_string(), "Falling");
        assert_eq!(AnimationCue::Land.name(), "Land");
    }

    #[test]
    fn test_drain_empties_queue_in_order() {
        let mut params = AnimatorParams::default();
        params.trigger(AnimationCue::Jump);
        params.trigger(AnimationCue::Land);
        assert_eq!(params.pending_cues().len(), 2);
        assert_eq!(
            params.drain_cues(),
            vec![AnimationCue::Jump, AnimationCue::Land]
        );
        assert!(params.pending_cues().is_empty());
    }

    #[test]
    fn test_grounded_params_start_with_no_cues() {
        let params = AnimatorParams::grounded();
        assert!(params.is_grounded);
        assert!(!params.is_jumping);
        assert!(params.pending_cues().is_empty());
    }
}
