//! Headless demo course and scripted input.
//!
//! The course is a raised start platform, open floor beyond its edge, and a
//! wall at the far end. The script walks off the platform, jumps, stops near
//! the wall, swings the camera around so the wall pulls it in, holds an
//! interaction, then sprints back.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use strider_config::Config;
use strider_ecs::{ControlInput, FrameSchedules, create_world};
use strider_physics::{CollisionLayers, PhysicsWorld, add_static_box};
use strider_player::{
    AnimationCue, AvatarHandles, AvatarReadout, CueLog, SetupError, add_player_systems,
    avatar_readout, set_interacting, spawn_avatar, validate_wiring,
};
use tracing::info;

/// Height of the start platform's top face.
pub const PLATFORM_TOP: f32 = 1.0;

/// Z of the platform's far edge.
pub const PLATFORM_EDGE: f32 = 4.0;

/// Z of the wall face toward the start.
pub const WALL_FACE: f32 = 14.5;

/// Frame times cycled by the demo loop, in seconds.
pub const FRAME_PATTERN: [f64; 7] = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];

/// Adds the demo course's static geometry on the world layer.
pub fn build_course(physics: &mut PhysicsWorld) {
    // floor
    add_static_box(
        physics,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(50.0, 0.5, 50.0),
        CollisionLayers::WORLD,
    );
    // start platform, z in [-10, 4]
    add_static_box(
        physics,
        Vec3::new(0.0, PLATFORM_TOP * 0.5, PLATFORM_EDGE - 7.0),
        Vec3::new(4.0, PLATFORM_TOP * 0.5, 7.0),
        CollisionLayers::WORLD,
    );
    // wall
    add_static_box(
        physics,
        Vec3::new(0.0, 2.0, WALL_FACE + 0.5),
        Vec3::new(6.0, 2.0, 0.5),
        CollisionLayers::WORLD,
    );
    // Register the colliders with the broad phase before the first query.
    physics.step();
}

/// One input change in the demo script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    /// Hold the movement stick.
    Move(Vec2),
    /// Look delta for a single frame.
    Look(Vec2),
    /// Hold or release sprint.
    Sprint(bool),
    /// Press jump once.
    Jump,
    /// Start or end a blocking interaction.
    Interact(bool),
}

/// An action applied once the demo clock reaches `at` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    /// Simulated time in seconds.
    pub at: f64,
    /// What changes.
    pub action: InputAction,
}

const fn event(at: f64, action: InputAction) -> InputEvent {
    InputEvent { at, action }
}

/// The demo's input timeline, sorted by time.
pub fn demo_script() -> Vec<InputEvent> {
    use InputAction::*;
    vec![
        event(0.0, Move(Vec2::new(0.0, 1.0))),
        event(1.6, Jump),
        event(2.6, Move(Vec2::ZERO)),
        // Half turn: 90 units at look speed 2.
        event(2.7, Look(Vec2::new(90.0, 0.0))),
        event(3.5, Interact(true)),
        event(3.5, Move(Vec2::new(0.0, 1.0))),
        event(4.0, Interact(false)),
        event(4.2, Sprint(true)),
        event(4.8, Move(Vec2::ZERO)),
        event(4.8, Sprint(false)),
    ]
}

/// A world with the course, one avatar, and its schedules.
pub struct Demo {
    /// The ECS world.
    pub world: World,
    /// Stage schedules driving the world.
    pub schedules: FrameSchedules,
    /// The spawned avatar and camera.
    pub handles: AvatarHandles,
    script: Vec<InputEvent>,
    cursor: usize,
    elapsed: f64,
    closest_camera: f32,
}

impl Demo {
    /// Builds the course and spawns the avatar on the start platform.
    ///
    /// Fails if the avatar wiring does not validate.
    pub fn new(config: &Config, script: Vec<InputEvent>) -> Result<Self, SetupError> {
        let mut world = create_world();
        let mut physics = PhysicsWorld::with_timestep(config.simulation.fixed_dt as f32);
        build_course(&mut physics);
        world.insert_resource(physics);
        world.insert_resource(CueLog::default());

        let start = Vec3::new(
            0.0,
            PLATFORM_TOP + config.locomotion.collider_half_height,
            0.0,
        );
        let handles = spawn_avatar(&mut world, start, config)?;
        let avatars = validate_wiring(&mut world)?;
        info!(avatars, "controller wiring validated");

        let mut schedules = FrameSchedules::with_fixed_dt(config.simulation.fixed_dt);
        add_player_systems(&mut schedules);
        schedules.initialize_all(&mut world);

        Ok(Self {
            world,
            schedules,
            handles,
            script,
            cursor: 0,
            elapsed: 0.0,
            closest_camera: config.camera.rest_distance.abs(),
        })
    }

    /// Applies due script events, runs one frame, and returns the number of
    /// fixed steps it took.
    pub fn frame(&mut self, dt: f64) -> u32 {
        while let Some(next) = self.script.get(self.cursor) {
            if next.at > self.elapsed {
                break;
            }
            let action = next.action;
            self.cursor += 1;
            self.apply(action);
        }

        let steps = self.schedules.run(&mut self.world, dt);
        self.elapsed += dt;
        // Look is a per-frame delta.
        self.world.resource_mut::<ControlInput>().set_look(Vec2::ZERO);

        if let Some(distance) = self.readout().and_then(|r| r.camera_distance) {
            self.closest_camera = self.closest_camera.min(distance.abs());
        }
        steps
    }

    fn apply(&mut self, action: InputAction) {
        info!(at = self.elapsed, ?action, "script");
        match action {
            InputAction::Interact(on) => {
                set_interacting(&mut self.world, self.handles.avatar, on);
            }
            action => {
                let mut input = self.world.resource_mut::<ControlInput>();
                match action {
                    InputAction::Move(axis) => input.set_move(axis),
                    InputAction::Look(axis) => input.set_look(axis),
                    InputAction::Sprint(held) => input.sprint_held = held,
                    InputAction::Jump => input.press_jump(),
                    InputAction::Interact(_) => {}
                }
            }
        }
    }

    /// Current avatar snapshot.
    pub fn readout(&self) -> Option<AvatarReadout> {
        avatar_readout(&self.world, self.handles.avatar)
    }

    /// Simulated seconds so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Smallest camera offset magnitude seen so far.
    pub fn closest_camera(&self) -> f32 {
        self.closest_camera
    }

    /// Cues the animator has received, oldest first.
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.world.resource::<CueLog>().cues()
    }
}
