//! Physics integration: rigid bodies, static level geometry, and world queries.
//!
//! Wraps the Rapier 3D physics engine behind a single [`PhysicsWorld`] resource.
//! The character controller only needs two things from it: a body whose
//! velocity it drives every fixed step, and the [`WorldQuery`] casts used for
//! ground detection and camera collision.

mod body;
mod layers;
mod query;

use bevy_ecs::prelude::*;
use rapier3d::prelude::*;

pub use body::{
    CharacterBody, add_static_box, body_state, set_body_velocity, spawn_character_body,
};
pub use layers::CollisionLayers;
pub use query::{RayHit, SweepHit, WorldQuery};
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Central physics simulation resource owning all Rapier state.
///
/// Insert into the ECS world at startup. Systems read via `Res<PhysicsWorld>`
/// for casts or mutate via `ResMut<PhysicsWorld>` to drive bodies.
#[derive(Resource)]
pub struct PhysicsWorld {
    /// World-space gravity vector. Character bodies opt out with a zero
    /// gravity scale and receive custom gravity from locomotion instead.
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    /// The main simulation pipeline.
    pub physics_pipeline: PhysicsPipeline,
    /// Tracks sleeping/awake body islands.
    pub island_manager: IslandManager,
    /// Broad-phase collision detection (also provides query pipeline).
    pub broad_phase: BroadPhaseBvh,
    /// Narrow-phase collision detection (contact manifolds).
    pub narrow_phase: NarrowPhase,
    /// All rigid bodies in the simulation.
    pub rigid_body_set: RigidBodySet,
    /// All colliders in the simulation.
    pub collider_set: ColliderSet,
    /// Impulse-based joints.
    pub impulse_joint_set: ImpulseJointSet,
    /// Multibody joints.
    pub multibody_joint_set: MultibodyJointSet,
    /// Continuous collision detection solver.
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates a physics world with gravity `(0, -9.81, 0)` and a `1/60` s step.
    pub fn new() -> Self {
        Self::with_timestep(1.0 / 60.0)
    }

    /// Creates a physics world stepping `dt` seconds per [`step`](Self::step).
    pub fn with_timestep(dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, -9.81, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Returns the fixed timestep in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// ECS system that steps the physics simulation once per invocation.
///
/// Runs in the `FixedUpdate` stage after locomotion has written velocities.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}
