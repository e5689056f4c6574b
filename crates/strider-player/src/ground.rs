//! Ground probe and loss hysteresis.
//!
//! The probe is a ray cast straight down from the collider center. A miss does
//! not unground the character immediately: the lost timer has to exceed the
//! configured threshold first, so single-step gaps on seams and stair edges
//! never read as a fall.

use bevy_ecs::prelude::*;
use glam::Vec3;
use strider_config::LocomotionConfig;
use strider_physics::{CollisionLayers, RigidBodyHandle, WorldQuery};

/// A confirmed ground contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Distance from the collider center down to `point`.
    pub distance: f32,
}

/// Result of the most recent ground probe, written once per fixed step.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundProbe {
    /// Contact, if the ray found terrain within range.
    pub hit: Option<ProbeHit>,
}

impl GroundProbe {
    /// A probe that found nothing.
    pub fn miss() -> Self {
        Self { hit: None }
    }

    /// A probe that touched terrain at `point`, `distance` below the origin.
    pub fn hit(point: Vec3, distance: f32) -> Self {
        Self {
            hit: Some(ProbeHit { point, distance }),
        }
    }

    /// Whether the probe touched terrain.
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// Reach of the probe below the collider center: half the collider plus a
/// small clearance margin.
pub fn probe_reach(config: &LocomotionConfig) -> f32 {
    config.collider_half_height + config.ground_check_distance
}

/// Casts the ground probe from `center` against the terrain layers.
pub fn cast_ground_probe(
    world: &impl WorldQuery,
    center: Vec3,
    config: &LocomotionConfig,
    exclude: Option<RigidBodyHandle>,
) -> GroundProbe {
    world
        .cast_ray_down(
            center,
            probe_reach(config),
            CollisionLayers::from(config.terrain_layers),
            exclude,
        )
        .map_or_else(GroundProbe::miss, |hit| {
            GroundProbe::hit(hit.point, hit.distance)
        })
}

/// Advances the lost timer: reset on a hit, accumulate `dt` on a miss.
pub fn advance_lost_timer(timer: &mut f32, probe_hit: bool, dt: f32) {
    if probe_hit {
        *timer = 0.0;
    } else {
        *timer += dt;
    }
}

/// Grounded until the probe has been missing for longer than `threshold`.
pub fn within_threshold(timer: f32, threshold: f32) -> bool {
    timer <= threshold
}
