//! World queries used by the character controller.
//!
//! [`WorldQuery`] is the seam between the controller and level geometry: a
//! downward ray for the ground probe and a sphere sweep for camera collision.
//! [`PhysicsWorld`] implements it against Rapier's query pipeline.

use glam::Vec3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;

use crate::{CollisionLayers, PhysicsWorld};

/// Result of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Result of a sphere sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// World-space contact point on the obstacle.
    pub point: Vec3,
    /// Distance from the sweep origin to `point`.
    pub distance: f32,
}

/// Geometry queries the controller needs from the world.
pub trait WorldQuery {
    /// Cast a ray straight down from `origin` for at most `max_distance`.
    ///
    /// Only colliders on `layers` are considered; `exclude` skips the caller's
    /// own body.
    fn cast_ray_down(
        &self,
        origin: Vec3,
        max_distance: f32,
        layers: CollisionLayers,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit>;

    /// Sweep a sphere of `radius` from `origin` along `direction` for at most
    /// `max_distance`, returning the nearest contact.
    fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<SweepHit>;
}

impl PhysicsWorld {
    /// Runs `query` against a pipeline restricted to `layers`, skipping the
    /// `exclude` body.
    fn with_query<R>(
        &self,
        layers: CollisionLayers,
        exclude: Option<RigidBodyHandle>,
        query: impl FnOnce(&QueryPipeline<'_>) -> R,
    ) -> R {
        let predicate = |_handle: ColliderHandle, collider: &Collider| {
            CollisionLayers::of_collider(collider).intersects(layers)
        };
        let mut filter = QueryFilter::new().predicate(&predicate);
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        let pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.rigid_body_set,
            &self.collider_set,
            filter,
        );
        query(&pipeline)
    }
}

impl WorldQuery for PhysicsWorld {
    fn cast_ray_down(
        &self,
        origin: Vec3,
        max_distance: f32,
        layers: CollisionLayers,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit> {
        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(0.0, -1.0, 0.0),
        );
        self.with_query(layers, exclude, |pipeline| {
            pipeline.cast_ray(&ray, max_distance, true)
        })
        .map(|(_, toi)| RayHit {
            point: origin + Vec3::NEG_Y * toi,
            distance: toi,
        })
    }

    /// Casts a ball along `direction`. The reported distance is measured from
    /// `origin` to the contact point on the obstacle, not to the ball center.
    fn sweep_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<SweepHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let ball = Ball::new(radius.max(0.0));
        let start = Pose::translation(origin.x, origin.y, origin.z);
        let velocity = Vector::new(dir.x, dir.y, dir.z);
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
            ..Default::default()
        };

        let (_, hit) = self.with_query(layers, None, |pipeline| {
            pipeline.cast_shape(&start, velocity, &ball, options)
        })?;
        // Pipeline queries report the world-side witness in world space.
        let point = Vec3::new(hit.witness1.x, hit.witness1.y, hit.witness1.z);
        Some(SweepHit {
            point,
            distance: origin.distance(point),
        })
    }
}
