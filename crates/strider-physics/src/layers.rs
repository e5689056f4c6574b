//! Collision layer masks.
//!
//! Layer membership is stored in the low 32 bits of a collider's `user_data`.
//! Colliders created without layer data count as [`CollisionLayers::WORLD`].

use rapier3d::prelude::Collider;

/// Bit mask of collision layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    /// No layers; a query with this filter never hits anything.
    pub const NONE: Self = Self(0);
    /// Static level geometry: floors, ledges, walls.
    pub const WORLD: Self = Self(1 << 0);
    /// Character bodies.
    pub const CHARACTER: Self = Self(1 << 1);
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Raw bit mask.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True if any bit is shared with `other`.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Value to store in a collider's `user_data`.
    pub fn to_user_data(self) -> u128 {
        u128::from(self.0)
    }

    /// Layers a collider belongs to.
    pub fn of_collider(collider: &Collider) -> Self {
        match collider.user_data as u32 {
            0 => Self::WORLD,
            bits => Self(bits),
        }
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for CollisionLayers {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier3d::prelude::ColliderBuilder;

    #[test]
    fn test_layers_intersect() {
        let mask = CollisionLayers::WORLD | CollisionLayers::CHARACTER;
        assert!(mask.intersects(CollisionLayers::WORLD));
        assert!(!CollisionLayers::WORLD.intersects(CollisionLayers::CHARACTER));
        assert!(!CollisionLayers::NONE.intersects(CollisionLayers::ALL));
    }

    #[test]
    fn test_untagged_collider_is_world() {
        let collider = ColliderBuilder::ball(0.5).build();
        assert_eq!(CollisionLayers::of_collider(&collider), CollisionLayers::WORLD);
    }

    #[test]
    fn test_user_data_roundtrip() {
        let collider = ColliderBuilder::ball(0.5)
            .user_data(CollisionLayers::CHARACTER.to_user_data())
            .build();
        assert_eq!(
            CollisionLayers::of_collider(&collider),
            CollisionLayers::CHARACTER
        );
    }
}
