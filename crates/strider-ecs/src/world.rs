//! World factory function and core resource registration.

use bevy_ecs::prelude::*;

use crate::{ControlInput, TimeRes};

/// Registers the core resources into the given world with default values.
///
/// Physics and player state are inserted later by their own crates.
pub fn register_core_resources(world: &mut World) {
    world.insert_resource(TimeRes::default());
    world.insert_resource(ControlInput::default());
}

/// Creates an ECS world with [`TimeRes`] and [`ControlInput`] pre-inserted.
pub fn create_world() -> World {
    let mut world = World::new();
    register_core_resources(&mut world);
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_world_has_all_resources() {
        let world = create_world();
        assert!(world.contains_resource::<TimeRes>());
        assert!(world.contains_resource::<ControlInput>());
    }

    #[test]
    fn test_time_res_defaults() {
        let world = create_world();
        let time = world.resource::<TimeRes>();
        assert_eq!(time.delta, 0.0);
        assert_eq!(time.fixed_ticks, 0);
        assert!((time.fixed_delta - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_world_starts_with_no_entities() {
        let world = create_world();
        assert_eq!(world.entities().len(), 0);
    }
}
