//! ECS world setup, frame stages, and the shared per-frame resources.
//!
//! Provides the central [`World`](bevy_ecs::world::World) factory and the
//! [`FrameSchedules`] runner that drives input sampling, the fixed
//! simulation tick, and the late (post-physics) tick in that order.

mod input;
mod schedule;
mod system_ordering;
mod time;
mod world;

pub use input::ControlInput;
pub use schedule::{FrameSchedules, FrameStage, MAX_FIXED_STEPS_PER_FRAME};
pub use system_ordering::{
    FixedUpdateSet, PostUpdateSet, configure_fixedupdate_ordering, configure_postupdate_ordering,
};
pub use time::TimeRes;
pub use world::{create_world, register_core_resources};
