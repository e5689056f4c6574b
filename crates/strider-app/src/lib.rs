//! Headless host for the Strider character controller: frame clock,
//! directory resolution, and the scripted demo course.

pub mod game_loop;
pub mod platform;
pub mod scenario;

pub use game_loop::GameLoop;
pub use platform::{PlatformDirs, PlatformError};
pub use scenario::{Demo, FRAME_PATTERN, InputAction, InputEvent, build_course, demo_script};
