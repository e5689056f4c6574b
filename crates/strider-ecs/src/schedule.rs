//! Frame stage labels and the ordered schedule runner.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};

use crate::TimeRes;

/// Maximum number of fixed-update steps per frame to prevent spiral-of-death.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 10;

/// Labels for each frame stage, run top to bottom every frame.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameStage {
    /// Sample input and publish animator values.
    PreUpdate,
    /// Deterministic simulation: ground probe, locomotion, physics.
    FixedUpdate,
    /// Late tick after physics: camera resolution, animator sync.
    PostUpdate,
}

/// Ordered collection of [`Schedule`]s that drives one frame.
///
/// `FixedUpdate` uses a time-accumulator pattern so simulation results do not
/// depend on the render frame rate.
pub struct FrameSchedules {
    schedules: Vec<(FrameStage, Schedule)>,
    fixed_accumulator: f64,
    fixed_dt: f64,
}

impl FrameSchedules {
    /// Create the stage schedules with the default fixed timestep (1/60 s).
    pub fn new() -> Self {
        Self::with_fixed_dt(1.0 / 60.0)
    }

    /// Create the stage schedules with a custom fixed timestep in seconds.
    pub fn with_fixed_dt(fixed_dt: f64) -> Self {
        let schedules = [
            FrameStage::PreUpdate,
            FrameStage::FixedUpdate,
            FrameStage::PostUpdate,
        ]
        .into_iter()
        .map(|label| (label.clone(), Schedule::new(label)))
        .collect();

        Self {
            schedules,
            fixed_accumulator: 0.0,
            fixed_dt,
        }
    }

    /// Register a system (or system tuple) into a specific stage.
    pub fn add_system<M>(&mut self, stage: FrameStage, system: impl IntoSystemConfigs<M>) {
        if let Some(schedule) = self.get_schedule_mut(&stage) {
            schedule.add_systems(system);
        }
    }

    /// Run all stages in order for one frame and return the number of fixed
    /// steps executed.
    ///
    /// `FixedUpdate` may run 0–[`MAX_FIXED_STEPS_PER_FRAME`] times based on
    /// accumulated delta time. The other stages run exactly once.
    pub fn run(&mut self, world: &mut World, frame_dt: f64) -> u32 {
        if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
            time.delta = frame_dt as f32;
            time.fixed_delta = self.fixed_dt as f32;
        }

        self.run_stage(FrameStage::PreUpdate, world);

        self.fixed_accumulator += frame_dt;
        let mut steps: u32 = 0;
        while self.fixed_accumulator >= self.fixed_dt && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.run_stage(FrameStage::FixedUpdate, world);
            if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
                time.fixed_ticks += 1;
            }
            self.fixed_accumulator -= self.fixed_dt;
            steps += 1;
        }

        self.run_stage(FrameStage::PostUpdate, world);
        steps
    }

    /// Returns the current fixed-update accumulator value in seconds.
    pub fn fixed_accumulator(&self) -> f64 {
        self.fixed_accumulator
    }

    /// Returns the fixed timestep in seconds.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Returns a mutable reference to the schedule for a given stage.
    ///
    /// Useful for configuring system sets and ordering constraints.
    pub fn get_schedule_mut(&mut self, stage: &FrameStage) -> Option<&mut Schedule> {
        self.schedules
            .iter_mut()
            .find(|(label, _)| label == stage)
            .map(|(_, schedule)| schedule)
    }

    /// Force-initialize all schedules, validating the dependency graph.
    pub fn initialize_all(&mut self, world: &mut World) {
        for (_label, schedule) in &mut self.schedules {
            let _ = schedule.initialize(world);
        }
    }

    fn run_stage(&mut self, target: FrameStage, world: &mut World) {
        if let Some(schedule) = self.get_schedule_mut(&target) {
            schedule.run(world);
        }
    }
}

impl Default for FrameSchedules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_world;

    #[derive(Resource, Default)]
    struct ExecutionLog {
        stages: Vec<String>,
    }

    fn log_system(stage_name: &'static str) -> impl Fn(ResMut<'_, ExecutionLog>) {
        move |mut log: ResMut<'_, ExecutionLog>| {
            log.stages.push(stage_name.to_string());
        }
    }

    #[derive(Resource, Default)]
    struct FixedCount(u32);

    fn count_fixed(mut count: ResMut<'_, FixedCount>) {
        count.0 += 1;
    }

    #[test]
    fn test_schedule_runs_all_stages_in_order() {
        let mut world = create_world();
        world.insert_resource(ExecutionLog::default());

        let mut schedules = FrameSchedules::new();
        schedules.add_system(FrameStage::PostUpdate, log_system("PostUpdate"));
        schedules.add_system(FrameStage::FixedUpdate, log_system("FixedUpdate"));
        schedules.add_system(FrameStage::PreUpdate, log_system("PreUpdate"));

        schedules.run(&mut world, 1.0 / 60.0);

        let log = world.resource::<ExecutionLog>();
        assert_eq!(log.stages, vec!["PreUpdate", "FixedUpdate", "PostUpdate"]);
    }

    #[test]
    fn test_fixed_update_runs_at_correct_rate() {
        let mut world = create_world();
        world.insert_resource(FixedCount::default());

        let mut schedules = FrameSchedules::new();
        schedules.add_system(FrameStage::FixedUpdate, count_fixed);

        // 3 frames at 20 Hz (50ms each): each frame covers three 16.67ms steps
        let mut steps = 0;
        for _ in 0..3 {
            steps += schedules.run(&mut world, 0.05);
        }

        assert_eq!(world.resource::<FixedCount>().0, 9);
        assert_eq!(steps, 9);
        assert_eq!(world.resource::<TimeRes>().fixed_ticks, 9);
    }

    #[test]
    fn test_fixed_update_skips_when_dt_too_small() {
        let mut world = create_world();
        world.insert_resource(FixedCount::default());

        let mut schedules = FrameSchedules::new();
        schedules.add_system(FrameStage::FixedUpdate, count_fixed);

        // 1ms < 16.67ms fixed step: no fixed update
        let steps = schedules.run(&mut world, 0.001);

        assert_eq!(steps, 0);
        assert_eq!(world.resource::<FixedCount>().0, 0);
        assert!((world.resource::<TimeRes>().delta - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_steps_capped_per_frame() {
        let mut world = create_world();
        world.insert_resource(FixedCount::default());

        let mut schedules = FrameSchedules::new();
        schedules.add_system(FrameStage::FixedUpdate, count_fixed);

        let steps = schedules.run(&mut world, 1.0);
        assert_eq!(steps, MAX_FIXED_STEPS_PER_FRAME);
        assert!(schedules.fixed_accumulator() > 0.0);
    }

    #[test]
    fn test_custom_fixed_dt_is_published() {
        let mut world = create_world();
        let mut schedules = FrameSchedules::with_fixed_dt(0.02);
        schedules.run(&mut world, 0.02);
        assert!((world.resource::<TimeRes>().fixed_delta - 0.02).abs() < 1e-6);
        assert!((schedules.fixed_dt() - 0.02).abs() < f64::EPSILON);
    }
}
