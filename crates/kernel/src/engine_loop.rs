use crate::WorldError;
use crate::world::World;
use diorama_render::Engine;
use std::time::Instant;

/// Longest frame reported to the world. Longer gaps (a stalled window, a
/// debugger break) are clamped so objects do not jump.
pub const MAX_FRAME_MS: f64 = 100.0;

/// Drives a [`World`] once per frame: update, pre-render, render.
#[derive(Debug)]
pub struct EngineLoop<E: Engine> {
    world: World<E>,
    last_frame: Option<Instant>,
    frames: u64,
}

impl<E: Engine> EngineLoop<E> {
    pub fn new(world: World<E>) -> Self {
        Self {
            world,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn initialize(&mut self) -> Result<(), WorldError> {
        self.world.initialize()
    }

    /// Run one frame timed against the previous call. The first frame
    /// reports zero elapsed time.
    pub fn frame(&mut self, now: Instant) -> Result<(), WorldError> {
        let elapsed_ms = match self.last_frame {
            Some(previous) => {
                (now.saturating_duration_since(previous).as_secs_f64() * 1000.0).min(MAX_FRAME_MS)
            }
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.frame_with_elapsed(elapsed_ms)
    }

    /// Run one frame with a fixed elapsed time, in milliseconds.
    pub fn frame_with_elapsed(&mut self, elapsed_ms: f64) -> Result<(), WorldError> {
        self.world.update(elapsed_ms);
        self.world.pre_render();
        self.world.render()?;
        self.frames += 1;
        Ok(())
    }

    pub fn world(&self) -> &World<E> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<E> {
        &mut self.world
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_render::DebugTextEngine;
    use std::time::Duration;

    fn engine_loop() -> EngineLoop<DebugTextEngine> {
        let world = World::new(DebugTextEngine::new(320, 240)).without_model();
        let mut engine_loop = EngineLoop::new(world);
        engine_loop.initialize().unwrap();
        engine_loop
    }

    #[test]
    fn first_frame_reports_zero() {
        let mut engine_loop = engine_loop();
        engine_loop.frame(Instant::now()).unwrap();
        assert_eq!(engine_loop.world().engine().elapsed_ms(), 0.0);
        assert_eq!(engine_loop.frames(), 1);
        assert_eq!(engine_loop.world().engine().frames(), 1);
    }

    #[test]
    fn elapsed_is_measured_between_frames() {
        let mut engine_loop = engine_loop();
        let start = Instant::now();
        engine_loop.frame(start).unwrap();
        engine_loop.frame(start + Duration::from_millis(40)).unwrap();
        assert!((engine_loop.world().engine().elapsed_ms() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut engine_loop = engine_loop();
        let start = Instant::now();
        engine_loop.frame(start).unwrap();
        engine_loop.frame(start + Duration::from_secs(5)).unwrap();
        assert_eq!(engine_loop.world().engine().elapsed_ms(), MAX_FRAME_MS);
    }

    #[test]
    fn fixed_steps_move_the_sphere() {
        let mut engine_loop = engine_loop();
        for _ in 0..4 {
            engine_loop.frame_with_elapsed(250.0).unwrap();
        }
        let z = engine_loop.world().sphere_position().unwrap().z;
        assert_eq!(z, 1.0);
        assert_eq!(engine_loop.frames(), 4);
    }

    #[test]
    fn keys_between_frames_are_applied() {
        let mut engine_loop = engine_loop();
        engine_loop.world_mut().key_down("3");
        engine_loop.frame_with_elapsed(16.0).unwrap();
        assert_eq!(engine_loop.world().camera().position.z, -5.0);
    }
}
