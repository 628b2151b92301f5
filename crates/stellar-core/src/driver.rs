//! Animation driver - the per-frame loop, fed by an injected tick source.
//!
//! Navigation requests are queued on the driver and applied at the start of
//! the next frame, so a transition is always fully before or fully after a
//! render, never in the middle of one.

use std::collections::VecDeque;

use crate::canvas::Canvas;
use crate::engine::SimulationEngine;
use crate::sequencer::Transition;

/// One scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub frame: u64,
}

/// Something that paces the loop: a display refresh, a timer, a test.
///
/// `None` means the loop is being torn down.
pub trait TickSource {
    fn next_tick(&mut self) -> Option<Tick>;
}

/// Issues a fixed number of ticks back to back
#[derive(Debug, Clone)]
pub struct FixedTicks {
    remaining: u64,
    issued: u64,
}

impl FixedTicks {
    pub fn new(count: u64) -> Self {
        Self {
            remaining: count,
            issued: 0,
        }
    }
}

impl TickSource for FixedTicks {
    fn next_tick(&mut self) -> Option<Tick> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let tick = Tick { frame: self.issued };
        self.issued += 1;
        Some(tick)
    }
}

/// Drives an engine frame by frame
#[derive(Debug, Default)]
pub struct AnimationDriver {
    pending: VecDeque<Transition>,
    frames: u64,
    stopped: bool,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a navigation request for the next frame
    pub fn request(&mut self, transition: Transition) {
        self.pending.push_back(transition);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued transitions, then render one frame.
    ///
    /// Returns `false` without drawing once the driver has been stopped.
    pub fn frame(&mut self, engine: &mut SimulationEngine, canvas: &mut dyn Canvas) -> bool {
        if self.stopped {
            return false;
        }
        while let Some(transition) = self.pending.pop_front() {
            engine.apply(transition);
        }
        engine.tick(canvas);
        self.frames += 1;
        true
    }

    /// Render a frame for every tick until the source ends or [`stop`](Self::stop)
    /// is called. Returns the number of frames rendered by this call.
    pub fn run(
        &mut self,
        engine: &mut SimulationEngine,
        canvas: &mut dyn Canvas,
        source: &mut dyn TickSource,
    ) -> u64 {
        let start = self.frames;
        while !self.stopped {
            if source.next_tick().is_none() {
                break;
            }
            self.frame(engine, canvas);
        }
        log::debug!("Animation loop ended after {} frames", self.frames - start);
        self.frames - start
    }

    /// Tear the loop down between ticks. Queued requests are dropped.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.pending.clear();
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::catalog::Language;
    use crate::config::EngineConfig;
    use crate::stages::StageId;

    fn engine() -> SimulationEngine {
        SimulationEngine::with_language(EngineConfig::seeded(1).with_size(640.0, 480.0), Language::English)
            .unwrap()
    }

    #[test]
    fn test_fixed_ticks() {
        let mut ticks = FixedTicks::new(3);
        assert_eq!(ticks.next_tick(), Some(Tick { frame: 0 }));
        assert_eq!(ticks.next_tick(), Some(Tick { frame: 1 }));
        assert_eq!(ticks.next_tick(), Some(Tick { frame: 2 }));
        assert_eq!(ticks.next_tick(), None);
    }

    #[test]
    fn test_run_renders_every_tick() {
        let mut engine = engine();
        let mut canvas = RecordingCanvas::new();
        let mut driver = AnimationDriver::new();

        let frames = driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(12));
        assert_eq!(frames, 12);
        assert_eq!(driver.frames(), 12);
    }

    #[test]
    fn test_requests_apply_before_next_frame() {
        let mut engine = engine();
        let mut canvas = RecordingCanvas::new();
        let mut driver = AnimationDriver::new();

        driver.request(Transition::Advance);
        driver.request(Transition::Advance);
        assert_eq!(engine.current_id(), StageId::Nebula);

        driver.frame(&mut engine, &mut canvas);
        assert_eq!(engine.current_id(), StageId::PreMainSequence);
        assert_eq!(driver.pending(), 0);
        // The frame rendered the new stage, so its phase has advanced once
        assert!((engine.phase().value() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_stop_ends_loop() {
        let mut engine = engine();
        let mut canvas = RecordingCanvas::new();
        let mut driver = AnimationDriver::new();
        driver.request(Transition::Advance);
        driver.stop();

        assert!(!driver.frame(&mut engine, &mut canvas));
        assert_eq!(driver.run(&mut engine, &mut canvas, &mut FixedTicks::new(5)), 0);
        assert!(canvas.is_empty());
        assert_eq!(engine.current_id(), StageId::Nebula);
    }
}
