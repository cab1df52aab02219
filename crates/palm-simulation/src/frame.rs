//! Frame loop bookkeeping for one instance

use std::time::Instant;

/// Tracks whether an instance is animating and how long since its last tick.
///
/// The platform's redraw callback calls [`AnimationLoop::tick`]; a stopped
/// loop turns every pending callback into a no-op.
#[derive(Debug, Clone, Default)]
pub struct AnimationLoop {
    running: bool,
    last_tick: Option<Instant>,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first tick after a start reports zero elapsed time
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_tick = None;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds since the previous tick, or `None` when stopped
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if !self.running {
            return None;
        }

        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.frames += 1;

        Some(elapsed)
    }
}
