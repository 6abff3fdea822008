//! Time management utilities

use std::time::{Duration, Instant};

/// Monotonic timer measuring the time between two simulation steps
#[derive(Debug)]
pub struct StepTimer {
    last_step: Instant,
    step_count: u64,
    max_step: Option<Duration>,
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTimer {
    /// Create a new timer, counting from now
    pub fn new() -> Self {
        Self {
            last_step: Instant::now(),
            step_count: 0,
            max_step: None,
        }
    }

    /// Clamp every measured interval to `max_step`
    pub fn with_max_step(mut self, max_step: Duration) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Time elapsed since the previous call (or since creation for the first call)
    ///
    /// Intervals longer than the configured maximum are clamped, so a stalled
    /// host does not hand the engine one huge step.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_step);
        self.last_step = now;
        self.step_count += 1;

        match self.max_step {
            Some(max) if elapsed > max => {
                log::warn!(
                    "Step interval {:?} exceeds maximum {:?}, clamping",
                    elapsed,
                    max
                );
                max
            }
            _ => elapsed,
        }
    }

    /// Number of intervals measured so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_steps() {
        let mut timer = StepTimer::new();
        assert_eq!(timer.step_count(), 0);
        timer.tick();
        timer.tick();
        assert_eq!(timer.step_count(), 2);
    }

    #[test]
    fn test_tick_is_clamped() {
        let mut timer = StepTimer::new().with_max_step(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(timer.tick(), Duration::ZERO);
    }
}
