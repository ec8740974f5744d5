//! Progress clock: elapsed time scaled by a speed multiplier

use serde::{Deserialize, Serialize};

use crate::consts::SOLVE_EPSILON;

/// Tracks elapsed solve time and maps it to a 0..=1 progress fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressClock {
    elapsed: f32,
    solve_time: f32,
}

impl ProgressClock {
    pub fn new(solve_time: f32) -> Self {
        Self {
            elapsed: 0.0,
            solve_time: solve_time.max(0.0),
        }
    }

    /// Passive advance: `elapsed += dt * speed`
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) {
        self.elapsed += dt.max(0.0) * speed_multiplier.max(0.0);
    }

    /// Drive the clock from an external progress source (mini-games)
    pub fn mirror(&mut self, progress: f32) {
        self.elapsed = progress.clamp(0.0, 1.0) * self.solve_time;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn solve_time(&self) -> f32 {
        self.solve_time
    }

    /// Elapsed has reached the solve time (within float slack)
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.solve_time - SOLVE_EPSILON
    }

    pub fn progress(&self) -> f32 {
        if self.is_done() {
            1.0
        } else {
            (self.elapsed / self.solve_time).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_multiplier_scales_progress() {
        let mut clock = ProgressClock::new(10.0);
        clock.advance(2.0, 1.5);
        assert!((clock.elapsed() - 3.0).abs() < 1e-6);
        assert!((clock.progress() - 0.3).abs() < 1e-6);
        assert!(!clock.is_done());
    }

    #[test]
    fn test_accumulated_frames_finish_on_time() {
        let mut clock = ProgressClock::new(10.0);
        for _ in 0..99 {
            clock.advance(0.1, 1.0);
        }
        assert!(!clock.is_done());
        clock.advance(0.1, 1.0);
        assert!(clock.is_done());
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_mirror_tracks_external_progress() {
        let mut clock = ProgressClock::new(15.0);
        clock.mirror(0.4);
        assert!((clock.elapsed() - 6.0).abs() < 1e-5);
        clock.mirror(1.0);
        assert!(clock.is_done());
    }

    #[test]
    fn test_zero_solve_time_is_done_immediately() {
        let clock = ProgressClock::new(0.0);
        assert!(clock.is_done());
        assert_eq!(clock.progress(), 1.0);
    }
}
