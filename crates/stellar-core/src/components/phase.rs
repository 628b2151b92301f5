//! Phase accumulator driving the oscillating stages.

use serde::{Deserialize, Serialize};

/// Wrap point for the accumulator.
///
/// 10π is a whole period of `sin(phase)`, `sin(2 * phase)` and of the
/// `0.2 * phase` corona rotation, so wrapping here never produces a visual jump.
pub const PHASE_PERIOD: f64 = 10.0 * std::f64::consts::PI;

/// Monotonically advancing scalar, reset when its stage is initialized
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    value: f64,
}

impl Phase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Advance by `step` and return the new value
    pub fn advance(&mut self, step: f64) -> f64 {
        self.value += step;
        if self.value >= PHASE_PERIOD {
            self.value -= PHASE_PERIOD;
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value as `f32` for trigonometry on the draw path
    pub fn radians(&self) -> f32 {
        self.value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_accumulation() {
        let mut phase = Phase::new();
        for _ in 0..100 {
            phase.advance(0.02);
        }
        assert!((phase.value() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut phase = Phase::new();
        phase.advance(1.5);
        phase.reset();
        assert_eq!(phase.value(), 0.0);
    }

    #[test]
    fn test_wraps_and_stays_bounded() {
        let mut phase = Phase::new();
        for _ in 0..1_000_000 {
            phase.advance(0.05);
        }
        assert!(phase.value() >= 0.0);
        assert!(phase.value() < PHASE_PERIOD);
    }

    #[test]
    fn test_wrap_is_visually_continuous() {
        let before = PHASE_PERIOD - 0.01;
        let after = before + 0.02 - PHASE_PERIOD;
        // Same visual result as if no wrap had happened
        let unwrapped = before + 0.02;
        assert!(((2.0 * after).sin() - (2.0 * unwrapped).sin()).abs() < 1e-9);
        assert!(((0.2 * after).sin() - (0.2 * unwrapped).sin()).abs() < 1e-9);
        assert!((after.sin() - unwrapped.sin()).abs() < 1e-9);
    }
}
