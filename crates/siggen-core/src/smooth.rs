//! One-pole parameter smoothing for click-free parameter changes.
//!
//! Every sample moves the current value a fixed fraction `1 / SMOOTH_N` of the
//! remaining distance toward the target. The target is approached exponentially
//! and never overshot; after `k · SMOOTH_N` samples the remaining distance is
//! about `e^-k` of where it started.
//!
//! # Example
//!
//! ```
//! use siggen_core::{OnePole, SMOOTH_N};
//!
//! let mut freq = OnePole::new(440.0);
//!
//! // Target jumps to 880 Hz; the smoothed value follows over ~SMOOTH_N samples.
//! for _ in 0..(5.0 * SMOOTH_N) as usize {
//!     freq.next(880.0);
//! }
//! assert!((freq.current() - 880.0).abs() < 440.0 * 0.01);
//! ```

/// Time constant of the smoothing filter, in samples (~93 ms at 44.1 kHz).
pub const SMOOTH_N: f64 = 4096.0;

/// One-pole exponential smoother.
///
/// Unlike a linear ramp this has no notion of "done": the value keeps
/// approaching the target for as long as it is driven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    current: f64,
}

impl OnePole {
    pub fn new(initial: f64) -> Self {
        Self { current: initial }
    }

    /// Advance one sample toward `target` and return the new value.
    #[inline]
    pub fn next(&mut self, target: f64) -> f64 {
        self.current += (target - self.current) / SMOOTH_N;
        self.current
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }
}
