//! Phase accumulator driving the tone generator.

use core::f64::consts::{PI, TAU};
use serde::{Deserialize, Serialize};

/// How the accumulated phase is brought back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseWrap {
    /// Keep phase in `[0, 2π)` by modulo after every step.
    #[default]
    Modulo,

    /// Bit-exact legacy accumulator: once phase reaches π, the next increment has
    /// 2π subtracted from it. Phase then stays in `[-π, π + increment)`.
    Legacy,
}

/// Running angular position, advanced per sample in proportion to frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator {
    phase: f64,
    /// Radians per sample per Hz, `2π / sample_rate`.
    k: f64,
    wrap: PhaseWrap,
}

impl PhaseAccumulator {
    pub fn new(sample_rate: f64, wrap: PhaseWrap) -> Self {
        Self {
            phase: 0.0,
            k: TAU / sample_rate,
            wrap,
        }
    }

    /// Phase increment constant `K = 2π / sample_rate`.
    #[inline]
    pub fn increment_constant(&self) -> f64 {
        self.k
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn wrap(&self) -> PhaseWrap {
        self.wrap
    }

    /// Advance by one sample at `frequency_hz` and return the new phase.
    #[inline]
    pub fn advance(&mut self, frequency_hz: f64) -> f64 {
        let increment = frequency_hz * self.k;

        match self.wrap {
            PhaseWrap::Modulo => {
                self.phase = (self.phase + increment) % TAU;
                if self.phase < 0.0 {
                    self.phase += TAU;
                }
            }
            PhaseWrap::Legacy => {
                self.phase += if self.phase < PI {
                    increment
                } else {
                    increment - TAU
                };
            }
        }

        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
