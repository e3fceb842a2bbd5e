//! Tolerance constants for tone testing.
//!
//! Sample values are i16 produced by rounding, so amplitude comparisons are
//! expressed in quantization steps.

/// Rounding to the nearest integer sample.
pub const QUANTIZATION_STEP: f64 = 1.0;

/// Relative frequency error allowed when measuring from zero crossings.
pub const FREQUENCY_TOLERANCE: f64 = 0.01;

/// Window peak at or below this is treated as silence.
pub const SILENCE_PEAK: i16 = 1;
