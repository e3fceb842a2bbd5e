//! Test helpers and fixtures for siggen integration tests
//!
//! Everything runs against [`CaptureBackend`], so no audio device is needed.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `QUANTIZATION_STEP` (1.0): one i16 rounding step
//! - `FREQUENCY_TOLERANCE` (1%): zero-crossing frequency estimates
//! - `SILENCE_PEAK` (1): window peak treated as silence

#![allow(dead_code)]

pub mod tolerances;

use siggen::core::{PEAK, SMOOTH_N};
use siggen::prelude::*;
use siggen::{CaptureHandle, ToneEngine};
use std::f64::consts::TAU;
use std::time::Duration;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: u32 = 44_100;

/// Longest any test waits for the engine thread to produce samples.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(20);

/// Samples after which both smoothers are within 1% of their targets.
pub const SETTLED: usize = 5 * SMOOTH_N as usize;

/// Engine config for tests: no priority change on the engine thread.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        realtime_priority: false,
        ..Default::default()
    }
}

/// Create a test engine on a capture device.
pub fn capture_engine(
    backend: CaptureBackend,
    config: EngineConfig,
) -> (ToneEngine<CaptureBackend>, CaptureHandle) {
    let capture = backend.handle();
    let engine = ToneEngine::new(backend, config).expect("Failed to create test engine");
    (engine, capture)
}

/// Run an engine offline until `num_samples` have been captured.
pub fn render(config: EngineConfig, sample_rate: u32, num_samples: usize) -> Vec<i16> {
    let backend = CaptureBackend::new(sample_rate, 0).limit(num_samples);
    let (mut engine, capture) = capture_engine(backend, config);

    engine.start().expect("Failed to start engine");
    assert!(
        capture.wait_for_samples(num_samples, CAPTURE_TIMEOUT),
        "Timed out waiting for {num_samples} samples"
    );
    engine.stop().expect("Failed to stop engine");

    capture.samples()
}

/// Peak absolute sample value.
pub fn peak(samples: &[i16]) -> i16 {
    samples
        .iter()
        .map(|s| s.saturating_abs())
        .max()
        .unwrap_or(0)
}

/// Peak per consecutive window of `window` samples.
pub fn envelope(samples: &[i16], window: usize) -> Vec<i16> {
    samples.chunks_exact(window).map(peak).collect()
}

/// Largest sample-to-sample difference.
pub fn max_step(samples: &[i16]) -> i32 {
    samples
        .windows(2)
        .map(|w| (i32::from(w[1]) - i32::from(w[0])).abs())
        .max()
        .unwrap_or(0)
}

/// Largest step a clean sine of `amplitude` (in `[0, 1]`) at `frequency`
/// can take between samples, plus rounding.
pub fn sine_step_bound(frequency: f64, amplitude: f64, sample_rate: u32) -> f64 {
    amplitude * PEAK * TAU * frequency / f64::from(sample_rate) + 2.0 * tolerances::QUANTIZATION_STEP
}

/// Positions of upward zero crossings, interpolated between samples.
pub fn rising_crossings(samples: &[i16]) -> Vec<f64> {
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] < 0 && w[1] >= 0)
        .map(|(i, w)| {
            let (a, b) = (f64::from(w[0]), f64::from(w[1]));
            i as f64 + a / (a - b)
        })
        .collect()
}

/// Estimate frequency from the spacing of upward zero crossings.
pub fn estimate_frequency(samples: &[i16], sample_rate: u32) -> f64 {
    let crossings = rising_crossings(samples);
    assert!(
        crossings.len() >= 2,
        "Need at least two zero crossings, found {}",
        crossings.len()
    );
    let cycles = (crossings.len() - 1) as f64;
    let span = crossings[crossings.len() - 1] - crossings[0];
    cycles * f64::from(sample_rate) / span
}

/// Assert a measured frequency is within [`tolerances::FREQUENCY_TOLERANCE`].
pub fn assert_frequency(samples: &[i16], sample_rate: u32, expected: f64) {
    let measured = estimate_frequency(samples, sample_rate);
    let error = (measured - expected).abs() / expected;
    assert!(
        error <= tolerances::FREQUENCY_TOLERANCE,
        "Expected ~{expected}Hz, measured {measured}Hz ({:.3}% off)",
        error * 100.0
    );
}

/// Assert no sample-to-sample jump exceeds `bound`.
pub fn assert_no_clicks(samples: &[i16], bound: f64) {
    let step = max_step(samples);
    assert!(
        f64::from(step) <= bound,
        "Sample step {step} exceeds click bound {bound:.1}"
    );
}
