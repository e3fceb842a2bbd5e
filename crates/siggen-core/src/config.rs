//! Tone engine configuration.

use crate::oscillator::PhaseWrap;
use crate::parameter::{AMPLITUDE_RANGE, FREQUENCY_RANGE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`ToneEngine`](crate::ToneEngine).
///
/// Smoothing and peak level are fixed calibration constants
/// ([`SMOOTH_N`](crate::SMOOTH_N), [`PEAK`](crate::PEAK)) and are not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target and starting smoothed frequency.
    pub initial_frequency_hz: f64,
    /// Target amplitude in `[0, 1]`. Output still fades in from silence.
    pub initial_amplitude: f64,
    pub phase_wrap: PhaseWrap,
    pub thread_name: String,
    /// Ask the OS for maximum priority on the engine thread.
    pub realtime_priority: bool,
    /// Upper bound on how long `stop()` waits for the engine thread.
    pub stop_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_frequency_hz: 440.0,
            initial_amplitude: 0.1,
            phase_wrap: PhaseWrap::Modulo,
            thread_name: String::from("siggen-audio"),
            realtime_priority: true,
            stop_timeout: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !FREQUENCY_RANGE.contains(self.initial_frequency_hz) {
            return Err(Error::InvalidConfig(format!(
                "initial_frequency_hz {} out of range ({}-{} Hz)",
                self.initial_frequency_hz, FREQUENCY_RANGE.min, FREQUENCY_RANGE.max
            )));
        }
        if !AMPLITUDE_RANGE.contains(self.initial_amplitude) {
            return Err(Error::InvalidConfig(format!(
                "initial_amplitude {} out of range (0-1)",
                self.initial_amplitude
            )));
        }
        if self.stop_timeout.is_zero() {
            return Err(Error::InvalidConfig("stop_timeout must be non-zero".into()));
        }
        if self.thread_name.is_empty() {
            return Err(Error::InvalidConfig("thread_name must not be empty".into()));
        }
        Ok(())
    }
}
