//! Live tone parameters shared between the owner thread and the engine thread.
//!
//! [`ParameterState`] is a last-writer-wins channel: the owner stores new targets
//! at any time, and the engine thread reads them every sample. Every field is an
//! independent atomic word, so a reader may see a new frequency together with an
//! old amplitude; the smoothing filter absorbs that slack.
//!
//! Out-of-range values are clamped at the boundary. Non-finite values are refused
//! and the previous target kept.
//!
//! # Example
//!
//! ```
//! use siggen_core::ParameterState;
//!
//! let params = ParameterState::new(440.0, 0.5);
//! params.set_target_frequency(-3.0); // clamped to the minimum
//! params.set_target_amplitude(2.0);  // clamped to 1.0
//!
//! let snap = params.snapshot();
//! assert!(snap.frequency_hz > 0.0);
//! assert_eq!(snap.amplitude, 1.0);
//! ```

use crate::lockfree::{AtomicDouble, AtomicFlag, AtomicTag};
use serde::{Deserialize, Serialize};

/// Lowest accepted target frequency.
pub const MIN_FREQUENCY_HZ: f64 = 0.1;

/// Highest accepted target frequency.
pub const MAX_FREQUENCY_HZ: f64 = 25_000.0;

/// Accepted target frequency range.
pub const FREQUENCY_RANGE: ParameterRange =
    ParameterRange::new(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ, ParameterScale::Logarithmic);

/// Accepted target amplitude range.
pub const AMPLITUDE_RANGE: ParameterRange = ParameterRange::new(0.0, 1.0, ParameterScale::Linear);

/// How a parameter value is scaled between normalized (0-1) and real values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ParameterScale {
    /// `real = min + normalized * (max - min)`
    #[default]
    Linear,

    /// `real = min * (max/min)^normalized`
    ///
    /// Requires `min > 0`.
    Logarithmic,
}

/// Valid range of a parameter, with normalized (0.0-1.0) conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub scale: ParameterScale,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64, scale: ParameterScale) -> Self {
        Self { min, max, scale }
    }

    pub const fn linear(min: f64, max: f64) -> Self {
        Self::new(min, max, ParameterScale::Linear)
    }

    pub const fn logarithmic(min: f64, max: f64) -> Self {
        Self::new(min, max, ParameterScale::Logarithmic)
    }

    /// Convert a real value to normalized (0.0-1.0).
    ///
    /// Logarithmic ranges must have `min > 0`.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let value = self.clamp(value);
        let range = self.max - self.min;

        if range <= 0.0 {
            return 0.0;
        }

        match self.scale {
            ParameterScale::Linear => (value - self.min) / range,
            ParameterScale::Logarithmic => (value / self.min).ln() / (self.max / self.min).ln(),
        }
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Periodic waveform family. Only a sine is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Waveform {
    #[default]
    Sine = 0,
}

impl Waveform {
    /// Evaluate the waveform at `phase` (radians), in `[-1, 1]`.
    #[inline]
    pub fn evaluate(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => phase.sin(),
        }
    }

    /// Decode a stored tag. Unknown tags yield `None`.
    #[inline]
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Waveform::Sine),
            _ => None,
        }
    }
}

/// Point-in-time copy of the targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub frequency_hz: f64,
    pub amplitude: f64,
    pub mute: bool,
    pub waveform: Waveform,
}

/// Live target values written by the owner and read by the engine thread.
#[derive(Debug)]
pub struct ParameterState {
    frequency: AtomicDouble,
    amplitude: AtomicDouble,
    mute: AtomicFlag,
    waveform: AtomicTag,
}

impl ParameterState {
    /// Initial values are clamped like any other write; non-finite values fall
    /// back to the range minimum.
    pub fn new(frequency_hz: f64, amplitude: f64) -> Self {
        let frequency_hz = if frequency_hz.is_finite() {
            FREQUENCY_RANGE.clamp(frequency_hz)
        } else {
            MIN_FREQUENCY_HZ
        };
        let amplitude = if amplitude.is_finite() {
            AMPLITUDE_RANGE.clamp(amplitude)
        } else {
            0.0
        };

        Self {
            frequency: AtomicDouble::new(frequency_hz),
            amplitude: AtomicDouble::new(amplitude),
            mute: AtomicFlag::new(false),
            waveform: AtomicTag::new(Waveform::Sine as u8),
        }
    }

    /// Returns the stored (clamped) value, or `None` if `hz` was refused.
    pub fn set_target_frequency(&self, hz: f64) -> Option<f64> {
        if !hz.is_finite() {
            tracing::warn!("Refused non-finite target frequency {hz}");
            return None;
        }
        let clamped = FREQUENCY_RANGE.clamp(hz);
        if clamped != hz {
            tracing::debug!("Target frequency {hz} clamped to {clamped}");
        }
        self.frequency.set(clamped);
        Some(clamped)
    }

    /// Returns the stored (clamped) value, or `None` if `level` was refused.
    pub fn set_target_amplitude(&self, level: f64) -> Option<f64> {
        if !level.is_finite() {
            tracing::warn!("Refused non-finite target amplitude {level}");
            return None;
        }
        let clamped = AMPLITUDE_RANGE.clamp(level);
        if clamped != level {
            tracing::debug!("Target amplitude {level} clamped to {clamped}");
        }
        self.amplitude.set(clamped);
        Some(clamped)
    }

    pub fn set_mute(&self, mute: bool) {
        self.mute.set(mute);
    }

    /// Flip mute, returning the new state.
    pub fn toggle_mute(&self) -> bool {
        self.mute.toggle()
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.set(waveform as u8);
    }

    pub fn target_frequency(&self) -> f64 {
        self.frequency.get()
    }

    pub fn target_amplitude(&self) -> f64 {
        self.amplitude.get()
    }

    pub fn is_muted(&self) -> bool {
        self.mute.get()
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_tag(self.waveform.get()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            frequency_hz: self.frequency.get(),
            amplitude: self.amplitude.get(),
            mute: self.mute.get(),
            waveform: self.waveform(),
        }
    }

    /// Snapshot for the per-sample path; relaxed loads only.
    #[inline]
    pub(crate) fn snapshot_relaxed(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            frequency_hz: self.frequency.get_relaxed(),
            amplitude: self.amplitude.get_relaxed(),
            mute: self.mute.get_relaxed(),
            waveform: Waveform::from_tag(self.waveform.get_relaxed()).unwrap_or_default(),
        }
    }
}

/// Smoothed values published by the engine thread for display.
///
/// Updated once per buffer; never read back into synthesis.
#[derive(Debug, Default)]
pub struct Readout {
    frequency: AtomicDouble,
    amplitude: AtomicDouble,
}

impl Readout {
    pub fn new(frequency_hz: f64) -> Self {
        Self {
            frequency: AtomicDouble::new(frequency_hz),
            amplitude: AtomicDouble::new(0.0),
        }
    }

    /// Smoothed frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency.get()
    }

    /// Smoothed amplitude in sample units (`0..=PEAK`).
    pub fn amplitude(&self) -> f64 {
        self.amplitude.get()
    }

    pub(crate) fn publish(&self, frequency_hz: f64, amplitude: f64) {
        self.frequency.set(frequency_hz);
        self.amplitude.set(amplitude);
    }
}
