//! Per-sample tone synthesis: smoothing, phase accumulation, quantization.

use crate::oscillator::{PhaseAccumulator, PhaseWrap};
use crate::parameter::{ParameterSnapshot, ParameterState};
use crate::smooth::OnePole;

/// Sample value of a full-amplitude tone (half of i16 full scale).
pub const PEAK: f64 = 16384.0;

/// Synthesis state owned by the engine thread.
///
/// Amplitude starts at zero so every run fades in through the smoother.
#[derive(Debug, Clone)]
pub struct SynthesisCursor {
    frequency: OnePole,
    amplitude: OnePole,
    phase: PhaseAccumulator,
}

impl SynthesisCursor {
    pub fn new(sample_rate: f64, initial_frequency_hz: f64, wrap: PhaseWrap) -> Self {
        Self {
            frequency: OnePole::new(initial_frequency_hz),
            amplitude: OnePole::new(0.0),
            phase: PhaseAccumulator::new(sample_rate, wrap),
        }
    }

    /// Produce one sample for the given targets.
    #[inline]
    pub fn next_sample(&mut self, targets: &ParameterSnapshot) -> i16 {
        let frequency = self.frequency.next(targets.frequency_hz);
        let level = if targets.mute {
            0.0
        } else {
            targets.amplitude * PEAK
        };
        let amplitude = self.amplitude.next(level);
        let phase = self.phase.advance(frequency);

        quantize(targets.waveform.evaluate(phase) * amplitude)
    }

    /// Fill `buffer`, re-reading the live targets for every sample.
    pub fn fill(&mut self, params: &ParameterState, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            let targets = params.snapshot_relaxed();
            *sample = self.next_sample(&targets);
        }
    }

    /// Smoothed frequency in Hz.
    #[inline]
    pub fn current_frequency(&self) -> f64 {
        self.frequency.current()
    }

    /// Smoothed amplitude in sample units.
    #[inline]
    pub fn current_amplitude(&self) -> f64 {
        self.amplitude.current()
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase.phase()
    }

    #[inline]
    pub fn increment_constant(&self) -> f64 {
        self.phase.increment_constant()
    }
}

/// Round to nearest and clip to the i16 range.
#[inline]
pub fn quantize(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
