//! Builder for configuring and constructing a `SignalGenerator`.

use crate::core::control::{self, DIAL_DEFAULT, DIAL_MAX, DIAL_MIN, FINE_CENTER, FINE_MAX};
use crate::core::control::{LEVEL_DEFAULT, LEVEL_MAX};
use crate::core::parameter::FREQUENCY_RANGE;
use crate::core::{AudioBackend, EngineConfig, PhaseWrap, ToneEngine};
use crate::engine::{Controls, SignalGenerator};
use crate::Result;
use std::time::Duration;

#[cfg(feature = "cpal")]
use crate::core::CpalBackend;

/// The sample rate and buffer size are negotiated with the output device on
/// `start()` and cannot be overridden. Query `stream_info()` once running.
///
/// # Example
///
/// ```ignore
/// use siggen::prelude::*;
///
/// let generator = SignalGenerator::builder()
///     .frequency(440.0)
///     .level(50)
///     .build()?;
///
/// generator.start()?;
/// ```
pub struct SignalGeneratorBuilder {
    config: EngineConfig,
    #[cfg(feature = "cpal")]
    output_device: Option<usize>,
    dial: f64,
    fine: u32,
    level: u32,
    muted: bool,
}

impl Default for SignalGeneratorBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            #[cfg(feature = "cpal")]
            output_device: None,
            dial: DIAL_DEFAULT,
            fine: FINE_CENTER,
            level: LEVEL_DEFAULT,
            muted: false,
        }
    }
}

impl SignalGeneratorBuilder {
    #[cfg(feature = "cpal")]
    pub fn output_device(mut self, index: usize) -> Self {
        self.output_device = Some(index);
        self
    }

    /// Default: 400 (1 kHz). Non-finite positions are ignored.
    pub fn dial(mut self, dial: f64) -> Self {
        if dial.is_finite() {
            self.dial = dial.clamp(DIAL_MIN, DIAL_MAX);
        } else {
            tracing::warn!("Ignoring non-finite dial position {dial}");
        }
        self
    }

    /// Default: centre
    pub fn fine(mut self, fine: u32) -> Self {
        self.fine = fine.min(FINE_MAX);
        self
    }

    /// Start at `hz`, with the fine slider centred. Non-finite values are
    /// ignored.
    pub fn frequency(mut self, hz: f64) -> Self {
        if !hz.is_finite() {
            tracing::warn!("Ignoring non-finite frequency {hz}");
            return self;
        }
        let hz = FREQUENCY_RANGE.clamp(hz);
        self.dial = control::frequency_to_dial(hz).clamp(DIAL_MIN, DIAL_MAX);
        self.fine = FINE_CENTER;
        self
    }

    /// Default: 10 (-20 dB)
    pub fn level(mut self, level: u32) -> Self {
        self.level = level.min(LEVEL_MAX);
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Default: [`PhaseWrap::Modulo`]
    pub fn phase_wrap(mut self, wrap: PhaseWrap) -> Self {
        self.config.phase_wrap = wrap;
        self
    }

    /// Default: true
    pub fn realtime_priority(mut self, enabled: bool) -> Self {
        self.config.realtime_priority = enabled;
        self
    }

    /// Default: 2 s
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.config.stop_timeout = timeout;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Build on a custom output backend.
    pub fn build_with<B: AudioBackend>(self, backend: B) -> Result<SignalGenerator<B>> {
        let controls = Controls {
            dial: self.dial,
            fine: self.fine,
            level: self.level,
        };

        // The first buffer starts from the control positions rather than 440 Hz
        let mut config = self.config;
        config.initial_frequency_hz =
            FREQUENCY_RANGE.clamp(control::tuned_frequency(controls.dial, controls.fine));
        config.initial_amplitude = control::level_to_amplitude(controls.level);

        let engine = ToneEngine::new(backend, config)?;
        Ok(SignalGenerator::from_parts(engine, controls, self.muted))
    }

    /// Build on the default (or selected) CPAL output device.
    #[cfg(feature = "cpal")]
    pub fn build(self) -> Result<SignalGenerator<CpalBackend>> {
        let backend = match self.output_device {
            Some(index) => CpalBackend::with_device(index),
            None => CpalBackend::default(),
        };
        self.build_with(backend)
    }
}
