//! SignalGenerator: tone engine plus the generator's control surface.

use crate::core::control::{
    self, DIAL_MAX, DIAL_MIN, FINE_CENTER, FINE_MAX, LEVEL_MAX,
};
use crate::core::parameter::FREQUENCY_RANGE;
use crate::core::{
    AudioBackend, EngineState, ParameterState, Readout, Result, StreamInfo, ToneEngine,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "cpal")]
use crate::{core::CpalBackend, SignalGeneratorBuilder};

/// Control positions. Targets pushed to the engine are derived from these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Controls {
    pub(crate) dial: f64,
    pub(crate) fine: u32,
    pub(crate) level: u32,
}

impl Controls {
    fn frequency(&self) -> f64 {
        control::tuned_frequency(self.dial, self.fine)
    }
}

/// Text shown on the generator's display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub frequency: String,
    pub level: String,
}

/// Signal generator: a [`ToneEngine`] driven by dial, fine-tune and level
/// controls.
///
/// All methods take `&self`; share it behind an `Arc` between UI handlers.
///
/// # Example
///
/// ```ignore
/// use siggen::prelude::*;
///
/// let generator = SignalGenerator::builder().build()?;
/// generator.start()?;
///
/// generator.set_dial(400.0);       // 1 kHz
/// generator.fine_higher();         // +0.002%
/// generator.set_level(50);         // -6 dB
/// println!("{}", generator.display().frequency);
/// ```
pub struct SignalGenerator<B: AudioBackend> {
    engine: Mutex<ToneEngine<B>>,
    params: Arc<ParameterState>,
    readout: Arc<Readout>,
    controls: Mutex<Controls>,
}

#[cfg(feature = "cpal")]
impl SignalGenerator<CpalBackend> {
    /// Builder for a generator on a CPAL device. Use
    /// [`SignalGeneratorBuilder::build_with`] for any other backend.
    pub fn builder() -> SignalGeneratorBuilder {
        SignalGeneratorBuilder::default()
    }
}

impl<B: AudioBackend> SignalGenerator<B> {
    pub(crate) fn from_parts(engine: ToneEngine<B>, controls: Controls, muted: bool) -> Self {
        let params = engine.parameters();
        let readout = engine.readout();
        params.set_mute(muted);

        let generator = Self {
            engine: Mutex::new(engine),
            params,
            readout,
            controls: Mutex::new(controls),
        };
        generator.push_frequency(&controls);
        generator.push_level(&controls);
        generator
    }

    pub fn start(&self) -> Result<StreamInfo> {
        self.engine.lock().start()
    }

    pub fn stop(&self) -> Result<()> {
        self.engine.lock().stop()
    }

    pub fn state(&self) -> EngineState {
        self.engine.lock().state()
    }

    pub fn is_running(&self) -> bool {
        self.engine.lock().is_running()
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.engine.lock().stream_info().cloned()
    }

    /// Run `f` with the underlying engine (e.g. to reach its backend).
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ToneEngine<B>) -> R,
    {
        f(&mut self.engine.lock())
    }

    /// Lock-free parameter handle for threads that bypass the controls.
    pub fn parameters(&self) -> Arc<ParameterState> {
        Arc::clone(&self.params)
    }

    // -- Frequency ------------------------------------------------------------

    /// Move the dial. Returns the resulting frequency.
    pub fn set_dial(&self, dial: f64) -> f64 {
        if !dial.is_finite() {
            tracing::warn!("Ignoring non-finite dial position {dial}");
            return self.frequency();
        }
        let mut controls = self.controls.lock();
        controls.dial = dial.clamp(DIAL_MIN, DIAL_MAX);
        self.push_frequency(&controls)
    }

    pub fn dial(&self) -> f64 {
        self.controls.lock().dial
    }

    /// Dial pointer position, normalized to `0..=1` over the frequency range.
    pub fn dial_position(&self) -> f64 {
        control::dial_normalized(self.dial())
    }

    /// Set the fine-tune slider (`0..=FINE_MAX`). Returns the resulting frequency.
    pub fn set_fine(&self, fine: u32) -> f64 {
        let mut controls = self.controls.lock();
        controls.fine = fine.min(FINE_MAX);
        self.push_frequency(&controls)
    }

    pub fn fine(&self) -> u32 {
        self.controls.lock().fine
    }

    /// Nudge the fine-tune slider down one step.
    pub fn fine_lower(&self) -> f64 {
        let mut controls = self.controls.lock();
        controls.fine = controls.fine.saturating_sub(1);
        self.push_frequency(&controls)
    }

    /// Nudge the fine-tune slider up one step.
    pub fn fine_higher(&self) -> f64 {
        let mut controls = self.controls.lock();
        controls.fine = controls.fine.saturating_add(1).min(FINE_MAX);
        self.push_frequency(&controls)
    }

    /// Jump to `hz`: the dial is moved there and fine tune recentred.
    ///
    /// `hz` is clamped to the frequency range first; non-finite values are
    /// ignored.
    pub fn set_frequency(&self, hz: f64) -> f64 {
        if !hz.is_finite() {
            tracing::warn!("Ignoring non-finite frequency {hz}");
            return self.frequency();
        }
        let hz = FREQUENCY_RANGE.clamp(hz);
        let mut controls = self.controls.lock();
        controls.dial = control::frequency_to_dial(hz).clamp(DIAL_MIN, DIAL_MAX);
        controls.fine = FINE_CENTER;
        self.push_frequency(&controls)
    }

    /// Select one of [`PRESET_FREQUENCIES`](control::PRESET_FREQUENCIES).
    pub fn select_preset(&self, index: usize) -> Option<f64> {
        let hz = control::PRESET_FREQUENCIES.get(index).copied()?;
        Some(self.set_frequency(hz))
    }

    /// Apply a typed-in frequency. Blank input is ignored (`Ok(None)`).
    pub fn set_exact(&self, text: &str) -> Result<Option<f64>> {
        match control::parse_exact_frequency(text)? {
            Some(hz) => Ok(Some(self.set_frequency(hz))),
            None => Ok(None),
        }
    }

    /// Target frequency from the current control positions.
    pub fn frequency(&self) -> f64 {
        self.params.target_frequency()
    }

    // -- Level ----------------------------------------------------------------

    /// Set the level slider (`0..=LEVEL_MAX`). Returns the level in dB.
    pub fn set_level(&self, level: u32) -> f64 {
        let mut controls = self.controls.lock();
        controls.level = level.min(LEVEL_MAX);
        self.push_level(&controls);
        control::level_to_db(controls.level)
    }

    pub fn level(&self) -> u32 {
        self.controls.lock().level
    }

    pub fn level_db(&self) -> f64 {
        control::level_to_db(self.level())
    }

    pub fn set_mute(&self, mute: bool) {
        self.params.set_mute(mute);
    }

    /// Flip mute, returning the new state.
    pub fn toggle_mute(&self) -> bool {
        self.params.toggle_mute()
    }

    pub fn is_muted(&self) -> bool {
        self.params.is_muted()
    }

    /// Mute for an external interruption (e.g. an incoming call).
    /// Returns true if this call muted the output.
    pub fn interrupt(&self) -> bool {
        if self.params.is_muted() {
            return false;
        }
        self.params.set_mute(true);
        tracing::info!("Output muted by interruption");
        true
    }

    // -- Display --------------------------------------------------------------

    pub fn display(&self) -> DisplayText {
        DisplayText {
            frequency: control::format_frequency(self.frequency()),
            level: control::format_level(self.level_db()),
        }
    }

    /// Frequency the engine is currently producing (lags the target).
    pub fn smoothed_frequency(&self) -> f64 {
        self.readout.frequency()
    }

    /// Amplitude the engine is currently producing, in `[0, 1]`.
    pub fn smoothed_amplitude(&self) -> f64 {
        self.readout.amplitude() / crate::core::PEAK
    }

    fn push_frequency(&self, controls: &Controls) -> f64 {
        let requested = controls.frequency();
        self.params
            .set_target_frequency(requested)
            .unwrap_or(requested)
    }

    fn push_level(&self, controls: &Controls) {
        self.params
            .set_target_amplitude(control::level_to_amplitude(controls.level));
    }
}
