//! Click-free single-tone synthesis engine.
//!
//! # Primary API
//!
//! - [`ToneEngine`]: dedicated production thread with start/stop lifecycle
//! - [`ParameterState`]: lock-free target values pushed by the UI
//! - [`AudioBackend`] / [`AudioSink`]: output device seam
//! - [`CaptureBackend`]: in-memory sink for tests and offline rendering
//! - [`control`]: dial, fine-tune and level mappings plus display text
//!
//! # Feature-gated APIs
//!
//! - `"cpal"`: [`CpalBackend`] for real output devices (enabled by default)
//!
//! # Example
//!
//! ```ignore
//! use siggen_core::{EngineConfig, ToneEngine};
//!
//! let mut engine = ToneEngine::with_default_device(EngineConfig::default())?;
//! engine.start()?;
//!
//! engine.set_target_frequency(880.0);
//! engine.set_target_amplitude(0.5);
//! engine.set_mute(true);
//!
//! engine.stop()?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

pub mod parameter;
pub use parameter::{
    ParameterRange, ParameterScale, ParameterSnapshot, ParameterState, Readout, Waveform,
    MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ,
};

pub mod smooth;
pub use smooth::{OnePole, SMOOTH_N};

pub mod oscillator;
pub use oscillator::{PhaseAccumulator, PhaseWrap};

pub mod synth;
pub use synth::{SynthesisCursor, PEAK};

pub mod sink;
pub use sink::{
    negotiate, select_buffer_size, AudioBackend, AudioSink, DeviceCaps, SinkConfig, SinkState,
    BUFFER_SIZE_CANDIDATES,
};

pub mod capture;
pub use capture::{CaptureBackend, CaptureHandle, CaptureSink, SinkEvent};

mod config;
pub use config::EngineConfig;

mod engine;
pub use engine::{EngineState, StreamInfo, ToneEngine};

pub mod control;

#[cfg(feature = "cpal")]
mod output;

#[cfg(feature = "cpal")]
pub use output::{CpalBackend, CpalSink};
