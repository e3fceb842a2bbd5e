//! # Siggen - Signal Generator
//!
//! Click-free single-tone generator with a frequency dial, fine tune, level
//! slider, presets and mute.
//!
//! ## Architecture
//!
//! Siggen is an umbrella crate over:
//! - **siggen-core** - Tone engine (smoothing, phase accumulator, sink
//!   negotiation, engine thread, control mappings)
//!
//! and adds [`SignalGenerator`], which turns control positions into engine
//! targets.
//!
//! ## Quick Start
//!
//! ```ignore
//! use siggen::prelude::*;
//!
//! let generator = SignalGenerator::builder().frequency(440.0).build()?;
//! generator.start()?;
//!
//! generator.select_preset(3);     // 1 kHz
//! generator.set_level(100);       // 0 dB
//! generator.toggle_mute();
//!
//! generator.stop()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - CPAL output
//! - `cpal` - [`CpalBackend`](core::CpalBackend) output devices

/// Re-export of siggen-core for direct access
pub use siggen_core as core;

pub use siggen_core::control;

pub use siggen_core::{
    // Backends
    AudioBackend,
    AudioSink,
    CaptureBackend,
    CaptureHandle,
    DeviceCaps,

    // Engine
    EngineConfig,
    EngineState,

    // Error
    Error,
    ParameterState,
    PhaseWrap,
    Result,
    SinkConfig,
    StreamInfo,
    ToneEngine,
    Waveform,
};

#[cfg(feature = "cpal")]
pub use siggen_core::CpalBackend;

mod builder;
mod engine;

pub use builder::SignalGeneratorBuilder;
pub use engine::{DisplayText, SignalGenerator};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{DisplayText, SignalGenerator, SignalGeneratorBuilder};

    pub use crate::control::PRESET_FREQUENCIES;
    pub use crate::core::{CaptureBackend, EngineConfig, PhaseWrap};

    #[cfg(feature = "cpal")]
    pub use crate::core::CpalBackend;
}
