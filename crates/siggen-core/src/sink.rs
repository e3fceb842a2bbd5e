//! Output sink abstraction and buffer-size negotiation.
//!
//! An [`AudioBackend`] describes a device and opens [`AudioSink`]s on it. The
//! engine thread drives a sink through a fixed sequence:
//!
//! ```text
//! probe → open → (state check) → play → write* → stop → release
//! ```
//!
//! `release` is reached on every path once `open` has succeeded.

use crate::{Error, Result};
use std::time::Duration;

/// Buffer sizes (frames) tried in ascending order during negotiation.
pub const BUFFER_SIZE_CANDIDATES: [usize; 6] = [1024, 2048, 4096, 8192, 16384, 32768];

/// Channel count of the produced signal.
pub const OUTPUT_CHANNELS: u16 = 1;

/// What a device reports before a sink is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Native output sample rate in Hz.
    pub sample_rate: u32,
    /// Smallest buffer the device accepts, in frames.
    pub min_buffer_frames: usize,
}

/// Parameters a sink is opened with. Samples are always signed 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_frames: usize,
}

impl SinkConfig {
    /// Mono config for a negotiated buffer size.
    pub fn mono(sample_rate: u32, buffer_frames: usize) -> Self {
        Self {
            sample_rate,
            channels: OUTPUT_CHANNELS,
            buffer_frames,
        }
    }

    /// Real-time playback duration of one full buffer.
    pub fn buffer_duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.buffer_frames as f64 / self.sample_rate as f64)
    }
}

/// Initialization state a sink reports right after `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Initialized,
    Uninitialized,
}

/// An opened output stream.
///
/// Sinks live on the engine thread for their whole life and need not be `Send`.
pub trait AudioSink {
    fn state(&self) -> SinkState;

    fn play(&mut self) -> Result<()>;

    /// Blocking write. Returns once every sample has been accepted, which takes
    /// roughly one buffer's playback time when the sink is full. Never fails:
    /// a sink that can no longer play keeps pacing and drops the samples.
    fn write(&mut self, samples: &[i16]);

    fn stop(&mut self) -> Result<()>;

    fn release(self);
}

/// Factory for sinks on one output device.
pub trait AudioBackend: Send + Sync + 'static {
    type Sink: AudioSink;

    /// Query native sample rate and minimum buffer size.
    fn probe(&self) -> Result<DeviceCaps>;

    fn open(&self, config: &SinkConfig) -> Result<Self::Sink>;

    /// Human-readable device name, for logs.
    fn device_name(&self) -> String {
        String::from("unknown")
    }
}

/// Pick the smallest candidate buffer size strictly greater than `min_frames`.
pub fn select_buffer_size(min_frames: usize) -> Result<usize> {
    BUFFER_SIZE_CANDIDATES
        .iter()
        .copied()
        .find(|&size| size > min_frames)
        .ok_or(Error::DeviceUnsupported { min_frames })
}

/// Negotiate a sink config from device capabilities.
pub fn negotiate(caps: &DeviceCaps) -> Result<SinkConfig> {
    if caps.sample_rate == 0 {
        return Err(Error::InvalidDevice(
            "Device reported a sample rate of 0 Hz".into(),
        ));
    }
    let buffer_frames = select_buffer_size(caps.min_buffer_frames)?;
    Ok(SinkConfig::mono(caps.sample_rate, buffer_frames))
}
