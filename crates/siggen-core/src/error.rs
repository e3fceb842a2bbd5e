//! Error types for siggen-core.

use thiserror::Error;

/// Error type for siggen-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Device unsupported: no buffer size exceeds device minimum of {min_frames} frames")]
    DeviceUnsupported { min_frames: usize },

    #[error("Device init failed: {0}")]
    DeviceInitFailed(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Engine is still shutting down from a previous stop request")]
    StopPending,

    #[error("Engine thread did not exit within {0:?}")]
    StopTimedOut(std::time::Duration),

    #[error("Engine thread exited before reporting its start status")]
    EngineThreadLost,

    #[error("Failed to spawn engine thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[cfg(feature = "cpal")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "cpal")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "cpal")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "cpal")]
    #[error("Failed to pause audio stream")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[cfg(feature = "cpal")]
    #[error("Failed to enumerate devices")]
    DevicesError(#[from] cpal::DevicesError),

    #[cfg(feature = "cpal")]
    #[error("Failed to get device name")]
    DeviceNameError(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// True for the two negotiation failures `start()` surfaces from the sink.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Error::DeviceUnsupported { .. } | Error::DeviceInitFailed(_)
        )
    }
}
