//! In-memory backend that records what the engine writes.
//!
//! Stands in for a sound card in tests and offline renders: it reports
//! configurable device capabilities, records every sample and every sink call,
//! and can pace writes to real time to reproduce device backpressure.
//!
//! # Example
//!
//! ```
//! use siggen_core::{CaptureBackend, EngineConfig, ToneEngine};
//!
//! let backend = CaptureBackend::new(44100, 512).limit(44100);
//! let capture = backend.handle();
//!
//! let mut engine = ToneEngine::new(backend, EngineConfig::default())?;
//! engine.start()?;
//! capture.wait_for_samples(44100, std::time::Duration::from_secs(5));
//! engine.stop()?;
//!
//! assert!(capture.samples().len() >= 44100);
//! # Ok::<(), siggen_core::Error>(())
//! ```

use crate::sink::{AudioBackend, AudioSink, DeviceCaps, SinkConfig, SinkState};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Sink calls, in the order they were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Open(SinkConfig),
    Play,
    Write(usize),
    Stop,
    Release,
}

#[derive(Debug, Default)]
struct Recording {
    samples: Vec<i16>,
    events: Vec<SinkEvent>,
    open_sinks: usize,
}

/// Shared view of everything a [`CaptureBackend`] recorded.
#[derive(Debug, Clone, Default)]
pub struct CaptureHandle {
    inner: Arc<Mutex<Recording>>,
}

impl CaptureHandle {
    /// All samples written so far (up to the backend's limit).
    pub fn samples(&self) -> Vec<i16> {
        self.inner.lock().samples.clone()
    }

    pub fn sample_count(&self) -> usize {
        self.inner.lock().samples.len()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.inner.lock().events.clone()
    }

    /// Sinks opened and not yet released.
    pub fn open_sinks(&self) -> usize {
        self.inner.lock().open_sinks
    }

    pub fn clear(&self) {
        let mut rec = self.inner.lock();
        rec.samples.clear();
        rec.events.clear();
    }

    /// Block until `count` samples are recorded or `timeout` elapses.
    /// Returns whether the count was reached.
    pub fn wait_for_samples(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.sample_count() >= count {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn record(&self, event: SinkEvent) {
        self.inner.lock().events.push(event);
    }
}

/// Backend recording into memory.
#[derive(Debug, Clone)]
pub struct CaptureBackend {
    caps: DeviceCaps,
    ready: bool,
    realtime: bool,
    limit: Option<usize>,
    handle: CaptureHandle,
}

impl CaptureBackend {
    /// Device with the given native rate and minimum buffer size (frames).
    pub fn new(sample_rate: u32, min_buffer_frames: usize) -> Self {
        Self {
            caps: DeviceCaps {
                sample_rate,
                min_buffer_frames,
            },
            ready: true,
            realtime: false,
            limit: None,
            handle: CaptureHandle::default(),
        }
    }

    /// Pace each write to the buffer's real-time duration.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Opened sinks report [`SinkState::Uninitialized`].
    pub fn uninitialized(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Stop recording after `samples`; later writes are dropped and paced.
    pub fn limit(mut self, samples: usize) -> Self {
        self.limit = Some(samples);
        self
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }

    pub fn caps(&self) -> DeviceCaps {
        self.caps
    }
}

impl AudioBackend for CaptureBackend {
    type Sink = CaptureSink;

    fn probe(&self) -> Result<DeviceCaps> {
        Ok(self.caps)
    }

    fn open(&self, config: &SinkConfig) -> Result<CaptureSink> {
        if config.sample_rate != self.caps.sample_rate {
            return Err(Error::InvalidConfig(format!(
                "Capture device runs at {} Hz, requested {} Hz",
                self.caps.sample_rate, config.sample_rate
            )));
        }

        {
            let mut rec = self.handle.inner.lock();
            rec.events.push(SinkEvent::Open(*config));
            rec.open_sinks += 1;
        }

        Ok(CaptureSink {
            config: *config,
            state: if self.ready {
                SinkState::Initialized
            } else {
                SinkState::Uninitialized
            },
            realtime: self.realtime,
            limit: self.limit,
            handle: self.handle.clone(),
        })
    }

    fn device_name(&self) -> String {
        String::from("capture")
    }
}

/// Sink opened by [`CaptureBackend`].
#[derive(Debug)]
pub struct CaptureSink {
    config: SinkConfig,
    state: SinkState,
    realtime: bool,
    limit: Option<usize>,
    handle: CaptureHandle,
}

impl AudioSink for CaptureSink {
    fn state(&self) -> SinkState {
        self.state
    }

    fn play(&mut self) -> Result<()> {
        self.handle.record(SinkEvent::Play);
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) {
        let full = {
            let mut rec = self.handle.inner.lock();
            rec.events.push(SinkEvent::Write(samples.len()));

            let room = self
                .limit
                .map_or(samples.len(), |limit| limit.saturating_sub(rec.samples.len()));
            let take = room.min(samples.len());
            rec.samples.extend_from_slice(&samples[..take]);
            take < samples.len()
        };

        let duration = SinkConfig {
            buffer_frames: samples.len(),
            ..self.config
        }
        .buffer_duration();

        if self.realtime {
            thread::sleep(duration);
        } else if full {
            // Nothing left to record; don't spin the engine thread.
            thread::sleep(duration.min(Duration::from_millis(5)));
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.handle.record(SinkEvent::Stop);
        Ok(())
    }

    fn release(self) {
        let mut rec = self.handle.inner.lock();
        rec.events.push(SinkEvent::Release);
        rec.open_sinks = rec.open_sinks.saturating_sub(1);
    }
}
