//! Tone engine: the dedicated production thread and its lifecycle.
//!
//! ```text
//! Stopped ──start()──▶ Running ──stop()──▶ StopRequested ──thread exits──▶ Stopped
//! ```
//!
//! `start()` blocks until the engine thread has negotiated and opened the sink,
//! so device errors come back synchronously. While running, the thread fills one
//! buffer at a time and hands it to the sink's blocking `write`, which paces
//! production to real time. The stop flag is checked once per buffer.

use crate::config::EngineConfig;
use crate::lockfree::AtomicFlag;
use crate::oscillator::PhaseWrap;
use crate::parameter::{ParameterState, Readout, Waveform};
use crate::sink::{negotiate, AudioBackend, AudioSink, SinkConfig, SinkState};
use crate::synth::{SynthesisCursor, PEAK};
use crate::{Error, Result};
use crossbeam_channel::{bounded, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thread_priority::ThreadPriority;

/// Sleep between checks while waiting for the engine thread to exit.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Engine lifecycle state, as seen by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
    /// Stop flag set but the thread has not exited yet (only observable after a
    /// timed-out `stop()`).
    StopRequested,
}

/// What the engine negotiated with the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub device: String,
    pub sample_rate: u32,
    pub buffer_frames: usize,
}

impl StreamInfo {
    pub fn buffer_duration(&self) -> Duration {
        SinkConfig::mono(self.sample_rate, self.buffer_frames).buffer_duration()
    }
}

/// Single-tone synthesizer driving one output sink from a dedicated thread.
///
/// Parameter setters take `&self` and may be called at any time, from any
/// thread holding [`parameters()`](Self::parameters). `start`/`stop` belong to
/// the owner.
pub struct ToneEngine<B: AudioBackend> {
    backend: Arc<B>,
    config: EngineConfig,
    params: Arc<ParameterState>,
    readout: Arc<Readout>,
    stop_requested: Arc<AtomicFlag>,
    state: EngineState,
    thread: Option<JoinHandle<()>>,
    stream: Option<StreamInfo>,
}

impl<B: AudioBackend> ToneEngine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let params = Arc::new(ParameterState::new(
            config.initial_frequency_hz,
            config.initial_amplitude,
        ));
        let readout = Arc::new(Readout::new(config.initial_frequency_hz));

        Ok(Self {
            backend: Arc::new(backend),
            config,
            params,
            readout,
            stop_requested: Arc::new(AtomicFlag::new(false)),
            state: EngineState::Stopped,
            thread: None,
            stream: None,
        })
    }

    /// Spawn the engine thread and wait for it to open the sink.
    ///
    /// Calling `start()` while running returns the current stream info.
    pub fn start(&mut self) -> Result<StreamInfo> {
        match self.state {
            EngineState::Running => {
                if let Some(info) = &self.stream {
                    return Ok(info.clone());
                }
            }
            EngineState::StopRequested => {
                if self.thread.as_ref().is_some_and(|h| !h.is_finished()) {
                    return Err(Error::StopPending);
                }
                self.reap_thread();
            }
            EngineState::Stopped => {}
        }

        self.stop_requested.set(false);
        self.readout.publish(self.params.target_frequency(), 0.0);

        let (ready_tx, ready_rx) = bounded(1);
        let worker = Worker {
            backend: Arc::clone(&self.backend),
            params: Arc::clone(&self.params),
            readout: Arc::clone(&self.readout),
            stop_requested: Arc::clone(&self.stop_requested),
            wrap: self.config.phase_wrap,
            realtime_priority: self.config.realtime_priority,
        };

        let handle = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || worker.run(ready_tx))
            .map_err(Error::ThreadSpawn)?;

        match ready_rx.recv() {
            Ok(Ok(info)) => {
                tracing::info!(
                    "Tone engine running on '{}' at {} Hz, {} frame buffer",
                    info.device,
                    info.sample_rate,
                    info.buffer_frames
                );
                self.thread = Some(handle);
                self.stream = Some(info.clone());
                self.state = EngineState::Running;
                Ok(info)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("Tone engine failed to start: {e}");
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(Error::EngineThreadLost)
            }
        }
    }

    /// Request shutdown and wait for the engine thread to stop and release the
    /// sink. No-op when not running.
    ///
    /// Waits at least two buffer durations, and at least `stop_timeout`. On
    /// timeout the engine stays in [`EngineState::StopRequested`]; call `stop()`
    /// again to keep waiting.
    pub fn stop(&mut self) -> Result<()> {
        if self.state == EngineState::Stopped {
            return Ok(());
        }

        self.state = EngineState::StopRequested;
        self.stop_requested.set(true);

        let timeout = self.stop_timeout();
        let deadline = Instant::now() + timeout;

        if let Some(handle) = &self.thread {
            while !handle.is_finished() {
                if Instant::now() >= deadline {
                    tracing::warn!("Tone engine thread still running after {timeout:?}");
                    return Err(Error::StopTimedOut(timeout));
                }
                thread::yield_now();
                thread::sleep(STOP_POLL_INTERVAL);
            }
        }

        self.reap_thread();
        tracing::debug!("Tone engine stopped");
        Ok(())
    }

    fn stop_timeout(&self) -> Duration {
        let buffers = self
            .stream
            .as_ref()
            .map_or(Duration::ZERO, |info| info.buffer_duration() * 2);
        self.config.stop_timeout.max(buffers)
    }

    fn reap_thread(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::warn!("Tone engine thread panicked");
            }
        }
        self.stream = None;
        self.state = EngineState::Stopped;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Negotiated stream, while running.
    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.stream.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shared handle for other threads that push targets.
    pub fn parameters(&self) -> Arc<ParameterState> {
        Arc::clone(&self.params)
    }

    /// Shared handle to the smoothed display values.
    pub fn readout(&self) -> Arc<Readout> {
        Arc::clone(&self.readout)
    }

    pub fn set_target_frequency(&self, hz: f64) {
        self.params.set_target_frequency(hz);
    }

    pub fn set_target_amplitude(&self, level: f64) {
        self.params.set_target_amplitude(level);
    }

    pub fn set_mute(&self, mute: bool) {
        self.params.set_mute(mute);
    }

    pub fn toggle_mute(&self) -> bool {
        self.params.toggle_mute()
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.params.set_waveform(waveform);
    }

    /// Smoothed frequency in Hz, for display only.
    pub fn smoothed_frequency(&self) -> f64 {
        self.readout.frequency()
    }

    /// Smoothed amplitude in `[0, 1]`, for display only.
    pub fn smoothed_amplitude(&self) -> f64 {
        self.readout.amplitude() / PEAK
    }
}

#[cfg(feature = "cpal")]
impl ToneEngine<crate::output::CpalBackend> {
    /// Engine on the system's default output device.
    pub fn with_default_device(config: EngineConfig) -> Result<Self> {
        Self::new(crate::output::CpalBackend::default(), config)
    }
}

impl<B: AudioBackend> Drop for ToneEngine<B> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("Detaching tone engine thread: {e}");
        }
    }
}

/// Everything the engine thread owns or shares.
struct Worker<B: AudioBackend> {
    backend: Arc<B>,
    params: Arc<ParameterState>,
    readout: Arc<Readout>,
    stop_requested: Arc<AtomicFlag>,
    wrap: PhaseWrap,
    realtime_priority: bool,
}

impl<B: AudioBackend> Worker<B> {
    fn run(self, ready: Sender<Result<StreamInfo>>) {
        if self.realtime_priority {
            if let Err(e) = thread_priority::set_current_thread_priority(ThreadPriority::Max) {
                tracing::debug!("Could not raise engine thread priority: {e:?}");
            }
        }

        let (mut sink, config) = match open_sink(&*self.backend) {
            Ok(opened) => opened,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        let info = StreamInfo {
            device: self.backend.device_name(),
            sample_rate: config.sample_rate,
            buffer_frames: config.buffer_frames,
        };
        let _ = ready.send(Ok(info));
        drop(ready);

        self.produce(&mut sink, &config);

        if let Err(e) = sink.stop() {
            tracing::warn!("Failed to stop sink: {e}");
        }
        sink.release();
    }

    /// Fill and flush buffers until the stop flag is seen.
    fn produce(&self, sink: &mut B::Sink, config: &SinkConfig) {
        let mut buffer = vec![0i16; config.buffer_frames];
        let mut cursor = SynthesisCursor::new(
            f64::from(config.sample_rate),
            self.params.target_frequency(),
            self.wrap,
        );

        while !self.stop_requested.get() {
            cursor.fill(&self.params, &mut buffer);
            self.readout
                .publish(cursor.current_frequency(), cursor.current_amplitude());
            sink.write(&buffer);
        }
    }
}

/// Negotiate, open, verify and start a sink. The sink is released on every
/// failure after `open`.
fn open_sink<B: AudioBackend>(backend: &B) -> Result<(B::Sink, SinkConfig)> {
    let caps = backend.probe()?;
    let config = negotiate(&caps)?;
    let mut sink = backend.open(&config)?;

    if sink.state() != SinkState::Initialized {
        sink.release();
        return Err(Error::DeviceInitFailed(format!(
            "'{}' did not initialize a {} Hz mono stream",
            backend.device_name(),
            config.sample_rate
        )));
    }

    if let Err(e) = sink.play() {
        sink.release();
        return Err(e);
    }

    Ok((sink, config))
}
