//! CPAL audio output backend.
//!
//! The engine thread pushes mono i16 samples into an SPSC ring buffer sized to
//! the negotiated buffer; the CPAL callback drains it and copies each sample to
//! every device channel. A full ring makes `write` wait, which is what paces the
//! engine thread to the device clock.

use crate::lockfree::AtomicFlag;
use crate::sink::{AudioBackend, AudioSink, DeviceCaps, SinkConfig, SinkState};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shortest sleep while waiting for ring buffer space.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Output device selected by index, or the host default.
#[derive(Debug, Clone, Default)]
pub struct CpalBackend {
    device_index: Option<usize>,
}

impl CpalBackend {
    pub fn with_device(index: usize) -> Self {
        Self {
            device_index: Some(index),
        }
    }

    pub fn device_index(&self) -> Option<usize> {
        self.device_index
    }

    /// List available output devices as `"index: name"`.
    pub fn list_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }
}

impl AudioBackend for CpalBackend {
    type Sink = CpalSink;

    fn probe(&self) -> Result<DeviceCaps> {
        let device = get_device(self.device_index)?;
        let config = device.default_output_config()?;

        let min_buffer_frames = match config.buffer_size() {
            cpal::SupportedBufferSize::Range { min, .. } => *min as usize,
            cpal::SupportedBufferSize::Unknown => 0,
        };

        Ok(DeviceCaps {
            sample_rate: config.sample_rate().0,
            min_buffer_frames,
        })
    }

    fn open(&self, config: &SinkConfig) -> Result<CpalSink> {
        let device = get_device(self.device_index)?;
        let supported = device.default_output_config()?;

        if supported.sample_rate().0 != config.sample_rate {
            return Err(Error::InvalidConfig(format!(
                "Device now runs at {} Hz, negotiated {} Hz",
                supported.sample_rate().0,
                config.sample_rate
            )));
        }

        let (producer, consumer) = HeapRb::<i16>::new(config.buffer_frames.max(1)).split();
        let failed = Arc::new(AtomicFlag::new(false));
        let mut stream_config = supported.config();
        match fixed_buffer_size(supported.buffer_size(), config.buffer_frames) {
            Some(frames) => stream_config.buffer_size = cpal::BufferSize::Fixed(frames),
            None => tracing::debug!(
                "Device cannot fix a {}-frame buffer, using its default",
                config.buffer_frames
            ),
        }

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, consumer, Arc::clone(&failed))?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, consumer, Arc::clone(&failed))?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, consumer, Arc::clone(&failed))?
            }
            format => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        let buffer_duration = config.buffer_duration();

        Ok(CpalSink {
            stream,
            producer,
            failed,
            buffer_duration,
            poll_interval: (buffer_duration / 8).max(MIN_POLL_INTERVAL),
        })
    }

    fn device_name(&self) -> String {
        get_device(self.device_index)
            .and_then(|d| Ok(d.name()?))
            .unwrap_or_else(|_| String::from("unknown"))
    }
}

/// Playing CPAL stream fed through a ring buffer.
pub struct CpalSink {
    stream: cpal::Stream,
    producer: HeapProd<i16>,
    failed: Arc<AtomicFlag>,
    buffer_duration: Duration,
    poll_interval: Duration,
}

impl AudioSink for CpalSink {
    fn state(&self) -> SinkState {
        if self.failed.get() {
            SinkState::Uninitialized
        } else {
            SinkState::Initialized
        }
    }

    fn play(&mut self) -> Result<()> {
        self.stream.play()?;
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) {
        let mut written = 0;

        while written < samples.len() {
            written += self.producer.push_slice(&samples[written..]);

            if written < samples.len() {
                if self.failed.get() {
                    // Stream is dead: keep real-time pacing, drop the rest.
                    thread::sleep(self.buffer_duration);
                    return;
                }
                thread::sleep(self.poll_interval);
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.stream.pause()?;
        Ok(())
    }

    fn release(self) {
        drop(self.stream);
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

/// Callback size for `frames`, if the device accepts it.
fn fixed_buffer_size(supported: &cpal::SupportedBufferSize, frames: usize) -> Option<u32> {
    let frames = u32::try_from(frames).ok()?;
    match supported {
        cpal::SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&frames) => {
            Some(frames)
        }
        _ => None,
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: HeapCons<i16>,
    failed: Arc<AtomicFlag>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<i16>,
{
    let channels = (config.channels as usize).max(1);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            // Underrun plays silence.
            for frame in data.chunks_mut(channels) {
                let value = T::from_sample(consumer.try_pop().unwrap_or(0));
                frame.fill(value);
            }
        },
        move |err| {
            failed.set(true);
            tracing::warn!("Audio stream error: {err}");
        },
        None,
    )?;

    Ok(stream)
}
