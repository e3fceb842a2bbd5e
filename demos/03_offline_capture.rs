//! # 03 - Offline Capture
//!
//! Render one second of tone into memory with the capture backend and report
//! its peak level. No audio device required.
//!
//! **Concepts:** Custom backends, `build_with`, capture handle
//!
//! ```bash
//! cargo run --example 03_offline_capture --no-default-features
//! ```

use siggen::prelude::*;
use siggen::SignalGeneratorBuilder;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44_100;

fn main() -> siggen::Result<()> {
    tracing_subscriber::fmt::init();

    let backend = CaptureBackend::new(SAMPLE_RATE, 0).limit(SAMPLE_RATE as usize);
    let capture = backend.handle();

    let generator = SignalGeneratorBuilder::default()
        .frequency(1000.0)
        .level(100)
        .realtime_priority(false)
        .build_with(backend)?;

    generator.start()?;
    let complete = capture.wait_for_samples(SAMPLE_RATE as usize, Duration::from_secs(10));
    generator.stop()?;

    let samples = capture.samples();
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);

    println!(
        "Captured {} samples (complete: {complete}), peak {peak}",
        samples.len()
    );
    println!("Sink calls: {:?}", capture.events().len());

    Ok(())
}
