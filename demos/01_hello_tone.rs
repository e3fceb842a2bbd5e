//! # 01 - Hello Tone
//!
//! Play a 440Hz tone through the default audio device, fade it out with mute,
//! then fade it back in.
//!
//! **Concepts:** Builder, start/stop lifecycle, click-free mute
//!
//! ```bash
//! cargo run --example 01_hello_tone
//! ```

use siggen::prelude::*;
use std::time::Duration;

fn main() -> siggen::Result<()> {
    tracing_subscriber::fmt::init();

    let generator = SignalGenerator::builder()
        .frequency(440.0)
        .level(30)
        .build()?;

    let info = generator.start()?;
    println!(
        "Playing on '{}' at {} Hz ({} frame buffer)",
        info.device, info.sample_rate, info.buffer_frames
    );

    let display = generator.display();
    println!("{} at {}", display.frequency, display.level);
    std::thread::sleep(Duration::from_secs(2));

    generator.toggle_mute();
    println!("Muted");
    std::thread::sleep(Duration::from_secs(1));

    generator.toggle_mute();
    println!("Unmuted");
    std::thread::sleep(Duration::from_secs(2));

    generator.stop()?;
    Ok(())
}
