//! # 02 - Dial Sweep
//!
//! Turn the frequency dial from 100Hz to 4kHz, nudge the fine tune, then step
//! through the presets. Every change glides instead of clicking.
//!
//! **Concepts:** Dial mapping, fine tune, presets, smoothed readout
//!
//! ```bash
//! cargo run --example 02_dial_sweep
//! ```

use siggen::control::{frequency_to_dial, PRESET_FREQUENCIES};
use siggen::prelude::*;
use std::time::Duration;

fn main() -> siggen::Result<()> {
    tracing_subscriber::fmt::init();

    let generator = SignalGenerator::builder().frequency(100.0).build()?;
    generator.start()?;

    let from = frequency_to_dial(100.0);
    let to = frequency_to_dial(4000.0);
    let steps = 40;

    for step in 0..=steps {
        let dial = from + (to - from) * step as f64 / steps as f64;
        generator.set_dial(dial);
        std::thread::sleep(Duration::from_millis(50));
        println!(
            "dial {:7.2}  target {}  producing {:8.2}Hz",
            dial,
            generator.display().frequency,
            generator.smoothed_frequency()
        );
    }

    for _ in 0..25 {
        generator.fine_higher();
    }
    println!("Fine tune: {}", generator.display().frequency);
    std::thread::sleep(Duration::from_secs(1));

    for (index, hz) in PRESET_FREQUENCIES.iter().enumerate() {
        generator.select_preset(index);
        println!("Preset {hz}Hz");
        std::thread::sleep(Duration::from_millis(500));
    }

    generator.stop()?;
    Ok(())
}
