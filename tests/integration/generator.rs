//! SignalGenerator integration tests
//!
//! Control positions in, engine targets and display text out.

use crate::helpers::*;
use approx::assert_relative_eq;
use siggen::control::{DIAL_MAX, DIAL_MIN, FINE_CENTER, FINE_MAX, LEVEL_DEFAULT};
use siggen::core::SinkEvent;
use siggen::prelude::*;
use siggen::{CaptureHandle, EngineState, Error};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn test_generator() -> SignalGenerator<CaptureBackend> {
    test_generator_with(SignalGeneratorBuilder::default())
}

fn test_generator_with(builder: SignalGeneratorBuilder) -> SignalGenerator<CaptureBackend> {
    builder
        .realtime_priority(false)
        .build_with(CaptureBackend::new(TEST_SAMPLE_RATE, 0).limit(0))
        .expect("Failed to create test generator")
}

#[test]
fn test_power_up_state() {
    let generator = test_generator();

    assert_eq!(generator.dial(), 400.0);
    assert_eq!(generator.fine(), FINE_CENTER);
    assert_eq!(generator.level(), LEVEL_DEFAULT);
    assert!(!generator.is_muted());
    assert_relative_eq!(generator.frequency(), 1000.0, epsilon = 1e-9);
    assert_relative_eq!(generator.level_db(), -20.0, epsilon = 1e-9);

    let display = generator.display();
    assert_eq!(display.frequency, "1000.00Hz");
    assert_eq!(display.level, "-20.00dB");
}

#[test]
fn test_builder_sets_engine_targets() {
    let generator = test_generator_with(
        SignalGeneratorBuilder::default()
            .frequency(440.0)
            .level(50)
            .muted(true),
    );

    let params = generator.parameters();
    assert_relative_eq!(params.target_frequency(), 440.0, epsilon = 1e-9);
    assert_relative_eq!(params.target_amplitude(), 0.5);
    assert!(params.is_muted());

    let config = generator.with_engine(|engine| engine.config().clone());
    assert_relative_eq!(config.initial_frequency_hz, 440.0, epsilon = 1e-9);
    assert_relative_eq!(config.initial_amplitude, 0.5);
    assert!(!config.realtime_priority);
}

#[test]
fn test_dial_moves_frequency() {
    let generator = test_generator();

    assert_relative_eq!(generator.set_dial(200.0), 100.0, epsilon = 1e-9);
    assert_relative_eq!(generator.set_dial(0.0), 10.0, epsilon = 1e-9);
    assert_eq!(generator.display().frequency, "10.00Hz");

    // Dial stops at its ends; the top end is held to the frequency range
    assert_eq!(generator.set_dial(DIAL_MAX + 100.0), 25_000.0);
    assert_eq!(generator.dial(), DIAL_MAX);
    assert_relative_eq!(generator.set_dial(DIAL_MIN - 100.0), 0.1, epsilon = 1e-12);
    assert_eq!(generator.dial(), DIAL_MIN);
}

#[test]
fn test_fine_tune_steps() {
    let generator = test_generator();

    assert_relative_eq!(generator.fine_higher(), 1000.02, epsilon = 1e-9);
    assert_relative_eq!(generator.fine_lower(), 1000.0, epsilon = 1e-9);
    assert_relative_eq!(generator.fine_lower(), 999.98, epsilon = 1e-9);

    assert_relative_eq!(generator.set_fine(FINE_MAX), 1010.0, epsilon = 1e-9);
    assert_relative_eq!(generator.fine_higher(), 1010.0, epsilon = 1e-9);
    assert_eq!(generator.fine(), FINE_MAX);

    assert_relative_eq!(generator.set_fine(0), 990.0, epsilon = 1e-9);
    assert_relative_eq!(generator.fine_lower(), 990.0, epsilon = 1e-9);
    assert_eq!(generator.fine(), 0);
}

/// Out-of-range and non-finite inputs never leave the controls unusable.
#[test]
fn test_invalid_frequency_inputs() {
    let generator = test_generator();

    // Below the range lands on the bottom of the dial
    assert_relative_eq!(generator.set_frequency(-5.0), 0.1, epsilon = 1e-12);
    assert_relative_eq!(generator.dial(), DIAL_MIN, epsilon = 1e-9);
    assert!(generator.set_fine(600).is_finite());
    assert!(generator.frequency().is_finite());

    generator.set_frequency(440.0);
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_relative_eq!(generator.set_frequency(bad), 440.0, epsilon = 1e-9);
        assert_relative_eq!(generator.set_dial(bad), 440.0, epsilon = 1e-9);
        assert!(generator.dial().is_finite());
        assert_eq!(generator.display().frequency, "440.00Hz");
    }
}

#[test]
fn test_builder_ignores_non_finite_inputs() {
    let generator = test_generator_with(
        SignalGeneratorBuilder::default()
            .frequency(f64::NAN)
            .dial(f64::INFINITY),
    );
    assert_eq!(generator.dial(), 400.0);
    assert_relative_eq!(generator.frequency(), 1000.0, epsilon = 1e-9);

    let generator = test_generator_with(SignalGeneratorBuilder::default().frequency(-5.0));
    assert_relative_eq!(generator.dial(), DIAL_MIN, epsilon = 1e-9);
    assert_relative_eq!(generator.frequency(), 0.1, epsilon = 1e-12);
}

/// Concurrent nudges are never lost.
#[test]
fn test_fine_steps_from_many_threads() {
    let generator = Arc::new(test_generator());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                for _ in 0..100 {
                    generator.fine_higher();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(generator.fine(), FINE_CENTER + 400);
}

#[test]
fn test_dial_position() {
    let generator = test_generator();
    assert_relative_eq!(generator.dial_position(), 800.0 / 1080.0, epsilon = 1e-9);

    generator.set_dial(DIAL_MIN);
    assert_relative_eq!(generator.dial_position(), 0.0, epsilon = 1e-9);
    generator.set_dial(DIAL_MAX);
    assert_relative_eq!(generator.dial_position(), 1.0, epsilon = 1e-9);
}

/// Fine tune is relative to the dial, so it carries across dial moves.
#[test]
fn test_fine_tune_follows_dial() {
    let generator = test_generator();
    generator.set_fine(FINE_MAX);
    assert_relative_eq!(generator.set_dial(200.0), 101.0, epsilon = 1e-9);
}

#[test]
fn test_presets() {
    let generator = test_generator();
    generator.set_fine(FINE_MAX);

    for (index, &hz) in PRESET_FREQUENCIES.iter().enumerate() {
        let applied = generator.select_preset(index).unwrap();
        assert_relative_eq!(applied, hz, epsilon = 1e-6);
        assert_eq!(generator.fine(), FINE_CENTER);
    }

    assert!(generator.select_preset(PRESET_FREQUENCIES.len()).is_none());
    assert_relative_eq!(generator.frequency(), 8000.0, epsilon = 1e-6);
}

#[test]
fn test_exact_entry() {
    let generator = test_generator();

    let applied = generator.set_exact("1234.5").unwrap();
    assert_relative_eq!(applied.unwrap(), 1234.5, epsilon = 1e-6);
    assert_eq!(generator.display().frequency, "1234.50Hz");

    // Blank input leaves the frequency alone
    assert_eq!(generator.set_exact("  ").unwrap(), None);
    assert_relative_eq!(generator.frequency(), 1234.5, epsilon = 1e-6);

    for bad in ["abc", "0.01", "30000"] {
        let err = generator.set_exact(bad).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "frequency", .. }));
    }
    assert_relative_eq!(generator.frequency(), 1234.5, epsilon = 1e-6);
}

#[test]
fn test_level_slider() {
    let generator = test_generator();

    assert_relative_eq!(generator.set_level(100), 0.0);
    assert_relative_eq!(generator.parameters().target_amplitude(), 1.0);
    assert_eq!(generator.display().level, " 0.00dB");

    assert_relative_eq!(generator.set_level(50), -6.0206, epsilon = 1e-4);
    assert_eq!(generator.display().level, "-6.02dB");

    assert_eq!(generator.set_level(0), -80.0);
    assert_eq!(generator.parameters().target_amplitude(), 0.0);
    assert_eq!(generator.display().level, "-80.00dB");

    generator.set_level(250);
    assert_eq!(generator.level(), 100);
}

#[test]
fn test_mute_toggle_keeps_level() {
    let generator = test_generator();
    generator.set_level(40);

    assert!(generator.toggle_mute());
    assert!(generator.is_muted());
    assert_relative_eq!(generator.parameters().target_amplitude(), 0.4);

    assert!(!generator.toggle_mute());
    assert!(!generator.is_muted());
}

/// An interruption mutes once and leaves unmuting to the user.
#[test]
fn test_interruption_mutes() {
    let generator = test_generator();

    assert!(generator.interrupt());
    assert!(generator.is_muted());

    assert!(!generator.interrupt());
    assert!(generator.is_muted());

    generator.toggle_mute();
    assert!(!generator.is_muted());
}

#[test]
fn test_generator_lifecycle() {
    let backend = CaptureBackend::new(TEST_SAMPLE_RATE, 0).limit(0);
    let capture: CaptureHandle = backend.handle();
    let generator = SignalGeneratorBuilder::default()
        .realtime_priority(false)
        .stop_timeout(Duration::from_millis(500))
        .thread_name("siggen-test")
        .build_with(backend)
        .unwrap();

    assert_eq!(generator.state(), EngineState::Stopped);
    let info = generator.start().unwrap();
    assert_eq!(info.device, "capture");
    assert!(generator.is_running());
    assert_eq!(generator.stream_info(), Some(info));

    generator.stop().unwrap();
    assert!(!generator.is_running());
    assert_eq!(capture.events().last(), Some(&SinkEvent::Release));
}

/// Smoothed readouts glide towards a new dial position.
#[test]
fn test_smoothed_readout_follows_controls() {
    let generator = test_generator_with(SignalGeneratorBuilder::default().level(100));
    generator.start().unwrap();
    generator.set_dial(200.0);

    let deadline = Instant::now() + CAPTURE_TIMEOUT;
    while (generator.smoothed_frequency() - 100.0).abs() > 0.1
        || (generator.smoothed_amplitude() - 1.0).abs() > 0.01
    {
        assert!(Instant::now() < deadline, "Readout never settled");
        std::thread::sleep(Duration::from_millis(5));
    }

    generator.stop().unwrap();
}
