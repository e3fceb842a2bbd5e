//! Control-surface mappings: dial, fine tune, level slider, exact entry.
//!
//! These turn the positions of the generator's controls into the target values
//! pushed into [`ParameterState`](crate::ParameterState), and format the values
//! shown back to the user.
//!
//! The frequency dial is logarithmic: every 200 dial units is one decade.
//!
//! ```
//! use siggen_core::control::{dial_to_frequency, frequency_to_dial};
//!
//! assert!((dial_to_frequency(400.0) - 1000.0).abs() < 1e-9);
//! assert!((frequency_to_dial(100.0) - 200.0).abs() < 1e-9);
//! ```

use crate::parameter::ParameterRange;
use crate::{Error, Result};

pub const DIAL_MIN: f64 = -400.0;
pub const DIAL_MAX: f64 = 680.0;
/// Dial position at power-up (1 kHz).
pub const DIAL_DEFAULT: f64 = 400.0;

/// Dial units per decade of frequency.
const DIAL_UNITS_PER_DECADE: f64 = 200.0;
/// Frequency at dial position 0.
const DIAL_ORIGIN_HZ: f64 = 10.0;

pub const FINE_MAX: u32 = 1000;
pub const FINE_CENTER: u32 = FINE_MAX / 2;
/// Fraction of the frequency covered by half the fine slider (±1%).
const FINE_SPAN: f64 = 1.0 / 50.0;

pub const LEVEL_MAX: u32 = 100;
/// Level slider at power-up (10%).
pub const LEVEL_DEFAULT: u32 = LEVEL_MAX / 10;
/// Floor of the level display.
pub const LEVEL_FLOOR_DB: f64 = -80.0;

/// Accepted range for typed-in frequencies.
pub const EXACT_RANGE: ParameterRange = ParameterRange::linear(0.1, 25_000.0);

/// One-touch preset frequencies, in Hz.
pub const PRESET_FREQUENCIES: [f64; 8] = [125.0, 250.0, 500.0, 1000.0, 1500.0, 2000.0, 4000.0, 8000.0];

/// Frequency range swept by the dial.
pub fn dial_range() -> ParameterRange {
    ParameterRange::logarithmic(dial_to_frequency(DIAL_MIN), dial_to_frequency(DIAL_MAX))
}

/// Frequency in Hz at a dial position. Positions outside the dial are clamped.
pub fn dial_to_frequency(dial: f64) -> f64 {
    let dial = dial.clamp(DIAL_MIN, DIAL_MAX);
    10f64.powf(dial / DIAL_UNITS_PER_DECADE) * DIAL_ORIGIN_HZ
}

/// Dial position for a frequency. The result may lie outside the dial.
pub fn frequency_to_dial(hz: f64) -> f64 {
    (hz / DIAL_ORIGIN_HZ).log10() * DIAL_UNITS_PER_DECADE
}

/// Dial position as a normalized 0-1 value (for drawing the pointer).
pub fn dial_normalized(dial: f64) -> f64 {
    dial_range().normalize(dial_to_frequency(dial))
}

/// Relative frequency adjustment for a fine-slider position, in `[-0.01, 0.01]`.
pub fn fine_adjust(fine: u32) -> f64 {
    let fine = fine.min(FINE_MAX);
    (f64::from(fine) - f64::from(FINE_CENTER)) / f64::from(FINE_MAX) * FINE_SPAN
}

/// Frequency produced by a dial position and a fine-slider position.
pub fn tuned_frequency(dial: f64, fine: u32) -> f64 {
    let base = dial_to_frequency(dial);
    base + base * fine_adjust(fine)
}

/// Amplitude in `[0, 1]` for a level-slider position.
pub fn level_to_amplitude(level: u32) -> f64 {
    f64::from(level.min(LEVEL_MAX)) / f64::from(LEVEL_MAX)
}

/// Level in dB for a level-slider position, floored at [`LEVEL_FLOOR_DB`].
pub fn level_to_db(level: u32) -> f64 {
    let db = 20.0 * level_to_amplitude(level).log10();
    // log10(0) is -inf, which max() floors as well
    db.max(LEVEL_FLOOR_DB)
}

/// Parse a typed-in frequency.
///
/// Returns `Ok(None)` for blank input, an error for unparsable or
/// out-of-range values.
pub fn parse_exact_frequency(text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let hz: f64 = text.parse().map_err(|_| Error::InvalidParameter {
        name: "frequency",
        reason: format!("'{text}' is not a number"),
    })?;

    if !EXACT_RANGE.contains(hz) {
        return Err(Error::InvalidParameter {
            name: "frequency",
            reason: format!(
                "{hz} Hz outside {}-{} Hz",
                EXACT_RANGE.min, EXACT_RANGE.max
            ),
        });
    }

    Ok(Some(hz))
}

/// Frequency display text, e.g. `"440.00Hz"`.
pub fn format_frequency(hz: f64) -> String {
    format!("{hz:5.2}Hz")
}

/// Level display text, e.g. `"-20.00dB"`.
pub fn format_level(db: f64) -> String {
    format!("{db:5.2}dB")
}
