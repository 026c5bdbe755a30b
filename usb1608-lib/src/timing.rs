//! Pacer timing arithmetic.
//!
//! The device paces scans by dividing its 40 MHz clock by `period + 1`.

use crate::constants::{CLOCK_HZ, MAX_FREQUENCY_HZ};

/// Round to the nearest integer with ties going up.
///
/// `f64::round` would do the same for positive values, but the rule is
/// spelled out here so it can never drift to ties-to-even. Negative and NaN
/// inputs yield 0; values past `u64::MAX` saturate.
pub fn round_half_up(value: f64) -> u64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as u64
}

/// Limit a requested frequency to what the pacer can produce.
pub fn clamp_frequency(frequency: f64) -> f64 {
    if frequency > MAX_FREQUENCY_HZ {
        MAX_FREQUENCY_HZ
    } else {
        frequency
    }
}

/// Pacer period register value for `frequency` Hz.
///
/// The frequency is clamped to [`MAX_FREQUENCY_HZ`] first. A frequency of
/// zero (or anything not strictly positive) gives period 0, which makes the
/// firmware pace from the external SYNC input.
pub fn pacer_period(frequency: f64) -> u32 {
    let frequency = clamp_frequency(frequency);
    if !(frequency > 0.0) {
        return 0;
    }
    let ticks = round_half_up(CLOCK_HZ / frequency).saturating_sub(1);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Frequency the device actually runs at for a given period.
pub fn actual_frequency(period: u32) -> f64 {
    CLOCK_HZ / (f64::from(period) + 1.0)
}
