use crate::constants::{ADC_MIDSCALE, NUM_CHANNELS, RANGE_TABLE_SIZE};
use crate::error::Error;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Input span of a channel's programmable-gain front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum VoltageRange {
    #[default]
    #[strum(to_string = "±10V")]
    Bip10V = 0,
    #[strum(to_string = "±5V")]
    Bip5V = 1,
    #[strum(to_string = "±2.5V")]
    Bip2_5V = 2,
    #[strum(to_string = "±2V")]
    Bip2V = 3,
    #[strum(to_string = "±1.25V")]
    Bip1_25V = 4,
    #[strum(to_string = "±1V")]
    Bip1V = 5,
    #[strum(to_string = "±0.625V")]
    Bip0_625V = 6,
    #[strum(to_string = "±0.3125V")]
    Bip0_3125V = 7,
}

/// All ranges in code order.
pub const RANGES: [VoltageRange; 8] = [
    VoltageRange::Bip10V,
    VoltageRange::Bip5V,
    VoltageRange::Bip2_5V,
    VoltageRange::Bip2V,
    VoltageRange::Bip1_25V,
    VoltageRange::Bip1V,
    VoltageRange::Bip0_625V,
    VoltageRange::Bip0_3125V,
];

impl VoltageRange {
    /// Half-span in volts (the range is `-span..+span`).
    pub fn span_v(&self) -> f64 {
        match self {
            VoltageRange::Bip10V => 10.0,
            VoltageRange::Bip5V => 5.0,
            VoltageRange::Bip2_5V => 2.5,
            VoltageRange::Bip2V => 2.0,
            VoltageRange::Bip1_25V => 1.25,
            VoltageRange::Bip1V => 1.0,
            VoltageRange::Bip0_625V => 0.625,
            VoltageRange::Bip0_3125V => 0.3125,
        }
    }

    /// Convert an offset-binary ADC code to volts.
    pub fn to_volts(&self, raw: u16) -> f64 {
        (f64::from(raw) - f64::from(ADC_MIDSCALE)) * self.span_v() / 32768.0
    }
}

/// Per-range linear correction read from calibration memory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    pub slope: f64,
    pub offset: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            slope: 1.0,
            offset: 0.0,
        }
    }
}

impl Calibration {
    /// Correct a raw code: `rint(raw * slope + offset)`, saturated to 16 bits.
    ///
    /// Rounding is half-to-even, the same as C `rint` under the default
    /// rounding mode.
    pub fn apply(&self, raw: u16) -> u16 {
        let corrected = (f64::from(raw) * self.slope + self.offset).round_ties_even();
        corrected.clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

/// Serialize one range per channel, channel 0 first.
pub fn encode_ranges(ranges: &[VoltageRange]) -> Result<[u8; RANGE_TABLE_SIZE], Error> {
    if ranges.len() != NUM_CHANNELS {
        return Err(Error::LengthMismatch {
            expected: NUM_CHANNELS,
            actual: ranges.len(),
        });
    }
    let mut table = [0u8; RANGE_TABLE_SIZE];
    for (byte, range) in table.iter_mut().zip(ranges) {
        *byte = (*range).into();
    }
    Ok(table)
}

/// Inverse of [`encode_ranges`].
pub fn decode_ranges(bytes: &[u8]) -> Result<[VoltageRange; NUM_CHANNELS], Error> {
    if bytes.len() != RANGE_TABLE_SIZE {
        return Err(Error::LengthMismatch {
            expected: RANGE_TABLE_SIZE,
            actual: bytes.len(),
        });
    }
    let mut ranges = [VoltageRange::default(); NUM_CHANNELS];
    for (range, byte) in ranges.iter_mut().zip(bytes) {
        *range = VoltageRange::try_from(*byte)?;
    }
    Ok(ranges)
}
