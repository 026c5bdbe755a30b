use crate::constants::{NUM_CHANNELS, SCAN_PAYLOAD_SIZE};
use crate::error::Error;
use crate::timing::pacer_period;
use modular_bitfield::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Debug-mode flag of the scan option byte.
///
/// Shares bit 4 with the top bit of the trigger field; the firmware value is
/// kept as-is.
pub const SCAN_DEBUG_MODE: u8 = 0x10;

/// Layout of the AnalogStartScan option byte, bit 0 first.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptionRegister {
    pub immediate_transfer: bool,
    pub pacer_on_sync: bool,
    pub trigger: B3,
    #[skip]
    unused: B2,
    pub inhibit_stall: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransferMode {
    /// Samples are sent once a full USB packet is available
    #[default]
    Block,
    /// Each sample is sent as soon as it is acquired
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PacerOutput {
    #[default]
    Off,
    /// Drive the internal pacer clock out on the SYNC pin
    OnSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TriggerMode {
    #[default]
    #[strum(to_string = "none")]
    None = 0,
    #[strum(to_string = "rising edge")]
    RisingEdge = 1,
    #[strum(to_string = "falling edge")]
    FallingEdge = 2,
    #[strum(to_string = "high level")]
    HighLevel = 3,
    #[strum(to_string = "low level")]
    LowLevel = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StallPolicy {
    /// Stop acquiring when the FIFO overruns
    #[default]
    StallOnOverrun,
    /// Keep acquiring and overwrite unread samples
    Inhibit,
}

/// Typed contents of the scan option byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanOptions {
    pub transfer_mode: TransferMode,
    pub pacer_output: PacerOutput,
    pub trigger: TriggerMode,
    pub debug: bool,
    pub stall: StallPolicy,
}

impl ScanOptions {
    /// Compose the option byte. Every combination is accepted.
    pub fn bits(&self) -> u8 {
        let register = ScanOptionRegister::new()
            .with_immediate_transfer(self.transfer_mode == TransferMode::Immediate)
            .with_pacer_on_sync(self.pacer_output == PacerOutput::OnSync)
            .with_trigger(self.trigger.into())
            .with_inhibit_stall(self.stall == StallPolicy::Inhibit);
        let [byte] = register.into_bytes();
        if self.debug { byte | SCAN_DEBUG_MODE } else { byte }
    }
}

impl From<ScanOptions> for u8 {
    fn from(options: ScanOptions) -> Self {
        options.bits()
    }
}

/// Wire layout of the AnalogStartScan payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct ScanPayloadRaw {
    pub scans: U32,        // 0 = continuous
    pub pacer_period: U32, // 0 = external pacer
    pub channels: u8,      // bit n enables channel n
    pub options: u8,
}

impl ScanPayloadRaw {
    /// Parse a payload previously built by [`pack_scan_payload`].
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Self::read_from_bytes(bytes).map_err(|_| Error::LengthMismatch {
            expected: SCAN_PAYLOAD_SIZE,
            actual: bytes.len(),
        })
    }
}

/// Build the 10-byte AnalogStartScan payload.
///
/// `frequency` is clamped to the device maximum before the pacer period is
/// derived; 0 Hz selects the external pacer.
pub fn pack_scan_payload(scans: u32, frequency: f64, channels: u8, options: u8) -> [u8; SCAN_PAYLOAD_SIZE] {
    let raw = ScanPayloadRaw {
        scans: U32::new(scans),
        pacer_period: U32::new(pacer_period(frequency)),
        channels,
        options,
    };
    let mut payload = [0u8; SCAN_PAYLOAD_SIZE];
    payload.copy_from_slice(raw.as_bytes());
    payload
}

/// Parameters of one AnalogStartScan request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanDescriptor {
    /// Number of scans, 0 for continuous acquisition
    pub scans: u32,
    /// Requested rate in Hz, 0 for external pacing
    pub frequency: f64,
    /// Active-channel bitmask
    pub channels: u8,
    pub options: ScanOptions,
}

impl ScanDescriptor {
    pub fn payload(&self) -> [u8; SCAN_PAYLOAD_SIZE] {
        pack_scan_payload(self.scans, self.frequency, self.channels, self.options.bits())
    }
}

/// Build a channel bitmask from channel indices.
pub fn channel_mask(channels: &[usize]) -> Result<u8, Error> {
    channels.iter().try_fold(0u8, |mask, &channel| {
        if channel >= NUM_CHANNELS {
            return Err(Error::InvalidChannel(channel));
        }
        Ok(mask | (1 << channel))
    })
}
