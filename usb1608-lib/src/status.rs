use crate::constants::STATUS_SIZE;
use crate::error::Error;
use modular_bitfield::prelude::*;

/// Device status word returned by GetStatus (little-endian).
#[bitfield(bytes = 2)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    #[skip]
    unused_low: bool,
    pub scan_running: bool,
    pub scan_overrun: bool,
    #[skip]
    reserved: B13,
}

impl Status {
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let word: [u8; STATUS_SIZE] = bytes.try_into().map_err(|_| Error::LengthMismatch {
            expected: STATUS_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Status::from_bytes(word))
    }

    /// Raw register value, reserved bits included.
    pub fn raw(&self) -> u16 {
        u16::from_le_bytes(self.into_bytes())
    }
}
