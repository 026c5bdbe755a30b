use crate::command::Command;
use crate::range::VoltageRange;
use nusb::transfer::TransferError;
use num_enum::TryFromPrimitiveError;
use thiserror::Error;

/// The primary error type for the `usb1608-lib` library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("USB device not found. Is the USB-1608FS-Plus connected?")]
    DeviceNotFound,

    #[error("USB error: {0}")]
    Usb(#[from] nusb::Error),

    #[error("USB transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Failure reported by a non-USB transport implementation.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Short transfer for {command:?}: expected {expected} bytes, transferred {actual}")]
    ShortTransfer {
        command: Command,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid voltage range code {0:#04x}")]
    InvalidRange(u8),

    #[error("Invalid analog channel {0} (device has 8 channels)")]
    InvalidChannel(usize),
}

impl From<TryFromPrimitiveError<VoltageRange>> for Error {
    fn from(err: TryFromPrimitiveError<VoltageRange>) -> Self {
        Error::InvalidRange(err.number)
    }
}
