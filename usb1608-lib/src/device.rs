use crate::command::Command;
use crate::constants::{DEFAULT_TIMEOUT, PID, VID};
use crate::error::Error;
use crate::transport::Transport;
use nusb::transfer::{ControlIn, ControlOut, ControlType, Recipient};
use nusb::{Interface, MaybeFuture};
use std::time::Duration;
use tracing::{debug, info};

/// How to find and talk to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    /// Timeout applied to every control transfer
    pub timeout: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: VID,
            product_id: PID,
            interface: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// An open USB-1608FS-Plus.
///
/// Commands are vendor device requests with `bRequest` set to the command
/// code and `wValue`/`wIndex` zero.
pub struct Usb1608FsPlus {
    interface: Interface,
    timeout: Duration,
}

impl Usb1608FsPlus {
    /// Open the first device matching the default VID/PID.
    pub fn open() -> Result<Self, Error> {
        Self::with_config(DeviceConfig::default())
    }

    pub fn with_config(config: DeviceConfig) -> Result<Self, Error> {
        info!("Searching for USB-1608FS-Plus...");
        let device_info = nusb::list_devices()
            .wait()?
            .find(|d| d.vendor_id() == config.vendor_id && d.product_id() == config.product_id)
            .ok_or(Error::DeviceNotFound)?;

        info!(
            "Found device on bus {} addr {} (serial {})",
            device_info.bus_id(),
            device_info.device_address(),
            device_info.serial_number().unwrap_or("<none>")
        );

        let device = device_info.open().wait()?;
        let interface = device.detach_and_claim_interface(config.interface).wait()?;
        info!("Interface {} claimed successfully.", config.interface);

        Ok(Self {
            interface,
            timeout: config.timeout,
        })
    }
}

impl Transport for Usb1608FsPlus {
    fn send_command(&mut self, command: Command, data: &[u8]) -> Result<usize, Error> {
        debug!(request = command.code(), bytes = hex::encode(data), "USB control out");
        self.interface
            .control_out(
                ControlOut {
                    control_type: ControlType::Vendor,
                    recipient: Recipient::Device,
                    request: command.code(),
                    value: 0,
                    index: 0,
                    data,
                },
                self.timeout,
            )
            .wait()?;
        Ok(data.len())
    }

    fn read_response(&mut self, command: Command, buf: &mut [u8]) -> Result<usize, Error> {
        let length = u16::try_from(buf.len()).map_err(|_| Error::LengthMismatch {
            expected: usize::from(u16::MAX),
            actual: buf.len(),
        })?;
        let data = self
            .interface
            .control_in(
                ControlIn {
                    control_type: ControlType::Vendor,
                    recipient: Recipient::Device,
                    request: command.code(),
                    value: 0,
                    index: 0,
                    length,
                },
                self.timeout,
            )
            .wait()?;
        debug!(request = command.code(), bytes = hex::encode(&data), "USB control in");
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }
}
