use crate::command::Command;
use crate::error::Error;

/// Byte channel to the device firmware.
///
/// Each call is one request tagged with a command code. Implementations
/// hold no protocol state; [`crate::device::Usb1608FsPlus`] maps the calls
/// onto vendor control transfers.
pub trait Transport {
    /// Send `data` for `command`, returning the number of bytes written.
    fn send_command(&mut self, command: Command, data: &[u8]) -> Result<usize, Error>;

    /// Fill `buf` with the response to `command`, returning the number of
    /// bytes read.
    fn read_response(&mut self, command: Command, buf: &mut [u8]) -> Result<usize, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_command(&mut self, command: Command, data: &[u8]) -> Result<usize, Error> {
        (**self).send_command(command, data)
    }

    fn read_response(&mut self, command: Command, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read_response(command, buf)
    }
}
