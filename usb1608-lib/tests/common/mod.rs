//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use usb1608_lib::command::Command;
#[allow(unused_imports)]
pub use usb1608_lib::error::Error;
#[allow(unused_imports)]
pub use usb1608_lib::range::{RANGES, VoltageRange, decode_ranges, encode_ranges};
#[allow(unused_imports)]
pub use usb1608_lib::scan::{ScanDescriptor, ScanOptions, ScanPayloadRaw};
#[allow(unused_imports)]
pub use usb1608_lib::transport::Transport;
#[allow(unused_imports)]
pub use usb1608_lib::{AnalogInput, ScanState};

/// One request seen by [`FakeDaq`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Send { command: Command, data: Vec<u8> },
    Read { command: Command, len: usize },
}

/// In-memory stand-in for the device firmware.
///
/// Stores the range table written with AnalogConfig and replays it on read,
/// answers GetStatus with `status`, and records every request.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FakeDaq {
    pub ranges: [u8; 8],
    pub status: [u8; 2],
    pub requests: Vec<Request>,
    /// Fail every call with a transport error
    pub fail: bool,
    /// Report this many bytes instead of the real count
    pub short_by: usize,
}

#[allow(dead_code)]
impl FakeDaq {
    pub fn sent(&self) -> Vec<(Command, Vec<u8>)> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                Request::Send { command, data } => Some((*command, data.clone())),
                Request::Read { .. } => None,
            })
            .collect()
    }
}

impl Transport for FakeDaq {
    fn send_command(&mut self, command: Command, data: &[u8]) -> Result<usize, Error> {
        self.requests.push(Request::Send {
            command,
            data: data.to_vec(),
        });
        if self.fail {
            return Err(Error::Transport("fake device unplugged".to_string()));
        }
        match command {
            Command::AnalogConfig => {
                if data.len() != self.ranges.len() {
                    return Err(Error::Transport(format!("data is wrong length {}", data.len())));
                }
                self.ranges.copy_from_slice(data);
            }
            Command::AnalogStartScan => self.status = [0x02, 0x00],
            Command::AnalogStopScan => self.status = [0x00, 0x00],
            _ => {}
        }
        Ok(data.len() - self.short_by.min(data.len()))
    }

    fn read_response(&mut self, command: Command, buf: &mut [u8]) -> Result<usize, Error> {
        self.requests.push(Request::Read { command, len: buf.len() });
        if self.fail {
            return Err(Error::Transport("fake device unplugged".to_string()));
        }
        match command {
            Command::AnalogConfig if buf.len() == self.ranges.len() => buf.copy_from_slice(&self.ranges),
            Command::GetStatus if buf.len() == self.status.len() => buf.copy_from_slice(&self.status),
            _ => return Err(Error::Transport(format!("unexpected read of {:?}", command))),
        }
        Ok(buf.len() - self.short_by.min(buf.len()))
    }
}

/// Route library logs to the test harness output.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
