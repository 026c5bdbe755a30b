use crate::command::Command;
use crate::constants::{NUM_CHANNELS, RANGE_TABLE_SIZE, STATUS_SIZE};
use crate::error::Error;
use crate::range::{VoltageRange, decode_ranges, encode_ranges};
use crate::scan::{ScanDescriptor, ScanOptions};
use crate::status::Status;
use crate::transport::Transport;
use tracing::{debug, trace};

/// Whether a scan has been started on this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
}

/// Analog input configuration for one device session.
///
/// Channel ranges and scan settings live in memory until one of the
/// transport-backed operations pushes them to the device. Methods take
/// `&mut self`; sharing a session between threads needs external locking.
pub struct AnalogInput<T: Transport> {
    transport: T,
    ranges: [VoltageRange; NUM_CHANNELS],
    frequency: f64,
    external_pacer: bool,
    options: ScanOptions,
    state: ScanState,
}

impl<T: Transport> AnalogInput<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ranges: [VoltageRange::default(); NUM_CHANNELS],
            frequency: 0.0,
            external_pacer: false,
            options: ScanOptions::default(),
            state: ScanState::Idle,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// Set the range of one channel. No device I/O.
    pub fn configure(&mut self, channel: usize, range: VoltageRange) -> Result<(), Error> {
        let slot = self.ranges.get_mut(channel).ok_or(Error::InvalidChannel(channel))?;
        *slot = range;
        Ok(())
    }

    pub fn range(&self, channel: usize) -> Result<VoltageRange, Error> {
        self.ranges.get(channel).copied().ok_or(Error::InvalidChannel(channel))
    }

    pub fn ranges(&self) -> &[VoltageRange; NUM_CHANNELS] {
        &self.ranges
    }

    pub fn set_ranges(&mut self, ranges: [VoltageRange; NUM_CHANNELS]) {
        self.ranges = ranges;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Pace scans from the SYNC input instead of the internal clock.
    pub fn set_external_pacer(&mut self, external: bool) {
        self.external_pacer = external;
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ScanOptions) {
        self.options = options;
    }

    /// Write the range table to the device.
    pub fn commit_ranges(&mut self) -> Result<(), Error> {
        let table = encode_ranges(&self.ranges)?;
        self.send(Command::AnalogConfig, &table)
    }

    /// Read the range table back from the device and adopt it.
    pub fn read_ranges(&mut self) -> Result<[VoltageRange; NUM_CHANNELS], Error> {
        let mut table = [0u8; RANGE_TABLE_SIZE];
        self.read(Command::AnalogConfig, &mut table)?;
        self.ranges = decode_ranges(&table)?;
        Ok(self.ranges)
    }

    pub fn start_scan(&mut self, descriptor: &ScanDescriptor) -> Result<(), Error> {
        let payload = descriptor.payload();
        self.send(Command::AnalogStartScan, &payload)?;
        self.state = ScanState::Scanning;
        Ok(())
    }

    /// Start a scan from the session's frequency, pacer and option settings.
    pub fn start_configured_scan(&mut self, scans: u32, channels: u8) -> Result<(), Error> {
        let descriptor = ScanDescriptor {
            scans,
            frequency: if self.external_pacer { 0.0 } else { self.frequency },
            channels,
            options: self.options,
        };
        self.start_scan(&descriptor)
    }

    pub fn stop_scan(&mut self) -> Result<(), Error> {
        self.send(Command::AnalogStopScan, &[])?;
        self.state = ScanState::Idle;
        Ok(())
    }

    /// Discard samples left in the device FIFO.
    pub fn clear_buffer(&mut self) -> Result<(), Error> {
        self.send(Command::AnalogClearBuffer, &[])
    }

    pub fn status(&mut self) -> Result<Status, Error> {
        let mut word = [0u8; STATUS_SIZE];
        self.read(Command::GetStatus, &mut word)?;
        Status::parse(&word)
    }

    fn send(&mut self, command: Command, payload: &[u8]) -> Result<(), Error> {
        debug!("{:?}: sending {} bytes", command, payload.len());
        trace!("{:?} payload: {:02x?}", command, payload);
        let written = self.transport.send_command(command, payload)?;
        if written != payload.len() {
            return Err(Error::ShortTransfer {
                command,
                expected: payload.len(),
                actual: written,
            });
        }
        Ok(())
    }

    fn read(&mut self, command: Command, buf: &mut [u8]) -> Result<(), Error> {
        debug!("{:?}: reading {} bytes", command, buf.len());
        let read = self.transport.read_response(command, buf)?;
        if read != buf.len() {
            return Err(Error::ShortTransfer {
                command,
                expected: buf.len(),
                actual: read,
            });
        }
        trace!("{:?} response: {:02x?}", command, buf);
        Ok(())
    }
}
