// Protocol constants for the USB-1608FS-Plus

use std::time::Duration;

/// Measurement Computing vendor ID
pub const VID: u16 = 0x09DB;

/// USB-1608FS-Plus product ID
pub const PID: u16 = 0x00EA;

/// Default timeout for control transfers (2000 ms)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Number of analog input channels
pub const NUM_CHANNELS: usize = 8;

/// Number of selectable gain levels (voltage ranges)
pub const NUM_RANGES: usize = 8;

/// Internal pacer clock of the device (40 MHz)
pub const CLOCK_HZ: f64 = 40_000_000.0;

/// Highest sample rate the pacer accepts
pub const MAX_FREQUENCY_HZ: f64 = 500_000.0;

/// Size of the AnalogConfig range table (one byte per channel)
pub const RANGE_TABLE_SIZE: usize = NUM_CHANNELS;

/// Size of the AnalogStartScan payload
pub const SCAN_PAYLOAD_SIZE: usize = 10;

/// Size of the GetStatus response
pub const STATUS_SIZE: usize = 2;

/// ADC code for zero volts (16-bit offset binary)
pub const ADC_MIDSCALE: u16 = 0x8000;
