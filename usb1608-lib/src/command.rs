use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;

/// Vendor request codes understood by the USB-1608FS-Plus firmware.
///
/// Codes the firmware does not define decode to [`Command::Unknown`], which
/// has an empty description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum Command {
    // Digital I/O
    DigitalTristate = 0x00,
    DigitalPort = 0x01,
    DigitalLatch = 0x02,

    // Analog input
    AnalogInput = 0x10,
    AnalogStartScan = 0x11,
    AnalogStopScan = 0x12,
    AnalogConfig = 0x14,
    AnalogClearBuffer = 0x15,

    // Counter/timer
    EventCounter = 0x20,

    // Memory
    CalibrationMemory = 0x30,
    UserMemory = 0x31,
    MbdMemory = 0x32,

    // Miscellaneous
    BlinkLed = 0x41,
    Reset = 0x42,
    GetStatus = 0x44,
    SerialNumber = 0x48,
    UpgradeFirmware = 0x50,

    // Message-Based DAQ
    TextMbd = 0x80,
    RawMbd = 0x81,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Every command the firmware defines, in code order.
pub const COMMANDS: &[Command] = &[
    Command::DigitalTristate,
    Command::DigitalPort,
    Command::DigitalLatch,
    Command::AnalogInput,
    Command::AnalogStartScan,
    Command::AnalogStopScan,
    Command::AnalogConfig,
    Command::AnalogClearBuffer,
    Command::EventCounter,
    Command::CalibrationMemory,
    Command::UserMemory,
    Command::MbdMemory,
    Command::BlinkLed,
    Command::Reset,
    Command::GetStatus,
    Command::SerialNumber,
    Command::UpgradeFirmware,
    Command::TextMbd,
    Command::RawMbd,
];

impl Command {
    /// The raw request code sent as `bRequest`.
    pub fn code(&self) -> u8 {
        (*self).into()
    }

    /// Human-readable description, empty for unknown codes.
    pub fn description(&self) -> &'static str {
        match self {
            Command::DigitalTristate => "Read/write tri-state register",
            Command::DigitalPort => "Read digital port pins",
            Command::DigitalLatch => "Read/write digital port output latch register",
            Command::AnalogInput => "Read analog input channel",
            Command::AnalogStartScan => "Start analog input scan",
            Command::AnalogStopScan => "Stop analog input scan",
            Command::AnalogConfig => "Configure the analog input channel",
            Command::AnalogClearBuffer => "Clear the analog input scan FIFO buffer",
            Command::EventCounter => "Read/reset event counter",
            Command::CalibrationMemory => "Read/write calibration memory",
            Command::UserMemory => "Read/write user memory",
            Command::MbdMemory => "Read/write Message-Based DAQ (MBD) memory",
            Command::BlinkLed => "Blink LED",
            Command::Reset => "Reset device",
            Command::GetStatus => "Read device status",
            Command::SerialNumber => "Read/write serial number",
            Command::UpgradeFirmware => "Enter device firmware upgrade (DFU) mode",
            Command::TextMbd => "Text-based MBD command/response",
            Command::RawMbd => "Raw MBD response",
            Command::Unknown(_) => "",
        }
    }
}

/// Look up the description of a raw command byte.
pub fn describe(code: u8) -> &'static str {
    Command::from_primitive(code).description()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
