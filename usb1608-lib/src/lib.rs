pub mod analog;
pub mod command;
pub mod constants;
pub mod device;
pub mod error;
pub mod range;
pub mod scan;
pub mod status;
pub mod timing;
pub mod transport;


// Re-export the main types for easy access
pub use analog::{AnalogInput, ScanState};
pub use command::Command;
pub use device::{DeviceConfig, Usb1608FsPlus};
pub use error::Error;
pub use range::{Calibration, VoltageRange};
pub use scan::{ScanDescriptor, ScanOptions, pack_scan_payload};
pub use status::Status;
pub use timing::pacer_period;
pub use transport::Transport;
