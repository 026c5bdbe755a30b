use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uom::fmt::DisplayStyle::Abbreviation;
use uom::si::electric_potential::volt;
use uom::si::f64::{ElectricPotential, Frequency};
use uom::si::frequency::hertz;
use usb1608_lib::command::COMMANDS;
use usb1608_lib::constants::MAX_FREQUENCY_HZ;
use usb1608_lib::scan::{PacerOutput, StallPolicy, TransferMode, TriggerMode};
use usb1608_lib::timing::{actual_frequency, clamp_frequency};
use usb1608_lib::{
    AnalogInput, DeviceConfig, ScanDescriptor, ScanOptions, Usb1608FsPlus, VoltageRange, pack_scan_payload,
    pacer_period,
};

/// Configure and drive the analog input of a USB-1608FS-Plus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Control transfer timeout in milliseconds.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the firmware command codes.
    Commands,
    /// Show the pacer period for a sample rate (no device needed).
    Pacer { frequency: f64 },
    /// Print the AnalogStartScan payload for a scan (no device needed).
    Packet {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Read or write the per-channel voltage ranges.
    Ranges {
        #[command(subcommand)]
        action: RangesCmd,
    },
    /// Read the device status word.
    Status,
    /// Start an analog input scan.
    Start {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Stop the running scan.
    Stop,
    /// Clear the scan FIFO.
    Clear,
}

#[derive(Subcommand, Debug)]
enum RangesCmd {
    Get {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set all eight ranges, codes 0 (±10V) to 7 (±0.3125V).
    Set {
        #[arg(num_args = 8, value_parser = clap::value_parser!(u8).range(0..8))]
        codes: Vec<u8>,
    },
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Number of scans, 0 for continuous
    #[arg(short, long, default_value_t = 0)]
    scans: u32,
    /// Sample rate in Hz, 0 for external pacer
    #[arg(short, long)]
    frequency: f64,
    /// Active channels, e.g. 0,1,5
    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    channels: Vec<usize>,
    #[arg(long, value_enum, default_value_t = Trigger::None)]
    trigger: Trigger,
    /// Send each sample as soon as it is acquired
    #[arg(long)]
    immediate: bool,
    /// Drive the pacer clock out on SYNC
    #[arg(long)]
    sync_out: bool,
    /// Keep acquiring on FIFO overrun
    #[arg(long)]
    inhibit_stall: bool,
    #[arg(long)]
    debug_mode: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Trigger {
    None,
    Rising,
    Falling,
    High,
    Low,
}

impl From<Trigger> for TriggerMode {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::None => TriggerMode::None,
            Trigger::Rising => TriggerMode::RisingEdge,
            Trigger::Falling => TriggerMode::FallingEdge,
            Trigger::High => TriggerMode::HighLevel,
            Trigger::Low => TriggerMode::LowLevel,
        }
    }
}

impl ScanArgs {
    fn descriptor(&self) -> Result<ScanDescriptor> {
        let channels = usb1608_lib::scan::channel_mask(&self.channels)?;
        Ok(ScanDescriptor {
            scans: self.scans,
            frequency: self.frequency,
            channels,
            options: ScanOptions {
                transfer_mode: if self.immediate {
                    TransferMode::Immediate
                } else {
                    TransferMode::Block
                },
                pacer_output: if self.sync_out { PacerOutput::OnSync } else { PacerOutput::Off },
                trigger: self.trigger.into(),
                debug: self.debug_mode,
                stall: if self.inhibit_stall {
                    StallPolicy::Inhibit
                } else {
                    StallPolicy::StallOnOverrun
                },
            },
        })
    }
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

fn print_pacer(frequency: f64) {
    let clamped = clamp_frequency(frequency);
    let period = pacer_period(frequency);
    let requested = Frequency::new::<hertz>(frequency);
    println!("Requested: {}", requested.into_format_args(hertz, Abbreviation));
    if clamped != frequency {
        println!("Clamped to maximum: {} Hz", MAX_FREQUENCY_HZ);
    }
    if period == 0 {
        println!("Pacer period: 0 (external pacer on SYNC)");
    } else {
        let actual = Frequency::new::<hertz>(actual_frequency(period));
        println!("Pacer period: {} ({:#010x})", period, period);
        println!("Actual rate: {:.3}", actual.into_format_args(hertz, Abbreviation));
    }
}

fn print_ranges(ranges: &[VoltageRange; 8], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ranges)?);
        return Ok(());
    }
    for (channel, range) in ranges.iter().enumerate() {
        let span = ElectricPotential::new::<volt>(range.span_v());
        println!(
            "  CH{}: code {} {:>9} (span {})",
            channel,
            u8::from(*range),
            range.to_string(),
            span.into_format_args(volt, Abbreviation)
        );
    }
    Ok(())
}

fn open(timeout_ms: u64) -> Result<AnalogInput<Usb1608FsPlus>> {
    let config = DeviceConfig {
        timeout: Duration::from_millis(timeout_ms),
        ..Default::default()
    };
    let device = Usb1608FsPlus::with_config(config).context("Failed to open USB-1608FS-Plus")?;
    Ok(AnalogInput::new(device))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file, &cli.verbose)?;

    match cli.command {
        Cmd::Commands => {
            for command in COMMANDS {
                println!("{:#04x}  {:?}: {}", command.code(), command, command);
            }
        }
        Cmd::Pacer { frequency } => print_pacer(frequency),
        Cmd::Packet { scan } => {
            let descriptor = scan.descriptor()?;
            let payload = pack_scan_payload(
                descriptor.scans,
                descriptor.frequency,
                descriptor.channels,
                descriptor.options.bits(),
            );
            println!("{}", hex::encode(payload));
        }
        Cmd::Ranges { action } => {
            let mut ai = open(cli.timeout_ms)?;
            match action {
                RangesCmd::Get { json } => {
                    let ranges = ai.read_ranges()?;
                    print_ranges(&ranges, json)?;
                }
                RangesCmd::Set { codes } => {
                    for (channel, code) in codes.iter().enumerate() {
                        ai.configure(channel, VoltageRange::try_from(*code)?)?;
                    }
                    ai.commit_ranges()?;
                    let ranges = ai.read_ranges()?;
                    info!("Ranges written and read back");
                    print_ranges(&ranges, false)?;
                }
            }
        }
        Cmd::Status => {
            let status = open(cli.timeout_ms)?.status()?;
            println!("Status word: {:#06x}", status.raw());
            println!("  Scan running: {}", status.scan_running());
            println!("  Scan overrun: {}", status.scan_overrun());
        }
        Cmd::Start { scan } => {
            let descriptor = scan.descriptor()?;
            let mut ai = open(cli.timeout_ms)?;
            ai.start_scan(&descriptor)?;
            info!(
                "Scan started: {} scans, channels {:#04x}, options {:#04x}",
                descriptor.scans,
                descriptor.channels,
                descriptor.options.bits()
            );
            print_pacer(descriptor.frequency);
        }
        Cmd::Stop => {
            open(cli.timeout_ms)?.stop_scan()?;
            info!("Scan stopped");
        }
        Cmd::Clear => {
            open(cli.timeout_ms)?.clear_buffer()?;
            info!("Scan FIFO cleared");
        }
    }

    Ok(())
}
