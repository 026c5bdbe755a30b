//! Tests for the analog input session against a fake device

mod common;

use common::*;
use usb1608_lib::scan::{PacerOutput, StallPolicy, TransferMode, TriggerMode};

fn session() -> AnalogInput<FakeDaq> {
    init_tracing();
    AnalogInput::new(FakeDaq::default())
}

#[test]
fn test_set_scan_ranges() {
    let given: [u8; 8] = [0x0, 0x0, 0x1, 0x1, 0x3, 0x3, 0x5, 0x5];
    let mut ai = session();
    for (channel, code) in given.iter().enumerate() {
        ai.configure(channel, VoltageRange::try_from(*code).unwrap()).unwrap();
    }
    ai.commit_ranges().expect("commit");

    let ranges = ai.read_ranges().expect("read back");
    let codes: Vec<u8> = ranges.iter().map(|r| u8::from(*r)).collect();
    assert_eq!(codes, given);
}

#[test]
fn test_commit_then_read_roundtrip_patterns() {
    let mut ai = session();
    for shift in 0..8 {
        let mut seq = RANGES;
        seq.rotate_right(shift);
        seq.swap(0, 7 - shift);
        ai.set_ranges(seq);
        ai.commit_ranges().unwrap();

        // forget the local copy so the read really comes from the device
        ai.set_ranges([VoltageRange::Bip10V; 8]);
        assert_eq!(ai.read_ranges().unwrap(), seq);
        assert_eq!(ai.ranges(), &seq);
    }
}

#[test]
fn test_configure_is_local_only() {
    let mut ai = session();
    ai.configure(3, VoltageRange::Bip0_625V).unwrap();
    assert_eq!(ai.range(3).unwrap(), VoltageRange::Bip0_625V);
    assert!(ai.transport().requests.is_empty());
}

#[test]
fn test_configure_rejects_bad_channel() {
    let mut ai = session();
    assert!(matches!(ai.configure(8, VoltageRange::Bip1V), Err(Error::InvalidChannel(8))));
    assert!(matches!(ai.range(9), Err(Error::InvalidChannel(9))));
}

#[test]
fn test_commit_sends_analog_config() {
    let mut ai = session();
    ai.configure(7, VoltageRange::Bip0_3125V).unwrap();
    ai.commit_ranges().unwrap();
    assert_eq!(
        ai.transport().sent(),
        vec![(Command::AnalogConfig, vec![0, 0, 0, 0, 0, 0, 0, 7])]
    );
}

#[test]
fn test_start_and_stop_scan() {
    let mut ai = session();
    assert_eq!(ai.state(), ScanState::Idle);

    let descriptor = ScanDescriptor {
        scans: 256,
        frequency: 50_000.0,
        channels: 0xFF,
        options: ScanOptions::default(),
    };
    ai.start_scan(&descriptor).unwrap();
    assert!(ai.is_scanning());
    assert!(ai.status().unwrap().scan_running());

    ai.stop_scan().unwrap();
    assert_eq!(ai.state(), ScanState::Idle);
    assert!(!ai.status().unwrap().scan_running());

    let sent = ai.transport().sent();
    assert_eq!(sent[0], (Command::AnalogStartScan, vec![0, 1, 0, 0, 31, 3, 0, 0, 255, 0]));
    assert_eq!(sent[1], (Command::AnalogStopScan, vec![]));
}

#[test]
fn test_start_configured_scan() {
    let mut ai = session();
    ai.set_frequency(10_000.0);
    ai.set_options(ScanOptions {
        transfer_mode: TransferMode::Immediate,
        pacer_output: PacerOutput::Off,
        trigger: TriggerMode::RisingEdge,
        debug: false,
        stall: StallPolicy::Inhibit,
    });
    ai.start_configured_scan(1, 0x01).unwrap();

    let (command, payload) = ai.transport().sent().remove(0);
    assert_eq!(command, Command::AnalogStartScan);
    let raw = ScanPayloadRaw::parse(&payload).unwrap();
    assert_eq!(raw.scans.get(), 1);
    assert_eq!(raw.pacer_period.get(), 3999);
    assert_eq!(raw.channels, 0x01);
    assert_eq!(raw.options, 0x85);
}

#[test]
fn test_external_pacer_writes_zero_period() {
    let mut ai = session();
    ai.set_frequency(500.0);
    ai.set_external_pacer(true);
    ai.start_configured_scan(0, 0x0F).unwrap();

    let (_, payload) = ai.transport().sent().remove(0);
    assert_eq!(payload, vec![0, 0, 0, 0, 0, 0, 0, 0, 0x0F, 0]);
}

#[test]
fn test_clear_buffer() {
    let mut ai = session();
    ai.clear_buffer().unwrap();
    assert_eq!(ai.transport().sent(), vec![(Command::AnalogClearBuffer, vec![])]);
}

#[test]
fn test_transport_failure_propagates() {
    let mut ai = AnalogInput::new(FakeDaq {
        fail: true,
        ..Default::default()
    });

    assert!(matches!(ai.commit_ranges(), Err(Error::Transport(_))));
    assert!(matches!(ai.read_ranges(), Err(Error::Transport(_))));
    assert!(matches!(ai.status(), Err(Error::Transport(_))));
    assert!(matches!(ai.start_scan(&ScanDescriptor::default()), Err(Error::Transport(_))));
    assert_eq!(ai.state(), ScanState::Idle);

    // one attempt each, never retried
    assert_eq!(ai.transport().requests.len(), 4);
}

#[test]
fn test_short_transfer_is_an_error() {
    let mut ai = AnalogInput::new(FakeDaq {
        short_by: 1,
        ..Default::default()
    });

    match ai.commit_ranges() {
        Err(Error::ShortTransfer {
            command,
            expected,
            actual,
        }) => {
            assert_eq!(command, Command::AnalogConfig);
            assert_eq!(expected, 8);
            assert_eq!(actual, 7);
        }
        other => panic!("expected ShortTransfer, got {other:?}"),
    }
    assert!(matches!(ai.read_ranges(), Err(Error::ShortTransfer { .. })));
    assert!(matches!(
        ai.start_scan(&ScanDescriptor::default()),
        Err(Error::ShortTransfer { expected: 10, actual: 9, .. })
    ));
    assert!(!ai.is_scanning());
}

#[test]
fn test_read_ranges_rejects_invalid_code() {
    let mut ai = AnalogInput::new(FakeDaq {
        ranges: [0, 1, 2, 3, 4, 5, 6, 0x42],
        ..Default::default()
    });
    ai.configure(0, VoltageRange::Bip5V).unwrap();
    assert!(matches!(ai.read_ranges(), Err(Error::InvalidRange(0x42))));
    // local table untouched on failure
    assert_eq!(ai.range(0).unwrap(), VoltageRange::Bip5V);
}

#[test]
fn test_borrowed_transport() {
    let mut fake = FakeDaq::default();
    {
        let mut ai = AnalogInput::new(&mut fake);
        ai.configure(1, VoltageRange::Bip2_5V).unwrap();
        ai.commit_ranges().unwrap();
    }
    assert_eq!(fake.ranges, [0, 2, 0, 0, 0, 0, 0, 0]);
}
