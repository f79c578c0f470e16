//! 真实模拟设备 + Modbus 读取 + CSV 落盘的联调测试。

use domain::{RegisterBank, Sample};
use plc_device::{DeviceConfig, RunningDevice, SimulatedDevice};
use plc_poller::{PollError, Poller, TickOutcome};
use plc_protocol::{ModbusSampleReader, ModbusTcpConfig, TcpLivenessProbe};
use plc_storage::{CSV_HEADER, CsvSampleLog, SampleRecord};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

async fn start_device() -> (SimulatedDevice, RunningDevice) {
    let device = SimulatedDevice::new(DeviceConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        generate_values: false,
        ..DeviceConfig::default()
    });
    let running = device.start().await.expect("start device");
    (device, running)
}

fn poller_for(addr: SocketAddr, path: &Path) -> Poller {
    let config = ModbusTcpConfig {
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(500),
        ..ModbusTcpConfig::new(addr.ip().to_string(), addr.port())
    };
    Poller::new(
        Arc::new(ModbusSampleReader::new(config)),
        Arc::new(TcpLivenessProbe::new(
            addr.ip().to_string(),
            addr.port(),
            Duration::from_millis(500),
        )),
        Arc::new(CsvSampleLog::new(path)),
    )
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read log")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn ticks_persist_only_changed_samples() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("modbus_data.csv");
    let (device, running) = start_device().await;
    let store = device.store();
    let poller = poller_for(running.local_addr(), &path);

    store
        .set(RegisterBank::HoldingRegisters, 100, &[50, 20, 1000, 1])
        .expect("set");
    assert_eq!(
        poller.tick().await,
        TickOutcome::Appended(Sample::new(50, 20, 1000, 1))
    );
    assert_eq!(
        poller.tick().await,
        TickOutcome::Unchanged(Sample::new(50, 20, 1000, 1))
    );

    store
        .set(RegisterBank::HoldingRegisters, 100, &[51, 20, 1000, 1])
        .expect("set");
    assert_eq!(
        poller.tick().await,
        TickOutcome::Appended(Sample::new(51, 20, 1000, 1))
    );

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    let first = SampleRecord::parse_csv_line(&lines[1]).expect("first");
    let second = SampleRecord::parse_csv_line(&lines[2]).expect("second");
    assert_eq!(first.sample, Sample::new(50, 20, 1000, 1));
    assert_eq!(second.sample, Sample::new(51, 20, 1000, 1));
    assert!(second.timestamp >= first.timestamp);

    running.stop().await;
}

#[tokio::test]
async fn fetch_reports_unavailable_after_device_stops() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("modbus_data.csv");
    let (device, running) = start_device().await;
    device
        .store()
        .set(RegisterBank::HoldingRegisters, 100, &[42, 17, 500, 3])
        .expect("set");
    let poller = poller_for(running.local_addr(), &path);

    assert_eq!(
        poller.fetch().await.expect("fetch"),
        Sample::new(42, 17, 500, 3)
    );
    assert!(!path.exists(), "fetch does not persist");

    running.stop().await;

    let err = poller.fetch().await.expect_err("device stopped");
    assert!(matches!(err, PollError::ServiceUnavailable));
    assert_eq!(poller.tick().await, TickOutcome::ReadFailed);
    assert!(!path.exists());
}
