//! 通过真实 TCP 连接验证模拟设备的 Modbus 应答。

use domain::{RegisterBank, SAMPLE_REGISTER_COUNT, SAMPLE_START_ADDRESS};
use plc_device::{DeviceConfig, RunningDevice, SimulatedDevice};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_modbus::prelude::*;

async fn start_quiet_device() -> (SimulatedDevice, RunningDevice) {
    let device = SimulatedDevice::new(DeviceConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        generate_values: false,
        ..DeviceConfig::default()
    });
    let running = device.start().await.expect("start device");
    (device, running)
}

#[tokio::test]
async fn reads_values_written_to_store() -> Result<(), Box<dyn std::error::Error>> {
    let (device, running) = start_quiet_device().await;
    device
        .store()
        .set(RegisterBank::HoldingRegisters, 100, &[42, 17, 500, 3])?;

    let mut ctx = tcp::connect(running.local_addr()).await?;
    let data = ctx
        .read_holding_registers(SAMPLE_START_ADDRESS, SAMPLE_REGISTER_COUNT)
        .await??;
    assert_eq!(data, vec![42, 17, 500, 3]);

    ctx.disconnect().await?;
    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn pipelined_reads_on_one_connection() -> Result<(), Box<dyn std::error::Error>> {
    let (device, running) = start_quiet_device().await;
    let store = device.store();
    let mut ctx = tcp::connect(running.local_addr()).await?;

    for round in 1..=5u16 {
        store.set(RegisterBank::HoldingRegisters, 100, &[round, round + 1, round + 2, round + 3])?;
        let data = ctx.read_holding_registers(100, 4).await??;
        assert_eq!(data, vec![round, round + 1, round + 2, round + 3]);
    }

    // 异常应答之后连接仍可继续使用
    let err = ctx.read_holding_registers(199, 4).await?.unwrap_err();
    assert_eq!(err, ExceptionCode::IllegalDataAddress);
    let data = ctx.read_holding_registers(100, 1).await??;
    assert_eq!(data, vec![5]);

    ctx.disconnect().await?;
    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn unsupported_requests_get_exception_responses() -> Result<(), Box<dyn std::error::Error>> {
    let (_device, running) = start_quiet_device().await;
    let mut ctx = tcp::connect(running.local_addr()).await?;

    let err = ctx.read_input_registers(100, 4).await?.unwrap_err();
    assert_eq!(err, ExceptionCode::IllegalFunction);

    let err = ctx.write_single_register(100, 7).await?.unwrap_err();
    assert_eq!(err, ExceptionCode::IllegalFunction);

    let err = ctx.read_holding_registers(1_000, 4).await?.unwrap_err();
    assert_eq!(err, ExceptionCode::IllegalDataAddress);

    ctx.disconnect().await?;
    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn raw_frame_gets_exception_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let (_device, running) = start_quiet_device().await;
    let mut stream = TcpStream::connect(running.local_addr()).await?;

    // MBAP: transaction=0x0001 protocol=0 length=6 unit=1 | PDU: 0x05 写单线圈 addr=0 value=0xFF00
    let request = [0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x01, 0x05, 0x00, 0x00, 0xFF, 0x00];
    stream.write_all(&request).await?;

    let mut response = [0u8; 9];
    tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut response)).await??;
    assert_eq!(
        response,
        [0x00, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01, 0x85, 0x01]
    );

    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn truncated_pdu_gets_exception_and_connection_survives()
-> Result<(), Box<dyn std::error::Error>> {
    let (device, running) = start_quiet_device().await;
    device
        .store()
        .set(RegisterBank::HoldingRegisters, 100, &[42, 17, 500, 3])?;
    let mut stream = TcpStream::connect(running.local_addr()).await?;

    // length=4：0x03 只带了起始地址，缺少数量字段
    let truncated = [0x00, 0x01, 0x00, 0x00, 0x00, 0x04, 0x01, 0x03, 0x00, 0x64];
    stream.write_all(&truncated).await?;
    let mut response = [0u8; 9];
    tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut response)).await??;
    assert_eq!(
        response,
        [0x00, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01, 0x83, 0x03]
    );

    // 多出一个字节同样是 IllegalDataValue
    let oversized = [
        0x00, 0x02, 0x00, 0x00, 0x00, 0x07, 0x05, 0x03, 0x00, 0x64, 0x00, 0x04, 0x00,
    ];
    stream.write_all(&oversized).await?;
    tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut response)).await??;
    assert_eq!(
        response,
        [0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x05, 0x83, 0x03]
    );

    // 同一连接上的合法请求照常应答
    let valid = [0x00, 0x03, 0x00, 0x00, 0x00, 0x06, 0x01, 0x03, 0x00, 0x64, 0x00, 0x04];
    stream.write_all(&valid).await?;
    let mut reply = [0u8; 17];
    tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut reply)).await??;
    assert_eq!(
        reply,
        [
            0x00, 0x03, 0x00, 0x00, 0x00, 0x0B, 0x01, 0x03, 0x08, 0x00, 0x2A, 0x00, 0x11, 0x01,
            0xF4, 0x00, 0x03,
        ]
    );

    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn undecodable_header_closes_connection() -> Result<(), Box<dyn std::error::Error>> {
    let (_device, running) = start_quiet_device().await;
    let mut stream = TcpStream::connect(running.local_addr()).await?;

    // protocol id = 1
    let request = [0x00, 0x01, 0x00, 0x01, 0x00, 0x06, 0x01, 0x03, 0x00, 0x64, 0x00, 0x04];
    stream.write_all(&request).await?;
    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut buf)).await?;
    assert!(matches!(read, Ok(0) | Err(_)), "connection should be closed");

    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn concurrent_clients_are_served_independently() -> Result<(), Box<dyn std::error::Error>> {
    let (device, running) = start_quiet_device().await;
    device
        .store()
        .set(RegisterBank::HoldingRegisters, 100, &[30, 50, 100, 0])?;
    let addr = running.local_addr();

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(tokio::spawn(async move {
            let mut ctx = tcp::connect(addr).await.expect("connect");
            let data = ctx
                .read_holding_registers(100, 4)
                .await
                .expect("transport")
                .expect("exception");
            ctx.disconnect().await.expect("disconnect");
            data
        }));
    }
    for handle in handles {
        assert_eq!(handle.await?, vec![30, 50, 100, 0]);
    }

    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn generator_fills_sample_registers() -> Result<(), Box<dyn std::error::Error>> {
    let device = SimulatedDevice::new(DeviceConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        update_interval: Duration::from_millis(20),
        ..DeviceConfig::default()
    });
    let running = device.start().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut ctx = tcp::connect(running.local_addr()).await?;
    let data = ctx.read_holding_registers(100, 4).await??;
    assert!((20..=100).contains(&data[0]));
    assert!(data[1] <= 100);
    assert!((100..=10_000).contains(&data[2]));
    assert!(data[3] <= 50);

    ctx.disconnect().await?;
    running.stop().await;
    Ok(())
}

#[tokio::test]
async fn stopped_device_refuses_connections() -> Result<(), Box<dyn std::error::Error>> {
    let (_device, running) = start_quiet_device().await;
    let addr = running.local_addr();
    running.stop().await;

    assert!(TcpStream::connect(addr).await.is_err());
    Ok(())
}
