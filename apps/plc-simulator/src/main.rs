//! 模拟 PLC 设备进程：Modbus TCP 服务端 + 数值发生器 + 状态端点。
//!
//! 与 plc-api 分进程运行时使用；监听地址取 `PLC_MODBUS_LISTEN_ADDR`，
//! 数值刷新周期取 `PLC_GENERATOR_INTERVAL_MS`，状态端点地址取 `PLC_SIMULATOR_HTTP_ADDR`。

mod status;

use plc_config::AppConfig;
use plc_device::{DeviceConfig, SimulatedDevice};
use plc_telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let device = SimulatedDevice::new(DeviceConfig {
        listen_addr: config.modbus_listen_addr.clone(),
        update_interval: config.generator_interval(),
        ..DeviceConfig::default()
    });
    let running = device.start().await?;

    let listener = tokio::net::TcpListener::bind(&config.simulator_http_addr).await?;
    info!(
        modbus = %running.local_addr(),
        http = %config.simulator_http_addr,
        "plc simulator running, press ctrl-c to stop"
    );
    axum::serve(listener, status::create_status_router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    running.stop().await;
    info!("plc simulator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c listener failed");
        std::future::pending::<()>().await;
    }
}
