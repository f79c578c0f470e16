//! PLC 采样 HTTP 服务：按需读取、定时轮询落盘与请求追踪 ID。

mod handlers;
mod middleware;
mod routes;
mod utils;

use plc_config::AppConfig;
use plc_device::{DeviceConfig, SimulatedDevice};
use plc_poller::{Poller, PollerConfig};
use plc_protocol::{ModbusSampleReader, ModbusTcpConfig, TcpLivenessProbe};
use plc_storage::CsvSampleLog;
use plc_telemetry::init_tracing;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub poller: Poller,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 单进程模式：在本进程内启动模拟设备
    let device = if config.embedded_simulator {
        let device = SimulatedDevice::new(DeviceConfig {
            listen_addr: config.modbus_listen_addr.clone(),
            update_interval: config.generator_interval(),
            ..DeviceConfig::default()
        });
        Some(device.start().await?)
    } else {
        None
    };

    let poller = build_poller(&config);
    // 定时轮询只注册一次
    let scheduled = poller.spawn(shutdown_rx);

    let app = routes::build_app(AppState { poller });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        addr = %config.http_addr,
        modbus = %format!("{}:{}", config.modbus_host, config.modbus_port),
        log_path = %config.log_path.display(),
        "plc api listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 依次停止定时轮询与模拟设备
    let _ = shutdown_tx.send(true);
    if let Some(handle) = scheduled {
        if let Err(err) = handle.await {
            warn!(error = %err, "scheduled polling task join failed");
        }
    }
    if let Some(device) = device {
        device.stop().await;
    }
    info!("plc api stopped");
    Ok(())
}

fn build_poller(config: &AppConfig) -> Poller {
    let reader = ModbusSampleReader::new(ModbusTcpConfig {
        host: config.modbus_host.clone(),
        port: config.modbus_port,
        unit_id: config.modbus_unit_id,
        connect_timeout: config.connect_timeout(),
        read_timeout: config.read_timeout(),
    });
    let probe = TcpLivenessProbe::new(
        config.modbus_host.clone(),
        config.modbus_port,
        config.probe_timeout(),
    );
    let log = CsvSampleLog::new(config.log_path.clone());
    Poller::with_config(
        Arc::new(reader),
        Arc::new(probe),
        Arc::new(log),
        PollerConfig {
            interval: config.poll_interval(),
        },
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c listener failed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
