//! 模拟设备装配与生命周期

use crate::error::DeviceError;
use crate::generator::ValueGenerator;
use crate::register_store::{DEFAULT_BANK_SIZE, RegisterStore};
use crate::server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 模拟设备配置
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Modbus TCP 监听地址（端口 0 表示由系统分配）
    pub listen_addr: String,
    /// 数值发生器周期
    pub update_interval: Duration,
    /// 是否启动数值发生器
    pub generate_values: bool,
    /// 每个数据区的寄存器数量
    pub bank_size: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5020".to_string(),
            update_interval: Duration::from_secs(1),
            generate_values: true,
            bank_size: DEFAULT_BANK_SIZE,
        }
    }
}

/// 模拟设备：寄存器表 + Modbus 服务 + 数值发生器
pub struct SimulatedDevice {
    config: DeviceConfig,
    store: Arc<RegisterStore>,
}

impl SimulatedDevice {
    pub fn new(config: DeviceConfig) -> Self {
        let store = Arc::new(RegisterStore::with_bank_size(config.bank_size));
        Self { config, store }
    }

    /// 寄存器表的共享句柄
    pub fn store(&self) -> Arc<RegisterStore> {
        Arc::clone(&self.store)
    }

    /// 绑定端口并启动后台任务
    pub async fn start(&self) -> Result<RunningDevice, DeviceError> {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .await
            .map_err(|source| DeviceError::Bind {
                addr: self.config.listen_addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = watch::channel(false);

        let mut tasks = Vec::new();
        let store = self.store();
        let server_shutdown = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(err) = server::serve(listener, store, server_shutdown).await {
                warn!(error = %err, "modbus server stopped");
            }
        }));

        if self.config.generate_values {
            let generator = ValueGenerator::new(self.store(), self.config.update_interval);
            tasks.push(tokio::spawn(generator.run(shutdown_rx)));
        }

        info!(
            addr = %local_addr,
            generate_values = self.config.generate_values,
            "simulated device started"
        );

        Ok(RunningDevice {
            local_addr,
            shutdown,
            tasks,
        })
    }
}

/// 运行中的模拟设备句柄
pub struct RunningDevice {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl RunningDevice {
    /// 实际监听地址
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 协作式停机：停止接受连接并结束数值发生器，等待后台任务退出
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "device task join failed");
            }
        }
        info!(addr = %self.local_addr, "simulated device stopped");
    }
}
