//! Modbus TCP 采样读取
//!
//! 每次读取独立建连：连接 → 读保持寄存器(100, 4) → 关闭连接。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let reader = ModbusSampleReader::new(ModbusTcpConfig::new("127.0.0.1", 5020));
//! let sample = reader.read_sample().await?;
//! ```

use crate::error::ProtocolError;
use crate::types::ModbusTcpConfig;
use async_trait::async_trait;
use domain::{SAMPLE_REGISTER_COUNT, SAMPLE_START_ADDRESS, Sample};
use std::net::SocketAddr;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tokio_modbus::prelude::*;
use tracing::debug;

/// 采样读取抽象
#[async_trait]
pub trait SampleReader: Send + Sync {
    async fn read_sample(&self) -> Result<Sample, ProtocolError>;
}

/// 基于 Modbus TCP 的采样读取器
pub struct ModbusSampleReader {
    config: ModbusTcpConfig,
}

impl ModbusSampleReader {
    pub fn new(config: ModbusTcpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModbusTcpConfig {
        &self.config
    }

    async fn resolve(&self) -> Result<SocketAddr, ProtocolError> {
        let address = self.config.address();
        let mut addrs = timeout(self.config.connect_timeout, lookup_host(address.as_str()))
            .await
            .map_err(|_| ProtocolError::Timeout(format!("resolve {}", address)))?
            .map_err(|e| ProtocolError::Connection(format!("resolve {}: {}", address, e)))?;
        addrs
            .next()
            .ok_or_else(|| ProtocolError::Connection(format!("no address for {}", address)))
    }
}

#[async_trait]
impl SampleReader for ModbusSampleReader {
    async fn read_sample(&self) -> Result<Sample, ProtocolError> {
        let addr = self.resolve().await?;

        let mut ctx = timeout(
            self.config.connect_timeout,
            tcp::connect_slave(addr, Slave(self.config.unit_id)),
        )
        .await
        .map_err(|_| ProtocolError::Timeout(format!("connect {}", addr)))?
        .map_err(|e| ProtocolError::Connection(format!("{}: {}", addr, e)))?;

        let result = timeout(
            self.config.read_timeout,
            ctx.read_holding_registers(SAMPLE_START_ADDRESS, SAMPLE_REGISTER_COUNT),
        )
        .await;

        // 无论读取结果如何都关闭连接
        if let Err(e) = timeout(self.config.read_timeout, ctx.disconnect()).await {
            debug!(addr = %addr, error = %e, "modbus disconnect timed out");
        }

        let registers = result
            .map_err(|_| ProtocolError::Timeout(format!("read holding registers from {}", addr)))?
            .map_err(|e| ProtocolError::Modbus(e.to_string()))?
            .map_err(ProtocolError::Exception)?;

        debug!(
            addr = %addr,
            register = SAMPLE_START_ADDRESS,
            count = SAMPLE_REGISTER_COUNT,
            values = ?registers,
            "read modbus registers"
        );

        Sample::from_registers(&registers).ok_or_else(|| {
            ProtocolError::DataParse(format!(
                "expected {} registers, got {}",
                SAMPLE_REGISTER_COUNT,
                registers.len()
            ))
        })
    }
}
