//! 协议相关类型定义

use std::time::Duration;

/// Modbus TCP 客户端配置
#[derive(Debug, Clone)]
pub struct ModbusTcpConfig {
    /// Modbus 服务器主机地址
    pub host: String,
    /// Modbus 服务器端口
    pub port: u16,
    /// 单元标识（从站 ID）
    pub unit_id: u8,
    /// 连接超时
    pub connect_timeout: Duration,
    /// 读取超时
    pub read_timeout: Duration,
}

impl ModbusTcpConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// `host:port` 形式的地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ModbusTcpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5020,
            unit_id: 1,
            connect_timeout: Duration::from_millis(3000),
            read_timeout: Duration::from_millis(3000),
        }
    }
}
