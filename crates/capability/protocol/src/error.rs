//! 协议错误类型定义

use tokio_modbus::prelude::ExceptionCode;

/// 协议通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 连接错误
    #[error("connection error: {0}")]
    Connection(String),

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 超时错误
    #[error("timeout: {0}")]
    Timeout(String),

    /// Modbus 帧/协议错误
    #[error("modbus error: {0}")]
    Modbus(String),

    /// 设备返回异常应答
    #[error("modbus exception: {0:?}")]
    Exception(ExceptionCode),

    /// 数据解析错误
    #[error("data parse error: {0}")]
    DataParse(String),
}

impl ProtocolError {
    /// 是否为传输层错误（连接被拒、超时、连接重置等）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProtocolError::Connection(_) | ProtocolError::Io(_) | ProtocolError::Timeout(_)
        )
    }
}
