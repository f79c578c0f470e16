//! 模拟设备错误类型定义

use domain::RegisterBank;

/// 寄存器表访问错误
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// 地址或数量超出数据区范围
    #[error("register range out of bounds: {bank} address={address} count={count}")]
    OutOfRange {
        bank: RegisterBank,
        address: u16,
        count: usize,
    },

    /// 锁中毒（写入方 panic）
    #[error("register bank lock poisoned: {0}")]
    LockPoisoned(RegisterBank),
}

/// 设备启动/运行错误
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// 监听地址绑定失败
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
