//! # 协议通信能力模块
//!
//! 轮询侧与模拟设备之间的全部网络交互：
//! - **Modbus TCP 读取**：连接设备，读保持寄存器 100–103，解析为 `Sample`
//! - **存活探测**：带超时的 TCP 连接测试，只返回 bool
//!
//! ## 架构设计
//!
//! ```text
//! Poller
//!   │
//!   ├── LivenessProbe ── TcpLivenessProbe ──▶ connect / close
//!   └── SampleReader ─── ModbusSampleReader ─▶ connect / 0x03(100, 4) / close
//! ```
//!
//! 每次读取都新建连接并在返回前关闭；连接与读取都有超时上限，
//! 设备不可达时不会阻塞定时任务。

mod error;
mod modbus_tcp;
mod probe;
mod types;

pub use error::ProtocolError;
pub use modbus_tcp::{ModbusSampleReader, SampleReader};
pub use probe::{LivenessProbe, TcpLivenessProbe, probe};
pub use types::ModbusTcpConfig;
