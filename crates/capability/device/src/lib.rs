//! # 模拟设备能力模块
//!
//! 模拟一台只暴露一张寄存器表的 PLC：
//! - **RegisterStore**：四个数据区的 16 位寄存器表，支持并发读写
//! - **ValueGenerator**：每秒向保持寄存器 100–103 写入随机读数
//! - **Modbus TCP 服务端**：只应答读保持寄存器（0x03），其余功能码返回异常
//!
//! ## 架构设计
//!
//! ```text
//! ValueGenerator ──set──▶ RegisterStore ◀──get── RegisterService ◀── Modbus TCP 客户端
//! ```
//!
//! `SimulatedDevice` 负责装配与生命周期：`start()` 绑定端口并启动后台任务，
//! 返回的 `RunningDevice` 通过 `stop()` 协作式停机。
//!
//! ## 寄存器表
//!
//! | 地址 | 含义 | 范围 |
//! |------|------|------|
//! | 100 | temperature | 20–100 |
//! | 101 | oil_level | 0–100 |
//! | 102 | cycle_count | 100–10000 |
//! | 103 | stops | 0–50 |

mod device;
mod error;
mod framing;
mod generator;
mod register_store;
mod server;

pub use device::{DeviceConfig, RunningDevice, SimulatedDevice};
pub use error::{DeviceError, RegisterError};
pub use generator::{
    CYCLE_COUNT_RANGE, OIL_LEVEL_RANGE, STOPS_RANGE, TEMPERATURE_RANGE, ValueGenerator,
    random_sample,
};
pub use register_store::{DEFAULT_BANK_SIZE, RegisterStore};
pub use server::{MAX_READ_COUNT, RegisterService, serve};
