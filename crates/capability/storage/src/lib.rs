//! # PLC Storage 模块
//!
//! 采样日志的存储抽象与实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`SampleLog` 异步接口
//! 2. **数据模型层** (`models.rs`)：`SampleRecord`、CSV 行格式
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **实现层**：
//!    - `csv_log`：CSV 文件实现（生产使用）
//!    - `in_memory`：内存实现（用于测试和演示）
//!
//! ## 文件格式
//!
//! ```text
//! timestamp,temperature,oil_level,cycle_count,stops
//! 2025-03-01 10:15:30,42,17,500,3
//! ```
//!
//! - 首行是表头，仅在文件不存在（或为空）时写入
//! - 时间戳为本地时间，精确到秒
//! - 与最后一条记录的四个数值相同的采样不会重复写入（忽略时间戳）
//!
//! ## 并发约束
//!
//! 同一个日志实例内，"读取最后一条 → 比较 → 追加" 在一把锁内完成，
//! 并发的定时任务按顺序写入。多个进程写同一文件不在支持范围内。

pub mod csv_log;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod traits;

pub use csv_log::CsvSampleLog;
pub use error::StorageError;
pub use in_memory::InMemorySampleLog;
pub use models::{AppendOutcome, CSV_HEADER, SampleRecord, TIMESTAMP_FORMAT};
pub use traits::SampleLog;
