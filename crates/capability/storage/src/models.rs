//! 数据模型定义
//!
//! - SampleRecord：带时间戳的采样记录（CSV 一行）
//! - AppendOutcome：追加结果

use crate::error::StorageError;
use chrono::{Local, NaiveDateTime, Timelike};
use domain::Sample;

/// CSV 表头（字段顺序即记录列顺序）
pub const CSV_HEADER: &str = "timestamp,temperature,oil_level,cycle_count,stops";

/// 时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 采样记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    pub timestamp: NaiveDateTime,
    pub sample: Sample,
}

impl SampleRecord {
    pub fn new(timestamp: NaiveDateTime, sample: Sample) -> Self {
        Self { timestamp, sample }
    }

    /// 以当前本地时间（截断到秒）创建记录
    pub fn now(sample: Sample) -> Self {
        let now = Local::now().naive_local();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        Self::new(timestamp, sample)
    }

    /// 编码为一行 CSV（不含换行）
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.sample.temperature,
            self.sample.oil_level,
            self.sample.cycle_count,
            self.sample.stops
        )
    }

    /// 解析一行 CSV
    pub fn parse_csv_line(line: &str) -> Result<Self, StorageError> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        let [timestamp, temperature, oil_level, cycle_count, stops] = fields.as_slice() else {
            return Err(StorageError::new(format!(
                "expected 5 fields, got {}: {}",
                fields.len(),
                line
            )));
        };
        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| StorageError::new(format!("invalid timestamp {}: {}", timestamp, e)))?;
        Ok(Self::new(
            timestamp,
            Sample::new(
                parse_field("temperature", temperature)?,
                parse_field("oil_level", oil_level)?,
                parse_field("cycle_count", cycle_count)?,
                parse_field("stops", stops)?,
            ),
        ))
    }
}

fn parse_field(name: &str, value: &str) -> Result<u16, StorageError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| StorageError::new(format!("invalid {}: {}", name, value)))
}

/// 追加结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// 写入了新记录
    Appended(SampleRecord),
    /// 与最后一条记录相同，未写入
    Unchanged,
}
