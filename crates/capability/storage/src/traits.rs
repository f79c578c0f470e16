//! 存储接口 Trait 定义

use crate::error::StorageError;
use crate::models::{AppendOutcome, SampleRecord};
use async_trait::async_trait;
use domain::Sample;

/// 采样日志接口
///
/// 追加式记录；同一实例上的 `append_if_changed` 互斥执行。
#[async_trait]
pub trait SampleLog: Send + Sync {
    /// 最后一条记录（日志为空时返回 None）
    async fn last_record(&self) -> Result<Option<SampleRecord>, StorageError>;

    /// 与最后一条记录的数值不同时追加一条带当前时间戳的记录
    async fn append_if_changed(&self, sample: Sample) -> Result<AppendOutcome, StorageError>;
}
