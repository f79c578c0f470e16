//! 采样日志内存实现
//!
//! 仅用于本地测试和演示。

use crate::error::StorageError;
use crate::models::{AppendOutcome, SampleRecord};
use crate::traits::SampleLog;
use domain::Sample;
use std::sync::RwLock;

/// 采样日志内存存储
pub struct InMemorySampleLog {
    records: RwLock<Vec<SampleRecord>>,
}

impl InMemorySampleLog {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// 全部记录副本（用于测试）
    pub fn records(&self) -> Vec<SampleRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySampleLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SampleLog for InMemorySampleLog {
    async fn last_record(&self) -> Result<Option<SampleRecord>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(records.last().cloned())
    }

    async fn append_if_changed(&self, sample: Sample) -> Result<AppendOutcome, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if records.last().is_some_and(|last| last.sample == sample) {
            return Ok(AppendOutcome::Unchanged);
        }
        let record = SampleRecord::now(sample);
        records.push(record.clone());
        Ok(AppendOutcome::Appended(record))
    }
}
