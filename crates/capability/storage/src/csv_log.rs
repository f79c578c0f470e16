//! CSV 采样日志
//!
//! 追加式写入；首行表头，之后每行一条记录。
//! 去重只看文件最后一条记录，不扫描全文件。

use crate::error::StorageError;
use crate::models::{AppendOutcome, CSV_HEADER, SampleRecord};
use crate::traits::SampleLog;
use async_trait::async_trait;
use domain::Sample;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// 读取文件尾部的最大字节数（单条记录远小于此值）
const TAIL_WINDOW: u64 = 4096;

/// 文件尾部状态
struct Tail {
    len: u64,
    ends_with_newline: bool,
    last_line: Option<String>,
}

impl Tail {
    /// 整个文件都在尾部窗口内且没有非空行
    fn is_blank(&self) -> bool {
        self.last_line.is_none() && self.len <= TAIL_WINDOW
    }
}

/// CSV 文件采样日志
pub struct CsvSampleLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl CsvSampleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取文件尾部；文件不存在时返回 None
    async fn read_tail(&self) -> Result<Option<Tail>, StorageError> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let len = file.metadata().await?.len();
        if len == 0 {
            return Ok(Some(Tail {
                len,
                ends_with_newline: false,
                last_line: None,
            }));
        }
        file.seek(SeekFrom::Start(len.saturating_sub(TAIL_WINDOW)))
            .await?;
        let mut buf = Vec::with_capacity(TAIL_WINDOW as usize);
        file.read_to_end(&mut buf).await?;

        let text = String::from_utf8_lossy(&buf);
        let last_line = text
            .lines()
            .map(str::trim)
            .rev()
            .find(|line| !line.is_empty())
            .map(str::to_string);
        Ok(Some(Tail {
            len,
            ends_with_newline: buf.last() == Some(&b'\n'),
            last_line,
        }))
    }

    /// 解析最后一行；表头或空文件视为没有记录
    fn parse_last(tail: &Tail) -> Result<Option<SampleRecord>, StorageError> {
        match tail.last_line.as_deref() {
            None => Ok(None),
            Some(line) if line == CSV_HEADER => Ok(None),
            Some(line) => SampleRecord::parse_csv_line(line).map(Some),
        }
    }
}

#[async_trait]
impl SampleLog for CsvSampleLog {
    async fn last_record(&self) -> Result<Option<SampleRecord>, StorageError> {
        match self.read_tail().await? {
            Some(tail) => Self::parse_last(&tail),
            None => Ok(None),
        }
    }

    async fn append_if_changed(&self, sample: Sample) -> Result<AppendOutcome, StorageError> {
        let _guard = self.writer.lock().await;

        let tail = self.read_tail().await?;
        let last = match &tail {
            Some(tail) => Self::parse_last(tail).unwrap_or_else(|err| {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "last log line unreadable, appending"
                );
                None
            }),
            None => None,
        };
        if last.is_some_and(|record| record.sample == sample) {
            debug!(path = %self.path.display(), "sample unchanged, skipping");
            return Ok(AppendOutcome::Unchanged);
        }

        let record = SampleRecord::now(sample);
        // 不存在或只有空白的文件整体重写，保证首行是表头
        let fresh = tail.as_ref().is_none_or(Tail::is_blank);
        let mut buf = String::new();
        if fresh {
            buf.push_str(CSV_HEADER);
            buf.push('\n');
        } else if tail.as_ref().is_some_and(|tail| !tail.ends_with_newline) {
            buf.push('\n');
        }
        buf.push_str(&record.to_csv_line());
        buf.push('\n');

        let mut options = OpenOptions::new();
        if fresh {
            options.create(true).write(true).truncate(true);
        } else {
            options.append(true);
        }
        let mut file = options.open(&self.path).await.map_err(|err| {
            StorageError::new(format!("open {} failed: {}", self.path.display(), err))
        })?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), "record appended");
        Ok(AppendOutcome::Appended(record))
    }
}
