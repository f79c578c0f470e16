//! # 轮询能力模块
//!
//! 把协议读取与采样日志串起来：
//! - `fetch`：按需读取（先探测存活，不落盘）
//! - `read_and_persist`：按需读取并落盘
//! - `tick`：定时读取并落盘（不探测，所有错误记录后跳过）
//! - `spawn`：注册定时任务（每个 Poller 只注册一次）
//!
//! ```text
//! interval ──▶ tick ──▶ SampleReader ──▶ SampleLog::append_if_changed
//! HTTP     ──▶ fetch ─▶ LivenessProbe ─▶ SampleReader
//! ```

use domain::Sample;
use plc_protocol::{LivenessProbe, ProtocolError, SampleReader};
use plc_storage::{AppendOutcome, SampleLog};
use plc_telemetry::{
    record_duplicate_skipped, record_persist_failure, record_poll_failure, record_poll_success,
    record_record_appended,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// 轮询错误
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// 存活探测失败，未发起读取
    #[error("modbus server unavailable")]
    ServiceUnavailable,
    /// 读取失败（传输错误、超时或异常应答）
    #[error("read failed: {0}")]
    Read(#[from] ProtocolError),
}

/// 单次定时轮询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 读取成功并写入了新记录
    Appended(Sample),
    /// 读取成功，与上一条记录相同
    Unchanged(Sample),
    /// 读取成功但落盘失败
    PersistFailed(Sample),
    /// 读取失败，本轮跳过
    ReadFailed,
}

/// 轮询参数
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// 定时轮询周期
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

struct PollerInner {
    reader: Arc<dyn SampleReader>,
    probe: Arc<dyn LivenessProbe>,
    log: Arc<dyn SampleLog>,
    config: PollerConfig,
    scheduled: AtomicBool,
}

/// 采样轮询器
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

impl Poller {
    pub fn new(
        reader: Arc<dyn SampleReader>,
        probe: Arc<dyn LivenessProbe>,
        log: Arc<dyn SampleLog>,
    ) -> Self {
        Self::with_config(reader, probe, log, PollerConfig::default())
    }

    pub fn with_config(
        reader: Arc<dyn SampleReader>,
        probe: Arc<dyn LivenessProbe>,
        log: Arc<dyn SampleLog>,
        config: PollerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                reader,
                probe,
                log,
                config,
                scheduled: AtomicBool::new(false),
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.config.interval
    }

    /// 按需读取：服务端不可达时直接返回 `ServiceUnavailable`，结果不落盘
    pub async fn fetch(&self) -> Result<Sample, PollError> {
        if !self.inner.probe.is_alive().await {
            record_poll_failure();
            return Err(PollError::ServiceUnavailable);
        }
        self.read().await
    }

    /// 按需读取并落盘；落盘失败只记录日志，仍返回读取到的采样
    pub async fn read_and_persist(&self) -> Result<Sample, PollError> {
        let sample = self.read().await?;
        self.persist(sample).await;
        Ok(sample)
    }

    /// 定时轮询一次；不探测，不返回错误
    pub async fn tick(&self) -> TickOutcome {
        match self.read().await {
            Ok(sample) => self.persist(sample).await,
            Err(err) => {
                warn!(target: "plc.poller", error = %err, "scheduled read failed, skipping");
                TickOutcome::ReadFailed
            }
        }
    }

    /// 按周期执行 `tick`，直到收到停机信号；首次执行在一个周期之后
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let period = self.interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            target: "plc.poller",
            interval_secs = period.as_secs_f64(),
            "scheduled polling started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!(target: "plc.poller", "scheduled polling stopped");
    }

    /// 注册定时任务；同一个 Poller 重复注册时返回 None
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        if self.inner.scheduled.swap(true, Ordering::SeqCst) {
            warn!(target: "plc.poller", "scheduled polling already registered");
            return None;
        }
        let poller = self.clone();
        Some(tokio::spawn(async move { poller.run(shutdown).await }))
    }

    async fn read(&self) -> Result<Sample, PollError> {
        match self.inner.reader.read_sample().await {
            Ok(sample) => {
                record_poll_success();
                debug!(target: "plc.poller", sample = ?sample, "sample read");
                Ok(sample)
            }
            Err(err) => {
                record_poll_failure();
                Err(PollError::Read(err))
            }
        }
    }

    async fn persist(&self, sample: Sample) -> TickOutcome {
        match self.inner.log.append_if_changed(sample).await {
            Ok(AppendOutcome::Appended(record)) => {
                record_record_appended();
                info!(
                    target: "plc.poller",
                    timestamp = %record.timestamp,
                    temperature = sample.temperature,
                    oil_level = sample.oil_level,
                    cycle_count = sample.cycle_count,
                    stops = sample.stops,
                    "sample persisted"
                );
                TickOutcome::Appended(sample)
            }
            Ok(AppendOutcome::Unchanged) => {
                record_duplicate_skipped();
                debug!(target: "plc.poller", "sample unchanged, not persisted");
                TickOutcome::Unchanged(sample)
            }
            Err(err) => {
                record_persist_failure();
                warn!(target: "plc.poller", error = %err, "persist sample failed");
                TickOutcome::PersistFailed(sample)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plc_storage::InMemorySampleLog;

    struct StaticReader(Sample);

    #[async_trait]
    impl SampleReader for StaticReader {
        async fn read_sample(&self) -> Result<Sample, ProtocolError> {
            Ok(self.0)
        }
    }

    struct StaticProbe(bool);

    #[async_trait]
    impl LivenessProbe for StaticProbe {
        async fn is_alive(&self) -> bool {
            self.0
        }
    }

    fn poller(alive: bool) -> Poller {
        Poller::new(
            Arc::new(StaticReader(Sample::new(42, 17, 500, 3))),
            Arc::new(StaticProbe(alive)),
            Arc::new(InMemorySampleLog::new()),
        )
    }

    #[test]
    fn default_interval_is_thirty_seconds() {
        assert_eq!(poller(true).interval(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn spawn_registers_once() {
        let poller = poller(true);
        let (tx, rx) = watch::channel(false);
        let first = poller.spawn(rx.clone()).expect("first registration");
        assert!(poller.spawn(rx.clone()).is_none());
        assert!(poller.clone().spawn(rx).is_none());

        tx.send(true).expect("send");
        first.await.expect("join");
    }

    #[test]
    fn poll_error_messages() {
        assert_eq!(
            PollError::ServiceUnavailable.to_string(),
            "modbus server unavailable"
        );
        let err = PollError::from(ProtocolError::Timeout("connect".to_string()));
        assert_eq!(err.to_string(), "read failed: timeout: connect");
    }
}
