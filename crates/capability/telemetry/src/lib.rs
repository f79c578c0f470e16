//! 追踪、请求 ID 生成与计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub requests_served: u64,
    pub exception_responses: u64,
    pub poll_success: u64,
    pub poll_failure: u64,
    pub records_appended: u64,
    pub duplicates_skipped: u64,
    pub persist_failure: u64,
    pub probe_failure: u64,
}

/// 进程级计数指标。
pub struct TelemetryMetrics {
    requests_served: AtomicU64,
    exception_responses: AtomicU64,
    poll_success: AtomicU64,
    poll_failure: AtomicU64,
    records_appended: AtomicU64,
    duplicates_skipped: AtomicU64,
    persist_failure: AtomicU64,
    probe_failure: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            requests_served: AtomicU64::new(0),
            exception_responses: AtomicU64::new(0),
            poll_success: AtomicU64::new(0),
            poll_failure: AtomicU64::new(0),
            records_appended: AtomicU64::new(0),
            duplicates_skipped: AtomicU64::new(0),
            persist_failure: AtomicU64::new(0),
            probe_failure: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_served: self.requests_served.load(Ordering::Relaxed),
            exception_responses: self.exception_responses.load(Ordering::Relaxed),
            poll_success: self.poll_success.load(Ordering::Relaxed),
            poll_failure: self.poll_failure.load(Ordering::Relaxed),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            persist_failure: self.persist_failure.load(Ordering::Relaxed),
            probe_failure: self.probe_failure.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录设备侧正常应答次数。
pub fn record_request_served() {
    metrics().requests_served.fetch_add(1, Ordering::Relaxed);
}

/// 记录设备侧异常应答次数。
pub fn record_exception_response() {
    metrics().exception_responses.fetch_add(1, Ordering::Relaxed);
}

/// 记录轮询成功次数。
pub fn record_poll_success() {
    metrics().poll_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录轮询失败次数。
pub fn record_poll_failure() {
    metrics().poll_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录落盘追加次数。
pub fn record_record_appended() {
    metrics().records_appended.fetch_add(1, Ordering::Relaxed);
}

/// 记录重复采样跳过次数。
pub fn record_duplicate_skipped() {
    metrics().duplicates_skipped.fetch_add(1, Ordering::Relaxed);
}

/// 记录落盘失败次数。
pub fn record_persist_failure() {
    metrics().persist_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录存活探测失败次数。
pub fn record_probe_failure() {
    metrics().probe_failure.fetch_add(1, Ordering::Relaxed);
}
