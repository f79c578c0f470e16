//! 健康检查与指标快照
//!
//! - GET /health
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plc_telemetry::metrics;

/// 健康检查：只反映进程存活，不探测设备。
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            requests_served: snapshot.requests_served,
            exception_responses: snapshot.exception_responses,
            poll_success: snapshot.poll_success,
            poll_failure: snapshot.poll_failure,
            records_appended: snapshot.records_appended,
            duplicates_skipped: snapshot.duplicates_skipped,
            persist_failure: snapshot.persist_failure,
            probe_failure: snapshot.probe_failure,
        })),
    )
        .into_response()
}
