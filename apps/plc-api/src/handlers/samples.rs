//! 采样相关 handlers
//!
//! - `GET /fetch_data`：先探测设备存活，再读取一次采样；不落盘
//! - `GET /read_data`：直接读取一次采样，并按去重规则追加到 CSV
//!
//! 成功时响应体就是采样本身：
//!
//! ```json
//! {"temperature": 42, "oil_level": 17, "cycle_count": 500, "stops": 3}
//! ```
//!
//! 失败时返回 500 与 `ApiResponse` 错误体（`DEVICE.UNAVAILABLE` / `DEVICE.READ_FAILED`）。

use crate::AppState;
use crate::utils::response::{poll_error, sample_to_dto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn fetch_data(State(state): State<AppState>) -> Response {
    match state.poller.fetch().await {
        Ok(sample) => (StatusCode::OK, Json(sample_to_dto(sample))).into_response(),
        Err(err) => poll_error(err),
    }
}

pub async fn read_data(State(state): State<AppState>) -> Response {
    match state.poller.read_and_persist().await {
        Ok(sample) => (StatusCode::OK, Json(sample_to_dto(sample))).into_response(),
        Err(err) => poll_error(err),
    }
}
