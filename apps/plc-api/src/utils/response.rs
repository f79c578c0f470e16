//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：poll_error
//! - DTO 转换：sample_to_dto

use api_contract::{ApiResponse, SampleDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::Sample;
use plc_poller::PollError;

/// 设备不可达
pub const DEVICE_UNAVAILABLE: &str = "DEVICE.UNAVAILABLE";
/// 读取失败
pub const DEVICE_READ_FAILED: &str = "DEVICE.READ_FAILED";

/// 轮询错误响应（均为 500）
pub fn poll_error(err: PollError) -> Response {
    let code = match &err {
        PollError::ServiceUnavailable => DEVICE_UNAVAILABLE,
        PollError::Read(_) => DEVICE_READ_FAILED,
    };
    tracing::warn!(code, error = %err, "device read failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(code, err.to_string())),
    )
        .into_response()
}

/// Sample 转 SampleDto
pub fn sample_to_dto(sample: Sample) -> SampleDto {
    SampleDto {
        temperature: sample.temperature,
        oil_level: sample.oil_level,
        cycle_count: sample.cycle_count,
        stops: sample.stops,
    }
}
