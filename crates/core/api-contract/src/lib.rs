//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装（错误与非采样类接口使用）。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 采样返回结构。
///
/// 字段名与历史接口保持一致（snake_case），直接作为 /fetch_data 的响应体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDto {
    pub temperature: u16,
    pub oil_level: u16,
    pub cycle_count: u16,
    pub stops: u16,
}

/// 指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub requests_served: u64,
    pub exception_responses: u64,
    pub poll_success: u64,
    pub poll_failure: u64,
    pub records_appended: u64,
    pub duplicates_skipped: u64,
    pub persist_failure: u64,
    pub probe_failure: u64,
}
