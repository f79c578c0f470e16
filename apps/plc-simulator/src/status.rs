//! 状态端点：供部署平台的端口探测与人工确认进程存活
//!
//! - GET /
//! - GET /health

use axum::{Json, Router, response::IntoResponse, routing::get};

pub fn create_status_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Modbus server is running" }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
