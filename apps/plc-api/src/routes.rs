//! 路由定义
//!
//! - 健康检查：/health
//! - 采样读取：/fetch_data, /read_data
//! - 指标快照：/metrics

use crate::AppState;
use crate::handlers::*;
use crate::middleware::request_context;
use axum::{Router, middleware, routing::get};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/fetch_data", get(fetch_data))
        .route("/read_data", get(read_data))
        .route("/metrics", get(get_metrics))
}

/// 装配完整应用：路由 + 状态 + 请求上下文中间件
pub fn build_app(state: AppState) -> Router {
    create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}
