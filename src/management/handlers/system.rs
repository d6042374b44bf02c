//! # 系统处理器

use axum::response::IntoResponse;

/// 存活探测
pub async fn ping_handler() -> impl IntoResponse {
    "pong"
}
