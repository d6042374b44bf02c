//! # 路由配置
//!
//! `/api` 下的全部路由。批量接口走 Bearer 中间件，手动触发接口在处理器内校验查询参数中的密钥。

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::management::handlers::{cron, monitors};
use crate::management::middleware::require_bearer_secret;
use crate::management::server::AppState;

/// 创建所有 `/api` 下的路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/cron", cron_routes(state.clone()))
        .nest("/monitors", monitor_routes(state.clone()))
        .with_state(state)
}

/// 定时任务路由
fn cron_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/execute", post(cron::execute_due_jobs))
        .route_layer(from_fn_with_state(state, require_bearer_secret));

    Router::new()
        .route("/trigger", get(cron::trigger_job))
        .merge(protected)
}

/// 在线监控路由
fn monitor_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/check", post(monitors::check_all))
        .route("/{id}/status", get(monitors::get_status))
        .route_layer(from_fn_with_state(state, require_bearer_secret));

    Router::new()
        .route("/trigger", get(monitors::trigger_monitor))
        .merge(protected)
}
