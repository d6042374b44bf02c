//! # 在线监控处理器

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::{ensure_positive_id, parse_target_id};
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::verify_secret;
use crate::management::response;
use crate::management::server::AppState;
use crate::{lerror, linfo};

/// 手动检查参数
#[derive(Debug, Deserialize)]
pub struct TriggerMonitorQuery {
    /// 目标 ID，认证通过后再解析
    pub monitor_id: Option<String>,
    /// 共享密钥
    pub secret: Option<String>,
}

/// 手动检查结果
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerMonitorResponse {
    /// 检查结果：up/degraded/down
    pub status: String,
    /// 监控 ID
    pub monitor_id: i32,
}

/// `POST /api/monitors/check`：检查所有启用的监控
pub async fn check_all(State(state): State<AppState>) -> Response {
    match state.runner.run_monitors().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            lerror!(
                "http",
                LogStage::Scheduling,
                LogComponent::MonitorRunner,
                "check_all_fail",
                &format!("加载在线监控失败: {e}")
            );
            response::app_error(e)
        }
    }
}

/// `GET /api/monitors/trigger?monitor_id=&secret=`：立即检查单个监控
pub async fn trigger_monitor(
    State(state): State<AppState>,
    Query(query): Query<TriggerMonitorQuery>,
) -> Response {
    let monitor_id = match verify_secret(state.cron_secret(), query.secret.as_deref())
        .and_then(|()| parse_target_id(query.monitor_id.as_deref(), "monitor_id"))
    {
        Ok(id) => id,
        Err(e) => return response::app_error(e),
    };

    linfo!(
        "http",
        LogStage::Scheduling,
        LogComponent::MonitorRunner,
        "manual_trigger",
        "手动检查在线监控",
        monitor_id
    );

    match state.runner.check_monitor(monitor_id).await {
        Ok(result) => Json(TriggerMonitorResponse {
            status: result.status,
            monitor_id,
        })
        .into_response(),
        Err(e) => response::app_error(e),
    }
}

/// `GET /api/monitors/{id}/status`
pub async fn get_status(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    if let Err(e) = ensure_positive_id(id, "monitor_id") {
        return response::app_error(e);
    }
    match state.runner.monitor_status(id).await {
        Ok(view) => response::success(view),
        Err(e) => response::app_error(e),
    }
}
