//! # 定时任务触发处理器

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::parse_target_id;
use crate::logging::{LogComponent, LogStage};
use crate::management::middleware::verify_secret;
use crate::management::response;
use crate::management::server::AppState;
use crate::{lerror, linfo};

/// 手动触发参数
#[derive(Debug, Deserialize)]
pub struct TriggerJobQuery {
    /// 目标 ID，认证通过后再解析
    pub job_id: Option<String>,
    /// 共享密钥
    pub secret: Option<String>,
}

/// 手动触发结果
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerJobResponse {
    /// 执行结果：success/failed/timeout
    pub status: String,
    /// 任务 ID
    pub job_id: i32,
}

/// `POST /api/cron/execute`：执行所有到期的定时任务
pub async fn execute_due_jobs(State(state): State<AppState>) -> Response {
    match state.runner.run_due_jobs(Utc::now().naive_utc()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            lerror!(
                "http",
                LogStage::Scheduling,
                LogComponent::CronRunner,
                "execute_due_jobs_fail",
                &format!("加载到期定时任务失败: {e}")
            );
            response::app_error(e)
        }
    }
}

/// `GET /api/cron/trigger?job_id=&secret=`：立即执行单个任务
pub async fn trigger_job(
    State(state): State<AppState>,
    Query(query): Query<TriggerJobQuery>,
) -> Response {
    let job_id = match verify_secret(state.cron_secret(), query.secret.as_deref())
        .and_then(|()| parse_target_id(query.job_id.as_deref(), "job_id"))
    {
        Ok(id) => id,
        Err(e) => return response::app_error(e),
    };

    linfo!(
        "http",
        LogStage::Scheduling,
        LogComponent::CronRunner,
        "manual_trigger",
        "手动触发定时任务",
        job_id
    );

    match state.runner.execute_job(job_id).await {
        Ok(result) => Json(TriggerJobResponse {
            status: result.status,
            job_id,
        })
        .into_response(),
        Err(e) => response::app_error(e),
    }
}
