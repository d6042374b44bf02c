//! 定时任务流水线

use chrono::{NaiveDateTime, Utc};
use entity::{cron_executions, cron_jobs};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use super::monitor::{clamp_ms, parse_status};
use super::schedule::compute_next_run;
use super::service::RunnerService;
use super::types::TargetResult;
use crate::error::{MonitorError, Result};
use crate::incident::{ExecutionStatus, TargetKind};
use crate::logging::{LogComponent, LogStage};
use crate::notify::NotificationTarget;
use crate::probe::{CheckKind, Expectation, ProbeRequest, ProbeResult, classify};
use crate::{ldebug, lerror, lwarn};

/// 补全失败后写入的兜底说明
const ABANDONED_MESSAGE: &str = "Failed to record execution result";

impl RunnerService {
    /// 写入 running 执行记录 -> 探测 -> 分类 -> 补全执行记录 -> 故障事件 -> 通知 -> 更新任务
    ///
    /// 执行记录写入失败时整个任务本轮放弃，下次调用时仍然到期
    pub(super) async fn run_cron_pipeline(&self, job: cron_jobs::Model) -> Result<TargetResult> {
        let started_at = Utc::now().naive_utc();

        let execution = cron_executions::ActiveModel {
            job_id: Set(job.id),
            status: Set(ExecutionStatus::Running.as_str().to_string()),
            started_at: Set(started_at),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| MonitorError::database_with_source("写入执行记录失败", e))?;

        let result = match ProbeRequest::from_target(
            &job.url,
            &job.method,
            job.timeout_seconds,
            self.config.default_timeout_seconds,
            job.headers.as_deref(),
            job.body.as_deref(),
        ) {
            Ok(request) => self.executor.probe(&request).await,
            Err(message) => ProbeResult::ConnectionError {
                message,
                latency_ms: 0,
            },
        };

        let classification = classify(&result, CheckKind::Cron, Expectation::AnySuccess);
        let now = Utc::now().naive_utc();

        let execution_id = execution.id;
        let mut execution: cron_executions::ActiveModel = execution.into();
        execution.status = Set(classification.execution.as_str().to_string());
        execution.completed_at = Set(Some(now));
        execution.duration_ms = Set(Some(clamp_ms(result.latency_ms())));
        execution.response_status = Set(result.status_code().map(i32::from));
        execution.response_body = Set(result.body_snippet().map(str::to_string));
        execution.error_message = Set(classification.error_message.clone());
        if let Err(e) = execution.update(&*self.db).await {
            lerror!(
                "runner",
                LogStage::Db,
                LogComponent::CronRunner,
                "execution_update_fail",
                &format!("补全执行记录失败: {e}"),
                job_id = job.id,
                execution_id = execution_id
            );
            self.abandon_execution(execution_id, now).await;
            return Err(MonitorError::database_with_source("更新执行记录失败", e));
        }

        let previous = parse_status(&job.current_status, job.id);
        let outcome = self
            .incidents
            .apply_transition(
                TargetKind::CronJob,
                job.id,
                previous,
                classification.status,
                classification.cause,
                now,
            )
            .await?;

        let target = NotificationTarget {
            kind: TargetKind::CronJob,
            id: job.id,
            name: job.name.clone(),
            url: job.url.clone(),
            notify_email: job.notify_email.clone(),
        };
        self.notify_transition(&target, outcome, &classification, now).await;

        let job_id = job.id;
        let next_run_at = compute_next_run(&job.cron_expression, now);
        let mut active: cron_jobs::ActiveModel = job.into();
        active.current_status = Set(classification.status.as_str().to_string());
        active.last_execution_status = Set(Some(classification.execution.as_str().to_string()));
        active.last_run_at = Set(Some(now));
        active.next_run_at = Set(Some(next_run_at));
        active.updated_at = Set(now);
        active
            .update(&*self.db)
            .await
            .map_err(|e| MonitorError::database_with_source("更新定时任务状态失败", e))?;

        ldebug!(
            "runner",
            LogStage::Probe,
            LogComponent::CronRunner,
            "job_executed",
            "定时任务执行完成",
            job_id = job_id,
            execution = %classification.execution,
            next_run_at = %next_run_at
        );

        Ok(TargetResult::new(
            job_id,
            classification.execution.as_str(),
            result.latency_ms(),
        ))
    }

    /// 结果写不进去时，尽力把仍是 running 的执行记录收尾为 failed
    async fn abandon_execution(&self, execution_id: i32, now: NaiveDateTime) {
        let closing = cron_executions::ActiveModel {
            status: Set(ExecutionStatus::Failed.as_str().to_string()),
            completed_at: Set(Some(now)),
            error_message: Set(Some(ABANDONED_MESSAGE.to_string())),
            ..Default::default()
        };
        let result = cron_executions::Entity::update_many()
            .filter(cron_executions::Column::Id.eq(execution_id))
            .filter(cron_executions::Column::Status.eq(ExecutionStatus::Running.as_str()))
            .set(closing)
            .exec(&*self.db)
            .await;

        if let Err(e) = result {
            lwarn!(
                "runner",
                LogStage::Db,
                LogComponent::CronRunner,
                "execution_abandon_fail",
                &format!("执行记录收尾失败，记录仍为 running: {e}"),
                execution_id = execution_id
            );
        }
    }
}
