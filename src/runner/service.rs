//! # 调度服务
//!
//! 批量入口按 `max_concurrency` 限制并发扇出，单个目标失败不影响其他目标

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use entity::{cron_jobs, monitors};
use futures::stream::{self, StreamExt};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::types::{RunSummary, TargetResult};
use crate::config::RunnerConfig;
use crate::error::{Context, MonitorError, Result};
use crate::incident::{IncidentService, TransitionOutcome};
use crate::logging::{LogComponent, LogStage};
use crate::notify::{NotificationEvent, NotificationTarget, Notifier};
use crate::probe::{Classification, ProbeExecutor};
use crate::{lerror, linfo};

/// 调度服务
#[derive(Clone)]
pub struct RunnerService {
    pub(super) db: Arc<DatabaseConnection>,
    pub(super) executor: ProbeExecutor,
    pub(super) incidents: IncidentService,
    pub(super) notifier: Notifier,
    pub(super) config: RunnerConfig,
}

impl RunnerService {
    /// 创建调度服务
    pub fn new(db: Arc<DatabaseConnection>, config: RunnerConfig, notifier: Notifier) -> Result<Self> {
        let executor = ProbeExecutor::new(&config)?;
        Ok(Self {
            incidents: IncidentService::new(Arc::clone(&db)),
            db,
            executor,
            notifier,
            config,
        })
    }

    /// 调度配置
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// 数据库连接
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 检查所有启用的在线监控
    pub async fn run_monitors(&self) -> Result<RunSummary> {
        let targets = monitors::Entity::find()
            .filter(monitors::Column::IsActive.eq(true))
            .order_by_asc(monitors::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| MonitorError::database_with_source("加载在线监控失败", e))?;

        linfo!(
            "runner",
            LogStage::Scheduling,
            LogComponent::Runner,
            "run_monitors",
            "开始检查在线监控",
            count = targets.len(),
            max_concurrency = self.config.max_concurrency
        );

        let summary = self
            .fan_out(targets, |monitor| {
                let id = monitor.id;
                (id, self.run_monitor_pipeline(monitor))
            })
            .await;

        Self::log_summary("run_monitors_done", &summary);
        Ok(summary)
    }

    /// 执行所有到期的定时任务（`next_run_at <= now` 或尚未调度）
    pub async fn run_due_jobs(&self, now: NaiveDateTime) -> Result<RunSummary> {
        let targets = cron_jobs::Entity::find()
            .filter(cron_jobs::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(cron_jobs::Column::NextRunAt.lte(now))
                    .add(cron_jobs::Column::NextRunAt.is_null()),
            )
            .order_by_asc(cron_jobs::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| MonitorError::database_with_source("加载到期定时任务失败", e))?;

        linfo!(
            "runner",
            LogStage::Scheduling,
            LogComponent::Runner,
            "run_due_jobs",
            "开始执行到期定时任务",
            count = targets.len(),
            max_concurrency = self.config.max_concurrency
        );

        let summary = self
            .fan_out(targets, |job| {
                let id = job.id;
                (id, self.run_cron_pipeline(job))
            })
            .await;

        Self::log_summary("run_due_jobs_done", &summary);
        Ok(summary)
    }

    /// 手动检查单个在线监控
    pub async fn check_monitor(&self, monitor_id: i32) -> Result<TargetResult> {
        let monitor = monitors::Entity::find_by_id(monitor_id)
            .one(&*self.db)
            .await
            .context("加载在线监控失败")?
            .ok_or_else(|| MonitorError::not_found("monitor", monitor_id))?;

        self.run_monitor_pipeline(monitor).await
    }

    /// 手动执行单个定时任务
    pub async fn execute_job(&self, job_id: i32) -> Result<TargetResult> {
        let job = cron_jobs::Entity::find_by_id(job_id)
            .one(&*self.db)
            .await
            .context("加载定时任务失败")?
            .ok_or_else(|| MonitorError::not_found("cron_job", job_id))?;

        self.run_cron_pipeline(job).await
    }

    async fn fan_out<T, F, Fut>(&self, targets: Vec<T>, pipeline: F) -> RunSummary
    where
        F: Fn(T) -> (i32, Fut),
        Fut: Future<Output = Result<TargetResult>>,
    {
        let results = stream::iter(targets)
            .map(|target| {
                let (target_id, run) = pipeline(target);
                async move {
                    let started = Instant::now();
                    match run.await {
                        Ok(result) => result,
                        Err(e) => {
                            lerror!(
                                "runner",
                                LogStage::Error,
                                LogComponent::Runner,
                                "target_failed",
                                &format!("目标处理失败，本轮跳过: {e}"),
                                target_id = target_id
                            );
                            TargetResult::error(target_id, started.elapsed())
                        }
                    }
                }
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        RunSummary::from_results(results)
    }

    /// 根据事件迁移结果发送宕机或恢复通知
    pub(super) async fn notify_transition(
        &self,
        target: &NotificationTarget,
        outcome: TransitionOutcome,
        classification: &Classification,
        now: NaiveDateTime,
    ) {
        let event = match (outcome, classification.cause) {
            (TransitionOutcome::Opened { incident }, Some(cause)) => NotificationEvent::Down {
                status: classification.status,
                cause,
                error_message: classification.error_message.clone(),
                occurred_at: incident.started_at,
            },
            (TransitionOutcome::Resolved { incident, downtime }, _) => NotificationEvent::Recovery {
                downtime,
                occurred_at: incident.resolved_at.unwrap_or(now),
            },
            _ => return,
        };

        self.notifier.notify(target, &event).await;
    }

    fn log_summary(operation: &str, summary: &RunSummary) {
        linfo!(
            "runner",
            LogStage::Scheduling,
            LogComponent::Runner,
            operation,
            "调度完成",
            executed = summary.executed,
            succeeded = summary.succeeded,
            failed = summary.failed
        );
    }
}
