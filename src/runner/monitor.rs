//! 在线监控流水线

use chrono::Utc;
use entity::{monitor_checks, monitors};
use sea_orm::{ActiveModelTrait, Set};

use super::service::RunnerService;
use super::types::TargetResult;
use crate::error::{MonitorError, Result};
use crate::incident::{TargetKind, TargetStatus};
use crate::logging::{LogComponent, LogStage};
use crate::notify::NotificationTarget;
use crate::probe::{CheckKind, Expectation, ProbeRequest, ProbeResult, classify};
use crate::{ldebug, lwarn};

impl RunnerService {
    /// 探测 -> 分类 -> 写检查记录 -> 故障事件 -> 通知 -> 更新状态
    ///
    /// 检查记录写入失败时整个目标本轮放弃，不改动事件和状态
    pub(super) async fn run_monitor_pipeline(&self, monitor: monitors::Model) -> Result<TargetResult> {
        let result = match ProbeRequest::from_target(
            &monitor.url,
            &monitor.method,
            monitor.timeout_seconds,
            self.config.default_timeout_seconds,
            monitor.headers.as_deref(),
            monitor.body.as_deref(),
        ) {
            Ok(request) => self.executor.probe(&request).await,
            Err(message) => ProbeResult::ConnectionError {
                message,
                latency_ms: 0,
            },
        };

        let expected = u16::try_from(monitor.expected_status).unwrap_or_else(|_| {
            lwarn!(
                "runner",
                LogStage::Classification,
                LogComponent::MonitorRunner,
                "invalid_expected_status",
                "expected_status 超出范围，按 200 处理",
                monitor_id = monitor.id,
                expected_status = monitor.expected_status
            );
            200
        });
        let classification = classify(&result, CheckKind::Uptime, Expectation::Exact(expected));
        let now = Utc::now().naive_utc();

        monitor_checks::ActiveModel {
            monitor_id: Set(monitor.id),
            status: Set(classification.status.as_str().to_string()),
            response_time_ms: Set(Some(clamp_ms(result.latency_ms()))),
            status_code: Set(result.status_code().map(i32::from)),
            error_message: Set(classification.error_message.clone()),
            checked_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| MonitorError::database_with_source("写入检查记录失败", e))?;

        let previous = parse_status(&monitor.current_status, monitor.id);
        let outcome = self
            .incidents
            .apply_transition(
                TargetKind::Monitor,
                monitor.id,
                previous,
                classification.status,
                classification.cause,
                now,
            )
            .await?;

        let target = NotificationTarget {
            kind: TargetKind::Monitor,
            id: monitor.id,
            name: monitor.name.clone(),
            url: monitor.url.clone(),
            notify_email: monitor.notify_email.clone(),
        };
        self.notify_transition(&target, outcome, &classification, now).await;

        let monitor_id = monitor.id;
        let mut active: monitors::ActiveModel = monitor.into();
        active.current_status = Set(classification.status.as_str().to_string());
        active.last_checked_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&*self.db)
            .await
            .map_err(|e| MonitorError::database_with_source("更新监控状态失败", e))?;

        ldebug!(
            "runner",
            LogStage::Probe,
            LogComponent::MonitorRunner,
            "monitor_checked",
            "在线监控检查完成",
            monitor_id = monitor_id,
            previous = %previous,
            status = %classification.status,
            latency_ms = result.latency_ms()
        );

        Ok(TargetResult::new(
            monitor_id,
            classification.status.as_str(),
            result.latency_ms(),
        ))
    }
}

/// 解析存储的状态，无法识别时按 `unknown` 处理
pub(super) fn parse_status(raw: &str, target_id: i32) -> TargetStatus {
    raw.parse().unwrap_or_else(|e| {
        lwarn!(
            "runner",
            LogStage::Classification,
            LogComponent::Runner,
            "invalid_stored_status",
            &format!("{e}，按 unknown 处理"),
            target_id = target_id
        );
        TargetStatus::Unknown
    })
}

/// 毫秒数写入 i32 列
pub(super) fn clamp_ms(ms: u64) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}
