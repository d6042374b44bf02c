//! # 监控状态视图
//!
//! 状态页使用：当前状态、24 小时可用率、最近检查记录和进行中的故障事件

use chrono::{NaiveDateTime, TimeDelta, Utc};
use entity::{incidents, monitor_checks, monitors};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

use super::service::RunnerService;
use crate::error::{MonitorError, Result};
use crate::incident::{TargetKind, TargetStatus};

/// 单个监控的状态视图
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStatusView {
    /// 监控 ID
    pub monitor_id: i32,
    /// 名称
    pub name: String,
    /// 目标地址
    pub url: String,
    /// 是否启用
    pub is_active: bool,
    /// 当前状态
    pub current_status: String,
    /// 最近一次检查时间
    pub last_checked_at: Option<NaiveDateTime>,
    /// 最近 24 小时 `up` 检查所占百分比，没有检查记录时为空
    pub uptime_24h: Option<f64>,
    /// 最近的检查记录，新的在前
    pub recent_checks: Vec<monitor_checks::Model>,
    /// 进行中的故障事件
    pub ongoing_incident: Option<incidents::Model>,
}

/// 计算可用率百分比（保留两位小数）
#[must_use]
pub fn uptime_percentage(checks: &[monitor_checks::Model]) -> Option<f64> {
    if checks.is_empty() {
        return None;
    }
    let up = checks
        .iter()
        .filter(|c| c.status == TargetStatus::Up.as_str())
        .count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = up as f64 * 100.0 / checks.len() as f64;
    Some((ratio * 100.0).round() / 100.0)
}

impl RunnerService {
    /// 查询监控状态视图
    pub async fn monitor_status(&self, monitor_id: i32) -> Result<MonitorStatusView> {
        let monitor = monitors::Entity::find_by_id(monitor_id)
            .one(self.db())
            .await?
            .ok_or_else(|| MonitorError::not_found("monitor", monitor_id))?;

        let since = Utc::now().naive_utc() - TimeDelta::hours(24);
        let last_day = monitor_checks::Entity::find()
            .filter(monitor_checks::Column::MonitorId.eq(monitor_id))
            .filter(monitor_checks::Column::CheckedAt.gte(since))
            .all(self.db())
            .await?;

        let recent_checks = monitor_checks::Entity::find()
            .filter(monitor_checks::Column::MonitorId.eq(monitor_id))
            .order_by_desc(monitor_checks::Column::CheckedAt)
            .order_by_desc(monitor_checks::Column::Id)
            .limit(self.config().recent_checks_limit)
            .all(self.db())
            .await?;

        let ongoing_incident = self
            .incidents
            .find_ongoing(TargetKind::Monitor, monitor_id)
            .await?;

        Ok(MonitorStatusView {
            monitor_id: monitor.id,
            name: monitor.name,
            url: monitor.url,
            is_active: monitor.is_active,
            current_status: monitor.current_status,
            last_checked_at: monitor.last_checked_at,
            uptime_24h: uptime_percentage(&last_day),
            recent_checks,
            ongoing_incident,
        })
    }
}
