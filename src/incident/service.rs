//! # 故障事件服务
//!
//! 负责故障事件的开启与关闭。开启前先查询进行中的事件，同时依赖
//! `(target_kind, target_id) WHERE status = 'ongoing'` 部分唯一索引兜底并发写入

use std::sync::Arc;

use chrono::NaiveDateTime;
use entity::incidents;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use super::downtime::format_downtime;
use super::transition::{Transition, plan_transition};
use super::types::{FailureCause, IncidentStatus, TargetKind, TargetStatus};
use crate::error::{MonitorError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{linfo, lwarn};

/// 一次状态迁移对故障事件造成的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// 新开启了故障事件
    Opened {
        /// 新建的事件
        incident: incidents::Model,
    },
    /// 已存在进行中的事件，未重复创建
    AlreadyOpen {
        /// 已存在的事件
        incident: incidents::Model,
    },
    /// 关闭了进行中的事件
    Resolved {
        /// 已关闭的事件
        incident: incidents::Model,
        /// 格式化后的故障时长
        downtime: String,
    },
    /// 需要关闭但没有找到进行中的事件
    NoOngoingIncident,
    /// 无需处理
    Unchanged,
}

/// 故障事件服务
#[derive(Debug, Clone)]
pub struct IncidentService {
    db: Arc<DatabaseConnection>,
}

impl IncidentService {
    /// 创建服务
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 根据前后状态开启或关闭故障事件
    pub async fn apply_transition(
        &self,
        kind: TargetKind,
        target_id: i32,
        previous: TargetStatus,
        next: TargetStatus,
        cause: Option<FailureCause>,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome> {
        match plan_transition(previous, next) {
            Transition::OpenIncident => {
                let cause = cause.ok_or_else(|| {
                    MonitorError::internal(format!(
                        "{kind} {target_id} 变为 {next} 但缺少故障原因"
                    ))
                })?;
                self.open(kind, target_id, cause, now).await
            }
            Transition::ResolveIncident => self.resolve(kind, target_id, now).await,
            Transition::Unchanged => Ok(TransitionOutcome::Unchanged),
        }
    }

    /// 查询进行中的故障事件
    pub async fn find_ongoing(
        &self,
        kind: TargetKind,
        target_id: i32,
    ) -> Result<Option<incidents::Model>> {
        let incident = incidents::Entity::find()
            .filter(incidents::Column::TargetKind.eq(kind.as_str()))
            .filter(incidents::Column::TargetId.eq(target_id))
            .filter(incidents::Column::Status.eq(IncidentStatus::Ongoing.as_str()))
            .order_by_desc(incidents::Column::StartedAt)
            .one(&*self.db)
            .await?;
        Ok(incident)
    }

    /// 开启故障事件（幂等）
    pub async fn open(
        &self,
        kind: TargetKind,
        target_id: i32,
        cause: FailureCause,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome> {
        if let Some(incident) = self.find_ongoing(kind, target_id).await? {
            lwarn!(
                "runner",
                LogStage::Incident,
                LogComponent::Incident,
                "incident_already_open",
                "目标已有进行中的故障事件，不重复创建",
                target_kind = %kind,
                target_id = target_id,
                incident_id = incident.id
            );
            return Ok(TransitionOutcome::AlreadyOpen { incident });
        }

        let model = incidents::ActiveModel {
            target_kind: Set(kind.as_str().to_string()),
            target_id: Set(target_id),
            status: Set(IncidentStatus::Ongoing.as_str().to_string()),
            cause: Set(cause.as_str().to_string()),
            started_at: Set(now),
            resolved_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        match model.insert(&*self.db).await {
            Ok(incident) => {
                linfo!(
                    "runner",
                    LogStage::Incident,
                    LogComponent::Incident,
                    "incident_opened",
                    "开启故障事件",
                    target_kind = %kind,
                    target_id = target_id,
                    incident_id = incident.id,
                    cause = %cause
                );
                Ok(TransitionOutcome::Opened { incident })
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // 并发写入时另一方先插入成功
                let incident = self.find_ongoing(kind, target_id).await?.ok_or_else(|| {
                    MonitorError::database_with_source("唯一约束冲突但未找到进行中的故障事件", e)
                })?;
                Ok(TransitionOutcome::AlreadyOpen { incident })
            }
            Err(e) => Err(MonitorError::database_with_source("写入故障事件失败", e)),
        }
    }

    /// 关闭进行中的故障事件并计算停机时长
    pub async fn resolve(
        &self,
        kind: TargetKind,
        target_id: i32,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome> {
        let Some(incident) = self.find_ongoing(kind, target_id).await? else {
            lwarn!(
                "runner",
                LogStage::Incident,
                LogComponent::Incident,
                "incident_missing",
                "目标恢复但没有进行中的故障事件",
                target_kind = %kind,
                target_id = target_id
            );
            return Ok(TransitionOutcome::NoOngoingIncident);
        };

        let mut active: incidents::ActiveModel = incident.into();
        active.status = Set(IncidentStatus::Resolved.as_str().to_string());
        active.resolved_at = Set(Some(now));
        let incident = active.update(&*self.db).await?;

        let downtime = format_downtime(now - incident.started_at);

        linfo!(
            "runner",
            LogStage::Incident,
            LogComponent::Incident,
            "incident_resolved",
            "故障事件已关闭",
            target_kind = %kind,
            target_id = target_id,
            incident_id = incident.id,
            downtime = %downtime
        );

        Ok(TransitionOutcome::Resolved { incident, downtime })
    }
}
