//! # 定时任务执行记录实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 定时任务执行记录实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cron_executions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_id: i32,
    /// running / success / failed / timeout
    pub status: String,
    pub started_at: DateTime,
    pub completed_at: Option<DateTime>,
    pub duration_ms: Option<i32>,
    pub response_status: Option<i32>,
    pub response_body: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cron_jobs::Entity",
        from = "Column::JobId",
        to = "super::cron_jobs::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    CronJob,
}

impl Related<super::cron_jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CronJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
