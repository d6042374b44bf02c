//! # 定时任务实体定义
//!
//! 定时任务（cron job）表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 定时任务实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cron_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: Option<String>, // JSON 对象字符串
    pub body: Option<String>,
    pub cron_expression: String,
    pub timeout_seconds: i32,
    pub notify_email: Option<String>,
    pub is_active: bool,
    /// unknown / up / down
    pub current_status: String,
    /// success / failed / timeout
    pub last_execution_status: Option<String>,
    pub last_run_at: Option<DateTime>,
    pub next_run_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cron_executions::Entity")]
    CronExecutions,
}

impl Related<super::cron_executions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CronExecutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
