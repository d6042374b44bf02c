//! # 可用性监控实体定义
//!
//! 可用性监控（uptime monitor）表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 可用性监控实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monitors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub url: String,
    pub method: String,
    pub expected_status: i32,
    pub timeout_seconds: i32,
    pub check_interval_seconds: i32,
    pub headers: Option<String>, // JSON 对象字符串
    pub body: Option<String>,
    pub notify_email: Option<String>,
    pub is_active: bool,
    /// unknown / up / degraded / down
    pub current_status: String,
    pub last_checked_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monitor_checks::Entity")]
    MonitorChecks,
}

impl Related<super::monitor_checks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitorChecks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
