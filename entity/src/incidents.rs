//! # 故障事件实体定义
//!
//! 监控目标的故障事件。`(target_kind, target_id)` 上同一时间最多一条 ongoing 记录，
//! 由迁移中的部分唯一索引保证。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 故障事件实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// monitor / cron_job
    pub target_kind: String,
    pub target_id: i32,
    /// ongoing / resolved
    pub status: String,
    /// status_code / timeout / connection_error
    pub cause: String,
    pub started_at: DateTime,
    pub resolved_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
