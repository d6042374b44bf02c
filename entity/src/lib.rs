//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod cron_executions;
pub mod cron_jobs;
pub mod incidents;
pub mod monitor_checks;
pub mod monitors;

pub use cron_executions::Entity as CronExecutions;
pub use cron_jobs::Entity as CronJobs;
pub use incidents::Entity as Incidents;
pub use monitor_checks::Entity as MonitorChecks;
pub use monitors::Entity as Monitors;
