//! # 故障事件模块
//!
//! 状态迁移规划、故障事件持久化和停机时长格式化

pub mod downtime;
pub mod service;
pub mod transition;
pub mod types;

pub use downtime::format_downtime;
pub use service::{IncidentService, TransitionOutcome};
pub use transition::{Transition, plan_transition};
pub use types::{ExecutionStatus, FailureCause, IncidentStatus, TargetKind, TargetStatus};
