//! # 调度入口模块
//!
//! 外部调度器每次调用时加载到期目标，按并发上限执行
//! 探测 -> 分类 -> 记录 -> 状态机 流水线，并汇总结果

mod cron;
mod monitor;
pub mod schedule;
pub mod service;
pub mod status;
pub mod types;

pub use service::RunnerService;
pub use status::MonitorStatusView;
pub use types::{RunSummary, TargetResult};
