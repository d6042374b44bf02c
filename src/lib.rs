//! # SmithKit Monitor Library
//!
//! 可用性监控检查循环与定时任务执行器核心库

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod incident;
pub mod logging;
pub mod management;
pub mod notify;
pub mod probe;
pub mod runner;

// Re-export commonly used types
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{MonitorError, Result};
pub use runner::{RunSummary, RunnerService};
