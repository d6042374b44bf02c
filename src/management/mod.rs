//! # 管理API模块
//!
//! 外部调度器调用的触发接口和监控状态查询接口

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use routes::create_routes;
pub use server::{AppState, ManagementServer};
