//! # 探测模块
//!
//! 对单个目标发起一次带超时的出站 HTTP 请求，并把结果归类为目标状态

pub mod classifier;
pub mod executor;
pub mod types;

pub use classifier::{CheckKind, Classification, Expectation, classify};
pub use executor::ProbeExecutor;
pub use types::{ProbeRequest, ProbeResult};
