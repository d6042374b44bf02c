//! # 结果分类器
//!
//! 纯函数：探测结果 + 期望 -> 状态

use serde::Serialize;

use super::types::ProbeResult;
use crate::incident::types::{ExecutionStatus, FailureCause, TargetStatus};

/// 目标类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// 在线监控：状态码不符视为 `degraded`
    Uptime,
    /// 定时任务：没有 `degraded` 概念
    Cron,
}

/// 成功判定条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// 状态码必须完全一致
    Exact(u16),
    /// 任意 2xx
    AnySuccess,
}

impl Expectation {
    /// 状态码是否满足期望
    #[must_use]
    pub const fn matches(self, status_code: u16) -> bool {
        match self {
            Self::Exact(expected) => expected == status_code,
            Self::AnySuccess => status_code >= 200 && status_code < 300,
        }
    }
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// 目标新状态
    pub status: TargetStatus,
    /// 执行记录状态（定时任务使用）
    pub execution: ExecutionStatus,
    /// 故障原因，健康时为空
    pub cause: Option<FailureCause>,
    /// 写入历史记录的错误描述
    pub error_message: Option<String>,
}

/// 分类一次探测结果
#[must_use]
pub fn classify(result: &ProbeResult, kind: CheckKind, expectation: Expectation) -> Classification {
    match result {
        ProbeResult::Response { status_code, .. } if expectation.matches(*status_code) => {
            Classification {
                status: TargetStatus::Up,
                execution: ExecutionStatus::Success,
                cause: None,
                error_message: None,
            }
        }
        ProbeResult::Response { status_code, .. } => {
            let status = match kind {
                CheckKind::Uptime => TargetStatus::Degraded,
                CheckKind::Cron => TargetStatus::Down,
            };
            let expected = match expectation {
                Expectation::Exact(code) => code.to_string(),
                Expectation::AnySuccess => "2xx".to_string(),
            };
            Classification {
                status,
                execution: ExecutionStatus::Failed,
                cause: Some(FailureCause::StatusCode),
                error_message: Some(format!("Expected status {expected}, got {status_code}")),
            }
        }
        ProbeResult::Timeout { latency_ms } => Classification {
            status: TargetStatus::Down,
            execution: ExecutionStatus::Timeout,
            cause: Some(FailureCause::Timeout),
            error_message: Some(format!("Request timed out after {latency_ms}ms")),
        },
        ProbeResult::ConnectionError { message, .. } => Classification {
            status: TargetStatus::Down,
            execution: ExecutionStatus::Failed,
            cause: Some(FailureCause::ConnectionError),
            error_message: Some(message.clone()),
        },
    }
}
