//! # 调度结果类型

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 流水线中途失败的目标使用的状态
pub const ERROR_STATUS: &str = "error";

/// 单个目标的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    /// 监控或定时任务 ID
    pub target_id: i32,
    /// 监控为 up/degraded/down，定时任务为 success/failed/timeout，流水线失败为 error
    pub status: String,
    /// 探测耗时（毫秒）
    pub duration_ms: u64,
}

impl TargetResult {
    /// 创建结果
    pub fn new(target_id: i32, status: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            target_id,
            status: status.into(),
            duration_ms,
        }
    }

    /// 流水线失败的结果
    #[must_use]
    pub fn error(target_id: i32, elapsed: Duration) -> Self {
        Self::new(
            target_id,
            ERROR_STATUS,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        )
    }

    /// 是否计为成功
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_str(), "up" | "success")
    }
}

/// 一次调度调用的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// 本轮处理的目标数
    pub executed: usize,
    /// 成功数
    pub succeeded: usize,
    /// 失败数，包括流水线错误
    pub failed: usize,
    /// 每个目标的结果
    pub results: Vec<TargetResult>,
}

impl RunSummary {
    /// 从结果列表汇总
    #[must_use]
    pub fn from_results(results: Vec<TargetResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            executed: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_counts_successes_and_failures() {
        let summary = RunSummary::from_results(vec![
            TargetResult::new(1, "up", 12),
            TargetResult::new(2, "degraded", 30),
            TargetResult::new(3, "success", 5),
            TargetResult::error(4, Duration::from_millis(7)),
        ]);

        assert_eq!(summary.executed, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.results[3].status, "error");
    }

    #[test]
    fn empty_run_serializes_with_zero_counts() {
        let json = serde_json::to_value(RunSummary::from_results(Vec::new())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"executed": 0, "succeeded": 0, "failed": 0, "results": []})
        );
    }
}
