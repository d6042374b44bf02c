//! # 状态与故障事件类型
//!
//! 数据库中以小写字符串存储，这里解析为枚举

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 无法识别的枚举字符串
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} value: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// 存储用的字符串形式
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// 目标当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// 尚未检查
    Unknown,
    /// 正常
    Up,
    /// 有响应但状态码不符
    Degraded,
    /// 无法访问或超时
    Down,
}

string_enum!(TargetStatus, "status", {
    Unknown => "unknown",
    Up => "up",
    Degraded => "degraded",
    Down => "down",
});

impl TargetStatus {
    /// `up` 和 `unknown` 视为健康
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Up | Self::Unknown)
    }

    /// `degraded` 和 `down` 视为不健康
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        !self.is_healthy()
    }
}

/// 故障原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// 状态码不符合预期
    StatusCode,
    /// 超时
    Timeout,
    /// 连接失败
    ConnectionError,
}

string_enum!(FailureCause, "cause", {
    StatusCode => "status_code",
    Timeout => "timeout",
    ConnectionError => "connection_error",
});

/// 故障事件关联的目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// 在线监控
    Monitor,
    /// 定时任务
    CronJob,
}

string_enum!(TargetKind, "target kind", {
    Monitor => "monitor",
    CronJob => "cron_job",
});

/// 故障事件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    /// 进行中
    Ongoing,
    /// 已恢复
    Resolved,
}

string_enum!(IncidentStatus, "incident status", {
    Ongoing => "ongoing",
    Resolved => "resolved",
});

/// 定时任务执行记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// 执行中
    Running,
    /// 成功
    Success,
    /// 失败
    Failed,
    /// 超时
    Timeout,
}

string_enum!(ExecutionStatus, "execution status", {
    Running => "running",
    Success => "success",
    Failed => "failed",
    Timeout => "timeout",
});
