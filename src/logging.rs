//! # 日志配置模块
//!
//! 初始化 tracing 订阅器，并提供带有阶段/组件/操作名的结构化日志宏

use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// 日志所处的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 启动
    Startup,
    /// 关闭
    Shutdown,
    /// 配置加载
    Configuration,
    /// 数据库
    Db,
    /// 调度
    Scheduling,
    /// 探测
    Probe,
    /// 结果分类
    Classification,
    /// 故障事件
    Incident,
    /// 通知
    Notification,
    /// 认证
    Authentication,
    /// 请求开始
    RequestStart,
    /// 响应
    Response,
    /// 内部处理
    Internal,
    /// 错误
    Error,
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Configuration => "configuration",
            Self::Db => "db",
            Self::Scheduling => "scheduling",
            Self::Probe => "probe",
            Self::Classification => "classification",
            Self::Incident => "incident",
            Self::Notification => "notification",
            Self::Authentication => "authentication",
            Self::RequestStart => "request_start",
            Self::Response => "response",
            Self::Internal => "internal",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 入口
    Main,
    /// 配置
    Config,
    /// 数据库
    Database,
    /// 管理服务
    ServerSetup,
    /// 探测执行器
    ProbeExecutor,
    /// 在线监控流水线
    MonitorRunner,
    /// 定时任务流水线
    CronRunner,
    /// 调度服务
    Runner,
    /// 故障事件服务
    Incident,
    /// 通知器
    Notifier,
    /// 触发认证
    Auth,
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::ServerSetup => "server_setup",
            Self::ProbeExecutor => "probe_executor",
            Self::MonitorRunner => "monitor_runner",
            Self::CronRunner => "cron_runner",
            Self::Runner => "runner",
            Self::Incident => "incident",
            Self::Notifier => "notifier",
            Self::Auth => "auth",
        };
        f.write_str(name)
    }
}

/// 结构化 info 日志
///
/// `linfo!(request_id, stage, component, operation, description, key = value...)`
#[macro_export]
macro_rules! linfo {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr $(,)?) => {
        ::tracing::info!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            "{}",
            $description
        )
    };
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr, $($fields:tt)+) => {
        ::tracing::info!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            $($fields)+,
            "{}",
            $description
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr $(,)?) => {
        ::tracing::warn!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            "{}",
            $description
        )
    };
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr, $($fields:tt)+) => {
        ::tracing::warn!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            $($fields)+,
            "{}",
            $description
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr $(,)?) => {
        ::tracing::error!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            "{}",
            $description
        )
    };
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr, $($fields:tt)+) => {
        ::tracing::error!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            $($fields)+,
            "{}",
            $description
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr $(,)?) => {
        ::tracing::debug!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            "{}",
            $description
        )
    };
    ($request_id:expr, $stage:expr, $component:expr, $operation:expr, $description:expr, $($fields:tt)+) => {
        ::tracing::debug!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            $($fields)+,
            "{}",
            $description
        )
    };
}

/// 计算默认过滤规则：应用自身 debug，数据库查询日志关闭
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("{level},smithkit_monitor=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置文件中的级别。重复初始化（例如测试中）会被忽略。
pub fn init_logging(config: Option<&LoggingConfig>) {
    let level = config.map_or("info", |c| c.level.as_str());
    let with_target = config.is_none_or(|c| c.with_target);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(
            tracing_fmt::layer()
                .with_target(with_target)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
