//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: super::DatabaseConfig,
    /// 探测/调度配置
    #[serde(default)]
    pub runner: RunnerConfig,
    /// 邮件通知配置
    #[serde(default)]
    pub email: EmailConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
        }
    }
}

impl ServerConfig {
    /// 监听地址字符串
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 探测与调度配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// 外部调度器调用触发接口时携带的共享密钥
    pub cron_secret: Option<String>,
    /// 单次调用内并发探测的上限
    pub max_concurrency: usize,
    /// 目标未配置超时时的默认超时（秒）
    pub default_timeout_seconds: u64,
    /// 出站请求的 User-Agent
    pub user_agent: String,
    /// 响应体片段最多读取的字节数
    pub response_snippet_bytes: usize,
    /// 状态页返回的最近检查条数
    pub recent_checks_limit: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cron_secret: None,
            max_concurrency: 10,
            default_timeout_seconds: 30,
            user_agent: "SmithKit-Monitor/1.0".to_string(),
            response_snippet_bytes: 1000,
            recent_checks_limit: 20,
        }
    }
}

/// 邮件通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// 是否启用邮件发送
    pub enabled: bool,
    /// 事务邮件 HTTP API 地址
    pub api_url: String,
    /// API 密钥
    pub api_key: Option<String>,
    /// 发件人
    pub from: String,
    /// 邮件请求超时（秒）
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "SmithKit <alerts@smithkit.dev>".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认日志级别（`RUST_LOG` 优先）
    pub level: String,
    /// 是否输出 target
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}
