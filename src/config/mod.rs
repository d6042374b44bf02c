//! # 配置管理模块
//!
//! 处理应用配置加载、验证和环境变量覆盖

mod app_config;
mod database;
mod manager;

pub use app_config::{AppConfig, EmailConfig, LoggingConfig, RunnerConfig, ServerConfig};
pub use database::DatabaseConfig;
pub use manager::ConfigManager;

use crate::error::Result;
use crate::ensure_config;

/// 验证配置有效性
pub(crate) fn validate_config(config: &AppConfig) -> Result<()> {
    ensure_config!(config.server.port != 0, "无效的服务器端口: {}", config.server.port);
    ensure_config!(!config.database.url.is_empty(), "数据库URL不能为空");
    ensure_config!(
        config.database.max_connections > 0,
        "数据库最大连接数必须大于0"
    );
    ensure_config!(
        config.runner.max_concurrency > 0,
        "runner.max_concurrency 必须大于0"
    );
    ensure_config!(
        config.runner.default_timeout_seconds > 0,
        "runner.default_timeout_seconds 必须大于0"
    );

    if config.email.enabled {
        ensure_config!(
            config.email.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            "启用邮件通知时必须配置 email.api_key"
        );
        ensure_config!(!config.email.from.is_empty(), "启用邮件通知时必须配置 email.from");
        url::Url::parse(&config.email.api_url).map_err(|e| {
            crate::error::MonitorError::config_with_source(
                format!("无效的邮件服务地址: {}", config.email.api_url),
                e,
            )
        })?;
    }

    Ok(())
}
