//! # 配置管理器
//!
//! 统一的配置加载接口：TOML 文件 + `SMITHKIT_*` 环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use super::AppConfig;
use crate::error::{MonitorError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo, lwarn};

const ENV_PREFIX: &str = "SMITHKIT_";
const CONFIG_PATH_ENV: &str = "SMITHKIT_CONFIG_PATH";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: AppConfig,
    /// 配置文件路径
    config_path: PathBuf,
    /// 已应用的环境变量覆盖数量
    override_count: usize,
}

impl ConfigManager {
    /// 创建配置管理器
    ///
    /// 优先使用 `SMITHKIT_CONFIG_PATH`，否则读取 `config/config.{RUST_ENV}.toml`
    pub fn new() -> Result<Self> {
        let config_file = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| {
            let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
            format!("config/config.{env}.toml")
        });

        Self::from_file(config_file)
    }

    /// 从指定文件创建配置管理器，并应用进程环境变量覆盖
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let content = Self::read_config_file(config_path)?;
        let overrides = Self::build_env_overrides(env::vars());

        let mut manager = Self::from_toml_str(&content, &overrides)?;
        manager.config_path = config_path.to_path_buf();

        linfo!(
            "system",
            LogStage::Configuration,
            LogComponent::Config,
            "config_loaded",
            "配置管理器初始化完成",
            path = %config_path.display(),
            env_overrides = manager.override_count
        );

        Ok(manager)
    }

    /// 从 TOML 文本和覆盖表构建配置
    pub fn from_toml_str(content: &str, overrides: &HashMap<String, String>) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)
            .map_err(|e| MonitorError::config_with_source(format!("TOML解析失败: {e}"), e))?;

        Self::apply_env_overrides(&mut config, overrides)?;
        super::validate_config(&config)?;

        Ok(Self {
            config,
            config_path: PathBuf::new(),
            override_count: overrides.len(),
        })
    }

    /// 获取当前配置
    #[must_use]
    pub fn get_config(&self) -> AppConfig {
        self.config.clone()
    }

    /// 配置文件路径
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn read_config_file(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(MonitorError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        std::fs::read_to_string(path).map_err(|e| {
            MonitorError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// 例如: `SMITHKIT_SERVER_PORT` -> `server.port`
    pub fn build_env_overrides(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, String> {
        vars.into_iter()
            .filter(|(key, _)| key != CONFIG_PATH_ENV)
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|config_key| (config_key.to_lowercase().replace('_', "."), value))
            })
            .collect()
    }

    fn apply_env_overrides(config: &mut AppConfig, overrides: &HashMap<String, String>) -> Result<()> {
        for (path, value) in overrides {
            let shown = if path.contains("key") || path.contains("secret") {
                "***"
            } else {
                value.as_str()
            };
            ldebug!(
                "system",
                LogStage::Configuration,
                LogComponent::Config,
                "apply_env_override",
                "应用环境变量覆盖",
                path = %path,
                value = %shown
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将环境变量覆盖应用到配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_value(path, value)?,
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = parse_value(path, value)?;
            }
            ["runner", "cron", "secret"] | ["cron", "secret"] => {
                config.runner.cron_secret = Some(value.to_string());
            }
            ["runner", "max", "concurrency"] => {
                config.runner.max_concurrency = parse_value(path, value)?;
            }
            ["runner", "default", "timeout", "seconds"] => {
                config.runner.default_timeout_seconds = parse_value(path, value)?;
            }
            ["runner", "user", "agent"] => config.runner.user_agent = value.to_string(),
            ["email", "enabled"] => config.email.enabled = parse_value(path, value)?,
            ["email", "api", "url"] => config.email.api_url = value.to_string(),
            ["email", "api", "key"] | ["resend", "api", "key"] => {
                config.email.api_key = Some(value.to_string());
            }
            ["email", "from"] => config.email.from = value.to_string(),
            ["logging", "level"] => config.logging.level = value.to_string(),
            _ => {
                lwarn!(
                    "system",
                    LogStage::Configuration,
                    LogComponent::Config,
                    "unknown_env_override",
                    "未知的配置路径，忽略环境变量覆盖",
                    path = %path
                );
            }
        }

        Ok(())
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| MonitorError::config_with_source(format!("无效的配置值 {path}: {value}"), e))
}
