//! 简单的应用上下文（DI 容器）
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::Result;
use crate::notify::Notifier;
use crate::runner::RunnerService;

/// 应用上下文，HTTP 处理器和命令行子命令共享
#[derive(Clone)]
pub struct AppContext {
    /// 应用配置
    pub config: Arc<AppConfig>,
    /// 数据库连接
    pub db: Arc<DatabaseConnection>,
    /// 检查与任务调度服务
    pub runner: Arc<RunnerService>,
}

impl AppContext {
    /// 使用已构建的组件创建上下文
    pub fn new(config: Arc<AppConfig>, db: Arc<DatabaseConnection>, notifier: Notifier) -> Result<Self> {
        let runner = RunnerService::new(Arc::clone(&db), config.runner.clone(), notifier)?;
        Ok(Self {
            config,
            db,
            runner: Arc::new(runner),
        })
    }

    /// 按配置装配：通知器根据邮件配置选择发送器
    pub fn from_config(config: AppConfig, db: DatabaseConnection) -> Result<Self> {
        let notifier = Notifier::from_config(&config.email)?;
        Self::new(Arc::new(config), Arc::new(db), notifier)
    }

    /// 触发接口使用的共享密钥
    #[must_use]
    pub fn cron_secret(&self) -> Option<&str> {
        self.config
            .runner
            .cron_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }
}
