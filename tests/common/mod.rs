//! # 集成测试公共工具
//!
//! 内存 SQLite + 迁移、可记录的邮件发送器、目标数据构造

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use entity::{cron_jobs, monitors};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use smithkit_monitor::config::{AppConfig, RunnerConfig};
use smithkit_monitor::notify::{EmailMessage, EmailSender, Notifier, NotifyError};
use smithkit_monitor::{AppContext, RunnerService};

pub const TEST_SECRET: &str = "test-cron-secret";

/// 内存数据库，已执行全部迁移
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("连接内存数据库失败");
    Migrator::up(&db, None).await.expect("执行迁移失败");
    db
}

/// 记录所有发送尝试的邮件发送器，可配置为总是失败
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(NotifyError::SendFailed("provider unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn runner_config() -> RunnerConfig {
    RunnerConfig {
        cron_secret: Some(TEST_SECRET.to_string()),
        max_concurrency: 4,
        default_timeout_seconds: 5,
        ..RunnerConfig::default()
    }
}

pub fn runner(db: DatabaseConnection, sender: Arc<RecordingSender>) -> RunnerService {
    RunnerService::new(Arc::new(db), runner_config(), Notifier::new(sender))
        .expect("创建调度服务失败")
}

pub fn app_context(db: DatabaseConnection, sender: Arc<RecordingSender>) -> Arc<AppContext> {
    let config = AppConfig {
        runner: runner_config(),
        ..AppConfig::default()
    };
    Arc::new(
        AppContext::new(Arc::new(config), Arc::new(db), Notifier::new(sender))
            .expect("创建应用上下文失败"),
    )
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub async fn insert_monitor(
    db: &DatabaseConnection,
    name: &str,
    url: &str,
    expected_status: i32,
    notify_email: Option<&str>,
) -> monitors::Model {
    monitors::ActiveModel {
        user_id: Set(1),
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        method: Set("GET".to_string()),
        expected_status: Set(expected_status),
        timeout_seconds: Set(5),
        check_interval_seconds: Set(60),
        headers: Set(None),
        body: Set(None),
        notify_email: Set(notify_email.map(str::to_string)),
        is_active: Set(true),
        current_status: Set("unknown".to_string()),
        last_checked_at: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("插入监控失败")
}

pub async fn insert_cron_job(
    db: &DatabaseConnection,
    name: &str,
    url: &str,
    cron_expression: &str,
    next_run_at: Option<NaiveDateTime>,
    is_active: bool,
) -> cron_jobs::Model {
    cron_jobs::ActiveModel {
        user_id: Set(1),
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        method: Set("GET".to_string()),
        headers: Set(None),
        body: Set(None),
        cron_expression: Set(cron_expression.to_string()),
        timeout_seconds: Set(5),
        notify_email: Set(Some("ops@example.com".to_string())),
        is_active: Set(is_active),
        current_status: Set("unknown".to_string()),
        last_execution_status: Set(None),
        last_run_at: Set(None),
        next_run_at: Set(next_run_at),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("插入定时任务失败")
}

/// 申请一个端口后立即释放，用于模拟拒绝连接
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("绑定端口失败");
    let port = listener.local_addr().expect("读取端口失败").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/health")
}
