//! # 通知器

use std::sync::Arc;

use chrono::NaiveDateTime;
use tera::Context;

use super::senders::{DisabledEmailSender, EmailMessage, EmailSender, HttpEmailSender, NotifyError};
use super::templates;
use crate::config::EmailConfig;
use crate::error::{MonitorError, Result};
use crate::incident::types::{FailureCause, TargetKind, TargetStatus};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lerror, linfo};

/// 通知涉及的目标信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    /// 目标类型
    pub kind: TargetKind,
    /// 目标 ID
    pub id: i32,
    /// 显示名称
    pub name: String,
    /// 目标地址
    pub url: String,
    /// 通知邮箱，为空时不发送
    pub notify_email: Option<String>,
}

/// 迁移事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// 进入故障
    Down {
        /// 迁移后的状态
        status: TargetStatus,
        /// 故障原因
        cause: FailureCause,
        /// 失败说明
        error_message: Option<String>,
        /// 发生时间
        occurred_at: NaiveDateTime,
    },
    /// 从故障恢复
    Recovery {
        /// 格式化后的故障时长
        downtime: String,
        /// 恢复时间
        occurred_at: NaiveDateTime,
    },
}

impl NotificationEvent {
    const fn label(&self) -> &'static str {
        match self {
            Self::Down { .. } => "down",
            Self::Recovery { .. } => "recovery",
        }
    }
}

/// 通知器
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
}

impl Notifier {
    /// 使用指定发送器创建通知器
    #[must_use]
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// 启动时根据配置选择发送器
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let sender: Arc<dyn EmailSender> = if config.enabled {
            Arc::new(HttpEmailSender::new(config).map_err(|e| {
                MonitorError::config_with_source("邮件发送器初始化失败", e)
            })?)
        } else {
            Arc::new(DisabledEmailSender)
        };

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Notifier,
            "notifier_ready",
            "通知器初始化完成",
            sender = sender.name()
        );

        Ok(Self::new(sender))
    }

    /// 当前发送器名称
    #[must_use]
    pub fn sender_name(&self) -> &'static str {
        self.sender.name()
    }

    /// 发送通知，任何错误都只记录日志
    pub async fn notify(&self, target: &NotificationTarget, event: &NotificationEvent) {
        let Some(to) = target.notify_email.as_deref().filter(|to| !to.is_empty()) else {
            ldebug!(
                "runner",
                LogStage::Notification,
                LogComponent::Notifier,
                "skip_notification",
                "目标未配置通知邮箱",
                target_kind = %target.kind,
                target_id = target.id
            );
            return;
        };

        let result = match Self::render(target, event, to) {
            Ok(message) => self.sender.send(&message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => linfo!(
                "runner",
                LogStage::Notification,
                LogComponent::Notifier,
                "notification_sent",
                "通知已发送",
                target_kind = %target.kind,
                target_id = target.id,
                event = event.label(),
                sender = self.sender.name()
            ),
            Err(e) => lerror!(
                "runner",
                LogStage::Notification,
                LogComponent::Notifier,
                "notification_failed",
                &format!("通知发送失败: {e}"),
                target_kind = %target.kind,
                target_id = target.id,
                event = event.label()
            ),
        }
    }

    /// 渲染邮件
    pub fn render(
        target: &NotificationTarget,
        event: &NotificationEvent,
        to: &str,
    ) -> std::result::Result<EmailMessage, NotifyError> {
        let mut context = Context::new();
        context.insert("name", &target.name);
        context.insert("url", &target.url);
        context.insert("target_kind", target.kind.as_str());

        let (subject_template, html_template) = match event {
            NotificationEvent::Down {
                status,
                cause,
                error_message,
                occurred_at,
            } => {
                context.insert("status", status.as_str());
                context.insert("cause", cause.as_str());
                context.insert("error_message", error_message);
                context.insert("occurred_at", &occurred_at.format("%Y-%m-%d %H:%M:%S").to_string());
                (templates::DOWN_SUBJECT, templates::DOWN_HTML)
            }
            NotificationEvent::Recovery {
                downtime,
                occurred_at,
            } => {
                context.insert("downtime", downtime);
                context.insert("occurred_at", &occurred_at.format("%Y-%m-%d %H:%M:%S").to_string());
                (templates::RECOVERY_SUBJECT, templates::RECOVERY_HTML)
            }
        };

        Ok(EmailMessage {
            to: to.to_string(),
            subject: templates::render(subject_template, &context, false)?,
            html: templates::render(html_template, &context, true)?,
        })
    }
}
