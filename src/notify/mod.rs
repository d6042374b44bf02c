//! # 通知模块
//!
//! 在宕机/恢复迁移时渲染邮件并交给邮件发送器，发送失败只记录日志

pub mod notifier;
pub mod senders;
pub mod templates;

pub use notifier::{NotificationEvent, NotificationTarget, Notifier};
pub use senders::{DisabledEmailSender, EmailMessage, EmailSender, HttpEmailSender, NotifyError};
