//! # 邮件发送器

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::logging::{LogComponent, LogStage};
use crate::linfo;

/// 发送器错误，不会传播到通知器之外
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 邮件服务拒绝了请求
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    /// 发送器配置无效
    #[error("Invalid email configuration: {0}")]
    InvalidConfiguration(String),
    /// 请求邮件服务失败
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// 模板渲染失败
    #[error("Templating error: {0}")]
    Template(String),
}

/// 待发送的邮件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// 收件人
    pub to: String,
    /// 邮件主题
    pub subject: String,
    /// HTML 正文
    pub html: String,
}

/// 邮件发送能力
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送一封邮件
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;

    /// 发送器名称，用于日志
    fn name(&self) -> &'static str;
}

/// 通过事务邮件 HTTP API（Resend 兼容）发送
pub struct HttpEmailSender {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpEmailSender {
    /// 根据配置创建发送器
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| NotifyError::InvalidConfiguration("email.api_key is empty".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let body = SendEmailBody {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(NotifyError::SendFailed(format!(
                "Email API returned non-success status: {status}. Body: {error_body}"
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// 未配置邮件服务时使用，只记录日志
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        linfo!(
            "runner",
            LogStage::Notification,
            LogComponent::Notifier,
            "email_disabled",
            "邮件服务未配置，跳过发送",
            to = %message.to,
            subject = %message.subject
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: String) -> EmailConfig {
        EmailConfig {
            enabled: true,
            api_url,
            api_key: Some("re_test".to_string()),
            from: "alerts@smithkit.dev".to_string(),
            timeout_seconds: 5,
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "ops@example.com".to_string(),
            subject: "down".to_string(),
            html: "<p>down</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn posts_resend_compatible_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header_eq("authorization", "Bearer re_test"))
            .and(body_partial_json(serde_json::json!({
                "from": "alerts@smithkit.dev",
                "to": ["ops@example.com"],
                "subject": "down"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let sender = HttpEmailSender::new(&config(format!("{}/emails", server.uri()))).unwrap();
        sender.send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_send_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from"))
            .mount(&server)
            .await;

        let sender = HttpEmailSender::new(&config(server.uri())).unwrap();
        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, NotifyError::SendFailed(ref msg) if msg.contains("invalid from")));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let mut config = config("https://api.resend.com/emails".to_string());
        config.api_key = None;
        assert!(matches!(
            HttpEmailSender::new(&config),
            Err(NotifyError::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn disabled_sender_always_succeeds() {
        let sender = DisabledEmailSender;
        assert!(sender.send(&message()).await.is_ok());
        assert_eq!(sender.name(), "disabled");
    }
}
