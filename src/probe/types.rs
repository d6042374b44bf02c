//! # 探测类型定义

use serde::Serialize;
use std::time::Duration;

/// 一次探测的请求描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// 目标地址
    pub url: String,
    /// HTTP 方法（大小写不敏感）
    pub method: String,
    /// 超时上限
    pub timeout: Duration,
    /// 额外请求头
    pub headers: Vec<(String, String)>,
    /// 请求体
    pub body: Option<String>,
}

impl ProbeRequest {
    /// 创建 GET 探测请求
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            timeout,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 按目标配置创建探测请求
    ///
    /// `headers_json` 为 JSON 对象文本，非字符串的值按 JSON 文本写入
    pub fn from_target(
        url: &str,
        method: &str,
        timeout_seconds: i32,
        default_timeout_seconds: u64,
        headers_json: Option<&str>,
        body: Option<&str>,
    ) -> Result<Self, String> {
        let seconds = u64::try_from(timeout_seconds)
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(default_timeout_seconds);

        Ok(Self {
            url: url.to_string(),
            method: method.to_string(),
            timeout: Duration::from_secs(seconds),
            headers: parse_headers(headers_json)?,
            body: body.filter(|b| !b.is_empty()).map(str::to_string),
        })
    }
}

fn parse_headers(raw: Option<&str>) -> Result<Vec<(String, String)>, String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(Vec::new());
    };

    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| format!("Invalid headers JSON: {e}"))?;

    Ok(map
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

/// 探测结果
///
/// 超时和连接错误都是正常的结果值，不是错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeResult {
    /// 收到了 HTTP 响应（任意状态码）
    Response {
        /// 状态码
        status_code: u16,
        /// 耗时（毫秒）
        latency_ms: u64,
        /// 截断后的响应体
        body_snippet: Option<String>,
    },
    /// 在超时上限内没有完成
    Timeout {
        /// 从开始到取消的耗时（毫秒）
        latency_ms: u64,
    },
    /// DNS/连接拒绝/TLS 等传输层失败，或请求无法构造
    ConnectionError {
        /// 错误链描述
        message: String,
        /// 耗时（毫秒）
        latency_ms: u64,
    },
}

impl ProbeResult {
    /// 从请求开始到完成（或取消）的耗时
    #[must_use]
    pub const fn latency_ms(&self) -> u64 {
        match self {
            Self::Response { latency_ms, .. }
            | Self::Timeout { latency_ms }
            | Self::ConnectionError { latency_ms, .. } => *latency_ms,
        }
    }

    /// 响应状态码
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// 响应体片段
    #[must_use]
    pub fn body_snippet(&self) -> Option<&str> {
        match self {
            Self::Response { body_snippet, .. } => body_snippet.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headers_are_parsed_from_json_object() {
        let request = ProbeRequest::from_target(
            "https://example.com",
            "post",
            5,
            30,
            Some(r#"{"X-Token": "abc", "X-Retry": 3}"#),
            Some("{}"),
        )
        .unwrap();

        assert_eq!(request.timeout, Duration::from_secs(5));
        assert!(request.headers.contains(&("X-Token".to_string(), "abc".to_string())));
        assert!(request.headers.contains(&("X-Retry".to_string(), "3".to_string())));
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn non_positive_timeout_uses_default() {
        let request =
            ProbeRequest::from_target("https://example.com", "GET", 0, 30, None, Some("")).unwrap();
        assert_eq!(request.timeout, Duration::from_secs(30));
        assert_eq!(request.body, None);
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let err = ProbeRequest::from_target("https://example.com", "GET", 5, 30, Some("[1,2]"), None)
            .unwrap_err();
        assert!(err.starts_with("Invalid headers JSON"));
    }
}
