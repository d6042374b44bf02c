//! # 探测执行器
//!
//! 每次调用恰好发出一个出站请求，超时通过 `tokio::time::timeout` 取消请求 future

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Response};
use tokio::time::timeout;

use super::types::{ProbeRequest, ProbeResult};
use crate::config::RunnerConfig;
use crate::error::{MonitorError, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

/// HTTP 探测执行器
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    client: Client,
    snippet_limit: usize,
}

impl ProbeExecutor {
    /// 创建探测执行器
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.default_timeout_seconds))
            .build()
            .map_err(|e| MonitorError::network_with_source("无法创建探测 HTTP 客户端", e))?;

        Ok(Self {
            client,
            snippet_limit: config.response_snippet_bytes,
        })
    }

    /// 执行一次探测
    ///
    /// 不会返回错误，也不会阻塞超过 `request.timeout`
    pub async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let start_time = Instant::now();

        let builder = match self.build_request(request) {
            Ok(builder) => builder,
            Err(message) => {
                return ProbeResult::ConnectionError {
                    message,
                    latency_ms: elapsed_ms(start_time),
                };
            }
        };

        let snippet_limit = self.snippet_limit;
        let result = timeout(request.timeout, async move {
            let response = builder.send().await?;
            let status_code = response.status().as_u16();
            let body_snippet = read_snippet(response, snippet_limit).await;
            Ok::<_, reqwest::Error>((status_code, body_snippet))
        })
        .await;

        let latency_ms = elapsed_ms(start_time);

        let outcome = match result {
            Ok(Ok((status_code, body_snippet))) => ProbeResult::Response {
                status_code,
                latency_ms,
                body_snippet,
            },
            Ok(Err(e)) if e.is_timeout() => ProbeResult::Timeout { latency_ms },
            Ok(Err(e)) => ProbeResult::ConnectionError {
                message: error_chain(&e),
                latency_ms,
            },
            Err(_) => ProbeResult::Timeout { latency_ms },
        };

        ldebug!(
            "runner",
            LogStage::Probe,
            LogComponent::ProbeExecutor,
            "probe_finished",
            "探测完成",
            url = %request.url,
            latency_ms = latency_ms,
            status_code = ?outcome.status_code()
        );

        outcome
    }

    fn build_request(&self, request: &ProbeRequest) -> std::result::Result<reqwest::RequestBuilder, String> {
        let method = Method::from_bytes(request.method.trim().to_uppercase().as_bytes())
            .map_err(|e| format!("Invalid HTTP method '{}': {e}", request.method))?;
        let url = url::Url::parse(&request.url).map_err(|e| format!("Invalid URL '{}': {e}", request.url))?;

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("Invalid header name '{name}': {e}"))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| format!("Invalid header value for '{name}': {e}"))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        Ok(builder)
    }
}

/// 读取响应体的前 `limit` 个字节，读取失败时保留已读部分
async fn read_snippet(mut response: Response, limit: usize) -> Option<String> {
    if limit == 0 {
        return None;
    }

    let mut buffer: Vec<u8> = Vec::new();
    while buffer.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    buffer.truncate(limit);

    if buffer.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
