//! # 触发密钥认证
//!
//! 批量接口使用 `Authorization: Bearer <secret>`，手动触发接口使用 `?secret=`。
//! 比较时不因首个不同字节提前返回。

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{MonitorError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::lwarn;
use crate::management::response;
use crate::management::server::AppState;

/// 从 `Authorization` 头中提取 Bearer Token
#[must_use]
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// 常量时间比较，长度不同直接判定不等
#[must_use]
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .iter()
        .zip(provided.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// 校验调用方提供的密钥
///
/// 服务端未配置密钥时拒绝所有调用
pub fn verify_secret(expected: Option<&str>, provided: Option<&str>) -> Result<()> {
    let Some(expected) = expected else {
        return Err(MonitorError::auth("Trigger secret is not configured"));
    };
    match provided {
        Some(provided) if secrets_match(expected, provided) => Ok(()),
        Some(_) => Err(MonitorError::auth("Invalid secret")),
        None => Err(MonitorError::auth("Missing secret")),
    }
}

/// Bearer 密钥中间件
pub async fn require_bearer_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(extract_bearer_token);

    if let Err(e) = verify_secret(state.cron_secret(), provided) {
        lwarn!(
            "http",
            LogStage::Authentication,
            LogComponent::Auth,
            "bearer_rejected",
            &format!("拒绝未授权调用: {e}"),
            path = %request.uri().path()
        );
        return response::app_error(e);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer   abc ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer ", None)]
    #[case("abc", None)]
    fn bearer_extraction(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }

    #[rstest]
    #[case(Some("s3cret"), Some("s3cret"), true)]
    #[case(Some("s3cret"), Some("s3creT"), false)]
    #[case(Some("s3cret"), Some("s3cret-longer"), false)]
    #[case(Some("s3cret"), None, false)]
    #[case(None, Some("anything"), false)]
    fn secret_verification(
        #[case] expected: Option<&str>,
        #[case] provided: Option<&str>,
        #[case] ok: bool,
    ) {
        assert_eq!(verify_secret(expected, provided).is_ok(), ok);
    }

    #[test]
    fn rejected_secret_maps_to_unauthorized() {
        let err = verify_secret(Some("a"), Some("b")).unwrap_err();
        assert_eq!(err.to_http_response_parts().0, axum::http::StatusCode::UNAUTHORIZED);
    }
}
