//! # API 响应结构
//!
//! 定义了标准的 JSON API 响应格式

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, MonitorError};

/// # 标准成功响应
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    /// 成功时为 true
    pub success: bool,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// # 标准错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// 错误代码
    pub code: String,
    /// 错误描述
    pub message: String,
}

/// # 标准错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 失败时为 false
    pub success: bool,
    /// 错误信息
    pub error: ErrorInfo,
    /// 响应时间
    pub timestamp: DateTime<Utc>,
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    /// 成功数据
    Success(T),
    /// 应用错误
    AppError(MonitorError),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success(data) => (
                StatusCode::OK,
                Json(SuccessResponse {
                    success: true,
                    data: Some(data),
                    timestamp: Utc::now(),
                }),
            )
                .into_response(),
            Self::AppError(error) => {
                let (status, code) = error.to_http_response_parts();
                let code = code.to_string();
                // 服务端错误不向调用方暴露内部细节
                let message = if error.category() == ErrorCategory::Server {
                    "Internal server error".to_string()
                } else {
                    error.to_string()
                };
                error_body(status, code, message)
            }
        }
    }
}

fn error_body(status: StatusCode, code: String, message: String) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorInfo { code, message },
        timestamp: Utc::now(),
    };
    (status, Json(body)).into_response()
}

/// # 便捷函数：成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    ApiResponse::Success(data).into_response()
}

/// # 便捷函数：应用错误响应
pub fn app_error(error: MonitorError) -> Response {
    ApiResponse::<()>::AppError(error).into_response()
}
