//! HTTP Error Handling
//!
//! 统一错误响应：结构化 JSON body + 真实 HTTP 状态码
//! （任何失败都以非 2xx 返回）

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    /// 外部提取工具 / 上游源失败
    UpstreamFailure(String),
    /// 外部提取超时
    UpstreamTimeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(errno::BAD_REQUEST, msg.clone()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone()),
                )
            }
            ApiError::UpstreamFailure(msg) => {
                tracing::error!(errno = errno::BAD_GATEWAY, error = %msg, "Upstream extraction failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(errno::BAD_GATEWAY, msg.clone()),
                )
            }
            ApiError::UpstreamTimeout(msg) => {
                tracing::error!(errno = errno::GATEWAY_TIMEOUT, error = %msg, "Upstream extraction timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorResponse::new(errno::GATEWAY_TIMEOUT, msg.clone()),
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<crate::application::ApplicationError> for ApiError {
    fn from(e: crate::application::ApplicationError) -> Self {
        use crate::application::ApplicationError;
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::UpstreamFailure(msg),
            ApplicationError::ExternalServiceTimeout(msg) => ApiError::UpstreamTimeout(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;

    #[test]
    fn test_validation_maps_to_400() {
        let api: ApiError = ApplicationError::validation("bad url").into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_external_failure_maps_to_502() {
        let api: ApiError =
            ApplicationError::ExternalServiceError("yt-dlp failed".to_string()).into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let api: ApiError =
            ApplicationError::ExternalServiceTimeout("300s".to_string()).into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
