//! 应用层错误定义
//!
//! 统一的查询错误类型

use thiserror::Error;

use crate::application::ports::ExtractError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误（提取工具、上游网络）
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 外部服务超时
    #[error("External service timeout: {0}")]
    ExternalServiceTimeout(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<ExtractError> for ApplicationError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidUrl(msg) => Self::ValidationError(format!("Invalid URL: {}", msg)),
            ExtractError::Timeout(secs) => {
                Self::ExternalServiceTimeout(format!("extraction timed out after {}s", secs))
            }
            ExtractError::IoError(msg) => Self::InternalError(format!("IO error: {}", msg)),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}
