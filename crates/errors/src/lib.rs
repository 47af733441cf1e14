//! dealer-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范，所有 crate 共用同一套错误分类

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PROBLEM_BASE: &str = "https://api.trailer-dealer.kz/problems";

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// 用户输入不满足前置条件（无匹配型号、重复合同号等），可由用户修正
    #[error("Validation error: {0}")]
    Validation(String),

    /// 提交时的唯一性冲突，回滚后提示用户重试
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 实体当前状态不允许该操作（例如挂车已售出）
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 工作流调用顺序错误（例如未注册文档就轮询）
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// 远程服务不可达、超时、非 2xx 或响应无法解析
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// 缺少外部集成所需配置（例如 mTLS 证书）
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }

    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 调用方是否可以原样重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::UpstreamUnavailable(_))
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::InvalidState(_) => 422,
            Self::FailedPrecondition(_) => 412,
            Self::UpstreamUnavailable(_) => 502,
            Self::NotConfigured(_) => 503,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Database(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("{}/{}", PROBLEM_BASE, self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::InvalidState(_) => "invalid-state",
            Self::FailedPrecondition(_) => "failed-precondition",
            Self::UpstreamUnavailable(_) => "upstream-unavailable",
            Self::NotConfigured(_) => "not-configured",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::Conflict(_) => "Conflict",
            Self::InvalidState(_) => "Invalid State",
            Self::FailedPrecondition(_) => "Failed Precondition",
            Self::UpstreamUnavailable(_) => "Upstream Unavailable",
            Self::NotConfigured(_) => "Not Configured",
            Self::Unauthenticated(_) => "Unauthenticated",
            Self::Forbidden(_) => "Forbidden",
            Self::Database(_) => "Database Error",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.to_problem_details())).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_for_workflow_errors() {
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::failed_precondition("x").status_code(), 412);
        assert_eq!(AppError::upstream_unavailable("x").status_code(), 502);
        assert_eq!(AppError::not_configured("x").status_code(), 503);
    }

    #[test]
    fn test_problem_details() {
        let problem = AppError::conflict("trailer already under contract").to_problem_details();
        assert_eq!(problem.status, 409);
        assert_eq!(problem.title, "Conflict");
        assert!(problem.r#type.ends_with("/conflict"));
        assert!(problem.detail.contains("trailer already under contract"));

        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("instance").is_none());
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::conflict("x").is_retryable());
        assert!(AppError::upstream_unavailable("x").is_retryable());
        assert!(!AppError::failed_precondition("x").is_retryable());
        assert!(!AppError::not_configured("x").is_retryable());
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = AppError::failed_precondition("no document").into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
    }
}
