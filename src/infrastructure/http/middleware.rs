//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志（含耗时）
/// 注意：业务错误细节在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = %elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = %elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn bad_request_handler() -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    async fn bad_gateway_handler() -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/bad-request", get(bad_request_handler))
            .route("/bad-gateway", get(bad_gateway_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    #[tokio::test]
    async fn test_ok_response_passes_through() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/ok")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_error_logs_warning() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/bad-request")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_server_error_logs_error() {
        let app = create_test_router();
        let request = HttpRequest::builder()
            .uri("/bad-gateway")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
