//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /download-audio  GET  提取音频并返回 base64（?url=<source URL>）
//! - /ping            GET  健康检查

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/download-audio", get(handlers::download_audio))
        .route("/ping", get(handlers::ping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ExtractOptions;
    use crate::infrastructure::adapters::{FakeExtractor, FakeExtractorConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use tower::util::ServiceExt;

    fn test_app(extractor: FakeExtractor) -> Router {
        let state = Arc::new(AppState::new(
            Arc::new(extractor),
            ExtractOptions::default(),
        ));
        create_routes().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = test_app(FakeExtractor::with_defaults());
        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_download_audio_returns_base64_buffer() {
        let fixed = FakeExtractorConfig::default().audio_data;
        let app = test_app(FakeExtractor::with_defaults());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-audio?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DdQw4w9WgXcQ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        let buffer = json["buffer"].as_str().unwrap();
        assert!(!buffer.is_empty());
        // 往返属性：解码 buffer 得到的字节与提取工具产出完全一致
        assert_eq!(BASE64.decode(buffer).unwrap(), fixed);
        assert_eq!(json["mime_type"], "audio/mpeg");
        assert_eq!(json["byte_len"].as_u64().unwrap() as usize, fixed.len());
    }

    #[tokio::test]
    async fn test_download_audio_missing_url_param() {
        let app = test_app(FakeExtractor::with_defaults());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-audio")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_audio_non_http_url_rejected() {
        let app = test_app(FakeExtractor::with_defaults());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-audio?url=not-a-url")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errno"], 400);
    }

    #[tokio::test]
    async fn test_download_audio_extractor_failure_maps_to_502() {
        let app = test_app(FakeExtractor::failing());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download-audio?url=https%3A%2F%2Fexample.com%2Fv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["errno"], 502);
        assert!(json["error"].as_str().unwrap().contains("fail"));
    }
}
