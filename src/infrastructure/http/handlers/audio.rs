//! Audio Handlers - 音频下载端点

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::DownloadAudioQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadAudioRequest {
    /// 源视频 URL
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadAudioResponseBody {
    /// 音频字节的 base64 编码
    pub buffer: String,
    pub mime_type: String,
    pub byte_len: usize,
}

/// GET /download-audio?url=<source URL>
///
/// 委托提取工具完成解析 / 下载 /（可选）转码，返回 base64 编码的音频
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    Query(req): Query<DownloadAudioRequest>,
) -> Result<Json<DownloadAudioResponseBody>, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(request_id = %request_id, url = %req.url, "Audio download requested");

    let result = state
        .download_audio_handler
        .handle(DownloadAudioQuery { url: req.url })
        .await?;

    tracing::info!(
        request_id = %request_id,
        byte_len = result.byte_len,
        mime_type = %result.mime_type,
        "Audio download completed"
    );

    Ok(Json(DownloadAudioResponseBody {
        buffer: result.buffer,
        mime_type: result.mime_type,
        byte_len: result.byte_len,
    }))
}
