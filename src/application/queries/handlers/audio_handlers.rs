//! Audio Query Handlers - 音频下载处理器

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::application::error::ApplicationError;
use crate::application::ports::{ExtractOptions, MediaExtractorPort};
use crate::application::queries::audio_queries::{DownloadAudioQuery, DownloadAudioResponse};

/// DownloadAudio Handler - 提取音频并编码
pub struct DownloadAudioHandler {
    extractor: Arc<dyn MediaExtractorPort>,
    options: ExtractOptions,
}

impl DownloadAudioHandler {
    pub fn new(extractor: Arc<dyn MediaExtractorPort>, options: ExtractOptions) -> Self {
        Self { extractor, options }
    }

    pub async fn handle(
        &self,
        query: DownloadAudioQuery,
    ) -> Result<DownloadAudioResponse, ApplicationError> {
        let url = query.url.trim();

        // 浅验证：只排除明显非 HTTP 的输入，站点支持与否交给提取工具判断
        if url.is_empty() {
            return Err(ApplicationError::validation("URL cannot be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApplicationError::validation(format!(
                "URL must be http(s): {}",
                url
            )));
        }

        let audio = self.extractor.extract_audio(url, &self.options).await?;

        tracing::debug!(
            byte_len = audio.data.len(),
            mime_type = %audio.mime_type,
            "Encoding extracted audio"
        );

        Ok(DownloadAudioResponse {
            buffer: BASE64.encode(&audio.data),
            mime_type: audio.mime_type,
            byte_len: audio.data.len(),
        })
    }
}
