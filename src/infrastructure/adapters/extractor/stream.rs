//! Stream Extractor - 直链拉流变体
//!
//! 实现 MediaExtractorPort trait：先用 `yt-dlp -j` 解析（不下载）拿到
//! 协商后的媒体直链，再经 reqwest 分块拉取到内存。不做转码，音频保持
//! 源站编码，整个过程不落盘

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{
    ExtractError, ExtractOptions, ExtractedAudio, MediaExtractorPort,
};

use super::ytdlp::{base_args, detect_audio_mime, mime_from_ext, MediaMetadata, YtdlpRunner};

/// Stream Extractor 配置
#[derive(Debug, Clone)]
pub struct StreamExtractorConfig {
    /// yt-dlp 可执行文件路径
    pub yt_dlp_path: String,
    /// 解析 + 拉取的超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for StreamExtractorConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            timeout_secs: 300,
        }
    }
}

/// 直链拉流提取器
pub struct StreamYtdlpExtractor {
    runner: YtdlpRunner,
    client: Client,
}

impl StreamYtdlpExtractor {
    /// 创建新的拉流提取器
    pub fn new(config: StreamExtractorConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExtractError::NetworkError(e.to_string()))?;

        Ok(Self {
            runner: YtdlpRunner::new(config.yt_dlp_path, config.timeout_secs),
            client,
        })
    }

    /// 解析源 URL，不下载
    async fn resolve(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<MediaMetadata, ExtractError> {
        let mut args = vec!["-j".to_string()];
        args.extend(base_args(url, options));

        let output = self.runner.run(&args).await?;
        MediaMetadata::parse(&output.stdout)
    }

    /// 拉取直链，分块累积到内存
    async fn fetch(&self, media_url: &str) -> Result<Vec<u8>, ExtractError> {
        let response = self
            .client
            .get(media_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout(self.runner.timeout_secs())
                } else {
                    ExtractError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::NetworkError(format!(
                "Media URL returned HTTP {}",
                status
            )));
        }

        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout(self.runner.timeout_secs())
                } else {
                    ExtractError::NetworkError(format!("Stream read error: {}", e))
                }
            })?;
            data.extend_from_slice(&chunk);
        }

        Ok(data)
    }
}

#[async_trait]
impl MediaExtractorPort for StreamYtdlpExtractor {
    async fn extract_audio(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<ExtractedAudio, ExtractError> {
        let metadata = self.resolve(url, options).await?;

        let media_url = metadata.url.as_deref().ok_or_else(|| {
            ExtractError::ExtractionFailed("yt-dlp metadata carried no media URL".to_string())
        })?;

        tracing::debug!(
            title = ?metadata.title,
            ext = ?metadata.ext,
            acodec = ?metadata.acodec,
            "Resolved media URL, fetching"
        );

        let data = self.fetch(media_url).await?;
        if data.is_empty() {
            return Err(ExtractError::EmptyAudio);
        }

        let mime_type = detect_audio_mime(&data)
            .unwrap_or_else(|| mime_from_ext(metadata.ext.as_deref().unwrap_or("")))
            .to_string();

        tracing::info!(
            byte_len = data.len(),
            mime_type = %mime_type,
            "Stream extraction completed"
        );

        Ok(ExtractedAudio {
            data,
            mime_type,
            source_title: metadata.title,
        })
    }

    async fn health_check(&self) -> bool {
        self.runner.version_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = StreamExtractorConfig::default();
        assert_eq!(config.yt_dlp_path, "yt-dlp");
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_extractor_builds_from_config() {
        let extractor = StreamYtdlpExtractor::new(StreamExtractorConfig::default());
        assert!(extractor.is_ok());
    }
}
