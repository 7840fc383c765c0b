//! Fake Extractor - 用于测试的提取器
//!
//! 始终返回固定的音频字节，不调用任何外部工具

use async_trait::async_trait;

use crate::application::ports::{
    ExtractError, ExtractOptions, ExtractedAudio, MediaExtractorPort,
};

/// Fake Extractor 配置
#[derive(Debug, Clone)]
pub struct FakeExtractorConfig {
    /// 固定返回的音频字节
    pub audio_data: Vec<u8>,
    /// 固定返回的 MIME 类型
    pub mime_type: String,
    /// 模拟提取延迟（毫秒）
    pub delay_ms: u64,
}

impl Default for FakeExtractorConfig {
    fn default() -> Self {
        Self {
            // 最小可识别的 mp3 头：ID3v2.4 tag + 一个 frame sync
            audio_data: vec![
                0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0xFF, 0xFB, 0x90,
                0x64,
            ],
            mime_type: "audio/mpeg".to_string(),
            delay_ms: 0,
        }
    }
}

/// Fake Extractor
///
/// 用于测试，始终返回配置的固定字节
pub struct FakeExtractor {
    config: FakeExtractorConfig,
}

impl FakeExtractor {
    /// 创建新的 FakeExtractor
    pub fn new(config: FakeExtractorConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeExtractorConfig::default())
    }

    /// 创建一个始终失败的 FakeExtractor（audio_data 为空即失败）
    pub fn failing() -> Self {
        Self::new(FakeExtractorConfig {
            audio_data: Vec::new(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl MediaExtractorPort for FakeExtractor {
    async fn extract_audio(
        &self,
        url: &str,
        _options: &ExtractOptions,
    ) -> Result<ExtractedAudio, ExtractError> {
        tracing::debug!(url = %url, "FakeExtractor: returning fixed audio");

        if self.config.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.delay_ms)).await;
        }

        if self.config.audio_data.is_empty() {
            return Err(ExtractError::ExtractionFailed(
                "fake extractor configured to fail".to_string(),
            ));
        }

        Ok(ExtractedAudio {
            data: self.config.audio_data.clone(),
            mime_type: self.config.mime_type.clone(),
            source_title: Some("fake source".to_string()),
        })
    }

    async fn health_check(&self) -> bool {
        !self.config.audio_data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_bytes() {
        let extractor = FakeExtractor::with_defaults();
        let audio = extractor
            .extract_audio("https://example.com/v", &ExtractOptions::default())
            .await
            .unwrap();
        assert_eq!(audio.data, FakeExtractorConfig::default().audio_data);
        assert_eq!(audio.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_failing_variant_errors() {
        let extractor = FakeExtractor::failing();
        let err = extractor
            .extract_audio("https://example.com/v", &ExtractOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ExtractionFailed(_)));
        assert!(!extractor.health_check().await);
    }
}
