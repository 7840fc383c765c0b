//! Media Extractor Port - 媒体提取抽象
//!
//! 定义「源 URL → 音频字节」的抽象接口，具体实现在 infrastructure/adapters 层
//! （yt-dlp 子进程 + 可选 ffmpeg 转码）

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// 提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    #[error("Extractor produced no audio data")]
    EmptyAudio,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::IoError(err.to_string())
    }
}

/// 目标音频编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// MP3 - 通用兼容，原始服务的默认输出
    #[default]
    Mp3,
    /// M4A (AAC)
    M4a,
    /// Opus
    Opus,
    /// WAV，不压缩
    Wav,
}

impl AudioCodec {
    /// 对应的 MIME 类型
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "audio/mpeg",
            AudioCodec::M4a => "audio/mp4",
            AudioCodec::Opus => "audio/ogg",
            AudioCodec::Wav => "audio/wav",
        }
    }
}

impl std::fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioCodec::Mp3 => write!(f, "mp3"),
            AudioCodec::M4a => write!(f, "m4a"),
            AudioCodec::Opus => write!(f, "opus"),
            AudioCodec::Wav => write!(f, "wav"),
        }
    }
}

impl std::str::FromStr for AudioCodec {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioCodec::Mp3),
            "m4a" | "aac" => Ok(AudioCodec::M4a),
            "opus" => Ok(AudioCodec::Opus),
            "wav" => Ok(AudioCodec::Wav),
            _ => Err(ExtractError::ExtractionFailed(format!(
                "Unsupported audio codec: {}",
                s
            ))),
        }
    }
}

/// 提取选项
///
/// 传递给提取工具的格式协商参数：目标编码、码率、质量偏好、单条目限制
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// 目标编码（仅 staged 变体实际转码；stream 变体保留源编码）
    pub codec: AudioCodec,
    /// 目标码率（kbps），用于转码后处理
    pub bitrate_kbps: u32,
    /// 是否选择最佳音质（yt-dlp audio-quality 0）
    pub best_quality: bool,
    /// 禁止播放列表展开，只处理单个条目
    pub no_playlist: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            codec: AudioCodec::Mp3,
            bitrate_kbps: 192,
            best_quality: true,
            no_playlist: true,
        }
    }
}

/// 提取结果
///
/// 请求级瞬态数据：响应发送后即丢弃，不缓存、不落盘
#[derive(Debug, Clone)]
pub struct ExtractedAudio {
    /// 音频字节（container 原样，无二次编码）
    pub data: Vec<u8>,
    /// MIME 类型（魔数探测或按扩展名推断）
    pub mime_type: String,
    /// 源标题（如可用）
    pub source_title: Option<String>,
}

/// Media Extractor Port
///
/// 外部提取/下载工具的抽象接口
#[async_trait]
pub trait MediaExtractorPort: Send + Sync {
    /// 将源 URL 解析为音频字节
    ///
    /// 内部完成解析、下载、以及（按实现）转码；调用方只拿到最终字节
    async fn extract_audio(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<ExtractedAudio, ExtractError>;

    /// 检查提取工具是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_codec_display_roundtrip() {
        for codec in [
            AudioCodec::Mp3,
            AudioCodec::M4a,
            AudioCodec::Opus,
            AudioCodec::Wav,
        ] {
            let parsed = AudioCodec::from_str(&codec.to_string()).unwrap();
            assert_eq!(parsed, codec);
        }
    }

    #[test]
    fn test_codec_aac_alias() {
        assert_eq!(AudioCodec::from_str("AAC").unwrap(), AudioCodec::M4a);
    }

    #[test]
    fn test_codec_unknown_rejected() {
        assert!(AudioCodec::from_str("flac2000").is_err());
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.codec, AudioCodec::Mp3);
        assert_eq!(options.bitrate_kbps, 192);
        assert!(options.no_playlist);
    }
}
