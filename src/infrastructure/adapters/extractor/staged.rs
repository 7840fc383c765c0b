//! Staged Extractor - 暂存文件变体
//!
//! 实现 MediaExtractorPort trait：yt-dlp 下载到请求级唯一暂存目录，并经
//! ffmpeg 后处理转码到目标编码，随后读回字节。TempDir 在任意退出路径上
//! 随 drop 删除，并发请求互不可见，不存在共享文件名竞争

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::application::ports::{
    AudioCodec, ExtractError, ExtractOptions, ExtractedAudio, MediaExtractorPort,
};

use super::ytdlp::{base_args, MediaMetadata, YtdlpRunner};

/// 暂存目录内的固定输出名；目录本身按请求唯一
const OUTPUT_STEM: &str = "audio";

/// Staged Extractor 配置
#[derive(Debug, Clone)]
pub struct StagedExtractorConfig {
    /// yt-dlp 可执行文件路径
    pub yt_dlp_path: String,
    /// 下载 + 转码的超时时间（秒）
    pub timeout_secs: u64,
    /// 暂存根目录，None 表示系统临时目录
    pub staging_root: Option<PathBuf>,
}

impl Default for StagedExtractorConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            timeout_secs: 300,
            staging_root: None,
        }
    }
}

/// 暂存文件提取器
pub struct StagedYtdlpExtractor {
    runner: YtdlpRunner,
    staging_root: Option<PathBuf>,
}

impl StagedYtdlpExtractor {
    /// 创建新的暂存提取器
    pub fn new(config: StagedExtractorConfig) -> Self {
        Self {
            runner: YtdlpRunner::new(config.yt_dlp_path, config.timeout_secs),
            staging_root: config.staging_root,
        }
    }

    /// 创建请求级暂存目录
    fn create_staging_dir(&self) -> Result<TempDir, ExtractError> {
        let builder_result = match &self.staging_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                tempfile::Builder::new().prefix("audrip-").tempdir_in(root)
            }
            None => tempfile::Builder::new().prefix("audrip-").tempdir(),
        };
        builder_result.map_err(|e| {
            ExtractError::IoError(format!("Failed to create staging dir: {}", e))
        })
    }

    /// 在暂存目录中定位产出文件
    ///
    /// 优先目标编码的扩展名；个别源 ffmpeg 会保留原始容器，兜底扫描
    /// `audio.*`
    fn find_output_file(dir: &Path, codec: AudioCodec) -> Result<PathBuf, ExtractError> {
        let expected = dir.join(format!("{}.{}", OUTPUT_STEM, codec));
        if expected.exists() {
            return Ok(expected);
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_output = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s == OUTPUT_STEM)
                .unwrap_or(false);
            if path.is_file() && is_output {
                return Ok(path);
            }
        }

        Err(ExtractError::ExtractionFailed(
            "yt-dlp reported success but no staged output file was found".to_string(),
        ))
    }
}

#[async_trait]
impl MediaExtractorPort for StagedYtdlpExtractor {
    async fn extract_audio(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<ExtractedAudio, ExtractError> {
        // 请求级暂存目录：唯一命名，函数返回时连同内容一并删除
        let staging = self.create_staging_dir()?;
        let output_template = staging
            .path()
            .join(format!("{}.%(ext)s", OUTPUT_STEM))
            .to_string_lossy()
            .into_owned();

        let quality = if options.best_quality {
            "0".to_string()
        } else {
            format!("{}K", options.bitrate_kbps)
        };

        let mut args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            options.codec.to_string(),
            "--audio-quality".to_string(),
            quality,
            "--no-part".to_string(),
            "--force-overwrites".to_string(),
            "--print-json".to_string(),
            "-o".to_string(),
            output_template,
        ];
        args.extend(base_args(url, options));

        let output = self.runner.run(&args).await?;

        // 元数据解析失败不致命：标题只是附带信息
        let title = MediaMetadata::parse(&output.stdout)
            .ok()
            .and_then(|m| m.title);

        let audio_path = Self::find_output_file(staging.path(), options.codec)?;
        let data = tokio::fs::read(&audio_path)
            .await
            .map_err(|e| ExtractError::IoError(format!("Failed to read staged file: {}", e)))?;

        if data.is_empty() {
            return Err(ExtractError::EmptyAudio);
        }

        tracing::info!(
            byte_len = data.len(),
            staged_file = %audio_path.display(),
            codec = %options.codec,
            "Staged extraction completed"
        );

        Ok(ExtractedAudio {
            mime_type: options.codec.mime_type().to_string(),
            data,
            source_title: title,
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
        let config = StagedExtractorConfig::default();
        assert_eq!(config.yt_dlp_path, "yt-dlp");
        assert!(config.staging_root.is_none());
    }

    #[test]
    fn test_find_output_file_exact_codec() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.mp3"), b"x").unwrap();

        let found = StagedYtdlpExtractor::find_output_file(dir.path(), AudioCodec::Mp3).unwrap();
        assert_eq!(found, dir.path().join("audio.mp3"));
    }

    #[test]
    fn test_find_output_file_fallback_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.m4a"), b"x").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), b"y").unwrap();

        let found = StagedYtdlpExtractor::find_output_file(dir.path(), AudioCodec::Mp3).unwrap();
        assert_eq!(found, dir.path().join("audio.m4a"));
    }

    #[test]
    fn test_find_output_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            StagedYtdlpExtractor::find_output_file(dir.path(), AudioCodec::Mp3).unwrap_err();
        assert!(matches!(err, ExtractError::ExtractionFailed(_)));
    }

    #[test]
    fn test_staging_dirs_are_unique_per_request() {
        let root = tempfile::tempdir().unwrap();
        let extractor = StagedYtdlpExtractor::new(StagedExtractorConfig {
            staging_root: Some(root.path().to_path_buf()),
            ..Default::default()
        });

        let a = extractor.create_staging_dir().unwrap();
        let b = extractor.create_staging_dir().unwrap();
        assert_ne!(a.path(), b.path());

        let a_path = a.path().to_path_buf();
        drop(a);
        // drop 即清理
        assert!(!a_path.exists());
        assert!(b.path().exists());
    }
}
