//! yt-dlp 子进程公共部分
//!
//! 两个提取变体共享的参数拼装、子进程执行、stderr 归类与元数据解析

use serde::Deserialize;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{ExtractError, ExtractOptions};

/// yt-dlp 的格式选择表达式（音频优先，带兜底）
pub(crate) const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";

/// yt-dlp `--print-json` 输出中本服务关心的字段
///
/// 其余字段（格式列表、字幕等）直接忽略
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MediaMetadata {
    /// 协商后的媒体直链（`-j` 模式下指向所选 format）
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// 所选 format 的容器扩展名
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
}

impl MediaMetadata {
    pub fn parse(stdout: &[u8]) -> Result<Self, ExtractError> {
        // `--print-json` 输出单行 JSON；取最后一个非空行以跳过可能的进度输出
        let text = String::from_utf8_lossy(stdout);
        let line = text
            .lines()
            .rev()
            .find(|l| l.trim_start().starts_with('{'))
            .ok_or_else(|| {
                ExtractError::ExtractionFailed("yt-dlp produced no JSON metadata".to_string())
            })?;

        serde_json::from_str(line).map_err(|e| {
            ExtractError::ExtractionFailed(format!("Failed to parse yt-dlp metadata: {}", e))
        })
    }
}

/// yt-dlp 子进程执行器
#[derive(Debug, Clone)]
pub(crate) struct YtdlpRunner {
    yt_dlp_path: String,
    timeout_secs: u64,
}

impl YtdlpRunner {
    pub fn new(yt_dlp_path: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            timeout_secs,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// 执行 yt-dlp 并收集输出，超时或退出码非零时归类为 ExtractError
    pub async fn run(&self, args: &[String]) -> Result<Output, ExtractError> {
        tracing::debug!(path = %self.yt_dlp_path, ?args, "Running yt-dlp");

        let mut command = Command::new(&self.yt_dlp_path);
        command.args(args).kill_on_drop(true);

        let output = tokio::time::timeout(Duration::from_secs(self.timeout_secs), command.output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout_secs))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractError::ToolNotFound(self.yt_dlp_path.clone())
                } else {
                    ExtractError::IoError(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                exit_code = ?output.status.code(),
                stderr = %stderr.lines().take(5).collect::<Vec<_>>().join(" | "),
                "yt-dlp failed"
            );
            return Err(classify_failure(&stderr, output.status.code()));
        }

        Ok(output)
    }

    /// 工具可用性检查（`--version`）
    pub async fn version_check(&self) -> bool {
        let args = vec!["--version".to_string()];
        match self.run(&args).await {
            Ok(output) => !output.stdout.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "yt-dlp version check failed");
                false
            }
        }
    }
}

/// 两个变体共用的基础参数
pub(crate) fn base_args(url: &str, options: &ExtractOptions) -> Vec<String> {
    let mut args = vec![
        "--no-warnings".to_string(),
        "--no-progress".to_string(),
        "-f".to_string(),
        AUDIO_FORMAT_SELECTOR.to_string(),
    ];
    if options.no_playlist {
        args.push("--no-playlist".to_string());
    }
    args.push(url.to_string());
    args
}

/// 按 stderr 内容归类失败原因
pub(crate) fn classify_failure(stderr: &str, exit_code: Option<i32>) -> ExtractError {
    let first_line = stderr
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unknown error")
        .to_string();

    if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
        return ExtractError::InvalidUrl(first_line);
    }
    if stderr.contains("Video unavailable")
        || stderr.contains("Private video")
        || stderr.contains("This video is not available")
        || stderr.contains("HTTP Error 404")
    {
        return ExtractError::SourceUnavailable(first_line);
    }
    if stderr.contains("ffprobe and ffmpeg not found") || stderr.contains("ffmpeg not found") {
        return ExtractError::ToolNotFound("ffmpeg".to_string());
    }
    if stderr.contains("Unable to download")
        || stderr.contains("Connection refused")
        || stderr.contains("Temporary failure in name resolution")
        || stderr.contains("timed out")
    {
        return ExtractError::NetworkError(first_line);
    }

    ExtractError::ExtractionFailed(format!(
        "yt-dlp exited with code {:?}: {}",
        exit_code, first_line
    ))
}

/// 按魔数探测音频 MIME 类型
pub(crate) fn detect_audio_mime(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }

    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("audio/webm");
    }
    if &data[4..8] == b"ftyp" {
        return Some("audio/mp4");
    }
    if data.starts_with(b"ID3") || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0) {
        return Some("audio/mpeg");
    }
    if data.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    if data.starts_with(b"fLaC") {
        return Some("audio/flac");
    }
    if data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some("audio/wav");
    }

    None
}

/// 按容器扩展名推断 MIME 类型（魔数探测失败时的兜底）
pub(crate) fn mime_from_ext(ext: &str) -> &'static str {
    match ext {
        "m4a" | "mp4" => "audio/mp4",
        "webm" => "audio/webm",
        "mp3" => "audio/mpeg",
        "opus" | "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}
