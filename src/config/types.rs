//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::AudioCodec;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 提取工具配置
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// 音频输出配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 暂存目录配置
    #[serde(default)]
    pub staging: StagingConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 提取变体
///
/// 原始服务存在两个行为分支，哪个是正式路径并不明确，因此两个都保留、
/// 由配置选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
    /// 解析直链后经 HTTP 拉流到内存，不转码
    #[default]
    Stream,
    /// 下载到请求级暂存目录并经 ffmpeg 转码，再读回
    Staged,
}

impl std::fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorMode::Stream => write!(f, "stream"),
            ExtractorMode::Staged => write!(f, "staged"),
        }
    }
}

/// 提取工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// yt-dlp 可执行文件路径（可以是 PATH 中的名字）
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: String,

    /// 提取变体
    #[serde(default)]
    pub mode: ExtractorMode,

    /// 单次提取超时时间（秒），覆盖子进程与直链拉取
    #[serde(default = "default_extract_timeout")]
    pub timeout_secs: u64,

    /// 禁止播放列表展开
    #[serde(default = "default_no_playlist")]
    pub no_playlist: bool,
}

fn default_yt_dlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_extract_timeout() -> u64 {
    300
}

fn default_no_playlist() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: default_yt_dlp_path(),
            mode: ExtractorMode::default(),
            timeout_secs: default_extract_timeout(),
            no_playlist: default_no_playlist(),
        }
    }
}

/// 音频输出配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 目标编码
    /// 可选: mp3, m4a, opus, wav（仅 staged 变体实际转码）
    #[serde(default)]
    pub codec: AudioCodec,

    /// 目标码率（kbps）
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    /// 是否选择最佳音质
    #[serde(default = "default_best_quality")]
    pub best_quality: bool,
}

fn default_bitrate_kbps() -> u32 {
    192
}

fn default_best_quality() -> bool {
    true
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            codec: AudioCodec::Mp3,
            bitrate_kbps: default_bitrate_kbps(),
            best_quality: default_best_quality(),
        }
    }
}

/// 暂存目录配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StagingConfig {
    /// 暂存根目录，None 表示使用系统临时目录
    /// 实际暂存位置始终是其下按请求唯一命名的子目录
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
