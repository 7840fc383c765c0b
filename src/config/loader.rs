//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AUDRIP_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AUDRIP_SERVER__PORT=8080`
/// - `AUDRIP_EXTRACTOR__YT_DLP_PATH=/usr/local/bin/yt-dlp`
/// - `AUDRIP_EXTRACTOR__MODE=staged`
/// - `AUDRIP_AUDIO__CODEC=opus`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("extractor.yt_dlp_path", "yt-dlp")?
        .set_default("extractor.mode", "stream")?
        .set_default("extractor.timeout_secs", 300)?
        .set_default("extractor.no_playlist", true)?
        .set_default("audio.codec", "mp3")?
        .set_default("audio.bitrate_kbps", 192)?
        .set_default("audio.best_quality", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: AUDRIP_
    // 层级分隔符: __ (双下划线)
    // 例如: AUDRIP_EXTRACTOR__MODE=staged
    builder = builder.add_source(
        Environment::with_prefix("AUDRIP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证提取工具路径
    if config.extractor.yt_dlp_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "yt-dlp path cannot be empty".to_string(),
        ));
    }

    // 验证超时
    if config.extractor.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Extraction timeout cannot be 0".to_string(),
        ));
    }

    // 验证码率
    if config.audio.bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "Audio bitrate cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Extractor: {}", config.extractor.yt_dlp_path);
    tracing::info!("Extractor Mode: {}", config.extractor.mode);
    tracing::info!("Extraction Timeout: {}s", config.extractor.timeout_secs);
    tracing::info!("No Playlist: {}", config.extractor.no_playlist);
    tracing::info!("Audio Codec: {}", config.audio.codec);
    tracing::info!("Audio Bitrate: {}kbps", config.audio.bitrate_kbps);
    if let Some(dir) = &config.staging.dir {
        tracing::info!("Staging Dir: {:?}", dir);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ExtractorMode;
    use std::io::Write;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[extractor]\nmode = \"staged\"\ntimeout_secs = 60\n"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.extractor.mode, ExtractorMode::Staged);
        assert_eq!(config.extractor.timeout_secs, 60);
        // 未覆盖的值保持默认
        assert_eq!(config.audio.bitrate_kbps, 192);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_yt_dlp_path() {
        let mut config = AppConfig::default();
        config.extractor.yt_dlp_path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.extractor.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_bitrate() {
        let mut config = AppConfig::default();
        config.audio.bitrate_kbps = 0;
        assert!(validate_config(&config).is_err());
    }
}
