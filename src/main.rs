//! Audrip - 音频提取 HTTP 服务
//!
//! 接收视频 URL，委托 yt-dlp 完成解析 / 下载 /（可选）转码，
//! 返回 base64 编码的音频 JSON

use std::sync::Arc;

use audrip::application::ports::{ExtractOptions, MediaExtractorPort};
use audrip::config::{load_config, print_config, ExtractorMode};
use audrip::infrastructure::adapters::{
    StagedExtractorConfig, StagedYtdlpExtractor, StreamExtractorConfig, StreamYtdlpExtractor,
};
use audrip::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},audrip={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Audrip - 音频提取 HTTP 服务");
    print_config(&config);

    // 按配置选择提取变体
    let extractor: Arc<dyn MediaExtractorPort> = match config.extractor.mode {
        ExtractorMode::Stream => {
            let stream_config = StreamExtractorConfig {
                yt_dlp_path: config.extractor.yt_dlp_path.clone(),
                timeout_secs: config.extractor.timeout_secs,
            };
            Arc::new(
                StreamYtdlpExtractor::new(stream_config)
                    .map_err(|e| anyhow::anyhow!("Failed to build extractor: {}", e))?,
            )
        }
        ExtractorMode::Staged => {
            let staged_config = StagedExtractorConfig {
                yt_dlp_path: config.extractor.yt_dlp_path.clone(),
                timeout_secs: config.extractor.timeout_secs,
                staging_root: config.staging.dir.clone(),
            };
            Arc::new(StagedYtdlpExtractor::new(staged_config))
        }
    };

    // 启动时探测提取工具，失败只告警不退出（工具可能稍后就位）
    if !extractor.health_check().await {
        tracing::warn!(
            path = %config.extractor.yt_dlp_path,
            "yt-dlp not responding to --version; extraction requests will fail until it is available"
        );
    }

    let options = ExtractOptions {
        codec: config.audio.codec,
        bitrate_kbps: config.audio.bitrate_kbps,
        best_quality: config.audio.best_quality,
        no_playlist: config.extractor.no_playlist,
    };

    // 创建 HTTP 服务器（依赖注入，不使用全局状态）
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(extractor, options);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
