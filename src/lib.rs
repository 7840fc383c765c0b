//! Audrip - 音频提取 HTTP 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 应用层 (application/):
//! - Ports: 端口定义（MediaExtractor）
//! - Queries: 查询处理器（DownloadAudio）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（/download-audio、/ping）
//! - Adapters: yt-dlp 提取器（stream / staged 两个变体）+ Fake 测试实现

pub mod application;
pub mod config;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
