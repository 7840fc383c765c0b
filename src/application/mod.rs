//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MediaExtractor）
//! - queries: 查询及处理器
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queries;

pub use error::ApplicationError;

pub use ports::{AudioCodec, ExtractError, ExtractOptions, ExtractedAudio, MediaExtractorPort};

pub use queries::{
    handlers::DownloadAudioHandler, DownloadAudioQuery, DownloadAudioResponse,
};
