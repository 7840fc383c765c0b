//! Application State
//!
//! 显式构造、依赖注入的应用状态（不使用进程级单例）

use std::sync::Arc;

use crate::application::{DownloadAudioHandler, ExtractOptions, MediaExtractorPort};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub extractor: Arc<dyn MediaExtractorPort>,

    // ========== Query Handlers ==========
    pub download_audio_handler: DownloadAudioHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(extractor: Arc<dyn MediaExtractorPort>, options: ExtractOptions) -> Self {
        Self {
            extractor: extractor.clone(),
            download_audio_handler: DownloadAudioHandler::new(extractor, options),
        }
    }
}
