//! Extractor Adapters - MediaExtractorPort 的具体实现
//!
//! 原始服务存在两个行为分支（直链拉流 / 暂存转码），由配置选择；
//! FakeExtractor 供测试使用

mod fake;
mod staged;
mod stream;
mod ytdlp;

pub use fake::{FakeExtractor, FakeExtractorConfig};
pub use staged::{StagedExtractorConfig, StagedYtdlpExtractor};
pub use stream::{StreamExtractorConfig, StreamYtdlpExtractor};
