//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod media_extractor;

pub use media_extractor::{
    AudioCodec, ExtractError, ExtractOptions, ExtractedAudio, MediaExtractorPort,
};
