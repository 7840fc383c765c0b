//! Audio Queries - 音频下载查询

/// 下载音频查询
#[derive(Debug, Clone)]
pub struct DownloadAudioQuery {
    /// 源视频 URL
    pub url: String,
}

/// 下载音频响应
///
/// `buffer` 为最终音频字节的标准 base64 编码；解码后与提取工具产出的
/// 字节完全一致（无二次编码）
#[derive(Debug, Clone)]
pub struct DownloadAudioResponse {
    pub buffer: String,
    pub mime_type: String,
    pub byte_len: usize,
}
