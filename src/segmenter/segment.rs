//! 消息片段模型
use serde::Serialize;

/// 净化后消息的渲染片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageSegment {
    // 普通文本（已净化的HTML安全片段）
    Text { text: String },
    // 通过校验的链接，取自净化后的HTML片段（文本中的 `<` `>` 已是实体形式）
    Link { url: String },
    // @提及：username 已净化转义，source 为原文（含 @）
    Mention { username: String, source: String },
}

impl MessageSegment {
    /// 片段在净化后消息中的原文
    pub fn source_text(&self) -> &str {
        match self {
            MessageSegment::Text { text } => text,
            MessageSegment::Link { url } => url,
            MessageSegment::Mention { source, .. } => source,
        }
    }
}
