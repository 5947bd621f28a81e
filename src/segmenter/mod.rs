//! 分段模块：把净化后的消息切分为文本、链接、@提及
pub mod segment;
pub mod segmenter;

pub use self::segment::MessageSegment;
pub use self::segmenter::MessageSegmenter;
