//! 剥离模块：标记剥离与危险协议过滤
pub mod markup_stripper;
pub mod protocol_filter;

pub use self::markup_stripper::MarkupStripper;
pub use self::protocol_filter::ProtocolFilter;
