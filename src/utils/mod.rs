//! 工具模块：提供通用工具函数
pub mod html_escape;

pub use self::html_escape::HtmlEscaper;
