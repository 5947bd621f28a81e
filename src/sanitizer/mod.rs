//! 净化模块：消息正文、URL、用户名
pub mod identifier;
pub mod sanitizer;
pub mod url_validator;

// 导出核心接口
pub use self::identifier::IdentifierSanitizer;
pub use self::sanitizer::{
    ContentSanitizer,
    sanitize_message_content,
    sanitize_url,
    sanitize_username,
};
pub use self::url_validator::{UrlValidator, ALLOWED_URL_SCHEMES};
