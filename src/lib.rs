//! chatguard - 聊天内容安全处理库
//! 消息正文标记剥离、URL协议白名单、用户名转义与XSS攻击特征检测，全部为无状态纯函数

// 导出全局错误类型
pub use self::error::{ChatGuardError, GuardResult};

// 导出配置模块
pub use self::config::{SanitizerConfig, ConfigManager, CustomConfigBuilder};

// 导出输入抽象
pub use self::input::MaybeText;

// 导出剥离模块核心接口
pub use self::stripper::{MarkupStripper, ProtocolFilter};

// 导出净化模块核心接口（含无需构造实例的简化接口）
pub use self::sanitizer::{
    ContentSanitizer,
    UrlValidator,
    IdentifierSanitizer,
    ALLOWED_URL_SCHEMES,
    sanitize_message_content,
    sanitize_url,
    sanitize_username,
};

// 导出检测模块核心接口
pub use self::detector::{
    XssDetector, XssSignature, SignatureKind, ScanReport, detect_xss_attempt,
};

// 导出分段模块核心接口
pub use self::segmenter::{MessageSegment, MessageSegmenter};

// 导出工具模块核心接口
pub use self::utils::HtmlEscaper;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod input;
pub mod stripper;
pub mod sanitizer;
pub mod detector;
pub mod segmenter;
pub mod utils;
