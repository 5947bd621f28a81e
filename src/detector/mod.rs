//! 检测模块：XSS攻击特征检测
pub mod signature;
pub mod detector;
pub mod report;

// 导出核心接口
pub use self::signature::{SignatureKind, Matcher, XssSignature, DEFAULT_SIGNATURES};
pub use self::detector::{XssDetector, detect_xss_attempt};
pub use self::report::ScanReport;
