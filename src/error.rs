//! 全局错误类型定义
//! 对外的四个净化/检测接口从不返回错误，这里的错误只在内部或可失败的辅助接口中流转

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum ChatGuardError {
    // URL校验相关错误
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("不允许的URL协议：{0}")]
    DisallowedScheme(String),
    #[error("URL包含不安全字符：{0}")]
    UnsafeUrl(String),

    // 特征编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 配置加载相关错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),

    // 基础错误
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type GuardResult<T> = Result<T, ChatGuardError>;
