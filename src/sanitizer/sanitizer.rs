//! 内容净化器：组合标记剥离、URL校验、用户名净化
//! 净化器由调用方显式构造并传递，不依赖全局单例
use crate::config::SanitizerConfig;
use crate::error::GuardResult;
use crate::input::MaybeText;
use crate::stripper::MarkupStripper;

use super::identifier::IdentifierSanitizer;
use super::url_validator::UrlValidator;

/// 内容净化器
#[derive(Debug, Clone, Default)]
pub struct ContentSanitizer {
    stripper: MarkupStripper,
    url_validator: UrlValidator,
    identifier: IdentifierSanitizer,
}

impl ContentSanitizer {
    /// 创建净化器；配置只作用于消息正文，URL与用户名始终使用最严格策略
    pub fn new(config: SanitizerConfig) -> Self {
        Self {
            stripper: MarkupStripper::new(config),
            url_validator: UrlValidator::new(),
            identifier: IdentifierSanitizer::new(),
        }
    }

    /// 消息正文使用的剥离器
    pub fn stripper(&self) -> &MarkupStripper {
        &self.stripper
    }

    /// 净化消息正文，空值返回空串
    pub fn sanitize_message_content<T: MaybeText + ?Sized>(&self, content: &T) -> String {
        content
            .non_empty_text()
            .map(|text| self.stripper.strip(text))
            .unwrap_or_default()
    }

    /// 净化URL，不通过返回 None
    pub fn sanitize_url<T: MaybeText + ?Sized>(&self, url: &T) -> Option<String> {
        self.url_validator.sanitize(url)
    }

    /// 校验URL并给出拒绝原因
    pub fn validate_url<'a>(&self, url: &'a str) -> GuardResult<&'a str> {
        self.url_validator.validate(url)
    }

    /// 净化用户名，空值返回空串
    pub fn sanitize_username<T: MaybeText + ?Sized>(&self, name: &T) -> String {
        self.identifier.sanitize(name)
    }
}

// 对外暴露的简化接口：每次调用构造默认净化器
pub fn sanitize_message_content<T: MaybeText + ?Sized>(content: &T) -> String {
    ContentSanitizer::default().sanitize_message_content(content)
}

pub fn sanitize_url<T: MaybeText + ?Sized>(url: &T) -> Option<String> {
    ContentSanitizer::default().sanitize_url(url)
}

pub fn sanitize_username<T: MaybeText + ?Sized>(name: &T) -> String {
    ContentSanitizer::default().sanitize_username(name)
}
