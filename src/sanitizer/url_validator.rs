//! URL校验器
//! 只接受或拒绝，从不改写：通过校验的URL与输入完全一致

use tracing::debug;
use url::Url;

use crate::error::{ChatGuardError, GuardResult};
use crate::input::MaybeText;
use crate::stripper::MarkupStripper;

/// 允许的URL协议
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// 可能打断 href 属性值的字符
const ATTRIBUTE_BREAKERS: &[char] = &['"', '\'', '`', '<', '>'];

/// URL校验器
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    // 固定使用空允许列表的剥离器做交叉校验
    stripper: MarkupStripper,
}

impl UrlValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验URL，返回拒绝原因
    pub fn validate<'a>(&self, url: &'a str) -> GuardResult<&'a str> {
        if url.is_empty() {
            return Err(ChatGuardError::InvalidInput("URL为空".to_string()));
        }

        // 1. 必须是可解析的绝对URL
        let parsed = Url::parse(url)?;

        // 2. 协议白名单
        if !ALLOWED_URL_SCHEMES.contains(&parsed.scheme()) {
            return Err(ChatGuardError::DisallowedScheme(parsed.scheme().to_string()));
        }

        // 3. 属性值逃逸字符、空白与控制字符
        if url
            .chars()
            .any(|c| ATTRIBUTE_BREAKERS.contains(&c) || c.is_whitespace() || c.is_control())
        {
            return Err(ChatGuardError::UnsafeUrl(url.to_string()));
        }

        // 4. 剥离前后不一致说明夹带了标记或危险片段
        if self.stripper.strip(url) != url {
            return Err(ChatGuardError::UnsafeUrl(url.to_string()));
        }

        Ok(url)
    }

    /// 净化URL：通过返回原串，否则返回 None
    pub fn sanitize<T: MaybeText + ?Sized>(&self, url: &T) -> Option<String> {
        let url = url.non_empty_text()?;
        match self.validate(url) {
            Ok(accepted) => Some(accepted.to_string()),
            Err(e) => {
                debug!("URL被拒绝：{}", e);
                None
            }
        }
    }
}
