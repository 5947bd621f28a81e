//! 标识符（用户名）净化
//! 先剥离全部标记，再对结果做五字符实体转义；每个 `&` 只转义一次

use crate::input::MaybeText;
use crate::stripper::MarkupStripper;
use crate::utils::HtmlEscaper;

/// 用户名净化器
#[derive(Debug, Clone, Default)]
pub struct IdentifierSanitizer {
    stripper: MarkupStripper,
}

impl IdentifierSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 净化用户名，结果可直接插入元素文本或带引号的属性值
    pub fn sanitize<T: MaybeText + ?Sized>(&self, name: &T) -> String {
        let Some(name) = name.non_empty_text() else {
            return String::new();
        };
        let text = self.stripper.strip_to_text(name);
        HtmlEscaper::escape_identifier(&text).into_owned()
    }
}
