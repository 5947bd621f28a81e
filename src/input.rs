//! 输入抽象：容忍“可能不是字符串”的输入
//! 空值、JSON null、数字、对象等一律视为“无文本”，由调用方返回默认值

use std::borrow::Cow;
use serde_json::Value;

/// 可能携带文本的输入
pub trait MaybeText {
    /// 取出文本；非字符串输入返回 None
    fn raw_text(&self) -> Option<&str>;

    /// 取出非空文本
    fn non_empty_text(&self) -> Option<&str> {
        self.raw_text().filter(|s| !s.is_empty())
    }
}

impl MaybeText for str {
    fn raw_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl MaybeText for String {
    fn raw_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl MaybeText for Cow<'_, str> {
    fn raw_text(&self) -> Option<&str> {
        Some(self.as_ref())
    }
}

impl MaybeText for Value {
    fn raw_text(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl<T: MaybeText> MaybeText for Option<T> {
    fn raw_text(&self) -> Option<&str> {
        self.as_ref().and_then(|inner| inner.raw_text())
    }
}

impl<T: MaybeText + ?Sized> MaybeText for &T {
    fn raw_text(&self) -> Option<&str> {
        (**self).raw_text()
    }
}
