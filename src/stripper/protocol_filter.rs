//! 危险协议过滤：标记剥离后的第二道处理
//! 大小写不敏感地移除 javascript: / data: / vbscript: 以及 on<word>= 形式的事件赋值

use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::Regex;

static DANGEROUS_PROTOCOL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)javascript:|vbscript:|data:|on[a-z0-9_]+="#).unwrap()
});

/// 危险协议过滤器
pub struct ProtocolFilter;

impl ProtocolFilter {
    /// 移除所有危险协议片段，重复执行直至不再命中
    /// （防止 `javajavascript:script:` 这类拼接在一次移除后重新成形）
    pub fn strip(input: &str) -> Cow<'_, str> {
        let mut current = match DANGEROUS_PROTOCOL_REGEX.replace_all(input, "") {
            Cow::Borrowed(_) => return Cow::Borrowed(input),
            Cow::Owned(stripped) => stripped,
        };

        loop {
            let next = match DANGEROUS_PROTOCOL_REGEX.replace_all(&current, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(stripped) => stripped,
            };
            current = next;
        }

        Cow::Owned(current)
    }

    /// 判断属性值是否携带危险协议，忽略浏览器会跳过的空白与控制字符
    pub fn is_dangerous_value(value: &str) -> bool {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect();
        DANGEROUS_PROTOCOL_REGEX.is_match(&compact)
    }
}
