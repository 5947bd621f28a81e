//! HTML实体转义工具
//! 按调用场景提供三种转义粒度：文本定界符、标识符五字符、属性值

use std::borrow::Cow;

/// HTML实体转义工具
pub struct HtmlEscaper;

impl HtmlEscaper {
    /// 仅转义标签定界符 `<` `>`，用于剥离后的消息文本
    pub fn escape_delimiters(input: &str) -> Cow<'_, str> {
        escape_with(input, |c| match c {
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            _ => None,
        })
    }

    /// 转义五个HTML敏感字符，用于用户名等标识符
    pub fn escape_identifier(input: &str) -> Cow<'_, str> {
        escape_with(input, |c| match c {
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            '&' => Some("&amp;"),
            '"' => Some("&quot;"),
            '\'' => Some("&#x27;"),
            _ => None,
        })
    }

    /// 转义双引号属性值
    pub fn escape_attribute(input: &str) -> Cow<'_, str> {
        escape_with(input, |c| match c {
            '&' => Some("&amp;"),
            '"' => Some("&quot;"),
            '<' => Some("&lt;"),
            '>' => Some("&gt;"),
            _ => None,
        })
    }
}

// 无需转义时零拷贝返回
fn escape_with<F>(input: &str, entity_for: F) -> Cow<'_, str>
where
    F: Fn(char) -> Option<&'static str>,
{
    let Some(first) = input.char_indices().find(|(_, c)| entity_for(*c).is_some()) else {
        return Cow::Borrowed(input);
    };

    let mut escaped = String::with_capacity(input.len() + 16);
    escaped.push_str(&input[..first.0]);
    for c in input[first.0..].chars() {
        match entity_for(c) {
            Some(entity) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_delimiters_only_touches_angle_brackets() {
        assert_eq!(HtmlEscaper::escape_delimiters("a < b > c & \"d\""), "a &lt; b &gt; c & \"d\"");
        assert!(matches!(HtmlEscaper::escape_delimiters("纯文本 & 'quote'"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_identifier_all_five() {
        assert_eq!(
            HtmlEscaper::escape_identifier(r#"<a&b "c" 'd'>"#),
            "&lt;a&amp;b &quot;c&quot; &#x27;d&#x27;&gt;"
        );
        // 仅转义一次
        assert_eq!(HtmlEscaper::escape_identifier("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(HtmlEscaper::escape_attribute(r#"x" onload="y"#), "x&quot; onload=&quot;y");
        assert_eq!(HtmlEscaper::escape_attribute("it's"), "it's");
    }
}
