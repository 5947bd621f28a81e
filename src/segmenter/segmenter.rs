//! 消息分段器
//! 先净化整条消息，再从净化结果中切出链接与 @提及；
//! 未通过URL校验的链接候选保留为普通文本

use once_cell::sync::Lazy;
use regex::Regex;

use super::segment::MessageSegment;
use crate::input::MaybeText;
use crate::sanitizer::ContentSanitizer;

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://|mailto:)[^\s"'`<>]+"#).unwrap()
});

static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@[\p{L}\p{N}_.\-]+"#).unwrap()
});

/// 链接末尾常见的句读符号，不属于URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']', '}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateKind {
    Link,
    Mention,
}

/// 消息分段器
#[derive(Debug, Clone, Copy)]
pub struct MessageSegmenter<'a> {
    sanitizer: &'a ContentSanitizer,
}

impl<'a> MessageSegmenter<'a> {
    pub fn new(sanitizer: &'a ContentSanitizer) -> Self {
        Self { sanitizer }
    }

    /// 净化并分段；所有片段原文依次拼接等于净化后的消息
    pub fn segment<T: MaybeText + ?Sized>(&self, content: &T) -> Vec<MessageSegment> {
        let sanitized = self.sanitizer.sanitize_message_content(content);
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (start, end, kind) in Self::candidates(&sanitized) {
            if start < cursor {
                continue;
            }

            let source = &sanitized[start..end];
            let segment = match kind {
                CandidateKind::Link => self
                    .sanitizer
                    .sanitize_url(source)
                    .map(|url| MessageSegment::Link { url }),
                CandidateKind::Mention => {
                    let username = self.sanitizer.sanitize_username(&source[1..]);
                    (!username.is_empty()).then(|| MessageSegment::Mention {
                        username,
                        source: source.to_string(),
                    })
                }
            };
            let Some(segment) = segment else {
                continue;
            };

            push_text(&mut segments, &sanitized[cursor..start]);
            segments.push(segment);
            cursor = end;
        }

        push_text(&mut segments, &sanitized[cursor..]);
        segments
    }

    /// 收集候选区间（按起始位置排序）
    fn candidates(text: &str) -> Vec<(usize, usize, CandidateKind)> {
        let mut candidates = Vec::new();

        for m in LINK_REGEX.find_iter(text) {
            let trimmed = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if !trimmed.is_empty() {
                candidates.push((m.start(), m.start() + trimmed.len(), CandidateKind::Link));
            }
        }

        for m in MENTION_REGEX.find_iter(text) {
            // 只认行首或空白之后的 @，排除邮箱等
            let preceded_ok = text[..m.start()]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace);
            let trimmed = m.as_str().trim_end_matches(['.', '-']);
            if preceded_ok && trimmed.len() > 1 {
                candidates.push((m.start(), m.start() + trimmed.len(), CandidateKind::Mention));
            }
        }

        candidates.sort_by_key(|(start, _, _)| *start);
        candidates
    }
}

// 相邻文本片段合并
fn push_text(segments: &mut Vec<MessageSegment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(MessageSegment::Text { text: last }) => last.push_str(text),
        _ => segments.push(MessageSegment::Text { text: text.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(raw: &str) -> Vec<MessageSegment> {
        let sanitizer = ContentSanitizer::default();
        MessageSegmenter::new(&sanitizer).segment(raw)
    }

    fn text(s: &str) -> MessageSegment {
        MessageSegment::Text { text: s.to_string() }
    }

    #[test]
    fn test_plain_message_single_segment() {
        assert_eq!(segment("just text"), vec![text("just text")]);
        assert!(segment("").is_empty());
        assert!(segment("<script>x</script>").is_empty());
    }

    #[test]
    fn test_links_and_mentions() {
        let segments = segment("hi @alice, see https://example.com/a?b=1. thanks");
        assert_eq!(
            segments,
            vec![
                text("hi "),
                MessageSegment::Mention { username: "alice".to_string(), source: "@alice".to_string() },
                text(", see "),
                MessageSegment::Link { url: "https://example.com/a?b=1".to_string() },
                text(". thanks"),
            ]
        );
    }

    #[test]
    fn test_rejected_link_stays_text() {
        assert_eq!(segment("broken http:// link"), vec![text("broken http:// link")]);
        assert_eq!(segment("broken https://[bad link"), vec![text("broken https://[bad link")]);
    }

    #[test]
    fn test_email_is_not_mention() {
        assert_eq!(segment("mail bob@example.com"), vec![text("mail bob@example.com")]);
        let segments = segment("mailto:bob@example.com");
        assert_eq!(segments, vec![MessageSegment::Link { url: "mailto:bob@example.com".to_string() }]);
    }

    #[test]
    fn test_markup_removed_before_segmenting() {
        let segments = segment("<b>@田中</b> <a href=\"javascript:x\">https://example.com</a>");
        assert_eq!(
            segments,
            vec![
                MessageSegment::Mention { username: "田中".to_string(), source: "@田中".to_string() },
                text(" "),
                MessageSegment::Link { url: "https://example.com".to_string() },
            ]
        );
    }

    #[test]
    fn test_sources_concatenate_to_sanitized() {
        let sanitizer = ContentSanitizer::default();
        let segmenter = MessageSegmenter::new(&sanitizer);
        for raw in [
            "a @b c https://x.org d",
            "@start and end@ and @",
            "1 < 2 @x https://y.io/<z>",
            "line\r\n@next http://a.b/c)",
        ] {
            let joined: String = segmenter.segment(raw).iter().map(|s| s.source_text()).collect();
            assert_eq!(joined, sanitizer.sanitize_message_content(raw));
        }
    }

    #[test]
    fn test_link_taken_from_sanitized_fragment() {
        // 链接内容与净化结果一致，而非原始输入
        let segments = segment("go https://y.io/<z>");
        assert_eq!(
            segments,
            vec![
                text("go "),
                MessageSegment::Link { url: "https://y.io/&lt;z&gt".to_string() },
                text(";"),
            ]
        );
    }

    #[test]
    fn test_segment_json_shape() {
        let json = serde_json::to_value(MessageSegment::Link { url: "https://a.b".to_string() }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "link", "url": "https://a.b"}));
    }
}
