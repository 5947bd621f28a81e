//! XSS攻击特征模型
//! 固定有序的特征表，按顺序匹配，首个命中即判定

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::GuardResult;

/// 特征类别
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    ScriptBlock,        // <script ...>...</script>
    JavascriptProtocol, // javascript:
    EventHandler,       // on<identifier>=
    IframeTag,          // <iframe
    ObjectTag,          // <object
    EmbedTag,           // <embed
    EvalCall,           // eval(
    CssExpression,      // expression(
    Custom(String),     // 监控侧追加的自定义特征
}

impl SignatureKind {
    /// 特征名称（用于审计日志与报告）
    pub fn name(&self) -> &str {
        match self {
            SignatureKind::ScriptBlock => "script_block",
            SignatureKind::JavascriptProtocol => "javascript_protocol",
            SignatureKind::EventHandler => "event_handler",
            SignatureKind::IframeTag => "iframe_tag",
            SignatureKind::ObjectTag => "object_tag",
            SignatureKind::EmbedTag => "embed_tag",
            SignatureKind::EvalCall => "eval_call",
            SignatureKind::CssExpression => "css_expression",
            SignatureKind::Custom(name) => name.as_str(),
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String), // 包含匹配（忽略大小写，存储小写形式）
    Regex(Regex),     // 正则匹配
}

impl Matcher {
    /// 简单匹配判断
    pub fn is_match(&self, input: &str) -> bool {
        match self {
            Matcher::Contains(needle) => input.to_lowercase().contains(needle.as_str()),
            Matcher::Regex(regex) => regex.is_match(input),
        }
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        match self {
            Matcher::Contains(needle) => needle.as_str(),
            Matcher::Regex(r) => r.as_str(),
        }
    }
}

/// 单条攻击特征
#[derive(Debug, Clone)]
pub struct XssSignature {
    pub kind: SignatureKind,
    pub matcher: Matcher,
}

impl XssSignature {
    /// 忽略大小写的子串特征
    pub fn contains(kind: SignatureKind, needle: &str) -> Self {
        Self {
            kind,
            matcher: Matcher::Contains(needle.to_lowercase()),
        }
    }

    /// 正则特征
    pub fn regex(kind: SignatureKind, pattern: &str) -> GuardResult<Self> {
        Ok(Self {
            kind,
            matcher: Matcher::Regex(Regex::new(pattern)?),
        })
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.matcher.is_match(input)
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }
}

/// 默认特征表（顺序即匹配优先级）
pub static DEFAULT_SIGNATURES: Lazy<Vec<XssSignature>> = Lazy::new(|| {
    vec![
        XssSignature::regex(SignatureKind::ScriptBlock, r#"(?is)<script\b[^>]*>.*?</script\s*>"#).unwrap(),
        XssSignature::contains(SignatureKind::JavascriptProtocol, "javascript:"),
        XssSignature::regex(SignatureKind::EventHandler, r#"(?i)on[a-z0-9_]+\s*="#).unwrap(),
        XssSignature::contains(SignatureKind::IframeTag, "<iframe"),
        XssSignature::contains(SignatureKind::ObjectTag, "<object"),
        XssSignature::contains(SignatureKind::EmbedTag, "<embed"),
        XssSignature::regex(SignatureKind::EvalCall, r#"(?i)eval\s*\("#).unwrap(),
        XssSignature::regex(SignatureKind::CssExpression, r#"(?i)expression\s*\("#).unwrap(),
    ]
});
