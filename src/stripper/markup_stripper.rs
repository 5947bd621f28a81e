//! 标记剥离器
//! 基于 html5ever 分词器逐个处理标记：丢弃元素，保留文本内容，
//! 脚本/样式等元素的内容整体丢弃，最后再做一次危险协议过滤

use std::cell::{Cell, RefCell};
use html5ever::LocalName;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use html5ever::tokenizer::states::RawKind;
use markup5ever::interface::Attribute;
use tendril::StrTendril;
use tracing::debug;

use super::protocol_filter::ProtocolFilter;
use crate::config::SanitizerConfig;
use crate::utils::HtmlEscaper;

/// 无内容的空元素，不参与嵌套计数
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// 剥离过程中产出的片段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    // 仅在配置允许标签时出现
    Markup(String),
}

/// 标记剥离器
#[derive(Debug, Clone, Default)]
pub struct MarkupStripper {
    config: SanitizerConfig,
}

impl MarkupStripper {
    /// 创建剥离器
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// 剥离标记，返回不含元素的HTML片段
    ///
    /// 源文本中的字符引用不解码，文本中残留的 `<` `>` 写为 `&lt;` `&gt;`，
    /// 默认配置下对同一输入重复剥离结果不变。
    pub fn strip(&self, input: &str) -> String {
        let mut fragment = String::with_capacity(input.len());
        for piece in self.tokenize(input) {
            match piece {
                Piece::Text(text) => fragment.push_str(&HtmlEscaper::escape_delimiters(&text)),
                Piece::Markup(markup) => fragment.push_str(&markup),
            }
        }
        ProtocolFilter::strip(&fragment).into_owned()
    }

    /// 剥离标记，仅返回文本内容（不做定界符转义）
    pub fn strip_to_text(&self, input: &str) -> String {
        let text: String = self
            .tokenize(input)
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Text(text) => Some(text),
                Piece::Markup(_) => None,
            })
            .collect();
        ProtocolFilter::strip(&text).into_owned()
    }

    fn tokenize(&self, input: &str) -> Vec<Piece> {
        if input.is_empty() {
            return Vec::new();
        }

        let prepared = PreparedInput::new(input);
        let opts = TokenizerOpts {
            discard_bom: false,
            ..TokenizerOpts::default()
        };
        let tokenizer = Tokenizer::new(StripSink::new(&self.config), opts);
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(prepared.source.as_str()));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        let sink = tokenizer.sink;
        let removed = sink.removed_count.get();
        if removed > 0 {
            debug!("标记剥离完成，移除元素{}个", removed);
        }

        sink.pieces
            .into_inner()
            .into_iter()
            .map(|piece| match piece {
                Piece::Text(text) => Piece::Text(prepared.restore(text)),
                Piece::Markup(markup) => Piece::Markup(prepared.restore(markup)),
            })
            .collect()
    }
}

/// 送入分词器前的输入
struct PreparedInput {
    source: String,
    cr_mapped: bool,
}

impl PreparedInput {
    fn new(input: &str) -> Self {
        // 分词器会把 \r 规范化为 \n；输入不含换页符时借 \x0C 占位保留回车
        let cr_mapped = input.contains('\r') && !input.contains('\x0C');
        let mut source = String::with_capacity(input.len() + 16);
        for c in input.chars() {
            match c {
                // 字符引用保持原样，不解码
                '&' => source.push_str("&amp;"),
                '\r' if cr_mapped => source.push('\x0C'),
                _ => source.push(c),
            }
        }
        Self { source, cr_mapped }
    }

    fn restore(&self, text: String) -> String {
        if self.cr_mapped && text.contains('\x0C') {
            text.replace('\x0C', "\r")
        } else {
            text
        }
    }
}

/// 分词结果接收器
struct StripSink<'a> {
    config: &'a SanitizerConfig,
    pieces: RefCell<Vec<Piece>>,
    // 正在整体丢弃的元素及其同名嵌套深度
    dropping: RefCell<Option<(LocalName, usize)>>,
    // 已打开但被移除的元素栈
    removed_open: RefCell<Vec<LocalName>>,
    removed_count: Cell<usize>,
}

impl TokenSink for StripSink<'_> {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => self.handle_tag(tag),
            Token::CharacterTokens(text) => {
                self.push_text(&text);
                TokenSinkResult::Continue
            }
            Token::NullCharacterToken => {
                self.push_text("\0");
                TokenSinkResult::Continue
            }
            // 注释、文档类型声明、解析错误均丢弃
            _ => TokenSinkResult::Continue,
        }
    }
}

impl<'a> StripSink<'a> {
    fn new(config: &'a SanitizerConfig) -> Self {
        Self {
            config,
            pieces: RefCell::new(Vec::new()),
            dropping: RefCell::new(None),
            removed_open: RefCell::new(Vec::new()),
            removed_count: Cell::new(0),
        }
    }

    fn handle_tag(&self, tag: Tag) -> TokenSinkResult<()> {
        if self.consume_dropped(&tag) {
            return TokenSinkResult::Continue;
        }

        match tag.kind {
            TagKind::StartTag => self.handle_start_tag(&tag),
            TagKind::EndTag => {
                self.handle_end_tag(&tag.name);
                TokenSinkResult::Continue
            }
        }
    }

    /// 处于整体丢弃的元素内部时吞掉标签，并维护同名嵌套深度
    fn consume_dropped(&self, tag: &Tag) -> bool {
        let mut dropping = self.dropping.borrow_mut();
        let Some((name, depth)) = dropping.as_mut() else {
            return false;
        };

        if tag.name == *name {
            match tag.kind {
                TagKind::StartTag if !tag.self_closing => *depth += 1,
                TagKind::StartTag => {}
                TagKind::EndTag => *depth -= 1,
            }
        }
        if *depth == 0 {
            *dropping = None;
        }
        true
    }

    fn handle_start_tag(&self, tag: &Tag) -> TokenSinkResult<()> {
        let name: &str = &tag.name;
        let next_state = content_state(name);
        let is_void = VOID_ELEMENTS.contains(&name);
        // 原始文本类元素的自闭合标记无效，浏览器仍会进入对应状态
        let opens_element = !is_void && !(tag.self_closing && next_state.is_none());

        if opens_element && self.config.drops_content_of(name) {
            self.removed_count.set(self.removed_count.get() + 1);
            *self.dropping.borrow_mut() = Some((tag.name.clone(), 1));
            return next_state.unwrap_or(TokenSinkResult::Continue);
        }

        if self.config.allows_tag(name) {
            self.push_markup(self.render_start_tag(tag));
        } else {
            self.removed_count.set(self.removed_count.get() + 1);
            if opens_element {
                self.removed_open.borrow_mut().push(tag.name.clone());
            }
        }

        next_state.unwrap_or(TokenSinkResult::Continue)
    }

    fn handle_end_tag(&self, name: &LocalName) {
        if self.config.allows_tag(name) {
            self.push_markup(format!("</{}>", &**name));
            return;
        }

        // 只关闭栈中同名的元素，连同其内部未关闭的元素一并弹出；孤立的结束标签忽略
        let mut open = self.removed_open.borrow_mut();
        if let Some(index) = open.iter().rposition(|open_name| open_name == name) {
            open.truncate(index);
        }
    }

    /// 重新生成允许保留的开始标签，只带允许的属性
    fn render_start_tag(&self, tag: &Tag) -> String {
        let mut markup = format!("<{}", &*tag.name);
        for attr in tag.attrs.iter().filter(|attr| self.keeps_attribute(attr)) {
            markup.push(' ');
            markup.push_str(&attr.name.local);
            markup.push_str("=\"");
            markup.push_str(&HtmlEscaper::escape_attribute(&attr.value));
            markup.push('"');
        }
        markup.push('>');
        markup
    }

    fn keeps_attribute(&self, attr: &Attribute) -> bool {
        self.config.allows_attribute(&attr.name.local) && !ProtocolFilter::is_dangerous_value(&attr.value)
    }

    fn push_text(&self, text: &str) {
        if self.dropping.borrow().is_some() {
            return;
        }
        if !self.config.keep_text_content && !self.removed_open.borrow().is_empty() {
            return;
        }

        let mut pieces = self.pieces.borrow_mut();
        match pieces.last_mut() {
            Some(Piece::Text(last)) => last.push_str(text),
            _ => pieces.push(Piece::Text(text.to_string())),
        }
    }

    fn push_markup(&self, markup: String) {
        self.pieces.borrow_mut().push(Piece::Markup(markup));
    }
}

/// 需要切换分词状态的元素，与浏览器解析保持一致
fn content_state(name: &str) -> Option<TokenSinkResult<()>> {
    match name {
        "script" => Some(TokenSinkResult::RawData(RawKind::ScriptData)),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(TokenSinkResult::RawData(RawKind::Rawtext)),
        "textarea" | "title" => Some(TokenSinkResult::RawData(RawKind::Rcdata)),
        "plaintext" => Some(TokenSinkResult::Plaintext),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;

    fn strip(input: &str) -> String {
        MarkupStripper::default().strip(input)
    }

    #[test]
    fn test_keeps_text_drops_tags() {
        assert_eq!(strip("<div><b>Bold text</b></div>"), "Bold text");
        assert_eq!(strip("<p>Hello <i>world</i>!</p>"), "Hello world!");
        assert_eq!(strip("a<br>b<hr/>c"), "abc");
    }

    #[test]
    fn test_drops_script_content() {
        assert_eq!(strip(r#"<script>alert("hack")</script>Hello"#), "Hello");
        assert_eq!(strip("<SCRIPT type=\"text/javascript\">var a = '<b>x</b>';</SCRIPT>ok"), "ok");
        assert_eq!(strip("<style>body { color: red }</style>text"), "text");
        assert_eq!(strip("<iframe src=\"https://evil\"><b>inner</b></iframe>after"), "after");
        assert_eq!(strip("<script/>hidden</script>shown"), "shown");
        assert_eq!(strip("<plaintext>everything <b>after</b>"), "");
    }

    #[test]
    fn test_nested_dropped_elements() {
        assert_eq!(strip("<svg><svg>a</svg>b</svg>c"), "c");
        assert_eq!(strip("<template><p>x</p></template>y"), "y");
    }

    #[test]
    fn test_drops_dangerous_attributes_and_elements() {
        assert_eq!(strip(r#"<img src="x" onerror="alert('XSS')">"#), "");
        assert_eq!(strip(r#"<div onclick="alert('XSS')">Click me</div>"#), "Click me");
        assert_eq!(strip(r#"<a href="javascript:alert(1)">link</a>"#), "link");
        assert_eq!(strip("<form action=\"/x\"><input value=\"v\">Send</form>"), "Send");
        assert_eq!(strip("<object data=\"x.swf\">fallback</object><embed src=\"y\">"), "fallback");
    }

    #[test]
    fn test_drops_comments_and_doctype() {
        assert_eq!(strip("<!DOCTYPE html><!-- secret -->visible"), "visible");
        assert_eq!(strip("a<!-- <script>alert(1)</script> -->b"), "ab");
    }

    #[test]
    fn test_protocol_pass_on_plain_text() {
        assert_eq!(strip("javascript:alert(1)"), "alert(1)");
        assert_eq!(strip("see DATA:text/html and VBScript:x"), "see text/html and x");
        assert_eq!(strip("onclick=alert(1)"), "alert(1)");
        // 标签移除后拼接出的协议同样被过滤
        assert_eq!(strip("java<b></b>script:alert(1)"), "alert(1)");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let samples = [
            "Normal message with 日本語",
            "中文消息，含标点！",
            "emoji 🎉🚀 and spaces   \t tabs",
            "Tom & Jerry; 5 = 5",
            "line1\r\nline2\rline3\n",
            "nul\0byte",
            "\u{FEFF}bom first",
            "a && b; x=1; &amp; stays &lt;literal&gt;",
        ];
        for sample in samples {
            assert_eq!(strip(sample), sample, "样本被修改：{:?}", sample);
        }
    }

    #[test]
    fn test_stray_delimiters_are_escaped() {
        assert_eq!(strip("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(strip("<<b>script>"), "&lt;script&gt;");
        assert_eq!(strip("trailing <"), "trailing &lt;");
    }

    #[test]
    fn test_idempotent() {
        let corpus = [
            "<div><b>Bold text</b></div>",
            "<<b>script>alert(1)<</b>/script>",
            "&lt;script&gt;",
            "java<b></b>script:javascript:x",
            "<textarea><b>kept</b></textarea>",
            "x\r\n<p>y</p>\r",
            "<a href='data:text/html,<script>alert(1)</script>'>z</a>",
            "onon<i></i>click=click=",
            "1 < 2 and 3 > 2",
        ];
        for input in corpus {
            let once = strip(input);
            assert_eq!(strip(&once), once, "不满足幂等：{:?}", input);
            assert!(!once.contains('<') && !once.contains('>'));
        }
    }

    #[test]
    fn test_rcdata_content_kept_as_text() {
        assert_eq!(strip("<textarea><b>kept</b></textarea>"), "&lt;b&gt;kept&lt;/b&gt;");
        assert_eq!(strip("<title>dropped</title>body"), "body");
    }

    #[test]
    fn test_strip_to_text_does_not_escape() {
        let stripper = MarkupStripper::default();
        assert_eq!(stripper.strip_to_text("<b>1 < 2</b>"), "1 < 2");
        assert_eq!(stripper.strip_to_text("a&b"), "a&b");
        assert_eq!(stripper.strip_to_text(""), "");
    }

    #[test]
    fn test_allowed_tags_are_reemitted() {
        let config = ConfigManager::custom()
            .allow_tag("b")
            .allow_tag("a")
            .allow_attribute("title")
            .allow_attribute("href")
            .build();
        let stripper = MarkupStripper::new(config);

        assert_eq!(
            stripper.strip(r#"<b title="x&y" onclick="y">hi</b><i>there</i>"#),
            r#"<b title="x&amp;y">hi</b>there"#
        );
        assert_eq!(stripper.strip(r#"<a href="java&#x09;script:alert(1)">x</a>"#), r#"<a href="java&amp;#x09;script:alert(1)">x</a>"#);
        assert_eq!(stripper.strip(r#"<a href=" javascript:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(stripper.strip(r#"<a href="https://example.com">x</a>"#), r#"<a href="https://example.com">x</a>"#);
        // 禁止列表中的标签即使被允许也不会输出
        assert_eq!(stripper.strip("<b><script>x</script></b>"), "<b></b>");
    }

    #[test]
    fn test_drop_text_of_removed_elements() {
        let config = ConfigManager::custom()
            .allow_tag("b")
            .keep_text_content(false)
            .build();
        let stripper = MarkupStripper::new(config);
        assert_eq!(stripper.strip("<div>hidden</div>visible<b>bold</b>"), "visible<b>bold</b>");
        assert_eq!(stripper.strip("<div><span>deep</span>still</div>out"), "out");
        // 不匹配的结束标签不会提前结束被移除的元素
        assert_eq!(stripper.strip("<div>a</p>secret</div>c"), "c");
        assert_eq!(stripper.strip("<div><span>a</div>b"), "b");
        assert_eq!(stripper.strip("</div>x<i>y</span>z</i>w"), "xw");
    }
}
