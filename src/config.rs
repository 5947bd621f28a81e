//! 净化器配置管理，取代动态的选项字典
//! 默认配置即最严格策略：不允许任何标签和属性，仅保留文本

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::GuardResult;

/// 显式禁止的危险标签
pub const DEFAULT_FORBIDDEN_TAGS: &[&str] = &["script", "iframe", "object", "embed", "form", "input"];

/// 显式禁止的危险属性
pub const DEFAULT_FORBIDDEN_ATTRIBUTES: &[&str] = &["onerror", "onload", "onclick", "onmouseover"];

/// 内容整体丢弃的标签（脚本、样式、嵌入文档等）
pub const DEFAULT_CONTENT_DROPPING_TAGS: &[&str] = &[
    "script", "style", "iframe", "noembed", "noframes", "noscript", "plaintext",
    "template", "title", "xmp", "svg", "math", "audio", "video", "head",
];

/// 标记剥离配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    // 允许保留的标签（默认为空）
    pub allowed_tags: HashSet<String>,
    // 允许保留的属性（默认为空）
    pub allowed_attributes: HashSet<String>,
    // 禁止的标签，优先级高于允许列表
    pub forbidden_tags: HashSet<String>,
    // 禁止的属性，优先级高于允许列表
    pub forbidden_attributes: HashSet<String>,
    // 被移除元素是否保留其文本内容
    pub keep_text_content: bool,
    // 内容整体丢弃的标签
    pub content_dropping_tags: HashSet<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            allowed_tags: HashSet::new(),
            allowed_attributes: HashSet::new(),
            forbidden_tags: to_name_set(DEFAULT_FORBIDDEN_TAGS),
            forbidden_attributes: to_name_set(DEFAULT_FORBIDDEN_ATTRIBUTES),
            keep_text_content: true,
            content_dropping_tags: to_name_set(DEFAULT_CONTENT_DROPPING_TAGS),
        }
    }
}

impl SanitizerConfig {
    /// 从JSON字符串加载配置，缺省字段取默认值
    pub fn from_json(json: &str) -> GuardResult<Self> {
        let config: SanitizerConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// 从JSON文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> GuardResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// 标签是否允许保留（禁止列表优先）
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag) && !self.forbidden_tags.contains(tag)
    }

    /// 属性是否允许保留，事件处理属性始终拒绝
    pub fn allows_attribute(&self, attr: &str) -> bool {
        self.allowed_attributes.contains(attr)
            && !self.forbidden_attributes.contains(attr)
            && !attr.starts_with("on")
    }

    /// 标签内容是否整体丢弃
    pub fn drops_content_of(&self, tag: &str) -> bool {
        self.content_dropping_tags.contains(tag)
    }

    // HTML分词器输出的标签名均为小写，配置统一小写后再比较
    fn normalized(self) -> Self {
        Self {
            allowed_tags: lowercase_set(self.allowed_tags),
            allowed_attributes: lowercase_set(self.allowed_attributes),
            forbidden_tags: lowercase_set(self.forbidden_tags),
            forbidden_attributes: lowercase_set(self.forbidden_attributes),
            keep_text_content: self.keep_text_content,
            content_dropping_tags: lowercase_set(self.content_dropping_tags),
        }
    }
}

fn to_name_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn lowercase_set(names: HashSet<String>) -> HashSet<String> {
    names.into_iter().map(|name| name.to_ascii_lowercase()).collect()
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> SanitizerConfig {
        SanitizerConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: SanitizerConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_tag(mut self, tag: &str) -> Self {
        self.config.allowed_tags.insert(tag.to_ascii_lowercase());
        self
    }

    pub fn allow_attribute(mut self, attr: &str) -> Self {
        self.config.allowed_attributes.insert(attr.to_ascii_lowercase());
        self
    }

    pub fn forbid_tag(mut self, tag: &str) -> Self {
        self.config.forbidden_tags.insert(tag.to_ascii_lowercase());
        self
    }

    pub fn forbid_attribute(mut self, attr: &str) -> Self {
        self.config.forbidden_attributes.insert(attr.to_ascii_lowercase());
        self
    }

    pub fn drop_content_of(mut self, tag: &str) -> Self {
        self.config.content_dropping_tags.insert(tag.to_ascii_lowercase());
        self
    }

    pub fn keep_text_content(mut self, keep: bool) -> Self {
        self.config.keep_text_content = keep;
        self
    }

    pub fn build(self) -> SanitizerConfig {
        self.config
    }
}
