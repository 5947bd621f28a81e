//! XSS攻击检测器：按特征表顺序分类文本
//! 与净化流程相互独立，净化始终执行，检测结果只用于测试、审计与监控
use std::borrow::Cow;
use tracing::debug;

use super::report::ScanReport;
use super::signature::{DEFAULT_SIGNATURES, SignatureKind, XssSignature};
use crate::error::GuardResult;
use crate::input::MaybeText;

/// XSS攻击检测器
#[derive(Debug, Clone)]
pub struct XssDetector {
    signatures: Cow<'static, [XssSignature]>,
}

impl Default for XssDetector {
    fn default() -> Self {
        Self {
            signatures: Cow::Borrowed(DEFAULT_SIGNATURES.as_slice()),
        }
    }
}

impl XssDetector {
    /// 使用默认特征表创建检测器
    pub fn new() -> Self {
        Self::default()
    }

    /// 在默认特征表之后追加自定义特征（名称, 正则）
    pub fn with_custom_patterns(patterns: &[(&str, &str)]) -> GuardResult<Self> {
        let mut signatures = DEFAULT_SIGNATURES.to_vec();
        for (name, pattern) in patterns {
            signatures.push(XssSignature::regex(SignatureKind::Custom(name.to_string()), pattern)?);
        }
        debug!("检测器特征表加载完成，共{}条特征", signatures.len());

        Ok(Self {
            signatures: Cow::Owned(signatures),
        })
    }

    /// 当前特征表
    pub fn signatures(&self) -> &[XssSignature] {
        &self.signatures
    }

    /// 是否包含攻击特征；空值返回 false
    pub fn detect<T: MaybeText + ?Sized>(&self, content: &T) -> bool {
        self.first_match(content).is_some()
    }

    /// 首个命中的特征
    pub fn first_match<T: MaybeText + ?Sized>(&self, content: &T) -> Option<&XssSignature> {
        let text = content.non_empty_text()?;
        let hit = self.signatures.iter().find(|signature| signature.is_match(text));
        if let Some(signature) = hit {
            debug!("检测到XSS特征：{}，规则={}", signature.name(), signature.matcher.describe());
        }
        hit
    }

    /// 全部命中的特征（按特征表顺序），用于审计报告
    pub fn scan<T: MaybeText + ?Sized>(&self, content: &T) -> ScanReport {
        let Some(text) = content.non_empty_text() else {
            return ScanReport::clean();
        };

        let matched: Vec<String> = self
            .signatures
            .iter()
            .filter(|signature| signature.is_match(text))
            .map(|signature| signature.name().to_string())
            .collect();

        if !matched.is_empty() {
            debug!("XSS扫描命中{}条特征：{:?}", matched.len(), matched);
        }
        ScanReport::from_matches(matched)
    }
}

// 对外暴露的简化接口
pub fn detect_xss_attempt<T: MaybeText + ?Sized>(content: &T) -> bool {
    XssDetector::default().detect(content)
}
