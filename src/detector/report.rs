//! 扫描报告：供审计日志与监控面板使用
use serde::Serialize;

/// XSS扫描报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    // 是否命中任一特征
    pub detected: bool,
    // 命中的特征名称（按特征表顺序）
    pub signatures: Vec<String>,
}

impl ScanReport {
    /// 未命中任何特征
    pub fn clean() -> Self {
        Self {
            detected: false,
            signatures: Vec::new(),
        }
    }

    pub fn from_matches(signatures: Vec<String>) -> Self {
        Self {
            detected: !signatures.is_empty(),
            signatures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = ScanReport::from_matches(vec!["script_block".to_string()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"detected": true, "signatures": ["script_block"]}));
        assert!(!ScanReport::from_matches(Vec::new()).detected);
    }
}
