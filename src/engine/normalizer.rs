// ==========================================
// 课表同步系统 - 键规整器
// ==========================================
// 职责: 把两侧异构的标识符规整为可比较的规范形式
// 约束: 纯函数, 永不报错; 解析失败一律退化为最保守的单值解释
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 学科代码规整
// ==========================================

/// 去掉 BEST 学科代码的字母前缀, 得到 SOPHIA 的纯数字编号
///
/// 例: "C1042" -> "1042"; 已是纯数字的代码原样返回。
/// 原始形式由调用方另存为 discipline_code_raw 以便追溯。
pub fn secondary_discipline_code(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped: &str = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if stripped.is_empty() {
        // 全字母代码无法映射, 保留原值让下游匹配自然失配
        trimmed.to_string()
    } else {
        stripped.to_string()
    }
}

// ==========================================
// 键列规范化
// ==========================================

/// 把键列值收敛为统一的字符串形式
///
/// "123" / "123.0" / " 123 " 收敛为 "123"; 非数值形式仅去首尾空白。
/// 两侧使用同一函数, 保证失配只会是 "匹配不上" 而不是 "匹配错"。
pub fn canonical_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
            return format!("{}", f as i64);
        }
    }
    trimmed.to_string()
}

/// 规整教师编号为数字 ID; 无法解析时返回 None
pub fn canonical_teacher_id(raw: &str) -> Option<i64> {
    let canonical = canonical_key(raw);
    canonical.parse::<i64>().ok()
}

// ==========================================
// ParsedList - 防御性列表解析
// ==========================================

/// 列表字段的解析结果; fallback 为 true 表示解析失败后按单值处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedList {
    pub items: Vec<String>,
    pub fallback: bool,
}

impl ParsedList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 解析列表编码的字符串字段 (序列化的列表字面量或逗号连接)
///
/// - `"['A', 'B']"` -> ["A", "B"]
/// - `"A,B"`        -> ["A", "B"]
/// - `"A"`          -> ["A"]
/// - 空串/纯空白    -> []
/// - 括号不配对等畸形输入 -> 整串作为单元素 (fallback = true)
pub fn parse_list_field(raw: &str) -> ParsedList {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedList {
            items: Vec::new(),
            fallback: false,
        };
    }

    if trimmed.starts_with('[') {
        if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            let items: Vec<String> = inner
                .split(',')
                .map(|part| part.trim().trim_matches('\'').trim_matches('"').trim())
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect();
            return ParsedList {
                items,
                fallback: false,
            };
        }
        // 形似列表但无法解析: 退化为单元素
        return ParsedList {
            items: vec![trimmed.to_string()],
            fallback: true,
        };
    }

    if trimmed.contains(',') {
        let items: Vec<String> = trimmed
            .split(',')
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect();
        return ParsedList {
            items,
            fallback: false,
        };
    }

    ParsedList {
        items: vec![trimmed.to_string()],
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_discipline_code_strips_prefix() {
        assert_eq!(secondary_discipline_code("C1042"), "1042");
        assert_eq!(secondary_discipline_code("1042"), "1042");
        assert_eq!(secondary_discipline_code(" C77 "), "77");
        // 全字母代码保持原样
        assert_eq!(secondary_discipline_code("ABC"), "ABC");
    }

    #[test]
    fn test_canonical_key_collapses_float_forms() {
        assert_eq!(canonical_key("123"), "123");
        assert_eq!(canonical_key("123.0"), "123");
        assert_eq!(canonical_key(" 123 "), "123");
        assert_eq!(canonical_key("T1"), "T1");
        assert_eq!(canonical_key(""), "");
        // 带小数部分的值不是 ID, 仅去空白
        assert_eq!(canonical_key("1.5"), "1.5");
    }

    #[test]
    fn test_canonical_teacher_id() {
        assert_eq!(canonical_teacher_id("456.0"), Some(456));
        assert_eq!(canonical_teacher_id("456"), Some(456));
        assert_eq!(canonical_teacher_id("n/a"), None);
    }

    #[test]
    fn test_parse_list_literal() {
        let parsed = parse_list_field("['T1', 'T2']");
        assert_eq!(parsed.items, vec!["T1", "T2"]);
        assert!(!parsed.fallback);
    }

    #[test]
    fn test_parse_comma_joined_and_scalar() {
        assert_eq!(parse_list_field("A,B").items, vec!["A", "B"]);
        assert_eq!(parse_list_field("A").items, vec!["A"]);
        assert!(parse_list_field("  ").items.is_empty());
    }

    #[test]
    fn test_parse_malformed_degrades_to_single_value() {
        let parsed = parse_list_field("['T1'");
        assert_eq!(parsed.items, vec!["['T1'"]);
        assert!(parsed.fallback);
    }
}
