// ==========================================
// 课表同步系统 - 集合差异计算器
// ==========================================
// 职责: 对两个逗号连接的 ID 列表做集合差
// 性质: diff(X, X) == ("", "") — 已对齐数据幂等
// ==========================================

use std::collections::BTreeSet;

/// 视为空集的字面值 (上游导出残留的 NaN/None 形式)
const NONE_LIKE: &[&str] = &["", "nan", "NaN", "<NA>", "None", "none", "null"];

/// 把逗号连接的 ID 字符串解析为集合
///
/// 空值/NaN 样式输入规整为空集; 末尾 ".0" 在分割前剥除。
fn to_set(raw: &str) -> BTreeSet<String> {
    let mut s = raw.trim();
    if NONE_LIKE.contains(&s) {
        return BTreeSet::new();
    }
    if let Some(stripped) = s.strip_suffix(".0") {
        s = stripped;
    }
    s.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && !NONE_LIKE.contains(item))
        .map(|item| item.to_string())
        .collect()
}

/// 计算 (current − target, target − current), 各自排序后逗号连接
///
/// current 为现状 (事件侧), target 为目标 (BEST 侧);
/// 第一个返回值是待移除 ID, 第二个是待新增 ID。
pub fn diff_id_lists(current: &str, target: &str) -> (String, String) {
    let set_current = to_set(current);
    let set_target = to_set(target);

    let to_remove: Vec<String> = set_current.difference(&set_target).cloned().collect();
    let to_add: Vec<String> = set_target.difference(&set_current).cloned().collect();

    (to_remove.join(","), to_add.join(","))
}
