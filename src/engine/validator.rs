// ==========================================
// 课表同步系统 - 参照校验引擎
// ==========================================
// 职责: 用四张参照表校验 BEST 安排行并回填教师数字编号
// 输入: 展开后的 AuthoritativeAssignment + ReferenceData
// 输出: (valid, invalid) 两个分区; invalid 行原样保留, 绝不丢弃
// ==========================================

use crate::domain::AuthoritativeAssignment;
use crate::engine::normalizer::{canonical_key, secondary_discipline_code};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

// ==========================================
// ReferenceData - 参照表集合
// ==========================================

/// 校验所需的参照数据, 构造时统一走键规整
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    course_codes: HashSet<String>,
    discipline_codes: HashSet<String>,
    group_names: HashSet<String>,
    /// 会计编号 -> 教师数字编号 (NContabilistico -> CdDocente)
    teacher_ids: HashMap<String, i64>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course_code(&mut self, code: &str) {
        self.course_codes.insert(canonical_key(code));
    }

    /// 学科参照与事件侧使用同一前缀剥离规则, 两侧对称
    pub fn add_discipline_code(&mut self, code: &str) {
        self.discipline_codes
            .insert(canonical_key(&secondary_discipline_code(code)));
    }

    pub fn add_group_name(&mut self, name: &str) {
        self.group_names.insert(canonical_key(name));
    }

    pub fn add_teacher(&mut self, accounting_code: &str, teacher_id: i64) {
        self.teacher_ids.insert(canonical_key(accounting_code), teacher_id);
    }

    pub fn teacher_id_for(&self, accounting_code: &str) -> Option<i64> {
        self.teacher_ids.get(&canonical_key(accounting_code)).copied()
    }
}

// ==========================================
// ReferenceValidator - 校验引擎
// ==========================================

// 无状态引擎, 参照数据通过参数传入
pub struct ReferenceValidator;

impl ReferenceValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验全部安排行并按四个标志切分
    ///
    /// # 返回
    /// (全部标志通过的行, 任一标志失败的行)
    pub fn validate(
        &self,
        assignments: Vec<AuthoritativeAssignment>,
        reference: &ReferenceData,
    ) -> (Vec<AuthoritativeAssignment>, Vec<AuthoritativeAssignment>) {
        let total = assignments.len();
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for mut row in assignments {
            row.course_valid = reference
                .course_codes
                .contains(&canonical_key(&row.course_code));
            row.discipline_valid = reference
                .discipline_codes
                .contains(&canonical_key(&row.discipline_code));
            row.group_valid = reference
                .group_names
                .contains(&canonical_key(&row.group_name));

            match reference.teacher_id_for(&row.teacher_accounting_code) {
                Some(id) => {
                    row.teacher_id = id;
                    row.teacher_valid = true;
                }
                None => {
                    row.teacher_valid = false;
                }
            }

            if row.is_fully_valid() {
                valid.push(row);
            } else {
                invalid.push(row);
            }
        }

        info!(
            total,
            valid = valid.len(),
            invalid = invalid.len(),
            "参照校验完成"
        );
        if !invalid.is_empty() {
            warn!(count = invalid.len(), "存在未通过参照校验的安排行, 已路由到 invalid 通道");
        }

        (valid, invalid)
    }
}

impl Default for ReferenceValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(disc: &str, group: &str, course: &str, acct: &str) -> AuthoritativeAssignment {
        AuthoritativeAssignment {
            discipline_code_raw: format!("C{}", disc),
            discipline_code: disc.to_string(),
            group_name: group.to_string(),
            course_code: course.to_string(),
            teacher_accounting_code: acct.to_string(),
            teacher_name: "Docente".to_string(),
            teacher_id: 0,
            course_valid: false,
            discipline_valid: false,
            group_valid: false,
            teacher_valid: false,
        }
    }

    fn reference() -> ReferenceData {
        let mut r = ReferenceData::new();
        r.add_course_code("LG01");
        r.add_discipline_code("C101");
        r.add_group_name("T1");
        r.add_teacher("900.0", 77);
        r
    }

    #[test]
    fn test_valid_row_gets_teacher_id() {
        let validator = ReferenceValidator::new();
        let (valid, invalid) = validator.validate(vec![assignment("101", "T1", "LG01", "900")], &reference());
        assert_eq!(invalid.len(), 0);
        assert_eq!(valid.len(), 1);
        assert!(valid[0].is_fully_valid());
        assert_eq!(valid[0].teacher_id, 77);
    }

    #[test]
    fn test_unknown_teacher_routes_to_invalid() {
        let validator = ReferenceValidator::new();
        let (valid, invalid) = validator.validate(vec![assignment("101", "T1", "LG01", "999")], &reference());
        assert!(valid.is_empty());
        assert_eq!(invalid.len(), 1);
        assert!(!invalid[0].teacher_valid);
        assert!(invalid[0].course_valid);
    }

    #[test]
    fn test_discipline_prefix_symmetry() {
        // 参照表带 'C' 前缀, 事件侧已剥离: 仍须命中
        let validator = ReferenceValidator::new();
        let (valid, _) = validator.validate(vec![assignment("101", "T1", "LG01", "900")], &reference());
        assert!(valid[0].discipline_valid);
    }
}
