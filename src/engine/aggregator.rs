// ==========================================
// 课表同步系统 - 关系聚合器
// ==========================================
// 职责: 把逐教师×逐学生组的安排行聚合为每业务键一条关系
// 输入: 已通过全部校验标志的 AuthoritativeAssignment
// 输出: AuthoritativeRelation (教师列表排序去重, DSD = ID 数)
// 约束: 先排序再去重, 保证重复运行逐字节一致
// ==========================================

use crate::domain::{AuthoritativeAssignment, AuthoritativeRelation, RelationKey};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

// 无状态引擎
pub struct RelationAggregator;

impl RelationAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 按复合键聚合安排行
    ///
    /// 空输入产出空关系集, 不是错误。
    /// BTreeMap/BTreeSet 同时承担分组与排序去重。
    pub fn aggregate(&self, assignments: &[AuthoritativeAssignment]) -> Vec<AuthoritativeRelation> {
        let mut groups: BTreeMap<RelationKey, (BTreeSet<String>, BTreeSet<String>, BTreeSet<i64>)> =
            BTreeMap::new();

        for row in assignments {
            let key = RelationKey {
                discipline_code: row.discipline_code.clone(),
                discipline_code_raw: row.discipline_code_raw.clone(),
                group_name: row.group_name.clone(),
                course_code: row.course_code.clone(),
            };
            let entry = groups.entry(key).or_default();
            entry.0.insert(row.teacher_accounting_code.clone());
            entry.1.insert(row.teacher_name.clone());
            entry.2.insert(row.teacher_id);
        }

        let relations: Vec<AuthoritativeRelation> = groups
            .into_iter()
            .map(|(key, (codes, names, ids))| AuthoritativeRelation {
                key,
                teacher_accounting_codes: codes.into_iter().collect(),
                teacher_names: names.into_iter().collect(),
                teacher_ids: ids.into_iter().collect(),
            })
            .collect();

        info!(
            rows = assignments.len(),
            relations = relations.len(),
            "关系聚合完成"
        );
        relations
    }
}

impl Default for RelationAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(disc: &str, group: &str, acct: &str, name: &str, id: i64) -> AuthoritativeAssignment {
        AuthoritativeAssignment {
            discipline_code_raw: format!("C{}", disc),
            discipline_code: disc.to_string(),
            group_name: group.to_string(),
            course_code: "LG01".to_string(),
            teacher_accounting_code: acct.to_string(),
            teacher_name: name.to_string(),
            teacher_id: id,
            course_valid: true,
            discipline_valid: true,
            group_valid: true,
            teacher_valid: true,
        }
    }

    #[test]
    fn test_aggregates_by_composite_key() {
        let aggregator = RelationAggregator::new();
        let relations = aggregator.aggregate(&[
            row("101", "T1", "900", "Ana", 11),
            row("101", "T1", "901", "Rui", 12),
            row("101", "T2", "900", "Ana", 11),
        ]);
        assert_eq!(relations.len(), 2);
        let t1 = relations.iter().find(|r| r.key.group_name == "T1").unwrap();
        assert_eq!(t1.dsd(), 2);
        assert_eq!(t1.teacher_ids, vec![11, 12]);
    }

    #[test]
    fn test_duplicates_collapse_and_sort() {
        let aggregator = RelationAggregator::new();
        let relations = aggregator.aggregate(&[
            row("101", "T1", "901", "Rui", 12),
            row("101", "T1", "900", "Ana", 11),
            row("101", "T1", "900", "Ana", 11),
        ]);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].dsd(), 2);
        assert_eq!(relations[0].teacher_accounting_codes, vec!["900", "901"]);
        assert_eq!(relations[0].teacher_names, vec!["Ana", "Rui"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let aggregator = RelationAggregator::new();
        assert!(aggregator.aggregate(&[]).is_empty());
    }
}
