// ==========================================
// 课表同步系统 - 跨系统匹配器
// ==========================================
// 职责: 按规范化业务键联接 BEST 关系集与 SOPHIA 行集
// 保证: 每条输入恰好落入一个分区, 无行被静默丢弃
// 约束: 键不完整的行单独返回, 绝不参与联接 (避免 null=null 假阳性)
// ==========================================

use crate::domain::{AuthoritativeRelation, SecondarySlot, SlotKey};
use crate::engine::normalizer::canonical_key;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ==========================================
// MatchResult - 行分类 (标签联合)
// ==========================================

/// 单个键的匹配结果
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// 两侧均存在
    Matched {
        relation: AuthoritativeRelation,
        slots: Vec<SecondarySlot>,
    },
    /// 仅 BEST 存在 (插入候选)
    BestOnly { relation: AuthoritativeRelation },
    /// 仅 SOPHIA 存在 (NO_BEST_DATA 候选)
    SophiaOnly {
        key: SlotKey,
        slots: Vec<SecondarySlot>,
    },
    /// BEST 键不完整
    IncompleteBest { relation: AuthoritativeRelation },
    /// SOPHIA 键不完整
    IncompleteSophia { slot: SecondarySlot },
}

// ==========================================
// MatchPartition - 匹配输出分区
// ==========================================

/// 匹配器输出; 五个分区合计覆盖全部输入行
#[derive(Debug, Clone, Default)]
pub struct MatchPartition {
    pub matched: Vec<(AuthoritativeRelation, Vec<SecondarySlot>)>,
    pub best_only: Vec<AuthoritativeRelation>,
    pub sophia_only: Vec<(SlotKey, Vec<SecondarySlot>)>,
    pub incomplete_best: Vec<AuthoritativeRelation>,
    pub incomplete_sophia: Vec<SecondarySlot>,
}

impl MatchPartition {
    /// 展平为逐键分类列表 (报表用)
    pub fn into_results(self) -> Vec<MatchResult> {
        let mut results = Vec::new();
        for (relation, slots) in self.matched {
            results.push(MatchResult::Matched { relation, slots });
        }
        for relation in self.best_only {
            results.push(MatchResult::BestOnly { relation });
        }
        for (key, slots) in self.sophia_only {
            results.push(MatchResult::SophiaOnly { key, slots });
        }
        for relation in self.incomplete_best {
            results.push(MatchResult::IncompleteBest { relation });
        }
        for slot in self.incomplete_sophia {
            results.push(MatchResult::IncompleteSophia { slot });
        }
        results
    }

    /// 分区覆盖的 BEST 关系总数
    pub fn relation_count(&self) -> usize {
        self.matched.len() + self.best_only.len() + self.incomplete_best.len()
    }

    /// 分区覆盖的 SOPHIA 行总数
    pub fn slot_count(&self) -> usize {
        self.matched.iter().map(|(_, s)| s.len()).sum::<usize>()
            + self.sophia_only.iter().map(|(_, s)| s.len()).sum::<usize>()
            + self.incomplete_sophia.len()
    }
}

// ==========================================
// CrossSystemMatcher - 匹配引擎
// ==========================================

// 无状态引擎
pub struct CrossSystemMatcher;

impl CrossSystemMatcher {
    pub fn new() -> Self {
        Self
    }

    /// 联接 BEST 关系集与 SOPHIA 行集
    ///
    /// 联接前两侧键列均通过 canonical_key 收敛为同一字符串形式,
    /// 数值样式 ("123" / "123.0" / 123) 统一为整数字符串;
    /// 组间按键排序, 组内保持快照插入顺序。
    ///
    /// SOPHIA 的联接键不含课程: 同 (学科, 学生组) 键下跨课程的多条
    /// BEST 关系先做教师并集, 再整体联接, 分类结果与输入顺序无关。
    pub fn match_slots(
        &self,
        relations: Vec<AuthoritativeRelation>,
        slots: Vec<SecondarySlot>,
    ) -> MatchPartition {
        let mut partition = MatchPartition::default();

        // SOPHIA 侧: 先分离不完整键, 再按规范键分组 (保持插入顺序)
        let mut sophia_groups: BTreeMap<(String, String), Vec<SecondarySlot>> = BTreeMap::new();
        for slot in slots {
            if !slot.key().is_complete() {
                partition.incomplete_sophia.push(slot);
                continue;
            }
            let key = (
                canonical_key(&slot.discipline_code),
                canonical_key(&slot.group_name),
            );
            sophia_groups.entry(key).or_default().push(slot);
        }

        // BEST 侧: 分离不完整键, 同键关系跨课程合并
        let mut best_groups: BTreeMap<(String, String), AuthoritativeRelation> = BTreeMap::new();
        for relation in relations {
            if !relation.key.is_complete() {
                partition.incomplete_best.push(relation);
                continue;
            }
            let key = (
                canonical_key(&relation.key.discipline_code),
                canonical_key(&relation.key.group_name),
            );
            match best_groups.entry(key) {
                Entry::Occupied(mut entry) => {
                    debug!(
                        discipline = %relation.key.discipline_code,
                        group = %relation.key.group_name,
                        course = %relation.key.course_code,
                        "同键关系跨课程合并"
                    );
                    merge_relation(entry.get_mut(), relation);
                }
                Entry::Vacant(entry) => {
                    entry.insert(relation);
                }
            }
        }

        // 逐键查找对应的 SOPHIA 组
        for (key, relation) in best_groups {
            match sophia_groups.remove(&key) {
                Some(group_slots) => {
                    debug!(
                        discipline = %key.0,
                        group = %key.1,
                        n_horario = group_slots.len(),
                        "匹配成功"
                    );
                    partition.matched.push((relation, group_slots));
                }
                None => partition.best_only.push(relation),
            }
        }

        // 剩余的 SOPHIA 组没有任何 BEST 关系命中
        for ((discipline, group), group_slots) in sophia_groups {
            partition
                .sophia_only
                .push((SlotKey::new(discipline, group), group_slots));
        }

        info!(
            matched = partition.matched.len(),
            best_only = partition.best_only.len(),
            sophia_only = partition.sophia_only.len(),
            incomplete_best = partition.incomplete_best.len(),
            incomplete_sophia = partition.incomplete_sophia.len(),
            "跨系统匹配完成"
        );
        partition
    }
}

impl Default for CrossSystemMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// 同一 (学科, 学生组) 键下两条关系的教师并集 (排序去重)
///
/// 键沿用先到关系的课程代码; DSD 随并集长度同步变化。
fn merge_relation(into: &mut AuthoritativeRelation, other: AuthoritativeRelation) {
    let codes: BTreeSet<String> = into
        .teacher_accounting_codes
        .drain(..)
        .chain(other.teacher_accounting_codes)
        .collect();
    into.teacher_accounting_codes = codes.into_iter().collect();

    let names: BTreeSet<String> = into
        .teacher_names
        .drain(..)
        .chain(other.teacher_names)
        .collect();
    into.teacher_names = names.into_iter().collect();

    let ids: BTreeSet<i64> = into
        .teacher_ids
        .drain(..)
        .chain(other.teacher_ids)
        .collect();
    into.teacher_ids = ids.into_iter().collect();
}
