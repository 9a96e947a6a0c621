// ==========================================
// 行位对账引擎 - 标签核心
// ==========================================
// 职责: 逐组执行贪心稳定指派
// 规则: 现任教师已在 BEST 集合中的行永远 Keep (指派稳定性),
//       其余 BEST 教师按编号升序依次填入剩余行
// ==========================================

use crate::domain::{
    AuthoritativeRelation, GroupStatus, ReconciledGroup, ReconciledSlot, SecondarySlot, SlotKey,
    SlotLabel, SlotOrder,
};
use crate::engine::matcher::MatchPartition;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

// ==========================================
// ReconcileOptions - 对账参数
// ==========================================

/// 对账行为参数 (迭代顺序是显式参数, 不依赖容器偶然顺序)
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub slot_order: SlotOrder,
}

// ==========================================
// SlotReconciler - 对账引擎
// ==========================================

// 无状态引擎
pub struct SlotReconciler;

impl SlotReconciler {
    pub fn new() -> Self {
        Self
    }

    /// 对整个匹配分区执行对账
    ///
    /// - matched 组按 DSD/NHorario 状态机打标签
    /// - best_only 组 (NHorario=0) 的全部教师进入插入通道
    /// - sophia_only 组标记 NO_BEST_DATA, 行保持现任教师不动
    ///
    /// 不完整键分区不参与, 由调用方单独报告。
    pub fn reconcile(
        &self,
        partition: &MatchPartition,
        options: &ReconcileOptions,
    ) -> Vec<ReconciledGroup> {
        let mut groups = Vec::new();

        for (relation, slots) in &partition.matched {
            groups.push(self.label_group(relation, slots.clone(), options.slot_order));
        }

        for relation in &partition.best_only {
            // 没有任何既有行: 全部教师等待插入
            let key = SlotKey::new(
                relation.key.discipline_code.clone(),
                relation.key.group_name.clone(),
            );
            debug!(key = %key.dimensao(), dsd = relation.dsd(), "BEST 关系无对应 SOPHIA 行");
            groups.push(ReconciledGroup {
                key,
                dsd: relation.dsd(),
                n_horario: 0,
                status: GroupStatus::DsdGreater,
                slots: Vec::new(),
                unplaced_teacher_ids: relation.teacher_ids.clone(),
            });
        }

        for (key, slots) in &partition.sophia_only {
            // 权威侧无数据: 终态, 不尝试任何改派, 留待人工调查
            warn!(key = %key.dimensao(), n_horario = slots.len(), "NO_BEST_DATA: SOPHIA 键在 BEST 中不存在");
            groups.push(ReconciledGroup {
                key: key.clone(),
                dsd: 0,
                n_horario: slots.len(),
                status: GroupStatus::NoBestData,
                slots: slots
                    .iter()
                    .map(|slot| ReconciledSlot {
                        slot: slot.clone(),
                        label: SlotLabel::Keep,
                    })
                    .collect(),
                unplaced_teacher_ids: Vec::new(),
            });
        }

        info!(groups = groups.len(), "行位对账完成");
        groups
    }

    /// 单组标签算法 (贪心、顺序稳定的二部指派)
    fn label_group(
        &self,
        relation: &AuthoritativeRelation,
        mut slots: Vec<SecondarySlot>,
        order: SlotOrder,
    ) -> ReconciledGroup {
        let dsd = relation.dsd();
        let n_horario = slots.len();
        let status = GroupStatus::from_counts(dsd, n_horario);

        if order == SlotOrder::ByTime {
            slots.sort_by_key(|s| (s.weekday, s.start, s.teacher_id));
        }

        let authoritative: BTreeSet<i64> = relation.teacher_ids.iter().copied().collect();

        // 第一遍: 现任教师命中 BEST 集合的行锁定为 Keep
        let kept: BTreeSet<i64> = slots
            .iter()
            .filter(|s| authoritative.contains(&s.teacher_id))
            .map(|s| s.teacher_id)
            .collect();

        // 待指派教师 = BEST 集合 − 已保留的现任教师, 升序
        let mut remaining: Vec<i64> = authoritative.difference(&kept).copied().collect();
        remaining.reverse(); // pop 从尾部取, 反转后保持升序指派

        let key = SlotKey::new(
            relation.key.discipline_code.clone(),
            relation.key.group_name.clone(),
        );

        let labeled: Vec<ReconciledSlot> = slots
            .into_iter()
            .map(|slot| {
                let label = if dsd == 0 {
                    // 零需求例外: 没有任何 BEST 教师要求时, 行不视为失配
                    SlotLabel::Keep
                } else if authoritative.contains(&slot.teacher_id) {
                    SlotLabel::Keep
                } else if let Some(id) = remaining.pop() {
                    SlotLabel::Assign(id)
                } else {
                    SlotLabel::Unassigned
                };
                ReconciledSlot { slot, label }
            })
            .collect();

        // 指派完既有行后仍剩余的教师进入插入通道
        remaining.reverse();
        let unplaced_teacher_ids = remaining;

        let unassigned = labeled
            .iter()
            .filter(|s| s.label == SlotLabel::Unassigned)
            .count();
        if unassigned > 0 {
            warn!(
                key = %key.dimensao(),
                dsd,
                n_horario,
                unassigned,
                "超额 SOPHIA 行没有可派教师 (仅记录, 不删除)"
            );
        }
        if !unplaced_teacher_ids.is_empty() {
            debug!(
                key = %key.dimensao(),
                unplaced = unplaced_teacher_ids.len(),
                "BEST 教师待插入新行"
            );
        }

        ReconciledGroup {
            key,
            dsd,
            n_horario,
            status,
            slots: labeled,
            unplaced_teacher_ids,
        }
    }
}

impl Default for SlotReconciler {
    fn default() -> Self {
        Self::new()
    }
}
