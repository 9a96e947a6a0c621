use super::core::{ReconcileOptions, SlotReconciler};
use super::placement::{synthesize_insert_slots, PlacementPolicy};
use crate::domain::{
    AuthoritativeRelation, GroupStatus, RelationKey, SecondarySlot, SlotKey, SlotLabel, SlotOrder,
    SlotTime,
};
use crate::engine::matcher::MatchPartition;

// ==========================================
// 测试辅助函数
// ==========================================

/// 创建测试用的 BEST 关系
fn relation(disc: &str, group: &str, teacher_ids: &[i64]) -> AuthoritativeRelation {
    AuthoritativeRelation {
        key: RelationKey {
            discipline_code: disc.to_string(),
            discipline_code_raw: format!("C{}", disc),
            group_name: group.to_string(),
            course_code: "LG01".to_string(),
        },
        teacher_accounting_codes: teacher_ids.iter().map(|id| format!("A{}", id)).collect(),
        teacher_names: teacher_ids.iter().map(|id| format!("Docente{}", id)).collect(),
        teacher_ids: teacher_ids.to_vec(),
    }
}

/// 创建测试用的 SOPHIA 行
fn slot(disc: &str, group: &str, weekday: u8, start_hour: u8, teacher_id: i64) -> SecondarySlot {
    SecondarySlot {
        discipline_code: disc.to_string(),
        group_name: group.to_string(),
        weekday,
        start: SlotTime::new(start_hour, 0),
        end: SlotTime::new(start_hour + 2, 0),
        regime_code: "D".to_string(),
        period_code: "S1".to_string(),
        teacher_id,
    }
}

fn reconcile_matched(
    relation: AuthoritativeRelation,
    slots: Vec<SecondarySlot>,
) -> crate::domain::ReconciledGroup {
    let partition = MatchPartition {
        matched: vec![(relation, slots)],
        ..Default::default()
    };
    let groups = SlotReconciler::new().reconcile(&partition, &ReconcileOptions::default());
    assert_eq!(groups.len(), 1);
    groups.into_iter().next().unwrap()
}

// ==========================================
// 状态机与标签
// ==========================================

#[test]
fn test_balanced_group_all_correct_is_all_keep() {
    // DSD=NHORARIO 且现任教师全部命中: 全 Keep
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12]),
        vec![slot("101", "T1", 1, 9, 11), slot("101", "T1", 2, 9, 12)],
    );
    assert_eq!(group.status, GroupStatus::DsdEqual);
    assert!(group.slots.iter().all(|s| s.label == SlotLabel::Keep));
    assert!(group.unplaced_teacher_ids.is_empty());
}

#[test]
fn test_balanced_group_reassigns_wrong_teacher() {
    // 场景: teachers=[A,B], 行为 [A, C] → A Keep, C 改派 B
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12]),
        vec![slot("101", "T1", 1, 9, 11), slot("101", "T1", 2, 9, 33)],
    );
    assert_eq!(group.status, GroupStatus::DsdEqual);
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.slots[1].label, SlotLabel::Assign(12));
    assert!(group.unplaced_teacher_ids.is_empty());
}

#[test]
fn test_more_teachers_than_slots_queues_insert() {
    // 场景: teachers=[A,B], 仅一行 A → A Keep, B 进入插入通道
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12]),
        vec![slot("101", "T1", 1, 9, 11)],
    );
    assert_eq!(group.status, GroupStatus::DsdGreater);
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.unplaced_teacher_ids, vec![12]);
}

#[test]
fn test_overstaffed_secondary_leaves_unassigned() {
    // DSD<NHORARIO: 多出的行标空, 不删除
    let group = reconcile_matched(
        relation("101", "T1", &[11]),
        vec![
            slot("101", "T1", 1, 9, 11),
            slot("101", "T1", 2, 9, 33),
            slot("101", "T1", 3, 9, 44),
        ],
    );
    assert_eq!(group.status, GroupStatus::DsdLess);
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.slots[1].label, SlotLabel::Unassigned);
    assert_eq!(group.slots[2].label, SlotLabel::Unassigned);
    assert!(group.unplaced_teacher_ids.is_empty());
}

#[test]
fn test_every_slot_gets_exactly_one_label() {
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12, 13]),
        vec![
            slot("101", "T1", 1, 9, 13),
            slot("101", "T1", 2, 9, 99),
            slot("101", "T1", 3, 9, 98),
        ],
    );
    assert_eq!(group.slots.len(), group.n_horario);
    // 保留 13; 11/12 按升序填入两条错配行
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.slots[1].label, SlotLabel::Assign(11));
    assert_eq!(group.slots[2].label, SlotLabel::Assign(12));
}

#[test]
fn test_assignment_stability_keeps_correct_slot() {
    // 即使改派能得到等价结果, 已正确的行也不动
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12]),
        vec![slot("101", "T1", 2, 14, 12), slot("101", "T1", 1, 9, 55)],
    );
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.slots[1].label, SlotLabel::Assign(11));
}

#[test]
fn test_no_best_data_group_is_untouched() {
    let partition = MatchPartition {
        sophia_only: vec![(
            SlotKey::new("777", "TX"),
            vec![slot("777", "TX", 1, 9, 55)],
        )],
        ..Default::default()
    };
    let groups = SlotReconciler::new().reconcile(&partition, &ReconcileOptions::default());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].status, GroupStatus::NoBestData);
    assert_eq!(groups[0].dsd, 0);
    assert_eq!(groups[0].slots[0].label, SlotLabel::Keep);
}

#[test]
fn test_best_only_relation_queues_all_teachers() {
    let partition = MatchPartition {
        best_only: vec![relation("101", "T9", &[21, 22])],
        ..Default::default()
    };
    let groups = SlotReconciler::new().reconcile(&partition, &ReconcileOptions::default());
    assert_eq!(groups[0].status, GroupStatus::DsdGreater);
    assert_eq!(groups[0].n_horario, 0);
    assert_eq!(groups[0].unplaced_teacher_ids, vec![21, 22]);
}

#[test]
fn test_duplicate_occupants_both_keep() {
    // 两条行都是同一位 BEST 教师: 指派稳定性优先, 都 Keep;
    // 落单教师记录在 unplaced, 但状态非 DSD>NHORARIO 时不触发插入
    let group = reconcile_matched(
        relation("101", "T1", &[11, 12]),
        vec![slot("101", "T1", 1, 9, 11), slot("101", "T1", 2, 9, 11)],
    );
    assert_eq!(group.slots[0].label, SlotLabel::Keep);
    assert_eq!(group.slots[1].label, SlotLabel::Keep);
    assert_eq!(group.unplaced_teacher_ids, vec![12]);
    assert_eq!(group.status, GroupStatus::DsdEqual);
}

#[test]
fn test_by_time_order_resorts_siblings_before_assignment() {
    // 快照顺序: 周二在前, 周一在后; 两行现任教师均不在 BEST 集合
    let partition = MatchPartition {
        matched: vec![(
            relation("101", "T1", &[11, 12]),
            vec![slot("101", "T1", 2, 9, 99), slot("101", "T1", 1, 9, 98)],
        )],
        ..Default::default()
    };
    let reconciler = SlotReconciler::new();

    // 插入顺序: 按快照顺序指派, 周二行先拿到 11
    let insertion = reconciler.reconcile(&partition, &ReconcileOptions::default());
    assert_eq!(insertion[0].slots[0].slot.weekday, 2);
    assert_eq!(insertion[0].slots[0].label, SlotLabel::Assign(11));
    assert_eq!(insertion[0].slots[1].label, SlotLabel::Assign(12));

    // 时序: 先按 (星期, 起始, 教师) 重排, 周一行先拿到 11
    let by_time = reconciler.reconcile(
        &partition,
        &ReconcileOptions {
            slot_order: SlotOrder::ByTime,
        },
    );
    assert_eq!(by_time[0].slots[0].slot.weekday, 1);
    assert_eq!(by_time[0].slots[0].label, SlotLabel::Assign(11));
    assert_eq!(by_time[0].slots[1].slot.weekday, 2);
    assert_eq!(by_time[0].slots[1].label, SlotLabel::Assign(12));
}

// ==========================================
// 插入行位合成
// ==========================================

#[test]
fn test_insert_prefers_free_weekday_same_time() {
    let key = SlotKey::new("101", "T1");
    let siblings = vec![slot("101", "T1", 2, 9, 11)];
    let inserted = synthesize_insert_slots(&key, &siblings, &[12, 13], &PlacementPolicy::default());
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].weekday, 1);
    assert_eq!(inserted[0].start, SlotTime::new(9, 0));
    assert_eq!(inserted[1].weekday, 3);
    // 互相之间以及与既有行均不冲突
    for (i, a) in inserted.iter().enumerate() {
        for s in siblings.iter().chain(inserted.iter().skip(i + 1)) {
            assert!(!s.overlaps(a.weekday, a.start, a.end));
        }
    }
}

#[test]
fn test_insert_falls_back_to_gap_scan() {
    let key = SlotKey::new("101", "T1");
    // 占满全部 7 个星期的 9-11 段, 留下 8-9 之前与 11 之后的间隙
    let siblings: Vec<SecondarySlot> =
        (1..=7).map(|w| slot("101", "T1", w, 9, 11)).collect();
    let policy = PlacementPolicy::default();
    let inserted = synthesize_insert_slots(&key, &siblings, &[12], &policy);
    assert_eq!(inserted.len(), 1);
    let new_slot = &inserted[0];
    assert_eq!(new_slot.weekday, 1);
    assert_eq!(new_slot.start, SlotTime::new(11, 0));
    assert!(siblings.iter().all(|s| !s.overlaps(new_slot.weekday, new_slot.start, new_slot.end)));
}

#[test]
fn test_insert_without_template_uses_policy_defaults() {
    let key = SlotKey::new("101", "T9");
    let policy = PlacementPolicy {
        default_slot_minutes: 90,
        default_regime_code: "D".to_string(),
        default_period_code: "S1".to_string(),
        ..Default::default()
    };
    let inserted = synthesize_insert_slots(&key, &[], &[21], &policy);
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].weekday, policy.weekday_min);
    assert_eq!(inserted[0].start, policy.day_start);
    assert_eq!(inserted[0].duration_minutes(), 90);
    assert_eq!(inserted[0].regime_code, "D");
}

#[test]
fn test_insert_append_rolls_past_day_end_when_saturated() {
    let key = SlotKey::new("101", "T1");
    // 每个星期 08:00-19:30 占满, 间隙不足 120 分钟
    let siblings: Vec<SecondarySlot> = (1..=7)
        .map(|w| SecondarySlot {
            discipline_code: "101".to_string(),
            group_name: "T1".to_string(),
            weekday: w,
            start: SlotTime::new(8, 0),
            end: SlotTime::new(19, 30),
            regime_code: "D".to_string(),
            period_code: "S1".to_string(),
            teacher_id: 11,
        })
        .collect();
    let inserted = synthesize_insert_slots(&key, &siblings, &[12], &PlacementPolicy::default());
    assert_eq!(inserted.len(), 1);
    // 放不进任何边界内间隙: 追加在末行之后, 允许越出 20:00
    assert_eq!(inserted[0].start, SlotTime::new(19, 30));
    assert!(siblings
        .iter()
        .all(|s| !s.overlaps(inserted[0].weekday, inserted[0].start, inserted[0].end)));
}
