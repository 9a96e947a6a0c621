// ==========================================
// 课表同步系统 - 事件级对账引擎
// ==========================================
// 职责: 按事件业务键联接既有事件与 BEST (WLS) 快照,
//       产出匹配/待插入/待删除三路分区与差异列
// 键: 模块 ID + 类型学 ID + 分段连接符 + 分段名称
// 约束: 键不完整的行单独返回, 绝不参与联接
// ==========================================

use crate::domain::{ChangeMarker, EventKey, EventOperationRecord, EventRow};
use crate::engine::set_diff::diff_id_lists;
use std::collections::BTreeMap;
use tracing::{debug, info};

// ==========================================
// EventPartition - 事件级对账输出
// ==========================================

/// 五个分区合计覆盖两侧全部输入行
#[derive(Debug, Clone, Default)]
pub struct EventPartition {
    /// 两侧均存在: 附差异列与更新后备注
    pub matched: Vec<EventOperationRecord>,
    /// 仅 BEST 存在 (待插入事件)
    pub to_insert: Vec<EventRow>,
    /// 仅事件侧存在 (待删除事件)
    pub to_delete: Vec<EventRow>,
    pub incomplete_events: Vec<EventRow>,
    pub incomplete_wls: Vec<EventRow>,
}

// ==========================================
// EventReconciler - 事件级引擎
// ==========================================

// 无状态引擎
pub struct EventReconciler {
    /// 批次标记, 写入变更事件的备注行首
    annotation_tag: String,
}

impl EventReconciler {
    pub fn new(annotation_tag: impl Into<String>) -> Self {
        Self {
            annotation_tag: annotation_tag.into(),
        }
    }

    /// 双向联接既有事件集与 WLS 快照
    ///
    /// 连接符为空的键在联接前回落到分段名称;
    /// 同键多行时按插入顺序一一配对, 多出的行落入单侧分区。
    pub fn reconcile(&self, events: Vec<EventRow>, wls: Vec<EventRow>) -> EventPartition {
        let mut partition = EventPartition::default();

        let mut wls_by_key: BTreeMap<EventKey, Vec<EventRow>> = BTreeMap::new();
        for row in wls {
            let row = normalize_connector(row);
            if !row.key.is_complete() {
                partition.incomplete_wls.push(row);
                continue;
            }
            wls_by_key.entry(row.key.clone()).or_default().push(row);
        }

        for row in events {
            let row = normalize_connector(row);
            if !row.key.is_complete() {
                partition.incomplete_events.push(row);
                continue;
            }
            let matched_wls = match wls_by_key.get_mut(&row.key) {
                Some(bucket) if !bucket.is_empty() => bucket.remove(0),
                _ => {
                    partition.to_delete.push(row);
                    continue;
                }
            };
            partition.matched.push(self.build_operation(row, matched_wls));
        }

        // 未被任何既有事件命中的 WLS 行
        for (_, bucket) in wls_by_key {
            for row in bucket {
                partition.to_insert.push(row);
            }
        }

        info!(
            matched = partition.matched.len(),
            to_insert = partition.to_insert.len(),
            to_delete = partition.to_delete.len(),
            incomplete_events = partition.incomplete_events.len(),
            incomplete_wls = partition.incomplete_wls.len(),
            "事件级对账完成"
        );
        partition
    }

    /// 匹配对 → 差异列 + 变更标记备注
    fn build_operation(&self, event: EventRow, wls: EventRow) -> EventOperationRecord {
        let (teacher_ids_to_remove, teacher_ids_to_add) =
            diff_id_lists(&event.teacher_ids, &wls.teacher_ids);
        let (student_group_ids_to_remove, student_group_ids_to_add) =
            diff_id_lists(&event.student_group_ids, &wls.student_group_ids);

        let marker = ChangeMarker::from_diffs(
            !teacher_ids_to_remove.is_empty() || !teacher_ids_to_add.is_empty(),
            !student_group_ids_to_remove.is_empty() || !student_group_ids_to_add.is_empty(),
        );
        let annotations = self.annotate(&event.annotations, marker);

        if marker != ChangeMarker::Unchanged {
            debug!(
                module_id = %event.key.module_id,
                section = %event.key.section_name,
                marker = marker.suffix(),
                "事件存在差异"
            );
        }

        EventOperationRecord {
            event,
            wls,
            teacher_ids_to_remove,
            teacher_ids_to_add,
            student_group_ids_to_remove,
            student_group_ids_to_add,
            annotations,
        }
    }

    /// 批次标记 + 变更后缀前插到既有备注; 无变更时备注原样保留
    fn annotate(&self, existing: &str, marker: ChangeMarker) -> String {
        if marker == ChangeMarker::Unchanged {
            return existing.to_string();
        }
        let line = format!("{}{}", self.annotation_tag, marker.suffix());
        if existing.trim().is_empty() {
            line
        } else {
            format!("{}\n{}", line, existing)
        }
    }
}

/// 连接符为空的键回落到分段名称
fn normalize_connector(mut row: EventRow) -> EventRow {
    if row.key.section_connector.trim().is_empty() {
        row.key.section_connector = row.key.section_name.clone();
    }
    row
}
