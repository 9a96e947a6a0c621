// ==========================================
// 课表同步系统 - 引擎编排器
// ==========================================
// 用途: 协调校验→聚合→匹配→对账→回写合成的执行顺序
// 保证: 键不完整/校验失败的行保留在结果中, 不静默丢弃
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::{AuthoritativeAssignment, ReconciledGroup, SecondarySlot};
use crate::engine::aggregator::RelationAggregator;
use crate::engine::matcher::{CrossSystemMatcher, MatchPartition};
use crate::engine::reconciler::{ReconcileOptions, SlotReconciler};
use crate::engine::validator::{ReferenceData, ReferenceValidator};
use crate::engine::writeback::{WriteActionRecord, WriteBackSynthesizer};
use tracing::info;

// ==========================================
// ReconcileResult - 批次结果
// ==========================================

#[derive(Debug, Clone)]
pub struct ReconcileResult {
    /// 校验未通过的 BEST 行 (报表用, 原样保留)
    pub invalid_assignments: Vec<AuthoritativeAssignment>,
    /// 匹配分区 (含不完整键分区)
    pub partition: MatchPartition,
    /// 逐组对账输出
    pub groups: Vec<ReconciledGroup>,
    /// 回写动作列表
    pub actions: Vec<WriteActionRecord>,
}

// ==========================================
// ReconcileOrchestrator - 引擎编排器
// ==========================================

pub struct ReconcileOrchestrator {
    config: ReconcileConfig,
    validator: ReferenceValidator,
    aggregator: RelationAggregator,
    matcher: CrossSystemMatcher,
    reconciler: SlotReconciler,
    synthesizer: WriteBackSynthesizer,
}

impl ReconcileOrchestrator {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            validator: ReferenceValidator::new(),
            aggregator: RelationAggregator::new(),
            matcher: CrossSystemMatcher::new(),
            reconciler: SlotReconciler::new(),
            synthesizer: WriteBackSynthesizer::new(),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// 执行完整批次
    ///
    /// 1. 参照表校验, 填充数值教师 ID
    /// 2. 聚合为 (学科, 学生组, 课程) 关系
    /// 3. 与 SOPHIA 行集联接
    /// 4. 逐组打标签
    /// 5. 合成 Edit/Insert/NoAction 动作
    pub fn run(
        &self,
        assignments: Vec<AuthoritativeAssignment>,
        slots: Vec<SecondarySlot>,
        reference: &ReferenceData,
    ) -> ReconcileResult {
        info!(
            assignments = assignments.len(),
            slots = slots.len(),
            "对账批次开始"
        );

        let (valid, invalid_assignments) = self.validator.validate(assignments, reference);
        let relations = self.aggregator.aggregate(&valid);
        let partition = self.matcher.match_slots(relations, slots);

        let options = ReconcileOptions {
            slot_order: self.config.slot_order,
        };
        let groups = self.reconciler.reconcile(&partition, &options);

        let policy = self.config.placement_policy();
        let actions = self.synthesizer.synthesize(&groups, &policy);

        info!(
            invalid = invalid_assignments.len(),
            groups = groups.len(),
            actions = actions.len(),
            "对账批次完成"
        );

        ReconcileResult {
            invalid_assignments,
            partition,
            groups,
            actions,
        }
    }
}
