// ==========================================
// 课表同步系统 - 引擎层
// ==========================================
// 职责: 实现对账业务规则, 不做 IO
// 红线: 单行数据异常只降级该行, 绝不中断批次
// ==========================================

pub mod aggregator;
pub mod event_ops;
pub mod gateway;
pub mod matcher;
pub mod normalizer;
pub mod orchestrator;
pub mod reconciler;
pub mod set_diff;
pub mod validator;
pub mod writeback;

// 重导出核心引擎
pub use aggregator::RelationAggregator;
pub use event_ops::{EventPartition, EventReconciler};
pub use gateway::{
    dispatch_actions, GatewayError, NoOpGateway, RecordingGateway, TimetableGateway, WriteOutcome,
};
pub use matcher::{CrossSystemMatcher, MatchPartition, MatchResult};
pub use orchestrator::{ReconcileOrchestrator, ReconcileResult};
pub use reconciler::{
    synthesize_insert_slots, PlacementPolicy, ReconcileOptions, SlotReconciler,
};
pub use validator::{ReferenceData, ReferenceValidator};
pub use writeback::{ExecuteRequest, WriteActionRecord, WriteBackSynthesizer};
