// ==========================================
// 课表同步系统 - 核心库
// ==========================================
// 系统定位: BEST→SOPHIA 教学安排对账与回写 (批处理)
// 红线: 对账引擎纯内存计算, 外部写操作只经网关 trait
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 对账规则
pub mod engine;

// 导入层 - 快照解析
pub mod importer;

// 配置层 - 批次参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigError, ReconcileConfig};
pub use domain::{
    ActionKind, AuthoritativeAssignment, AuthoritativeRelation, ChangeMarker, EventKey,
    EventOperationRecord, EventRow, GroupStatus, ReconciledGroup, ReconciledSlot, SecondarySlot,
    SlotKey, SlotLabel, SlotOrder, SlotTime,
};
pub use engine::{
    CrossSystemMatcher, EventReconciler, ExecuteRequest, MatchPartition, NoOpGateway,
    ReconcileOrchestrator, ReconcileResult, ReferenceData, ReferenceValidator, RelationAggregator,
    SlotReconciler, TimetableGateway, WriteActionRecord, WriteBackSynthesizer,
};
