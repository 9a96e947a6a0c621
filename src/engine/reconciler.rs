// ==========================================
// 课表同步系统 - 行位对账引擎
// ==========================================
// 职责: 按 DSD 与 NHorario 的对比给每条 SOPHIA 行打标签,
//       并为放不下的 BEST 教师合成插入行的星期/时间
// 红线: 引擎从不删除信息; 超额行仅记录, 绝不清空教师
// ==========================================

mod core;
mod placement;

#[cfg(test)]
mod tests;

pub use self::core::{ReconcileOptions, SlotReconciler};
pub use self::placement::{synthesize_insert_slots, PlacementPolicy};
