// ==========================================
// 课表同步系统 - 领域层
// ==========================================
// 职责: 实体定义与领域类型, 不含业务规则
// ==========================================

pub mod assignment;
pub mod event;
pub mod slot;
pub mod types;

pub use assignment::{AuthoritativeAssignment, AuthoritativeRelation, RelationKey};
pub use event::{EventKey, EventOperationRecord, EventRow};
pub use slot::{ReconciledGroup, ReconciledSlot, SecondarySlot, SlotKey, SlotTime, NO_TEACHER};
pub use types::{ActionKind, ChangeMarker, GroupStatus, SlotLabel, SlotOrder};
