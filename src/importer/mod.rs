// ==========================================
// 课表同步系统 - 导入层
// ==========================================
// 职责: 已导出快照 (CSV/Excel) → 领域实体
// 红线: 文件级错误才失败; 单行异常只降级该行
// ==========================================

pub mod error;
pub mod file_parser;
pub mod snapshot;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRecord, SnapshotFileParser};
pub use snapshot::{
    expand_best_events, load_reference_data, map_event_rows, map_sophia_slots,
};
