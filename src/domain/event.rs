// ==========================================
// 课表同步系统 - 事件级实体
// ==========================================
// 职责: 事件级对账 (区别于行级/slot 级) 使用的行结构
// 键: 模块 ID + 类型学 ID + 分段连接符 + 分段名称
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// EventKey - 事件业务键
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub module_id: String,
    pub typology_ids: String,
    pub section_connector: String,
    pub section_name: String,
}

impl EventKey {
    /// 前三个分量非空才允许参与匹配 (section_name 允许为空, 与连接符一致时冗余)
    pub fn is_complete(&self) -> bool {
        !self.module_id.trim().is_empty()
            && !self.typology_ids.trim().is_empty()
            && !self.section_connector.trim().is_empty()
    }
}

// ==========================================
// EventRow - 事件快照行
// ==========================================

/// 单条事件行 (BEST 的 WLSection 侧或既有 Event 侧共用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub key: EventKey,
    pub event_name: String,
    /// 逗号连接的教师 ID 列表
    pub teacher_ids: String,
    /// 逗号连接的学生组 ID 列表
    pub student_group_ids: String,
    /// 既有备注 (可为空)
    pub annotations: String,
}

// ==========================================
// EventOperationRecord - 事件级对账输出
// ==========================================

/// 匹配成功的事件对, 附带四个差异列与变更标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOperationRecord {
    /// 既有事件侧原行
    pub event: EventRow,
    /// BEST (WLS) 侧原行
    pub wls: EventRow,
    /// 事件侧有而 BEST 侧没有的教师 ID (待移除)
    pub teacher_ids_to_remove: String,
    /// BEST 侧有而事件侧没有的教师 ID (待新增)
    pub teacher_ids_to_add: String,
    /// 事件侧有而 BEST 侧没有的学生组 ID
    pub student_group_ids_to_remove: String,
    /// BEST 侧有而事件侧没有的学生组 ID
    pub student_group_ids_to_add: String,
    /// 更新后的 annotations (批次标记 + 变更后缀)
    pub annotations: String,
}

impl EventOperationRecord {
    pub fn has_teacher_changes(&self) -> bool {
        !self.teacher_ids_to_remove.is_empty() || !self.teacher_ids_to_add.is_empty()
    }

    pub fn has_group_changes(&self) -> bool {
        !self.student_group_ids_to_remove.is_empty() || !self.student_group_ids_to_add.is_empty()
    }
}
