// ==========================================
// 课表同步系统 - 领域类型定义
// ==========================================
// 职责: 对账过程使用的状态/标签/动作枚举
// 序列化格式: 与报表列值保持一致 (例如 "DSD>NHORARIO")
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 对账组状态 (Group Status)
// ==========================================
// 由 DSD 与 NHorario 的比较唯一决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupStatus {
    /// BEST 要求的教师数多于 SOPHIA 现有行数 (触发插入)
    #[serde(rename = "DSD>NHORARIO")]
    DsdGreater,
    /// BEST 要求的教师数少于 SOPHIA 现有行数 (仅记录, 不删除)
    #[serde(rename = "DSD<NHORARIO")]
    DsdLess,
    /// 两侧数量一致
    #[serde(rename = "DSD=NHORARIO")]
    DsdEqual,
    /// SOPHIA 键在 BEST 中完全不存在 (终态, 不做任何改动)
    #[serde(rename = "NO_BEST_DATA")]
    NoBestData,
}

impl GroupStatus {
    /// 转换为报表列值
    pub fn as_str(&self) -> &str {
        match self {
            GroupStatus::DsdGreater => "DSD>NHORARIO",
            GroupStatus::DsdLess => "DSD<NHORARIO",
            GroupStatus::DsdEqual => "DSD=NHORARIO",
            GroupStatus::NoBestData => "NO_BEST_DATA",
        }
    }

    /// 由数量对比推导状态 (NO_BEST_DATA 由匹配器单独判定)
    pub fn from_counts(dsd: usize, n_horario: usize) -> Self {
        use std::cmp::Ordering;
        match dsd.cmp(&n_horario) {
            Ordering::Greater => GroupStatus::DsdGreater,
            Ordering::Less => GroupStatus::DsdLess,
            Ordering::Equal => GroupStatus::DsdEqual,
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 课表行标签 (Slot Label)
// ==========================================
// 每个 SOPHIA 课表行在对账后恰好获得一个标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotLabel {
    /// 现任教师已在 BEST 教师集合中, 保持不变
    Keep,
    /// 需要改派为指定的 BEST 教师 (CdDocente)
    Assign(i64),
    /// 没有剩余的 BEST 教师可派 (超额容量, 仅记录)
    Unassigned,
}

impl SlotLabel {
    /// 报表列值: "Keep" / 教师编号 / 空串
    pub fn to_field(&self) -> String {
        match self {
            SlotLabel::Keep => "Keep".to_string(),
            SlotLabel::Assign(id) => id.to_string(),
            SlotLabel::Unassigned => String::new(),
        }
    }
}

// ==========================================
// 回写动作类型 (Action Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// 改写既有课表行的教师 (EditLinhaHorario)
    Edit,
    /// 新增课表行 (InsLinhaHorario)
    Insert,
    /// 无需任何写操作
    NoAction,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Edit => write!(f, "EDIT"),
            ActionKind::Insert => write!(f, "INSERT"),
            ActionKind::NoAction => write!(f, "NO_ACTION"),
        }
    }
}

// ==========================================
// 变更标记 (Change Marker)
// ==========================================
// 事件级对账在 annotations 上追加的人读后缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeMarker {
    /// 仅教师变更 (- PR)
    TeacherChanged,
    /// 仅学生组变更 (- GR)
    GroupChanged,
    /// 教师与学生组均变更 (- GR;PR)
    Both,
    /// 无变更
    Unchanged,
}

impl ChangeMarker {
    /// 由差异列的有无推导标记
    pub fn from_diffs(teacher_changed: bool, group_changed: bool) -> Self {
        match (teacher_changed, group_changed) {
            (true, true) => ChangeMarker::Both,
            (true, false) => ChangeMarker::TeacherChanged,
            (false, true) => ChangeMarker::GroupChanged,
            (false, false) => ChangeMarker::Unchanged,
        }
    }

    /// annotations 后缀 (无变更时为空)
    pub fn suffix(&self) -> &str {
        match self {
            ChangeMarker::TeacherChanged => " - PR",
            ChangeMarker::GroupChanged => " - GR",
            ChangeMarker::Both => " - GR;PR",
            ChangeMarker::Unchanged => "",
        }
    }
}

// ==========================================
// 课表行迭代顺序 (Slot Order)
// ==========================================
// 贪心指派使用的确定性顺序, 作为显式参数而非隐式容器顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotOrder {
    /// 快照插入顺序 (缺省; 组间按键排序, 组内保持快照顺序)
    #[default]
    Insertion,
    /// 按 (星期, 开始时间, 教师) 排序
    ByTime,
}
