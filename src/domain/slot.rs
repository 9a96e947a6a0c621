// ==========================================
// 课表同步系统 - SOPHIA 侧实体
// ==========================================
// 职责: SOPHIA 课表行 (slot) 与对账结果结构
// 约束: 引擎从不就地修改快照, 只产出回写指令
// ==========================================

use crate::domain::types::{GroupStatus, SlotLabel};
use serde::{Deserialize, Serialize};

/// 无教师哨兵值 (SOPHIA 用 0 表示空缺)
pub const NO_TEACHER: i64 = 0;

// ==========================================
// SlotTime - 时刻 (小时+分钟)
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotTime {
    pub hour: u8,
    pub minute: u8,
}

impl SlotTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// 自零点起的分钟数
    pub fn total_minutes(&self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    /// 由分钟数还原 (不做 24h 截断, 允许越界时刻并由上层告警)
    pub fn from_total_minutes(minutes: i32) -> Self {
        let m = minutes.max(0);
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }
}

impl std::fmt::Display for SlotTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ==========================================
// SlotKey - SOPHIA 分组键
// ==========================================

/// SOPHIA 侧分组键 (学科 + 学生组); 同键的行互为兄弟行
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub discipline_code: String,
    pub group_name: String,
}

impl SlotKey {
    pub fn new(discipline_code: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            discipline_code: discipline_code.into(),
            group_name: group_name.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.discipline_code.trim().is_empty() && !self.group_name.trim().is_empty()
    }

    /// DIMENSAO 关联键 (仅用于下游报表分组)
    pub fn dimensao(&self) -> String {
        format!("{}|{}", self.discipline_code, self.group_name)
    }
}

// ==========================================
// SecondarySlot - SOPHIA 课表行
// ==========================================

/// SOPHIA 的一条周课表行 (GetDiscHorario 的一条记录)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondarySlot {
    /// 学科代码 (SOPHIA 自身编号)
    pub discipline_code: String,
    /// 学生组 (DgTurma)
    pub group_name: String,
    /// 星期 (1-7)
    pub weekday: u8,
    pub start: SlotTime,
    pub end: SlotTime,
    /// 体制代码 (CdRegime)
    pub regime_code: String,
    /// 学段代码 (CdPeriodo)
    pub period_code: String,
    /// 现任教师编号 (CdDocente, 0 = 空缺)
    pub teacher_id: i64,
}

impl SecondarySlot {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.discipline_code.clone(), self.group_name.clone())
    }

    pub fn has_teacher(&self) -> bool {
        self.teacher_id != NO_TEACHER
    }

    /// 行时长 (分钟); 结束早于开始时按 0 处理
    pub fn duration_minutes(&self) -> i32 {
        (self.end.total_minutes() - self.start.total_minutes()).max(0)
    }

    /// 与另一行在同一星期内时间区间是否重叠
    pub fn overlaps(&self, weekday: u8, start: SlotTime, end: SlotTime) -> bool {
        self.weekday == weekday
            && self.start.total_minutes() < end.total_minutes()
            && start.total_minutes() < self.end.total_minutes()
    }
}

// ==========================================
// ReconciledSlot / ReconciledGroup - 对账结果
// ==========================================

/// 对账后的单条课表行: 原行 + 标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledSlot {
    pub slot: SecondarySlot,
    pub label: SlotLabel,
}

/// 一个 BEST 关系与其 SOPHIA 兄弟行的联接结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledGroup {
    pub key: SlotKey,
    /// BEST 侧要求的教师数 (NO_BEST_DATA 时为 0)
    pub dsd: usize,
    /// SOPHIA 侧既有行数
    pub n_horario: usize,
    pub status: GroupStatus,
    /// 每条兄弟行的标签 (长度 == n_horario)
    pub slots: Vec<ReconciledSlot>,
    /// 无行可派的 BEST 教师 (状态为 DSD>NHORARIO 时进入插入通道)
    pub unplaced_teacher_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(weekday: u8, sh: u8, eh: u8) -> SecondarySlot {
        SecondarySlot {
            discipline_code: "101".to_string(),
            group_name: "T1".to_string(),
            weekday,
            start: SlotTime::new(sh, 0),
            end: SlotTime::new(eh, 0),
            regime_code: "D".to_string(),
            period_code: "S1".to_string(),
            teacher_id: 7,
        }
    }

    #[test]
    fn test_overlap_same_weekday_only() {
        let s = slot(2, 9, 11);
        assert!(s.overlaps(2, SlotTime::new(10, 0), SlotTime::new(12, 0)));
        assert!(!s.overlaps(3, SlotTime::new(10, 0), SlotTime::new(12, 0)));
        // 边界相接不算重叠
        assert!(!s.overlaps(2, SlotTime::new(11, 0), SlotTime::new(13, 0)));
    }

    #[test]
    fn test_duration_and_roundtrip() {
        assert_eq!(slot(1, 9, 11).duration_minutes(), 120);
        let t = SlotTime::from_total_minutes(SlotTime::new(13, 30).total_minutes());
        assert_eq!(t, SlotTime::new(13, 30));
    }
}
