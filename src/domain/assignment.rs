// ==========================================
// 课表同步系统 - BEST 侧实体
// ==========================================
// 职责: 权威系统 (BEST) 的教学安排行与聚合关系
// 输入: 已展开的事件快照 (每教师 × 每学生组一行)
// 输出: 按业务键聚合后的 AuthoritativeRelation
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// AuthoritativeAssignment - 展开后的单行安排
// ==========================================

/// BEST 事件展开后的单条教学安排 (聚合前)
///
/// 四个校验标志分别对应课程/学科/学生组/教师在参照表中的命中情况;
/// 任一标志为 false 的行只进入 "invalid" 通道, 绝不参与匹配。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeAssignment {
    /// BEST 原始学科代码 (可能带字母前缀, 保留用于追溯)
    pub discipline_code_raw: String,
    /// SOPHIA 编号体系下的学科代码 (去前缀后的纯数字形式)
    pub discipline_code: String,
    /// 学生组 (DgTurma)
    pub group_name: String,
    /// 课程代码 (CdCurso)
    pub course_code: String,
    /// 教师会计编号 (NContabilistico)
    pub teacher_accounting_code: String,
    /// 教师姓名
    pub teacher_name: String,
    /// 教师数字编号 (CdDocente, 由参照表回填; 0 表示尚未解析)
    pub teacher_id: i64,
    /// 课程参照校验
    pub course_valid: bool,
    /// 学科参照校验
    pub discipline_valid: bool,
    /// 学生组参照校验
    pub group_valid: bool,
    /// 教师参照校验
    pub teacher_valid: bool,
}

impl AuthoritativeAssignment {
    /// 四个校验标志是否全部通过
    pub fn is_fully_valid(&self) -> bool {
        self.course_valid && self.discipline_valid && self.group_valid && self.teacher_valid
    }
}

// ==========================================
// RelationKey - 聚合业务键
// ==========================================

/// 聚合键: 学科(两种编号) + 学生组 + 课程
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationKey {
    pub discipline_code: String,
    pub discipline_code_raw: String,
    pub group_name: String,
    pub course_code: String,
}

impl RelationKey {
    /// 键的所有分量是否非空 (空分量的行路由到 incomplete 通道)
    pub fn is_complete(&self) -> bool {
        !self.discipline_code.trim().is_empty()
            && !self.group_name.trim().is_empty()
            && !self.course_code.trim().is_empty()
    }
}

// ==========================================
// AuthoritativeRelation - 聚合后的关系
// ==========================================

/// 同一业务键下所有安排的聚合结果, 构建后不可变
///
/// 三个列表排序去重, 保证重复运行输出逐字节一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeRelation {
    pub key: RelationKey,
    /// 排序去重后的教师会计编号
    pub teacher_accounting_codes: Vec<String>,
    /// 排序去重后的教师姓名
    pub teacher_names: Vec<String>,
    /// 排序去重后的教师数字编号
    pub teacher_ids: Vec<i64>,
}

impl AuthoritativeRelation {
    /// DSD: 该学科/学生组需要的不同教师数
    pub fn dsd(&self) -> usize {
        self.teacher_ids.len()
    }
}
