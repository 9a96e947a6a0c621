// ==========================================
// 课表同步系统 - 快照映射
// ==========================================
// 职责: 把表头键控的原始记录映射为领域实体
// 输入: BEST 事件导出 / SOPHIA 课表导出 / 四张参照表
// 约束: 单行异常只降级该行 (告警), 绝不中断整个快照
// ==========================================

use crate::domain::{AuthoritativeAssignment, EventKey, EventRow, SecondarySlot, SlotTime, NO_TEACHER};
use crate::engine::normalizer::{canonical_teacher_id, parse_list_field, secondary_discipline_code};
use crate::engine::validator::ReferenceData;
use crate::importer::file_parser::RawRecord;
use tracing::{info, warn};

fn field<'a>(record: &'a RawRecord, name: &str) -> &'a str {
    record.get(name).map(String::as_str).unwrap_or("")
}

// ==========================================
// BEST 事件快照展开
// ==========================================

/// 把 BEST 事件快照展开为逐教师 × 逐学生组的安排行
///
/// 列表编码的 studentGroup_names / course_codes / course_names 对齐展开,
/// teacher_names / teacher_codes 同理; 长度不一致时就近取尾元素并告警。
pub fn expand_best_events(records: &[RawRecord]) -> Vec<AuthoritativeAssignment> {
    let mut assignments = Vec::new();

    for (row_idx, record) in records.iter().enumerate() {
        let discipline_raw = field(record, "CdDisc").trim().to_string();

        let groups = parse_list_field(field(record, "studentGroup_names"));
        let courses = parse_list_field(field(record, "course_codes"));
        let teacher_names = parse_list_field(field(record, "teacher_names"));
        let teacher_codes = parse_list_field(field(record, "teacher_codes"));

        if groups.fallback || courses.fallback || teacher_names.fallback || teacher_codes.fallback {
            warn!(row = row_idx, "列表字段解析退化为单值");
        }
        if groups.len() != courses.len() && !courses.is_empty() {
            warn!(
                row = row_idx,
                groups = groups.len(),
                courses = courses.len(),
                "学生组与课程列长度不一致, 就近对齐"
            );
        }
        if teacher_names.len() != teacher_codes.len() {
            warn!(
                row = row_idx,
                names = teacher_names.len(),
                codes = teacher_codes.len(),
                "教师姓名与编号列长度不一致, 就近对齐"
            );
        }

        // 对齐列按主列索引取值, 越界时退到末元素
        let aligned = |list: &[String], idx: usize| -> String {
            list.get(idx)
                .or_else(|| list.last())
                .cloned()
                .unwrap_or_default()
        };

        for (group_idx, group_name) in groups.items.iter().enumerate() {
            let course_code = aligned(&courses.items, group_idx);
            for (teacher_idx, teacher_name) in teacher_names.items.iter().enumerate() {
                let accounting_code = aligned(&teacher_codes.items, teacher_idx);
                assignments.push(AuthoritativeAssignment {
                    discipline_code_raw: discipline_raw.clone(),
                    discipline_code: secondary_discipline_code(&discipline_raw),
                    group_name: group_name.clone(),
                    course_code: course_code.clone(),
                    teacher_accounting_code: accounting_code,
                    teacher_name: teacher_name.clone(),
                    teacher_id: NO_TEACHER,
                    course_valid: false,
                    discipline_valid: false,
                    group_valid: false,
                    teacher_valid: false,
                });
            }
        }
    }

    info!(
        events = records.len(),
        assignments = assignments.len(),
        "BEST 事件快照展开完成"
    );
    assignments
}

// ==========================================
// SOPHIA 课表快照映射
// ==========================================

fn parse_time(hour_raw: &str, minute_raw: &str) -> Option<SlotTime> {
    let hour: u8 = hour_raw.trim().parse().ok()?;
    let minute: u8 = minute_raw.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(SlotTime::new(hour, minute))
}

/// SOPHIA 导出行 → SecondarySlot
///
/// 教师编号缺失/不可解析时落到 0 哨兵值; 时间列畸形的行整行降级。
pub fn map_sophia_slots(records: &[RawRecord]) -> Vec<SecondarySlot> {
    let mut slots = Vec::new();

    for (row_idx, record) in records.iter().enumerate() {
        let start = parse_time(field(record, "HoraIni"), field(record, "MinutoIni"));
        let end = parse_time(field(record, "HoraFim"), field(record, "MinutoFim"));
        let weekday: Option<u8> = field(record, "DiaSemana").trim().parse().ok();

        let (start, end, weekday) = match (start, end, weekday) {
            (Some(s), Some(e), Some(w)) => (s, e, w),
            _ => {
                warn!(row = row_idx, "SOPHIA 行时间/星期列畸形, 整行降级");
                continue;
            }
        };

        let teacher_id =
            canonical_teacher_id(field(record, "CdDocente")).unwrap_or(NO_TEACHER);

        slots.push(SecondarySlot {
            discipline_code: field(record, "CdDis").trim().to_string(),
            group_name: field(record, "DgTurma").trim().to_string(),
            weekday,
            start,
            end,
            regime_code: field(record, "CdRegime").trim().to_string(),
            period_code: field(record, "CdPEstudo").trim().to_string(),
            teacher_id,
        });
    }

    info!(
        rows = records.len(),
        slots = slots.len(),
        degraded = records.len() - slots.len(),
        "SOPHIA 课表快照映射完成"
    );
    slots
}

// ==========================================
// 事件级快照映射
// ==========================================

/// 事件级对账用的行映射 (既有事件侧与 WLS 侧共用同一列约定)
pub fn map_event_rows(records: &[RawRecord]) -> Vec<EventRow> {
    let rows: Vec<EventRow> = records
        .iter()
        .map(|record| EventRow {
            key: EventKey {
                module_id: field(record, "module_id").trim().to_string(),
                typology_ids: field(record, "typology_ids").trim().to_string(),
                section_connector: field(record, "wls_section_connector").trim().to_string(),
                section_name: field(record, "wls_section_name").trim().to_string(),
            },
            event_name: field(record, "event_name").trim().to_string(),
            teacher_ids: field(record, "teacher_ids").trim().to_string(),
            student_group_ids: field(record, "studentGroup_ids").trim().to_string(),
            annotations: field(record, "annotations").trim().to_string(),
        })
        .collect();
    info!(rows = rows.len(), "事件级快照映射完成");
    rows
}

// ==========================================
// 参照表装载
// ==========================================

/// 四张参照表 → ReferenceData
///
/// 教师表要求会计编号与数字编号同时可解析, 否则该行降级。
pub fn load_reference_data(
    courses: &[RawRecord],
    disciplines: &[RawRecord],
    groups: &[RawRecord],
    teachers: &[RawRecord],
) -> ReferenceData {
    let mut reference = ReferenceData::new();

    for record in courses {
        reference.add_course_code(field(record, "CdCurso"));
    }
    for record in disciplines {
        reference.add_discipline_code(field(record, "CdDisc"));
    }
    for record in groups {
        reference.add_group_name(field(record, "DgTurma"));
    }
    for (row_idx, record) in teachers.iter().enumerate() {
        let accounting_code = field(record, "NContabilistico").trim();
        match canonical_teacher_id(field(record, "CdDocente")) {
            Some(teacher_id) if !accounting_code.is_empty() => {
                reference.add_teacher(accounting_code, teacher_id);
            }
            _ => warn!(row = row_idx, "教师参照行缺编号, 降级"),
        }
    }

    info!("参照表装载完成");
    reference
}
