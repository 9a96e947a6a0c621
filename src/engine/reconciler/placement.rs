// ==========================================
// 行位对账引擎 - 插入行位合成
// ==========================================
// 职责: 为待插入的 BEST 教师合成不冲突的星期/时间
// 策略: (1) 空闲星期同时段 → (2) 既有行间隙 → (3) 末尾追加滚动
// 保证: 有界终止, 永不与兄弟行重叠; 病态输入可能越出教学时段 (告警)
// ==========================================

use crate::domain::{SecondarySlot, SlotKey, SlotTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ==========================================
// PlacementPolicy - 行位合成策略参数
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementPolicy {
    /// 教学日开始边界
    pub day_start: SlotTime,
    /// 教学日结束边界
    pub day_end: SlotTime,
    /// 星期下界 (含)
    pub weekday_min: u8,
    /// 星期上界 (含)
    pub weekday_max: u8,
    /// 组内无模板行时的缺省时长 (分钟)
    pub default_slot_minutes: i32,
    /// 组内无模板行时的缺省体制代码
    pub default_regime_code: String,
    /// 组内无模板行时的缺省学段代码
    pub default_period_code: String,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            day_start: SlotTime::new(8, 0),
            day_end: SlotTime::new(20, 0),
            weekday_min: 1,
            weekday_max: 7,
            default_slot_minutes: 120,
            default_regime_code: String::new(),
            default_period_code: String::new(),
        }
    }
}

// ==========================================
// 合成入口
// ==========================================

/// 为一组待插入教师合成新课表行
///
/// 第一条兄弟行作为形状模板 (时长/时段/体制/学段);
/// 组内没有任何兄弟行时使用策略缺省值。
/// 已合成的行计入兄弟集合, 后续插入不会与之冲突。
pub fn synthesize_insert_slots(
    key: &SlotKey,
    siblings: &[SecondarySlot],
    unplaced_teacher_ids: &[i64],
    policy: &PlacementPolicy,
) -> Vec<SecondarySlot> {
    let mut occupied: Vec<SecondarySlot> = siblings.to_vec();
    let mut synthesized = Vec::new();

    for &teacher_id in unplaced_teacher_ids {
        let template = siblings.first();
        let duration = template
            .map(|t| t.duration_minutes())
            .filter(|d| *d > 0)
            .unwrap_or(policy.default_slot_minutes);
        let preferred_start = template.map(|t| t.start).unwrap_or(policy.day_start);
        let regime_code = template
            .map(|t| t.regime_code.clone())
            .unwrap_or_else(|| policy.default_regime_code.clone());
        let period_code = template
            .map(|t| t.period_code.clone())
            .unwrap_or_else(|| policy.default_period_code.clone());

        let (weekday, start) = find_free_position(&occupied, preferred_start, duration, policy, key);
        let end = SlotTime::from_total_minutes(start.total_minutes() + duration);

        let slot = SecondarySlot {
            discipline_code: key.discipline_code.clone(),
            group_name: key.group_name.clone(),
            weekday,
            start,
            end,
            regime_code,
            period_code,
            teacher_id,
        };
        debug!(key = %key.dimensao(), teacher_id, weekday, start = %start, end = %end, "合成插入行位");
        occupied.push(slot.clone());
        synthesized.push(slot);
    }

    synthesized
}

/// 按三级策略寻找不冲突的 (星期, 开始时刻)
fn find_free_position(
    occupied: &[SecondarySlot],
    preferred_start: SlotTime,
    duration: i32,
    policy: &PlacementPolicy,
    key: &SlotKey,
) -> (u8, SlotTime) {
    // 策略 1: 完全空闲的星期, 沿用模板时段
    for weekday in policy.weekday_min..=policy.weekday_max {
        if !occupied.iter().any(|s| s.weekday == weekday) {
            return (weekday, preferred_start);
        }
    }

    // 策略 2: 逐星期按时间序扫描 ≥ 时长的间隙
    // (日始边界→首行, 相邻行之间, 末行→日末边界)
    for weekday in policy.weekday_min..=policy.weekday_max {
        let mut day_slots: Vec<&SecondarySlot> =
            occupied.iter().filter(|s| s.weekday == weekday).collect();
        day_slots.sort_by_key(|s| s.start);

        let mut cursor = policy.day_start.total_minutes();
        for slot in &day_slots {
            if slot.start.total_minutes() - cursor >= duration {
                return (weekday, SlotTime::from_total_minutes(cursor));
            }
            cursor = cursor.max(slot.end.total_minutes());
        }
        if policy.day_end.total_minutes() - cursor >= duration {
            return (weekday, SlotTime::from_total_minutes(cursor));
        }
    }

    // 策略 3: 在最晚行之后追加, 越出日末边界则滚动到下一个星期;
    // 扫完整个星期范围仍放不下时, 接受越界时刻 (仅告警, 不拒绝)
    // 走到这里必有既有行 (否则策略 1 已命中); 无行时回到日始
    let latest = match occupied.iter().max_by_key(|s| (s.weekday, s.end)) {
        Some(slot) => slot,
        None => return (policy.weekday_min, policy.day_start),
    };

    let span = policy.weekday_max - policy.weekday_min + 1;
    let mut weekday = latest.weekday;
    for _ in 0..span {
        let last_end = occupied
            .iter()
            .filter(|s| s.weekday == weekday)
            .map(|s| s.end.total_minutes())
            .max()
            .unwrap_or(policy.day_start.total_minutes());
        if policy.day_end.total_minutes() - last_end >= duration {
            return (weekday, SlotTime::from_total_minutes(last_end));
        }
        weekday = if weekday >= policy.weekday_max {
            policy.weekday_min
        } else {
            weekday + 1
        };
    }

    // 所有星期都放不下: 挂在最晚行之后, 可能落在教学时段之外
    let fallback_start = occupied
        .iter()
        .filter(|s| s.weekday == latest.weekday)
        .map(|s| s.end.total_minutes())
        .max()
        .unwrap_or(policy.day_start.total_minutes());
    warn!(
        key = %key.dimensao(),
        weekday = latest.weekday,
        start_minutes = fallback_start,
        "无可用间隙, 插入行落在教学时段之外"
    );
    (latest.weekday, SlotTime::from_total_minutes(fallback_start))
}
