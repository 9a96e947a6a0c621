// ==========================================
// 课表同步系统 - 运行配置
// ==========================================
// 职责: 批次参数 (学年/批次标记/行位合成策略) 的默认值与文件装载
// 格式: JSON 文件, 缺失字段回落到默认值
// ==========================================

use crate::domain::{SlotOrder, SlotTime};
use crate::engine::reconciler::PlacementPolicy;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

// ==========================================
// ReconcileConfig - 批次配置
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 学年 (AnoLectivo)
    pub academic_year: i32,
    /// 事件备注批次标记行首
    pub annotation_tag: String,
    /// 教学日开始边界
    pub day_start: SlotTime,
    /// 教学日结束边界
    pub day_end: SlotTime,
    pub weekday_min: u8,
    pub weekday_max: u8,
    /// 组内无模板行时的插入时长 (分钟)
    pub default_slot_minutes: i32,
    pub default_regime_code: String,
    pub default_period_code: String,
    /// 贪心指派的行迭代顺序
    pub slot_order: SlotOrder,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            academic_year: 2025,
            // 批次标记带日期, 与事件备注里的历史批次可区分
            annotation_tag: format!("SYNC {}", Utc::now().format("%Y-%m-%d")),
            day_start: SlotTime::new(8, 0),
            day_end: SlotTime::new(20, 0),
            weekday_min: 1,
            weekday_max: 7,
            default_slot_minutes: 120,
            default_regime_code: String::new(),
            default_period_code: String::new(),
            slot_order: SlotOrder::Insertion,
        }
    }
}

impl ReconcileConfig {
    /// 从 JSON 文件装载; 缺失字段取默认值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        info!(path = %path.display(), academic_year = config.academic_year, "配置装载完成");
        Ok(config)
    }

    pub fn placement_policy(&self) -> PlacementPolicy {
        PlacementPolicy {
            day_start: self.day_start,
            day_end: self.day_end,
            weekday_min: self.weekday_min,
            weekday_max: self.weekday_max,
            default_slot_minutes: self.default_slot_minutes,
            default_regime_code: self.default_regime_code.clone(),
            default_period_code: self.default_period_code.clone(),
        }
    }
}
