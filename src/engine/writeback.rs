// ==========================================
// 课表同步系统 - 回写合成器
// ==========================================
// 职责: 把打好标签的对账结果翻译为外部写操作
// 映射: Keep→NoAction, 改派→Edit, 待插教师→Insert
// 约束: Edit 必须携带完整旧元组 (外部接口靠旧值定位待改行)
// ==========================================

use crate::domain::{ActionKind, GroupStatus, ReconciledGroup, SecondarySlot, SlotLabel};
use crate::engine::reconciler::{synthesize_insert_slots, PlacementPolicy};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// ==========================================
// WriteActionRecord - 单条回写动作
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteActionRecord {
    /// 本次合成批次标识
    pub run_id: Uuid,
    pub kind: ActionKind,
    /// DIMENSAO 关联键 (学科|学生组), 仅用于下游报表分组
    pub dimensao: String,
    pub discipline_code: String,
    pub group_name: String,
    /// 既有行的完整旧元组 (Edit 的定位子句; Insert 时为 None)
    pub old: Option<SecondarySlot>,
    /// 新元组 (Edit 的替换值 / Insert 的新行; NoAction 时为 None)
    pub new: Option<SecondarySlot>,
}

// ==========================================
// ExecuteRequest - 外部 RPC 调用载荷
// ==========================================

/// Execute 分发器的命名参数串 (Funcao + PEntrada + PSaida)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub funcao: String,
    pub p_entrada: String,
    pub p_saida: String,
}

const EDIT_P_SAIDA: &str = "CdHorario;CdDisc;DiaSemana;HoraInicio;HoraFim;CdSala;CdDocente;Estado";

impl WriteActionRecord {
    /// 翻译为 Execute 载荷; NoAction 不产生调用
    pub fn to_execute_request(&self, ano_lectivo: i32) -> Option<ExecuteRequest> {
        match self.kind {
            ActionKind::Edit => {
                let old = self.old.as_ref()?;
                let new = self.new.as_ref()?;
                let p_entrada = format!(
                    "AnoLectivo={};CdDisc={};DgTurma={};DiaSemana={};HoraInicio={};MinutoInicio={};HoraFim={};MinutoFim={};CdRegime={};CdPeriodo={};CdDocente={};NovoCdDocente={}",
                    ano_lectivo,
                    self.discipline_code,
                    self.group_name,
                    old.weekday,
                    old.start.hour,
                    old.start.minute,
                    old.end.hour,
                    old.end.minute,
                    old.regime_code,
                    old.period_code,
                    old.teacher_id,
                    new.teacher_id,
                );
                Some(ExecuteRequest {
                    funcao: "EditLinhaHorario".to_string(),
                    p_entrada,
                    p_saida: EDIT_P_SAIDA.to_string(),
                })
            }
            ActionKind::Insert => {
                let new = self.new.as_ref()?;
                let p_entrada = format!(
                    "AnoLectivo={};CdDisc={};DgTurma={};DiaSemana={};HoraInicio={};MinutoInicio={};HoraFim={};MinutoFim={};CdRegime={};CdPeriodo={};CdDocente={}",
                    ano_lectivo,
                    self.discipline_code,
                    self.group_name,
                    new.weekday,
                    new.start.hour,
                    new.start.minute,
                    new.end.hour,
                    new.end.minute,
                    new.regime_code,
                    new.period_code,
                    new.teacher_id,
                );
                Some(ExecuteRequest {
                    funcao: "InsLinhaHorario".to_string(),
                    p_entrada,
                    p_saida: EDIT_P_SAIDA.to_string(),
                })
            }
            ActionKind::NoAction => None,
        }
    }
}

// ==========================================
// WriteBackSynthesizer - 合成引擎
// ==========================================

// 无状态引擎
pub struct WriteBackSynthesizer;

impl WriteBackSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// 把对账结果映射为动作列表 (每条行/每位待插教师恰好一条)
    ///
    /// 插入只在 DSD>NHORARIO 的组触发; 其余 unplaced 记录仅保留在
    /// 对账输出中。NoAction 行也进入列表, 保证动作列表覆盖全部行。
    pub fn synthesize(
        &self,
        groups: &[ReconciledGroup],
        policy: &PlacementPolicy,
    ) -> Vec<WriteActionRecord> {
        let run_id = Uuid::new_v4();
        let mut actions = Vec::new();

        for group in groups {
            for reconciled in &group.slots {
                let slot = &reconciled.slot;
                let record = match &reconciled.label {
                    SlotLabel::Keep | SlotLabel::Unassigned => WriteActionRecord {
                        run_id,
                        kind: ActionKind::NoAction,
                        dimensao: group.key.dimensao(),
                        discipline_code: group.key.discipline_code.clone(),
                        group_name: group.key.group_name.clone(),
                        old: Some(slot.clone()),
                        new: None,
                    },
                    SlotLabel::Assign(teacher_id) => {
                        // 除教师外其余属性原样重发
                        let mut new_slot = slot.clone();
                        new_slot.teacher_id = *teacher_id;
                        WriteActionRecord {
                            run_id,
                            kind: ActionKind::Edit,
                            dimensao: group.key.dimensao(),
                            discipline_code: group.key.discipline_code.clone(),
                            group_name: group.key.group_name.clone(),
                            old: Some(slot.clone()),
                            new: Some(new_slot),
                        }
                    }
                };
                actions.push(record);
            }

            if group.status == GroupStatus::DsdGreater && !group.unplaced_teacher_ids.is_empty() {
                let siblings: Vec<SecondarySlot> =
                    group.slots.iter().map(|s| s.slot.clone()).collect();
                for new_slot in synthesize_insert_slots(
                    &group.key,
                    &siblings,
                    &group.unplaced_teacher_ids,
                    policy,
                ) {
                    actions.push(WriteActionRecord {
                        run_id,
                        kind: ActionKind::Insert,
                        dimensao: group.key.dimensao(),
                        discipline_code: group.key.discipline_code.clone(),
                        group_name: group.key.group_name.clone(),
                        old: None,
                        new: Some(new_slot),
                    });
                }
            }
        }

        let edits = actions.iter().filter(|a| a.kind == ActionKind::Edit).count();
        let inserts = actions.iter().filter(|a| a.kind == ActionKind::Insert).count();
        info!(
            total = actions.len(),
            edits,
            inserts,
            no_action = actions.len() - edits - inserts,
            "回写动作合成完成"
        );
        actions
    }
}

impl Default for WriteBackSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
