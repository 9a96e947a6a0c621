// ==========================================
// 课表同步系统 - 外部回写网关
// ==========================================
// 职责: 定义对 SOPHIA Execute 端点的调用 trait
// 说明: Engine 层定义 trait, 传输适配器在外部实现
// 约束: 端点返回自由文本, 引擎原样记录, 不解析不重试
// ==========================================

use crate::engine::writeback::{ExecuteRequest, WriteActionRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 网关错误
// ==========================================

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("传输失败: {0}")]
    Transport(String),
    #[error("端点拒绝调用: {0}")]
    Rejected(String),
}

// ==========================================
// WriteOutcome - 单次调用结果
// ==========================================

/// 一条动作行的调用记录; outcome 为端点自由文本, 原样保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub funcao: String,
    pub dimensao: String,
    pub outcome: String,
}

// ==========================================
// 网关 Trait
// ==========================================

/// SOPHIA 回写网关
///
/// Engine 层定义, 真实 SOAP 传输在部署侧实现。
/// 每条动作行恰好一次调用; 返回值为端点的自由文本结果。
#[async_trait]
pub trait TimetableGateway: Send + Sync {
    async fn execute(&self, request: ExecuteRequest) -> Result<String, GatewayError>;
}

/// 空操作网关 (演练模式与单元测试)
#[derive(Debug, Clone, Default)]
pub struct NoOpGateway;

#[async_trait]
impl TimetableGateway for NoOpGateway {
    async fn execute(&self, request: ExecuteRequest) -> Result<String, GatewayError> {
        debug!(funcao = %request.funcao, "NoOpGateway: 跳过外部调用");
        Ok(String::new())
    }
}

/// 记录式网关: 保存全部请求供测试断言
#[derive(Debug, Default)]
pub struct RecordingGateway {
    requests: Mutex<Vec<ExecuteRequest>>,
    /// 对每次调用返回的固定文本
    pub canned_outcome: String,
}

impl RecordingGateway {
    pub fn new(canned_outcome: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            canned_outcome: canned_outcome.into(),
        }
    }

    pub fn recorded(&self) -> Vec<ExecuteRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl TimetableGateway for RecordingGateway {
    async fn execute(&self, request: ExecuteRequest) -> Result<String, GatewayError> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
        Ok(self.canned_outcome.clone())
    }
}

// ==========================================
// 批量分发
// ==========================================

/// 依序把动作列表送入网关, 逐条记录端点结果
///
/// NoAction 行不产生调用; 单条失败记录错误文本后继续,
/// 不中断批次 (端点结果语义不透明, 没有可靠的重试依据)。
pub async fn dispatch_actions(
    gateway: &dyn TimetableGateway,
    actions: &[WriteActionRecord],
    ano_lectivo: i32,
) -> Vec<WriteOutcome> {
    let mut outcomes = Vec::new();
    for action in actions {
        let request = match action.to_execute_request(ano_lectivo) {
            Some(request) => request,
            None => continue,
        };
        let funcao = request.funcao.clone();
        let outcome = match gateway.execute(request).await {
            Ok(text) => text,
            Err(err) => format!("ERRO: {}", err),
        };
        outcomes.push(WriteOutcome {
            funcao,
            dimensao: action.dimensao.clone(),
            outcome,
        });
    }
    info!(calls = outcomes.len(), "回写批次分发完成");
    outcomes
}
