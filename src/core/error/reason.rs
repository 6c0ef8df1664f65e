//! 推理层错误类型
//!
//! 注意：循环守卫对重写分支的剪枝不是错误，是正常的静默终止。

use thiserror::Error;

use crate::core::error::exec::ExecError;
use crate::core::error::plan::PlannerError;
use crate::core::types::{ConceptId, VarName};

/// 推理操作结果类型别名
pub type ReasonerResult<T> = Result<T, ReasonerError>;

/// 推理层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReasonerError {
    /// 谓词原子引用的标识无法解析，整个查询失败
    #[error("无法解析的标识: 变量 {var} 引用的概念 {id} 不存在")]
    UnboundIdentity { var: VarName, id: ConceptId },

    #[error("规划错误: {0}")]
    Plan(#[from] PlannerError),

    #[error("执行错误: {0}")]
    Exec(#[from] ExecError),
}
