//! 变更层错误类型
//!
//! 涵盖插入与删除语句执行过程中的错误。变更错误中止同一语句中
//! 尚未应用的属性；已应用的属性不由本层回滚（回滚属于存储层事务边界）。

use thiserror::Error;

use crate::core::error::graph::GraphError;
use crate::core::types::{ConceptId, VarName};

/// 变更操作结果类型别名
pub type MutationResult<T> = Result<T, MutationError>;

/// 变更层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    /// 插入引用了未绑定的变量
    #[error("未解析的变量: {0}")]
    UnresolvedVariable(VarName),

    /// 变更目标缺少所需能力（如 has-scope 的外层概念不是 Type）
    #[error("能力不匹配: 概念 {id} 不是 {required}")]
    Capability { id: ConceptId, required: &'static str },

    /// 删除目标缺少显式 id
    #[error("删除 {property} 属性需要显式 id")]
    DeleteRequiresId { property: &'static str },

    #[error("不支持的操作: {0}")]
    UnsupportedOperation(String),

    #[error("图接口错误: {0}")]
    Graph(#[from] GraphError),
}
