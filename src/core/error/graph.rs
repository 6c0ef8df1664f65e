//! 图接口错误类型
//!
//! 存储层通过 `GraphStore` trait 暴露的失败形态；核心只透传、不解释。

use thiserror::Error;

use crate::core::types::{ConceptId, Label};

/// 图接口操作结果类型别名
pub type GraphResult<T> = Result<T, GraphError>;

/// 图接口错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("概念不存在: {0}")]
    ConceptNotFound(ConceptId),

    #[error("标签未定义: {0}")]
    LabelNotFound(Label),

    /// 存储后端内部错误，按字符串透传以降低耦合
    #[error("存储后端错误: {0}")]
    Backend(String),
}
