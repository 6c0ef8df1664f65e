//! 执行层错误类型

use thiserror::Error;

use crate::core::error::graph::GraphError;
use crate::core::error::pattern::PatternError;

/// 执行操作结果类型别名
pub type ExecResult<T> = Result<T, ExecError>;

/// 执行层错误类型
///
/// 遍历失败时携带触发它的片段上下文，便于诊断。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecError {
    /// 协作式取消：在计划步骤之间检查取消令牌
    #[error("查询已取消")]
    Cancelled,

    #[error("片段 [{fragment}] 遍历失败: {source}")]
    Traversal {
        fragment: String,
        #[source]
        source: GraphError,
    },

    #[error("片段 [{fragment}] 谓词求值失败: {source}")]
    Predicate {
        fragment: String,
        #[source]
        source: PatternError,
    },
}
