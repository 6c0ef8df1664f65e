//! 统一错误处理系统 for SemaDB
//!
//! ## 设计理念
//!
//! 1. **分层设计**：每一层（模式、规划、执行、变更、推理、Schema、图接口）
//!    各自持有独立的错误枚举，错误语义在产生处最精确。
//! 2. **分层转换**：层间通过 `#[from]` 注解自动转换，顶层 `SemaError`
//!    保留完整错误链。
//! 3. **统一接口**：`SemaResult<T>` 提供统一的返回类型，简化错误传播。

use thiserror::Error;

// 子模块
pub mod exec;
pub mod graph;
pub mod mutate;
pub mod pattern;
pub mod plan;
pub mod reason;
pub mod schema;

// 重新导出所有错误类型
pub use exec::{ExecError, ExecResult};
pub use graph::{GraphError, GraphResult};
pub use mutate::{MutationError, MutationResult};
pub use pattern::{PatternError, PatternResult};
pub use plan::{PlanResult, PlannerError};
pub use reason::{ReasonerError, ReasonerResult};
pub use schema::{SchemaError, SchemaResult};

/// 统一的引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemaError {
    #[error("模式错误: {0}")]
    Pattern(#[from] PatternError),

    #[error("规划错误: {0}")]
    Plan(#[from] PlannerError),

    #[error("执行错误: {0}")]
    Exec(#[from] ExecError),

    #[error("变更错误: {0}")]
    Mutation(#[from] MutationError),

    #[error("推理错误: {0}")]
    Reasoner(#[from] ReasonerError),

    #[error("Schema错误: {0}")]
    Schema(#[from] SchemaError),

    #[error("图接口错误: {0}")]
    Graph(#[from] GraphError),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一的结果类型
pub type SemaResult<T> = Result<T, SemaError>;

impl From<serde_json::Error> for SemaError {
    fn from(err: serde_json::Error) -> Self {
        SemaError::Internal(err.to_string())
    }
}
