//! 模式层错误类型
//!
//! 涵盖谓词编译与模式构造过程中的错误

use thiserror::Error;

use crate::core::value::DataType;

/// 模式操作结果类型别名
pub type PatternResult<T> = Result<T, PatternError>;

/// 模式层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// 约束规格非法（如无法编译的正则）
    #[error("非法约束: {0}")]
    InvalidConstraint(String),

    /// 谓词作用于不匹配的值域
    ///
    /// 区别于"值不存在"：值存在但类型错误必须显式失败，不能静默返回 false。
    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: DataType, actual: DataType },

    /// 变量名为空
    #[error("变量名不能为空")]
    EmptyVarName,
}
