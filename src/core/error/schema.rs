//! Schema 层错误类型
//!
//! Schema 完整性错误在加载时检出，对该次加载致命；查询期不会出现。

use thiserror::Error;

use crate::core::types::{Label, RuleId};

/// Schema 操作结果类型别名
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema 层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("规则 {rule} 引用了未声明的标签: {label}")]
    UndeclaredLabel { rule: RuleId, label: Label },

    #[error("重复声明的标签: {0}")]
    DuplicateLabel(Label),

    /// 规则结论无法降解为逻辑原子
    #[error("规则 {0} 的结论不可原子化")]
    InvalidRuleHead(RuleId),
}
