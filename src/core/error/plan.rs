//! 规划层错误类型

use thiserror::Error;

/// 规划操作结果类型别名
pub type PlanResult<T> = Result<T, PlannerError>;

/// 规划层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// 等价片段集为空
    ///
    /// 只会由片段集构建器的缺陷触发；不连通模式不是错误，
    /// 规划器会为其插入新的扫描起点。
    #[error("无法规划的约束: {0}")]
    UnplannableConstraint(String),

    #[error("不支持的操作: {0}")]
    UnsupportedOperation(String),
}
