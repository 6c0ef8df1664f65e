//! 匿名变量生成器模块 - 为规则展开提供新鲜变量
//!
//! 规则体代入查询时，规则自身的变量必须换成本次展开独有的新名字，
//! 避免与查询变量发生捕获。

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::types::VarName;

/// 匿名变量生成器
#[derive(Debug, Default)]
pub struct AnonVarGenerator {
    counter: AtomicU64,
}

impl AnonVarGenerator {
    /// 创建新的匿名变量生成器
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// 生成一个新的匿名变量名
    pub fn fresh(&self) -> VarName {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let var_name = format!("__VAR_{}", n);
        log::trace!("Build anon var: {}", var_name);
        VarName::new(var_name)
    }

    /// 检查变量名是否为匿名变量
    /// 解析器不允许用户使用以'_'开头的变量名，
    /// 以'_'开头的变量名仅由引擎内部生成。
    pub fn is_anon(var: &VarName) -> bool {
        var.as_str().starts_with('_')
    }
}
