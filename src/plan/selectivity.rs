//! 选择性估计器模块
//!
//! 用于估算片段的期望中间结果规模，供规划器做贪心排序。

use std::sync::Arc;

use crate::pattern::predicate::Predicate;
use crate::plan::fragment::Fragment;
use crate::schema::stats::SchemaStatistics;

/// 选择性估计器
#[derive(Debug)]
pub struct SelectivityEstimator {
    stats: Arc<SchemaStatistics>,
}

impl SelectivityEstimator {
    /// 创建新的选择性估计器
    pub fn new(stats: Arc<SchemaStatistics>) -> Self {
        Self { stats }
    }

    /// 估计片段的选择性
    ///
    /// 默认代价乘以统计修正：扇入方向的边遍历按关系种类的平均扇出放大，
    /// 值过滤按谓词种类收缩。
    pub fn estimate(&self, fragment: &Fragment) -> f64 {
        let base = fragment.base_cost();
        match fragment {
            Fragment::IsaIn { .. } => base * self.stats.average_fanout("isa"),
            Fragment::ScopeIn { .. } => base * self.stats.average_fanout("scope"),
            Fragment::RoleIn { .. } => base * self.stats.average_fanout("role"),
            Fragment::ValueFilter { predicate, .. } => {
                base * Self::estimate_predicate_selectivity(predicate)
            }
            _ => base,
        }
    }

    /// 估计谓词选择性
    pub fn estimate_predicate_selectivity(predicate: &Predicate) -> f64 {
        match predicate {
            // 精确匹配
            Predicate::Equality(_) => 0.05,
            // 范围条件
            Predicate::Comparison(_, _) => 0.333,
            // 子串与正则的选择性较低
            Predicate::Contains(_) => 0.5,
            Predicate::Regex { .. } => 0.5,
        }
    }
}

impl Clone for SelectivityEstimator {
    fn clone(&self) -> Self {
        Self {
            stats: self.stats.clone(),
        }
    }
}
