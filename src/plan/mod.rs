//! 遍历规划层
//!
//! 属性 → 等价片段集 → 贪心排序后的可执行计划。

pub mod fragment;
pub mod planner;
pub mod selectivity;
pub mod sets;

pub use fragment::Fragment;
pub use planner::{Plan, Planner};
pub use selectivity::SelectivityEstimator;
pub use sets::EquivalentFragmentSet;
