//! 片段规划器
//!
//! 把模式中所有属性贡献的等价片段集合并为一个全序遍历计划。
//!
//! 算法：贪心代价排序，反复在"依赖变量已被前缀绑定"的片段集中，
//! 取估算选择性最低的成员；代价相同取先声明者（先声明的变量、
//! 先声明的属性），保证相同输入产生相同计划，供缓存与可复现测试使用。
//! 不连通的模式不是错误：规划器按声明顺序为第一个未绑定变量插入
//! 无约束扫描。空片段集是构建器缺陷，报 `UnplannableConstraint`。

use std::collections::HashSet;

use rayon::prelude::*;

use crate::core::error::{PlanResult, PlannerError};
use crate::core::types::VarName;
use crate::pattern::Pattern;
use crate::plan::fragment::Fragment;
use crate::plan::selectivity::SelectivityEstimator;
use crate::plan::sets::EquivalentFragmentSet;

/// 可执行的遍历计划：片段的全序
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    fragments: Vec<Fragment>,
}

impl Plan {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

/// 片段规划器
#[derive(Debug, Clone)]
pub struct Planner {
    estimator: SelectivityEstimator,
}

impl Planner {
    /// 创建新的规划器
    pub fn new(estimator: SelectivityEstimator) -> Self {
        Self { estimator }
    }

    /// 规划单个模式
    pub fn plan(&self, pattern: &Pattern) -> PlanResult<Plan> {
        let sets = pattern.fragment_sets();
        let declared = pattern.declared_vars();
        self.plan_sets(&sets, &declared)
    }

    /// 并行规划一批相互独立的模式
    ///
    /// 编译是纯函数，批内无共享可变状态。
    pub fn plan_batch(&self, patterns: &[Pattern]) -> Vec<PlanResult<Plan>> {
        patterns.par_iter().map(|p| self.plan(p)).collect()
    }

    /// 对片段集列表做贪心排序
    ///
    /// `declared` 给出变量的声明顺序，用于平局裁决和扫描起点选择。
    pub fn plan_sets(
        &self,
        sets: &[EquivalentFragmentSet],
        declared: &[VarName],
    ) -> PlanResult<Plan> {
        for set in sets {
            if set.is_empty() {
                return Err(PlannerError::UnplannableConstraint(
                    "等价片段集为空".to_string(),
                ));
            }
        }

        let mut bound: HashSet<VarName> = HashSet::new();
        let mut remaining: Vec<&EquivalentFragmentSet> = sets.iter().collect();
        let mut chosen: Vec<Fragment> = Vec::with_capacity(sets.len());

        while !remaining.is_empty() {
            let mut best: Option<(f64, usize, usize)> = None;
            for (set_idx, set) in remaining.iter().enumerate() {
                for (frag_idx, frag) in set.fragments().iter().enumerate() {
                    if !frag.dependencies().iter().all(|v| bound.contains(*v)) {
                        continue;
                    }
                    let cost = self.estimator.estimate(frag);
                    // 严格小于：代价相同保留先遇到的候选，计划因此确定
                    if best.map_or(true, |(c, _, _)| cost < c) {
                        best = Some((cost, set_idx, frag_idx));
                    }
                }
            }

            match best {
                Some((cost, set_idx, frag_idx)) => {
                    let set = remaining.remove(set_idx);
                    let frag = set.fragments()[frag_idx].clone();
                    log::debug!("选择片段 [{}], 估算代价 {:.3}", frag, cost);
                    for v in frag.binds() {
                        bound.insert(v.clone());
                    }
                    chosen.push(frag);
                }
                None => {
                    // 不连通：开启新的扫描起点
                    let var = Self::next_scan_var(declared, &remaining, &bound);
                    match var {
                        Some(v) => {
                            log::debug!("模式不连通, 从 {} 开启新扫描", v);
                            bound.insert(v.clone());
                            chosen.push(Fragment::Scan { var: v });
                        }
                        None => {
                            // 所有变量都已绑定却仍无候选，只能是片段集自身矛盾
                            return Err(PlannerError::UnplannableConstraint(
                                "剩余片段集的依赖无法满足".to_string(),
                            ));
                        }
                    }
                }
            }
        }

        Ok(Plan { fragments: chosen })
    }

    /// 按声明顺序取第一个未绑定变量；声明序没有覆盖时退回片段集自身的变量
    fn next_scan_var(
        declared: &[VarName],
        remaining: &[&EquivalentFragmentSet],
        bound: &HashSet<VarName>,
    ) -> Option<VarName> {
        if let Some(v) = declared.iter().find(|v| !bound.contains(*v)) {
            return Some(v.clone());
        }
        for set in remaining {
            for frag in set.fragments() {
                for v in frag.dependencies() {
                    if !bound.contains(v) {
                        return Some(v.clone());
                    }
                }
            }
        }
        None
    }
}
