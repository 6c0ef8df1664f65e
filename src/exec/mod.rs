//! 匹配执行器
//!
//! 按规划器给出的全序逐片段执行：后面的片段依赖前面片段产出的
//! 变量绑定，严格顺序不可重排。执行只产出绑定、不变更图，
//! 因此取消无需回滚——在片段之间检查取消令牌即可。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::error::{ExecError, ExecResult, GraphError};
use crate::core::types::{ConceptId, VarName};
use crate::graph::{Concept, GraphStore};
use crate::plan::fragment::Fragment;
use crate::plan::planner::Plan;

/// 协作式取消令牌
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 一行变量绑定
///
/// BTreeMap 保证迭代按变量名有序，绑定元组因此可直接作为去重键。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings(BTreeMap<VarName, Concept>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &VarName) -> Option<&Concept> {
        self.0.get(var)
    }

    pub fn insert(&mut self, var: VarName, concept: Concept) {
        self.0.insert(var, concept);
    }

    pub fn contains(&self, var: &VarName) -> bool {
        self.0.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VarName, &Concept)> {
        self.0.iter()
    }

    /// 投影到给定变量集
    pub fn project(&self, vars: &std::collections::BTreeSet<VarName>) -> Bindings {
        Bindings(
            self.0
                .iter()
                .filter(|(k, _)| vars.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// 绑定元组：有序的 (变量, 概念 id) 序列，作为答案去重键
    pub fn key_tuple(&self) -> Vec<(VarName, ConceptId)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.id().clone()))
            .collect()
    }

    /// 尝试把 var 绑定为 concept；与已有绑定冲突返回 None
    fn extended(&self, var: &VarName, concept: &Concept) -> Option<Bindings> {
        match self.0.get(var) {
            Some(existing) if existing == concept => Some(self.clone()),
            Some(_) => None,
            None => {
                let mut next = self.clone();
                next.0.insert(var.clone(), concept.clone());
                Some(next)
            }
        }
    }
}

/// 匹配执行器
pub struct MatchExecutor<'g, G: GraphStore> {
    graph: &'g G,
    cancel: CancelToken,
}

impl<'g, G: GraphStore> MatchExecutor<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(graph: &'g G, cancel: CancelToken) -> Self {
        Self { graph, cancel }
    }

    /// 执行计划，产出绑定行
    pub fn execute(&self, plan: &Plan) -> ExecResult<Vec<Bindings>> {
        let mut rows = vec![Bindings::new()];
        for fragment in plan.fragments() {
            if self.cancel.is_cancelled() {
                return Err(ExecError::Cancelled);
            }
            rows = self.apply(fragment, rows)?;
            log::trace!("片段 [{}] 执行后剩余 {} 行", fragment, rows.len());
            if rows.is_empty() {
                break;
            }
        }
        Ok(rows)
    }

    fn apply(&self, fragment: &Fragment, rows: Vec<Bindings>) -> ExecResult<Vec<Bindings>> {
        let wrap = |source: GraphError| ExecError::Traversal {
            fragment: fragment.to_string(),
            source,
        };
        let mut out = Vec::new();

        match fragment {
            Fragment::LabelLookup { var, label } => {
                let target = self.graph.concept_with_label(label);
                if let Some(concept) = target {
                    for row in &rows {
                        if let Some(next) = row.extended(var, &concept) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::IdLookup { var, id } => {
                let target = self.graph.concept(id);
                if let Some(concept) = target {
                    for row in &rows {
                        if let Some(next) = row.extended(var, &concept) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::IsaOut { instance, type_var } => {
                for row in &rows {
                    let start = self.bound(row, instance, fragment)?;
                    if let Some(t) = self.graph.type_of(start.id()).map_err(wrap)? {
                        if let Some(next) = row.extended(type_var, &t) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::IsaIn { type_var, instance } => {
                for row in &rows {
                    let start = self.bound(row, type_var, fragment)?;
                    for c in self.graph.instances_of(start.id()).map_err(wrap)? {
                        if let Some(next) = row.extended(instance, &c) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::ScopeOut { outer, scope } => {
                for row in &rows {
                    let start = self.bound(row, outer, fragment)?;
                    for c in self.graph.scopes_of(start.id()).map_err(wrap)? {
                        if let Some(next) = row.extended(scope, &c) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::ScopeIn { scope, outer } => {
                for row in &rows {
                    let start = self.bound(row, scope, fragment)?;
                    for c in self.graph.scoped_by(start.id()).map_err(wrap)? {
                        if let Some(next) = row.extended(outer, &c) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::RoleOut {
                relation,
                player,
                role,
            } => {
                for row in &rows {
                    let start = self.bound(row, relation, fragment)?;
                    for (entry_role, c) in self.graph.role_players(start.id()).map_err(wrap)? {
                        if let Some(required) = role {
                            if entry_role.as_ref() != Some(required) {
                                continue;
                            }
                        }
                        if let Some(next) = row.extended(player, &c) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::RoleIn {
                player,
                relation,
                role,
            } => {
                for row in &rows {
                    let start = self.bound(row, player, fragment)?;
                    for rel in self
                        .graph
                        .relations_with_player(start.id())
                        .map_err(wrap)?
                    {
                        let players = self.graph.role_players(rel.id()).map_err(wrap)?;
                        let connected = players.iter().any(|(entry_role, c)| {
                            let role_ok = match role {
                                Some(required) => entry_role.as_ref() == Some(required),
                                None => true,
                            };
                            role_ok && c.id() == start.id()
                        });
                        if !connected {
                            continue;
                        }
                        if let Some(next) = row.extended(relation, &rel) {
                            out.push(next);
                        }
                    }
                }
            }
            Fragment::ValueFilter { var, predicate } => {
                for row in &rows {
                    let start = self.bound(row, var, fragment)?;
                    match self.graph.value_of(start.id()) {
                        // 值不存在：该行不满足约束
                        None => continue,
                        Some(value) => {
                            let keep = predicate.test(&value).map_err(|source| {
                                ExecError::Predicate {
                                    fragment: fragment.to_string(),
                                    source,
                                }
                            })?;
                            if keep {
                                out.push(row.clone());
                            }
                        }
                    }
                }
            }
            Fragment::Scan { var } => {
                let all = self.graph.all_concepts().map_err(wrap)?;
                for row in &rows {
                    for c in &all {
                        if let Some(next) = row.extended(var, c) {
                            out.push(next);
                        }
                    }
                }
            }
        }

        Ok(out)
    }

    fn bound<'r>(
        &self,
        row: &'r Bindings,
        var: &VarName,
        fragment: &Fragment,
    ) -> ExecResult<&'r Concept> {
        row.get(var).ok_or_else(|| ExecError::Traversal {
            fragment: fragment.to_string(),
            source: GraphError::Backend(format!("变量 {} 未绑定", var)),
        })
    }
}
