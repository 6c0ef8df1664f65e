//! 推理引擎
//!
//! 每个推理查询经历 Flattened → Unified → Expanded → Answered 四个阶段：
//! 模式降解为原子合取；原子与 Schema 规则头合一；合一成功的原子被规则体
//! 替换并与剩余原子合取，递归重写；无规则可用的叶子查询交给片段规划器
//! 对图执行，部分绑定在合取上连接。
//!
//! 终止性是显式不变量：重写路径携带一个 (原子种类, 规则 id) 访问集，
//! 同一路径上重现的组合被静默剪枝，这不是错误，而是该分支已被覆盖。
//! 同一规则仍可在兄弟分支的不同图位置上应用。
//!
//! 经由不同重写路径得到的重复答案按绑定元组抑制；抑制键的口径
//! （完整绑定或投影到请求变量）由 `DedupPolicy` 决定。

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::config::{DedupPolicy, EngineConfig};
use crate::core::error::{ExecError, ReasonerError, ReasonerResult};
use crate::core::types::{RuleId, VarName};
use crate::exec::{Bindings, CancelToken, MatchExecutor};
use crate::graph::GraphStore;
use crate::pattern::property::Property;
use crate::pattern::var_pattern::{Pattern, VarPattern};
use crate::plan::{Planner, SelectivityEstimator};
use crate::reasoner::atom::{Atom, AtomKind};
use crate::reasoner::query::ReasonerQuery;
use crate::reasoner::unify::unify_with_head;
use crate::schema::{SchemaSnapshot, SchemaStatistics};
use crate::utils::anon_var::AnonVarGenerator;

/// 推理引擎
///
/// 编译与展开是纯函数，Schema 经 `Arc` 快照共享；
/// 对图的执行通过规划器与匹配执行器进行。
pub struct ReasonerEngine<'g, G: GraphStore> {
    schema: Arc<SchemaSnapshot>,
    graph: &'g G,
    planner: Planner,
    config: EngineConfig,
    cancel: CancelToken,
    anon: AnonVarGenerator,
}

impl<'g, G: GraphStore> ReasonerEngine<'g, G> {
    pub fn new(
        schema: Arc<SchemaSnapshot>,
        stats: Arc<SchemaStatistics>,
        graph: &'g G,
    ) -> Self {
        Self {
            schema,
            graph,
            planner: Planner::new(SelectivityEstimator::new(stats)),
            config: EngineConfig::default(),
            cancel: CancelToken::new(),
            anon: AnonVarGenerator::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 回答模式查询，答案覆盖模式声明的全部变量
    pub fn answer(&self, pattern: &Pattern) -> ReasonerResult<Vec<Bindings>> {
        let requested = pattern.declared_vars();
        self.answer_selected(pattern, &requested)
    }

    /// 回答模式查询，答案投影到请求的变量
    pub fn answer_selected(
        &self,
        pattern: &Pattern,
        selected: &[VarName],
    ) -> ReasonerResult<Vec<Bindings>> {
        // Flattened
        let (query, residual) = ReasonerQuery::from_pattern(pattern);

        // 谓词原子引用的标识必须可解析，否则整个查询失败
        for atom in query.atoms() {
            if let Atom::Id(predicate) = atom {
                if self.graph.concept(&predicate.id).is_none() {
                    return Err(ReasonerError::UnboundIdentity {
                        var: predicate.var.clone(),
                        id: predicate.id.clone(),
                    });
                }
            }
        }

        let namespace: BTreeSet<VarName> = pattern.declared_vars().into_iter().collect();
        let selected_set: BTreeSet<VarName> = selected.iter().cloned().collect();

        let mut path: Vec<(AtomKind, RuleId)> = Vec::new();
        let raw = self.expand(&query, &residual, &mut path)?;

        // Answered: 投影并抑制重复答案
        let mut seen: HashSet<Vec<_>> = HashSet::new();
        let mut out = Vec::new();
        for row in raw {
            let full = row.project(&namespace);
            let answer = full.project(&selected_set);
            let key = match self.config.dedup_policy {
                DedupPolicy::FullBinding => full.key_tuple(),
                DedupPolicy::Projected => answer.key_tuple(),
            };
            if seen.insert(key) {
                out.push(answer);
            }
        }
        Ok(out)
    }

    /// Expanded 阶段：直接匹配的答案加上每条适用规则重写后的答案
    fn expand(
        &self,
        query: &ReasonerQuery,
        residual: &[(VarName, Property)],
        path: &mut Vec<(AtomKind, RuleId)>,
    ) -> ReasonerResult<Vec<Bindings>> {
        if self.cancel.is_cancelled() {
            return Err(ExecError::Cancelled.into());
        }

        // 已存储事实的直接匹配
        let mut answers = self.direct(query, residual)?;

        if path.len() >= self.config.max_expansion_depth {
            log::debug!(
                "达到最大展开深度 {}, 该分支不再重写",
                self.config.max_expansion_depth
            );
            return Ok(answers);
        }

        for (index, atom) in query.atoms().iter().enumerate() {
            for rule in self.schema.rules_for(atom.kind()) {
                let pair = (atom.kind(), rule.id.clone());
                if path.contains(&pair) {
                    // 同一路径上已覆盖的分支，静默剪枝
                    log::trace!("剪枝已覆盖分支: ({}, {})", pair.0, pair.1);
                    continue;
                }

                // Unified
                let Some(unifier) = unify_with_head(atom, rule.head()) else {
                    continue;
                };
                let (body, body_residual) = ReasonerQuery::from_pattern(&rule.when);
                let unifier = unifier.complete_with_fresh(body.variables(), &self.anon);
                let renamed_body = body.rename(unifier.mapping());

                let mut merged_residual = residual.to_vec();
                for (var, property) in body_residual {
                    let renamed_var = unifier
                        .mapping()
                        .get(&var)
                        .cloned()
                        .unwrap_or(var);
                    merged_residual.push((renamed_var, property));
                }

                // 规则体替换原子，与剩余原子合取
                let rewritten = query.substituted(index, &renamed_body);
                log::debug!(
                    "原子 [{}] 与规则 {} 合一, 重写为 {} 个原子",
                    atom,
                    rule.id,
                    rewritten.atoms().len()
                );

                path.push(pair);
                let sub = self.expand(&rewritten, &merged_residual, path)?;
                path.pop();
                answers.extend(sub);
            }
        }

        Ok(answers)
    }

    /// Answered 阶段的叶子执行：回写为结构模式，规划并对图执行
    fn direct(
        &self,
        query: &ReasonerQuery,
        residual: &[(VarName, Property)],
    ) -> ReasonerResult<Vec<Bindings>> {
        if query.is_empty() && residual.is_empty() {
            return Ok(Vec::new());
        }
        let mut vars: Vec<VarPattern> = query.to_pattern().vars().to_vec();
        for (name, property) in residual {
            match vars.iter_mut().find(|v| v.name() == name) {
                Some(var) => *var = var.clone().with_property(property.clone()),
                None => {
                    vars.push(VarPattern::from_var(name.clone()).with_property(property.clone()))
                }
            }
        }
        let pattern = Pattern::new(vars);
        let plan = self.planner.plan(&pattern)?;
        let rows = MatchExecutor::with_cancel(self.graph, self.cancel.clone()).execute(&plan)?;
        Ok(rows)
    }
}
