//! 原子与规则头的合一
//!
//! 合一成功的条件：原子种类与角色结构在变量重命名意义下一致。
//! 规则自身的变量在每次展开时替换为新鲜名字，避免与查询变量捕获。

use std::collections::HashMap;

use crate::core::types::VarName;
use crate::reasoner::atom::{Atom, RelationAtom, TypeAtom};
use crate::utils::anon_var::AnonVarGenerator;

/// 规则变量到查询变量的映射
#[derive(Debug, Clone, Default)]
pub struct Unifier {
    mapping: HashMap<VarName, VarName>,
}

impl Unifier {
    pub fn mapping(&self) -> &HashMap<VarName, VarName> {
        &self.mapping
    }

    fn bind(&mut self, rule_var: &VarName, query_var: &VarName) -> bool {
        match self.mapping.get(rule_var) {
            Some(existing) => existing == query_var,
            None => {
                self.mapping
                    .insert(rule_var.clone(), query_var.clone());
                true
            }
        }
    }

    /// 为未映射的规则变量补充新鲜名字
    pub fn complete_with_fresh(
        mut self,
        rule_vars: impl IntoIterator<Item = VarName>,
        anon: &AnonVarGenerator,
    ) -> Self {
        for var in rule_vars {
            self.mapping.entry(var).or_insert_with(|| anon.fresh());
        }
        self
    }
}

/// 尝试把查询原子与规则头合一
///
/// 标签不一致时合一失败；规则头未声明标签时按结构合一。
pub fn unify_with_head(atom: &Atom, head: &Atom) -> Option<Unifier> {
    let mut unifier = Unifier::default();
    match (atom, head) {
        (Atom::Type(a), Atom::Type(h)) => {
            if a.edge != h.edge {
                return None;
            }
            if !labels_compatible(a, h) {
                return None;
            }
            if !unifier.bind(&h.var, &a.var) {
                return None;
            }
            if !unifier.bind(&h.inner, &a.inner) {
                return None;
            }
            Some(unifier)
        }
        (Atom::Relation(a), Atom::Relation(h)) => {
            if !roles_compatible(a, h) {
                return None;
            }
            if !unifier.bind(&h.relation, &a.relation) {
                return None;
            }
            if !unifier.bind(&h.player, &a.player) {
                return None;
            }
            Some(unifier)
        }
        // 谓词原子不受规则推导
        _ => None,
    }
}

fn labels_compatible(atom: &TypeAtom, head: &TypeAtom) -> bool {
    match (&atom.label, &head.label) {
        (Some(a), Some(h)) => a == h,
        // 原子未约束标签时可以合一，答案由执行过滤
        (None, _) => true,
        // 规则头未声明标签：结论适用于任意类型
        (Some(_), None) => true,
    }
}

fn roles_compatible(atom: &RelationAtom, head: &RelationAtom) -> bool {
    match (&atom.role, &head.role) {
        (Some(a), Some(h)) => a == h,
        (None, _) => true,
        (Some(_), None) => true,
    }
}
