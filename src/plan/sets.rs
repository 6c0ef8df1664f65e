//! 等价片段集
//!
//! 一个等价片段集对应一条逻辑约束；集合中的每个片段单独执行都能
//! 完整实施该约束，只是遍历起点不同。规划器按代价恰好选取一个成员。
//!
//! 构建器保证：(a) 同一集合内的片段逻辑等价——任选其一、丢弃其余，
//! 不改变查询的答案集；(b) 来自不同属性的集合彼此独立，除非显式
//! 共享变量名。

use crate::core::types::{ConceptId, Label, VarName};
use crate::pattern::predicate::Predicate;
use crate::plan::fragment::Fragment;

/// 等价片段集：非空、可互换的片段集合
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquivalentFragmentSet {
    fragments: Vec<Fragment>,
}

impl EquivalentFragmentSet {
    /// 由片段列表构造
    ///
    /// 空集合是构建器缺陷，规划器遇到时报 `UnplannableConstraint`。
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// 约束 "outer 以 scope 为作用域"
///
/// 正向从外层概念出发，反向从 scope 实例出发。
pub fn has_scope(start: &VarName, scope: &VarName) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![
        Fragment::ScopeOut {
            outer: start.clone(),
            scope: scope.clone(),
        },
        Fragment::ScopeIn {
            scope: scope.clone(),
            outer: start.clone(),
        },
    ])
}

/// 约束 "instance 是 type_var 的实例"
pub fn isa(instance: &VarName, type_var: &VarName) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![
        Fragment::IsaOut {
            instance: instance.clone(),
            type_var: type_var.clone(),
        },
        Fragment::IsaIn {
            type_var: type_var.clone(),
            instance: instance.clone(),
        },
    ])
}

/// 约束 "relation 经由 role 关联 player"
pub fn role_player(
    relation: &VarName,
    player: &VarName,
    role: Option<&Label>,
) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![
        Fragment::RoleOut {
            relation: relation.clone(),
            player: player.clone(),
            role: role.cloned(),
        },
        Fragment::RoleIn {
            player: player.clone(),
            relation: relation.clone(),
            role: role.cloned(),
        },
    ])
}

/// 约束 "var 的值满足谓词"
pub fn value(var: &VarName, predicate: Predicate) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![Fragment::ValueFilter {
        var: var.clone(),
        predicate,
    }])
}

/// 约束 "var 就是概念 id"
pub fn id(var: &VarName, id: ConceptId) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![Fragment::IdLookup {
        var: var.clone(),
        id,
    }])
}

/// 约束 "var 是标签为 label 的类型"
pub fn label(var: &VarName, label: Label) -> EquivalentFragmentSet {
    EquivalentFragmentSet::new(vec![Fragment::LabelLookup {
        var: var.clone(),
        label,
    }])
}
