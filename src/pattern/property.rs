//! 模式属性
//!
//! 属性是附着在模式变量上的单条约束。封闭的变体集合配合穷尽匹配：
//! 匹配（贡献片段集）、插入、删除、原子化都是对变体的一次 match 分发。
//! 属性一经构造不可变，相等性与哈希完全由变体加载荷决定，
//! 相同约束在片段集去重时据此合并。

use crate::core::error::{MutationError, MutationResult};
use crate::core::types::{ConceptId, Label, VarName};
use crate::graph::{Concept, GraphStore};
use crate::mutation::InsertExecutor;
use crate::pattern::predicate::Predicate;
use crate::pattern::var_pattern::VarPattern;
use crate::plan::sets::{self, EquivalentFragmentSet};
use crate::reasoner::atom::{
    Atom, IdPredicateAtom, RelationAtom, TypeAtom, TypeEdge, ValuePredicateAtom,
};

/// 模式属性变体
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    /// 类型标签：变量是名为 label 的 Schema 类型
    TypeLabel { label: Label },
    /// 显式标识：变量就是概念 id
    Id { id: ConceptId },
    /// 类型隶属：变量是内层类型模式的实例
    Isa { type_pattern: VarPattern },
    /// 作用域：变量（Type）以内层实例为 scope
    HasScope { scope: VarPattern },
    /// 值约束
    Value { predicate: Predicate },
    /// 关系角色：变量（Relation）经由 role 关联内层参与者
    RolePlayer {
        role: Option<Label>,
        player: VarPattern,
    },
}

impl Property {
    /// 属性名，用于打印与诊断
    pub fn name(&self) -> &'static str {
        match self {
            Property::TypeLabel { .. } => "label",
            Property::Id { .. } => "id",
            Property::Isa { .. } => "isa",
            Property::HasScope { .. } => "has-scope",
            Property::Value { .. } => "value",
            Property::RolePlayer { .. } => "role-player",
        }
    }

    /// 属性值的可打印形式
    pub fn printable_value(&self) -> String {
        match self {
            Property::TypeLabel { label } => label.to_string(),
            Property::Id { id } => id.to_string(),
            Property::Isa { type_pattern } => type_pattern.printable_name(),
            Property::HasScope { scope } => scope.printable_name(),
            Property::Value { predicate } => predicate.canonical_form(),
            Property::RolePlayer { role, player } => match role {
                Some(r) => format!("({}: {})", r, player.printable_name()),
                None => player.printable_name(),
            },
        }
    }

    /// 直接内层变量（有限、可重新遍历的序列）
    pub fn inner_vars(&self) -> Vec<&VarPattern> {
        match self {
            Property::Isa { type_pattern } => vec![type_pattern],
            Property::HasScope { scope } => vec![scope],
            Property::RolePlayer { player, .. } => vec![player],
            Property::TypeLabel { .. } | Property::Id { .. } | Property::Value { .. } => Vec::new(),
        }
    }

    /// 贡献匹配片段集
    ///
    /// 纯函数：同一属性实例对同一起点变量总是产出结构相等的片段集。
    pub fn match_fragments(&self, start: &VarName) -> Vec<EquivalentFragmentSet> {
        match self {
            Property::TypeLabel { label } => vec![sets::label(start, label.clone())],
            Property::Id { id } => vec![sets::id(start, id.clone())],
            Property::Isa { type_pattern } => vec![sets::isa(start, type_pattern.name())],
            Property::HasScope { scope } => vec![sets::has_scope(start, scope.name())],
            Property::Value { predicate } => vec![sets::value(start, predicate.clone())],
            Property::RolePlayer { role, player } => {
                vec![sets::role_player(start, player.name(), role.as_ref())]
            }
        }
    }

    /// 插入语义
    ///
    /// `concept` 是执行器已为外层变量物化的概念。引用内层变量的属性
    /// 先经执行器的变量表解析；解析失败让整条语句在任何图写入前中止。
    pub fn insert<G: GraphStore>(
        &self,
        executor: &mut InsertExecutor<'_, G>,
        concept: &Concept,
    ) -> MutationResult<()> {
        match self {
            // 标签、id、isa 参与概念物化，物化完成后无事可做
            Property::TypeLabel { .. } | Property::Id { .. } | Property::Isa { .. } => Ok(()),
            Property::HasScope { scope } => {
                let scope_concept = executor.resolve(scope)?;
                let scope_instance = scope_concept.as_instance()?;
                let outer = concept.as_type()?;
                executor
                    .graph_mut()
                    .apply_scope(outer.id(), scope_instance.id())?;
                Ok(())
            }
            Property::Value { predicate } => match predicate {
                Predicate::Equality(value) => {
                    executor.graph_mut().set_value(concept.id(), value.clone())?;
                    Ok(())
                }
                other => Err(MutationError::UnsupportedOperation(format!(
                    "插入不支持非等值谓词: {}",
                    other
                ))),
            },
            Property::RolePlayer { role, player } => {
                let player_concept = executor.resolve(player)?;
                let player_instance = player_concept.as_instance()?;
                let relation = concept.as_relation()?;
                executor.graph_mut().add_role_player(
                    relation.id(),
                    role.as_ref(),
                    player_instance.id(),
                )?;
                Ok(())
            }
        }
    }

    /// 删除语义
    ///
    /// has-scope 要求内层模式携带显式 id；对不存在的关系删除是无操作。
    pub fn delete<G: GraphStore>(&self, graph: &mut G, concept: &Concept) -> MutationResult<()> {
        match self {
            Property::HasScope { scope } => {
                let scope_id = scope
                    .fixed_id()
                    .ok_or(MutationError::DeleteRequiresId {
                        property: "has-scope",
                    })?;
                let outer = concept.as_type()?;
                match graph.concept(scope_id) {
                    Some(scope_concept) => {
                        graph.remove_scope(outer.id(), scope_concept.id())?;
                        Ok(())
                    }
                    // scope 概念已不在图中，视为已删除
                    None => Ok(()),
                }
            }
            // 标签与 id 是寻址信息，不是可删除的事实
            Property::TypeLabel { .. } | Property::Id { .. } => Ok(()),
            Property::Isa { .. } | Property::Value { .. } | Property::RolePlayer { .. } => {
                Err(MutationError::UnsupportedOperation(format!(
                    "属性 {} 不支持删除",
                    self.name()
                )))
            }
        }
    }

    /// 降解为逻辑原子
    ///
    /// 只有具备逻辑含义的变体产出原子；内层变量携带固定标识时，
    /// 原子附带对应的 IdPredicate，使推理器能把"已绑定的类型/作用域"
    /// 当作可选择的约束。
    pub fn to_atom(&self, var: &VarPattern, siblings: &[VarPattern]) -> Option<Atom> {
        match self {
            Property::Isa { type_pattern } => Some(Atom::Type(TypeAtom {
                var: var.name().clone(),
                inner: type_pattern.name().clone(),
                edge: TypeEdge::Isa,
                label: label_for(type_pattern, siblings),
                id_predicate: id_predicate_for(type_pattern, siblings),
            })),
            Property::HasScope { scope } => Some(Atom::Type(TypeAtom {
                var: var.name().clone(),
                inner: scope.name().clone(),
                edge: TypeEdge::HasScope,
                label: label_for(scope, siblings),
                id_predicate: id_predicate_for(scope, siblings),
            })),
            Property::RolePlayer { role, player } => Some(Atom::Relation(RelationAtom {
                relation: var.name().clone(),
                player: player.name().clone(),
                role: role.clone(),
            })),
            Property::Value { predicate } => Some(Atom::Value(ValuePredicateAtom {
                var: var.name().clone(),
                predicate: predicate.clone(),
            })),
            Property::Id { id } => Some(Atom::Id(IdPredicateAtom {
                var: var.name().clone(),
                id: id.clone(),
            })),
            // 标签属性描述的是类型变量自身，留在结构层匹配
            Property::TypeLabel { .. } => None,
        }
    }
}

/// 从内层模式或同名兄弟变量提取 IdPredicate
fn id_predicate_for(inner: &VarPattern, siblings: &[VarPattern]) -> Option<IdPredicateAtom> {
    let id = inner.fixed_id().or_else(|| {
        siblings
            .iter()
            .find(|s| s.name() == inner.name())
            .and_then(|s| s.fixed_id())
    })?;
    Some(IdPredicateAtom {
        var: inner.name().clone(),
        id: id.clone(),
    })
}

/// 从内层模式或同名兄弟变量提取类型标签
fn label_for(inner: &VarPattern, siblings: &[VarPattern]) -> Option<Label> {
    inner
        .type_label()
        .or_else(|| {
            siblings
                .iter()
                .find(|s| s.name() == inner.name())
                .and_then(|s| s.type_label())
        })
        .cloned()
}
