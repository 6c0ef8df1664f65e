//! 逻辑原子
//!
//! 原子是作用在一个或多个变量上的逻辑命题，由属性降解而来，
//! 一经构造不可变。合一按 (种类, 角色结构, 引用的 Schema 标识) 定键。

use std::fmt;

use crate::core::types::{ConceptId, Label, VarName};
use crate::pattern::predicate::Predicate;
use crate::pattern::property::Property;
use crate::pattern::var_pattern::VarPattern;

/// 原子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Type,
    Relation,
    IdPredicate,
    ValuePredicate,
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtomKind::Type => "type",
            AtomKind::Relation => "relation",
            AtomKind::IdPredicate => "id-predicate",
            AtomKind::ValuePredicate => "value-predicate",
        };
        write!(f, "{}", name)
    }
}

/// TypeAtom 断言的关系边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeEdge {
    Isa,
    HasScope,
}

/// 类型原子：`var` 与 `inner` 之间的类型性关系（isa / has-scope）
///
/// 内层变量指向固定标识时附带 IdPredicate，推理器据此把
/// "已绑定的类型/作用域"当作可选择的约束。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeAtom {
    pub var: VarName,
    pub inner: VarName,
    pub edge: TypeEdge,
    pub label: Option<Label>,
    pub id_predicate: Option<IdPredicateAtom>,
}

/// 关系原子：`relation` 经由 `role` 关联 `player`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationAtom {
    pub relation: VarName,
    pub player: VarName,
    pub role: Option<Label>,
}

/// 标识谓词原子：`var` 就是概念 `id`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdPredicateAtom {
    pub var: VarName,
    pub id: ConceptId,
}

/// 值谓词原子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuePredicateAtom {
    pub var: VarName,
    pub predicate: Predicate,
}

/// 逻辑原子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Type(TypeAtom),
    Relation(RelationAtom),
    Id(IdPredicateAtom),
    Value(ValuePredicateAtom),
}

impl Atom {
    pub fn kind(&self) -> AtomKind {
        match self {
            Atom::Type(_) => AtomKind::Type,
            Atom::Relation(_) => AtomKind::Relation,
            Atom::Id(_) => AtomKind::IdPredicate,
            Atom::Value(_) => AtomKind::ValuePredicate,
        }
    }

    /// 原子涉及的变量
    pub fn variables(&self) -> Vec<&VarName> {
        match self {
            Atom::Type(a) => vec![&a.var, &a.inner],
            Atom::Relation(a) => vec![&a.relation, &a.player],
            Atom::Id(a) => vec![&a.var],
            Atom::Value(a) => vec![&a.var],
        }
    }

    /// 按映射重命名变量；映射之外的变量保持原名
    pub fn rename(&self, mapping: &std::collections::HashMap<VarName, VarName>) -> Atom {
        let m = |v: &VarName| mapping.get(v).cloned().unwrap_or_else(|| v.clone());
        match self {
            Atom::Type(a) => Atom::Type(TypeAtom {
                var: m(&a.var),
                inner: m(&a.inner),
                edge: a.edge,
                label: a.label.clone(),
                id_predicate: a.id_predicate.as_ref().map(|p| IdPredicateAtom {
                    var: m(&p.var),
                    id: p.id.clone(),
                }),
            }),
            Atom::Relation(a) => Atom::Relation(RelationAtom {
                relation: m(&a.relation),
                player: m(&a.player),
                role: a.role.clone(),
            }),
            Atom::Id(a) => Atom::Id(IdPredicateAtom {
                var: m(&a.var),
                id: a.id.clone(),
            }),
            Atom::Value(a) => Atom::Value(ValuePredicateAtom {
                var: m(&a.var),
                predicate: a.predicate.clone(),
            }),
        }
    }

    /// 回写为结构模式，供叶子查询交给规划器执行
    pub fn to_var_patterns(&self) -> Vec<VarPattern> {
        match self {
            Atom::Type(a) => {
                let mut inner = VarPattern::from_var(a.inner.clone());
                if let Some(label) = &a.label {
                    inner = inner.with_property(Property::TypeLabel {
                        label: label.clone(),
                    });
                }
                if let Some(id_pred) = &a.id_predicate {
                    inner = inner.with_property(Property::Id {
                        id: id_pred.id.clone(),
                    });
                }
                let property = match a.edge {
                    TypeEdge::Isa => Property::Isa {
                        type_pattern: inner,
                    },
                    TypeEdge::HasScope => Property::HasScope { scope: inner },
                };
                vec![VarPattern::from_var(a.var.clone()).with_property(property)]
            }
            Atom::Relation(a) => {
                vec![
                    VarPattern::from_var(a.relation.clone()).with_property(Property::RolePlayer {
                        role: a.role.clone(),
                        player: VarPattern::from_var(a.player.clone()),
                    }),
                ]
            }
            Atom::Id(a) => vec![VarPattern::from_var(a.var.clone()).with_property(Property::Id {
                id: a.id.clone(),
            })],
            Atom::Value(a) => {
                vec![
                    VarPattern::from_var(a.var.clone()).with_property(Property::Value {
                        predicate: a.predicate.clone(),
                    }),
                ]
            }
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Type(a) => {
                let edge = match a.edge {
                    TypeEdge::Isa => "isa",
                    TypeEdge::HasScope => "has-scope",
                };
                match &a.label {
                    Some(l) => write!(f, "{} {} {}({})", a.var, edge, a.inner, l),
                    None => write!(f, "{} {} {}", a.var, edge, a.inner),
                }
            }
            Atom::Relation(a) => match &a.role {
                Some(r) => write!(f, "{} ({}: {})", a.relation, r, a.player),
                None => write!(f, "{} (?: {})", a.relation, a.player),
            },
            Atom::Id(a) => write!(f, "{} id {}", a.var, a.id),
            Atom::Value(a) => write!(f, "{} value {}", a.var, a.predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_rename_respects_mapping() {
        let atom = Atom::Type(TypeAtom {
            var: VarName::from("b"),
            inner: VarName::from("t"),
            edge: TypeEdge::Isa,
            label: Some(Label::from("Child")),
            id_predicate: None,
        });
        let mut mapping = HashMap::new();
        mapping.insert(VarName::from("b"), VarName::from("z"));
        let renamed = atom.rename(&mapping);
        assert_eq!(renamed.variables()[0], &VarName::from("z"));
        // 映射之外的变量不变
        assert_eq!(renamed.variables()[1], &VarName::from("t"));
    }

    #[test]
    fn test_to_var_patterns_roundtrip_kind() {
        let atom = Atom::Type(TypeAtom {
            var: VarName::from("x"),
            inner: VarName::from("y"),
            edge: TypeEdge::HasScope,
            label: None,
            id_predicate: Some(IdPredicateAtom {
                var: VarName::from("y"),
                id: ConceptId::from("thing-1"),
            }),
        });
        let patterns = atom.to_var_patterns();
        assert_eq!(patterns.len(), 1);
        let inner = &patterns[0].inner_vars()[0];
        assert_eq!(inner.fixed_id(), Some(&ConceptId::from("thing-1")));
    }
}
