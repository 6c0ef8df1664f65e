//! Schema 层
//!
//! 类型、关系种类与规则的只读定义。`SchemaBuilder` 在加载时校验
//! 完整性（规则引用的标签必须已声明、规则结论必须可原子化），
//! 校验失败对该次加载致命；查询期拿到的 `SchemaSnapshot` 是
//! 事实不可变的快照，经 `Arc` 共享，查询中途不会观察到 Schema 变化。

pub mod stats;

pub use stats::{EdgeStatistics, SchemaStatistics, TypeStatistics};

use std::collections::HashMap;

use crate::core::error::{SchemaError, SchemaResult};
use crate::core::types::{Label, RuleId};
use crate::pattern::property::Property;
use crate::pattern::var_pattern::{Pattern, VarPattern};
use crate::reasoner::atom::{Atom, AtomKind};

/// 类型定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub label: Label,
}

/// 关系种类定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    pub label: Label,
    pub roles: Vec<Label>,
}

/// 规则定义：body（when）成立时可推出 head（then）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub id: RuleId,
    pub when: Pattern,
    pub then: VarPattern,
    /// 结论降解出的原子，构建时计算，供合一使用
    head: Atom,
}

impl RuleDef {
    pub fn head(&self) -> &Atom {
        &self.head
    }
}

/// Schema 快照
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    types: HashMap<Label, TypeDef>,
    relations: HashMap<Label, RelationDef>,
    rules: Vec<RuleDef>,
}

impl SchemaSnapshot {
    pub fn type_def(&self, label: &Label) -> Option<&TypeDef> {
        self.types.get(label)
    }

    pub fn relation_def(&self, label: &Label) -> Option<&RelationDef> {
        self.relations.get(label)
    }

    pub fn contains_label(&self, label: &Label) -> bool {
        self.types.contains_key(label) || self.relations.contains_key(label)
    }

    pub fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    /// 枚举结论种类与给定原子种类一致的规则
    pub fn rules_for(&self, kind: AtomKind) -> Vec<&RuleDef> {
        self.rules
            .iter()
            .filter(|r| r.head().kind() == kind)
            .collect()
    }
}

/// Schema 构建器
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<Label>,
    relations: Vec<(Label, Vec<Label>)>,
    rules: Vec<(RuleId, Pattern, VarPattern)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_type(mut self, label: impl Into<Label>) -> Self {
        self.types.push(label.into());
        self
    }

    pub fn define_relation(mut self, label: impl Into<Label>, roles: Vec<Label>) -> Self {
        self.relations.push((label.into(), roles));
        self
    }

    pub fn define_rule(mut self, id: impl Into<RuleId>, when: Pattern, then: VarPattern) -> Self {
        self.rules.push((id.into(), when, then));
        self
    }

    /// 校验并构建快照
    pub fn build(self) -> SchemaResult<SchemaSnapshot> {
        let mut types = HashMap::new();
        let mut relations = HashMap::new();

        for label in self.types {
            if types.contains_key(&label) {
                return Err(SchemaError::DuplicateLabel(label));
            }
            types.insert(label.clone(), TypeDef { label });
        }
        for (label, roles) in self.relations {
            if types.contains_key(&label) || relations.contains_key(&label) {
                return Err(SchemaError::DuplicateLabel(label));
            }
            relations.insert(label.clone(), RelationDef { label, roles });
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (id, when, then) in self.rules {
            Self::validate_labels(&id, &when, &types, &relations)?;
            let then_pattern = Pattern::new(vec![then.clone()]);
            Self::validate_labels(&id, &then_pattern, &types, &relations)?;

            let head = then
                .properties()
                .iter()
                .find_map(|p| p.to_atom(&then, when.vars()))
                .ok_or_else(|| SchemaError::InvalidRuleHead(id.clone()))?;
            log::debug!("加载规则 {}, 结论原子 [{}]", id, head);
            rules.push(RuleDef {
                id,
                when,
                then,
                head,
            });
        }

        Ok(SchemaSnapshot {
            types,
            relations,
            rules,
        })
    }

    /// 规则引用的标签与角色必须已声明
    fn validate_labels(
        rule: &RuleId,
        pattern: &Pattern,
        types: &HashMap<Label, TypeDef>,
        relations: &HashMap<Label, RelationDef>,
    ) -> SchemaResult<()> {
        for (_, property) in pattern.all_constraints() {
            match property {
                Property::TypeLabel { label } => {
                    if !types.contains_key(label) && !relations.contains_key(label) {
                        return Err(SchemaError::UndeclaredLabel {
                            rule: rule.clone(),
                            label: label.clone(),
                        });
                    }
                }
                Property::RolePlayer {
                    role: Some(role), ..
                } => {
                    let declared = relations.values().any(|r| r.roles.contains(role));
                    if !declared {
                        return Err(SchemaError::UndeclaredLabel {
                            rule: rule.clone(),
                            label: role.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
