//! 推理查询
//!
//! 原子在共享变量命名空间上的有序合取。只有推理器在重写
//! （代入规则体）时改动它；匹配路径从不改动。

use std::collections::{BTreeSet, HashMap};

use crate::core::types::VarName;
use crate::pattern::var_pattern::{Pattern, VarPattern};
use crate::reasoner::atom::Atom;

/// 原子合取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonerQuery {
    atoms: Vec<Atom>,
}

impl ReasonerQuery {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Flattened 状态：把模式降解为原子合取
    ///
    /// 支持 `to_atom` 的属性进入逻辑层；其余属性留在结构层，
    /// 不参与推理，由返回的残差列表记录。
    pub fn from_pattern(pattern: &Pattern) -> (Self, Vec<(VarName, crate::pattern::Property)>) {
        let mut atoms = Vec::new();
        let mut residual = Vec::new();
        for var in pattern.vars() {
            Self::flatten(var, pattern.vars(), &mut atoms, &mut residual);
        }
        (Self { atoms }, residual)
    }

    fn flatten(
        var: &VarPattern,
        siblings: &[VarPattern],
        atoms: &mut Vec<Atom>,
        residual: &mut Vec<(VarName, crate::pattern::Property)>,
    ) {
        for property in var.properties() {
            match property.to_atom(var, siblings) {
                Some(atom) => atoms.push(atom),
                None => residual.push((var.name().clone(), property.clone())),
            }
            for inner in property.inner_vars() {
                Self::flatten(inner, siblings, atoms, residual);
            }
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 查询的变量命名空间
    pub fn variables(&self) -> BTreeSet<VarName> {
        self.atoms
            .iter()
            .flat_map(|a| a.variables())
            .cloned()
            .collect()
    }

    /// 按映射重命名所有原子
    pub fn rename(&self, mapping: &HashMap<VarName, VarName>) -> Self {
        Self {
            atoms: self.atoms.iter().map(|a| a.rename(mapping)).collect(),
        }
    }

    /// 以 `replacement` 替换下标 `index` 处的原子，其余原子保持合取
    pub fn substituted(&self, index: usize, replacement: &ReasonerQuery) -> Self {
        let mut atoms = Vec::with_capacity(self.atoms.len() - 1 + replacement.atoms.len());
        atoms.extend(replacement.atoms.iter().cloned());
        for (i, atom) in self.atoms.iter().enumerate() {
            if i != index {
                atoms.push(atom.clone());
            }
        }
        Self { atoms }
    }

    /// 回写为结构模式，交给规划器执行
    pub fn to_pattern(&self) -> Pattern {
        let vars: Vec<VarPattern> = self.atoms.iter().flat_map(|a| a.to_var_patterns()).collect();
        Pattern::new(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ConceptId;
    use crate::pattern::property::Property;
    use crate::reasoner::atom::AtomKind;

    #[test]
    fn test_flatten_scoped_pattern() {
        let scope = VarPattern::new("y")
            .expect("变量构造失败")
            .with_property(Property::Id {
                id: ConceptId::from("thing-1"),
            });
        let x = VarPattern::new("x")
            .expect("变量构造失败")
            .with_property(Property::HasScope { scope });
        let pattern = Pattern::new(vec![x]);

        let (query, residual) = ReasonerQuery::from_pattern(&pattern);
        assert!(residual.is_empty());
        // has-scope 产出 TypeAtom，内层 id 产出 IdPredicate 原子
        assert_eq!(query.atoms().len(), 2);
        assert_eq!(query.atoms()[0].kind(), AtomKind::Type);
        assert_eq!(query.atoms()[1].kind(), AtomKind::IdPredicate);
    }

    #[test]
    fn test_substitution_preserves_remainder() {
        let a = Atom::Id(crate::reasoner::atom::IdPredicateAtom {
            var: VarName::from("x"),
            id: ConceptId::from("a"),
        });
        let b = Atom::Id(crate::reasoner::atom::IdPredicateAtom {
            var: VarName::from("y"),
            id: ConceptId::from("b"),
        });
        let query = ReasonerQuery::new(vec![a.clone(), b.clone()]);
        let replacement = ReasonerQuery::new(vec![Atom::Id(
            crate::reasoner::atom::IdPredicateAtom {
                var: VarName::from("z"),
                id: ConceptId::from("c"),
            },
        )]);
        let rewritten = query.substituted(0, &replacement);
        assert_eq!(rewritten.atoms().len(), 2);
        assert!(rewritten.atoms().contains(&b));
        assert!(!rewritten.atoms().contains(&a));
    }
}
