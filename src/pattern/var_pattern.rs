//! 模式变量
//!
//! `VarPattern` 是一个变量名加上附着其上的有序属性集；`Pattern` 是
//! 一次查询/变更的全部变量。两者由外部解析器构造，核心只读消费。

use crate::core::error::{PatternError, PatternResult};
use crate::core::types::{ConceptId, Label, VarName};
use crate::pattern::property::Property;
use crate::plan::sets::EquivalentFragmentSet;

/// 带属性的模式变量
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarPattern {
    name: VarName,
    properties: Vec<Property>,
}

impl VarPattern {
    /// 创建模式变量；变量名为空被拒绝
    pub fn new(name: impl Into<VarName>) -> PatternResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(PatternError::EmptyVarName);
        }
        Ok(Self {
            name,
            properties: Vec::new(),
        })
    }

    /// 由已校验的变量名直接构造
    ///
    /// 供引擎内部（规则展开、原子回写）使用，调用方保证名字非空。
    pub fn from_var(name: VarName) -> Self {
        Self {
            name,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &VarName {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// 可打印的变量名（`$x`）
    pub fn printable_name(&self) -> String {
        self.name.to_string()
    }

    /// 直接内层变量（有限、可重新遍历）
    pub fn inner_vars(&self) -> Vec<&VarPattern> {
        self.properties.iter().flat_map(|p| p.inner_vars()).collect()
    }

    /// 显式 id 属性的值
    pub fn fixed_id(&self) -> Option<&ConceptId> {
        self.properties.iter().find_map(|p| match p {
            Property::Id { id } => Some(id),
            _ => None,
        })
    }

    /// 标签属性的值
    pub fn type_label(&self) -> Option<&Label> {
        self.properties.iter().find_map(|p| match p {
            Property::TypeLabel { label } => Some(label),
            _ => None,
        })
    }

    /// isa 属性携带的类型模式
    pub fn isa_pattern(&self) -> Option<&VarPattern> {
        self.properties.iter().find_map(|p| match p {
            Property::Isa { type_pattern } => Some(type_pattern),
            _ => None,
        })
    }
}

/// 一次查询/变更的模式：变量的有序集合
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    vars: Vec<VarPattern>,
}

impl Pattern {
    pub fn new(vars: Vec<VarPattern>) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &[VarPattern] {
        &self.vars
    }

    /// 全部 (变量, 属性) 约束对，含内层变量，按声明顺序
    pub fn all_constraints(&self) -> Vec<(&VarName, &Property)> {
        let mut out = Vec::new();
        for var in &self.vars {
            Self::collect(var, &mut out);
        }
        out
    }

    fn collect<'a>(var: &'a VarPattern, out: &mut Vec<(&'a VarName, &'a Property)>) {
        for property in var.properties() {
            out.push((var.name(), property));
            for inner in property.inner_vars() {
                Self::collect(inner, out);
            }
        }
    }

    /// 变量声明顺序（首次出现为准，含内层变量）
    pub fn declared_vars(&self) -> Vec<VarName> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        let mut stack: Vec<&VarPattern> = Vec::new();
        for var in self.vars.iter().rev() {
            stack.push(var);
        }
        while let Some(var) = stack.pop() {
            if seen.insert(var.name().clone()) {
                out.push(var.name().clone());
            }
            let inners = var.inner_vars();
            for inner in inners.into_iter().rev() {
                stack.push(inner);
            }
        }
        out
    }

    /// 汇总全部属性的等价片段集
    ///
    /// 相同的约束（结构相等的集合）只保留首个，属性的结构化相等
    /// 保证重复约束在此处合并。
    pub fn fragment_sets(&self) -> Vec<EquivalentFragmentSet> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (var, property) in self.all_constraints() {
            for set in property.match_fragments(var) {
                if seen.insert(set.clone()) {
                    out.push(set);
                }
            }
        }
        out
    }

    /// 模式的规范串形式，作为计划缓存键
    ///
    /// 谓词的规范串是稳定的，因此整个模式的规范串也稳定。
    pub fn canonical_form(&self) -> String {
        let parts: Vec<String> = self
            .all_constraints()
            .iter()
            .map(|(var, property)| {
                format!("{} {} {}", var, property.name(), property.printable_value())
            })
            .collect();
        parts.join("; ")
    }
}
