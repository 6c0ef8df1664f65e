//! 变更执行器
//!
//! 插入/删除绕过规划器，直接按属性的变更契约逐条作用于图接口。
//! 单条语句内的执行是串行的，触及同一外层概念的变更天然被序列化。
//! 错误中止同一语句中尚未应用的属性；已应用的属性不在本层回滚。

use std::collections::HashMap;

use crate::core::error::{GraphError, MutationError, MutationResult};
use crate::core::types::VarName;
use crate::graph::{Concept, GraphStore};
use crate::pattern::var_pattern::VarPattern;

/// 插入执行器
///
/// 维护本次语句的变量到概念表：先为每个变量物化概念，
/// 再应用各属性的插入语义。物化阶段出错时没有任何图写入发生。
pub struct InsertExecutor<'g, G: GraphStore> {
    graph: &'g mut G,
    table: HashMap<VarName, Concept>,
}

impl<'g, G: GraphStore> InsertExecutor<'g, G> {
    pub fn new(graph: &'g mut G) -> Self {
        Self {
            graph,
            table: HashMap::new(),
        }
    }

    pub fn graph_mut(&mut self) -> &mut G {
        self.graph
    }

    /// 解析内层变量到概念
    ///
    /// 先查本语句的变量表，再按显式 id 查图；两者皆无 → 未解析变量。
    pub fn resolve(&self, pattern: &VarPattern) -> MutationResult<Concept> {
        if let Some(concept) = self.table.get(pattern.name()) {
            return Ok(concept.clone());
        }
        if let Some(id) = pattern.fixed_id() {
            return self
                .graph
                .concept(id)
                .ok_or_else(|| MutationError::Graph(GraphError::ConceptNotFound(id.clone())));
        }
        Err(MutationError::UnresolvedVariable(pattern.name().clone()))
    }

    /// 执行整条插入语句
    pub fn insert_all(&mut self, patterns: &[VarPattern]) -> MutationResult<Vec<Concept>> {
        // 阶段一：物化每个变量的概念并登记变量表
        let mut ordered = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let concept = self.materialize(pattern)?;
            self.table.insert(pattern.name().clone(), concept.clone());
            ordered.push(concept);
        }

        // 阶段二：应用各属性的插入语义
        for (pattern, concept) in patterns.iter().zip(ordered.iter()) {
            for property in pattern.properties() {
                property.insert(self, concept)?;
            }
        }

        log::debug!("插入语句完成, 物化 {} 个概念", ordered.len());
        Ok(ordered)
    }

    /// 为单个变量物化概念
    ///
    /// 优先级：显式 id 查找 > 标签定义类型 > isa 创建实例。
    fn materialize(&mut self, pattern: &VarPattern) -> MutationResult<Concept> {
        if let Some(id) = pattern.fixed_id() {
            return self
                .graph
                .concept(id)
                .ok_or_else(|| MutationError::Graph(GraphError::ConceptNotFound(id.clone())));
        }
        if let Some(label) = pattern.type_label() {
            return Ok(self.graph.put_type(label)?);
        }
        if let Some(type_pattern) = pattern.isa_pattern() {
            let type_concept = self.resolve_type(type_pattern)?;
            let type_concept = type_concept.as_type()?;
            return Ok(self.graph.put_instance(type_concept.id())?);
        }
        Err(MutationError::UnresolvedVariable(pattern.name().clone()))
    }

    fn resolve_type(&self, type_pattern: &VarPattern) -> MutationResult<Concept> {
        if let Some(concept) = self.table.get(type_pattern.name()) {
            return Ok(concept.clone());
        }
        if let Some(label) = type_pattern.type_label() {
            return self
                .graph
                .concept_with_label(label)
                .ok_or_else(|| MutationError::Graph(GraphError::LabelNotFound(label.clone())));
        }
        if let Some(id) = type_pattern.fixed_id() {
            return self
                .graph
                .concept(id)
                .ok_or_else(|| MutationError::Graph(GraphError::ConceptNotFound(id.clone())));
        }
        Err(MutationError::UnresolvedVariable(type_pattern.name().clone()))
    }
}

/// 删除执行器
pub struct DeleteExecutor<'g, G: GraphStore> {
    graph: &'g mut G,
}

impl<'g, G: GraphStore> DeleteExecutor<'g, G> {
    pub fn new(graph: &'g mut G) -> Self {
        Self { graph }
    }

    /// 执行整条删除语句
    ///
    /// 删除目标按显式 id 定位；目标概念已不存在时整个模式视为已删除
    /// （幂等）。属性级删除遵循各变体的删除契约。
    pub fn delete_all(&mut self, patterns: &[VarPattern]) -> MutationResult<()> {
        for pattern in patterns {
            let id = pattern
                .fixed_id()
                .ok_or(MutationError::DeleteRequiresId { property: "delete" })?;
            let concept = match self.graph.concept(id) {
                Some(c) => c,
                None => continue,
            };
            for property in pattern.properties() {
                property.delete(self.graph, &concept)?;
            }
        }
        Ok(())
    }
}
