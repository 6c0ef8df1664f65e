//! 内存图实现
//!
//! HashMap 支撑的 `GraphStore`，供测试夹具与内嵌调用方使用。
//! 邻接表用 Vec 保存并在枚举时按 id 排序，保证遍历顺序可复现。

use std::collections::HashMap;

use crate::core::error::{GraphError, GraphResult};
use crate::core::types::{ConceptId, Label};
use crate::core::value::Value;

use super::{Concept, ConceptKind, GraphStore};

#[derive(Debug, Default)]
pub struct MemoryGraph {
    concepts: HashMap<ConceptId, Concept>,
    label_index: HashMap<Label, ConceptId>,
    /// instance -> type
    isa: HashMap<ConceptId, ConceptId>,
    /// type -> instances
    isa_rev: HashMap<ConceptId, Vec<ConceptId>>,
    /// outer -> scopes
    scopes: HashMap<ConceptId, Vec<ConceptId>>,
    /// scope -> outers
    scopes_rev: HashMap<ConceptId, Vec<ConceptId>>,
    /// relation -> (role, player)
    players: HashMap<ConceptId, Vec<(Option<Label>, ConceptId)>>,
    /// player -> relations
    players_rev: HashMap<ConceptId, Vec<ConceptId>>,
    values: HashMap<ConceptId, Value>,
    next_id: u64,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> ConceptId {
        self.next_id += 1;
        ConceptId::new(format!("c{}", self.next_id))
    }

    fn require(&self, id: &ConceptId) -> GraphResult<Concept> {
        self.concepts
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::ConceptNotFound(id.clone()))
    }

    fn sorted(&self, ids: Option<&Vec<ConceptId>>) -> Vec<Concept> {
        let mut out: Vec<Concept> = ids
            .map(|v| v.iter().filter_map(|id| self.concepts.get(id).cloned()).collect())
            .unwrap_or_default();
        out.sort_by(|a, b| a.id().cmp(b.id()));
        out
    }

    // ==================== 测试夹具接口 ====================

    /// 以显式 id 插入类型概念
    pub fn insert_type_with_id(&mut self, id: impl Into<ConceptId>, label: impl Into<Label>) -> Concept {
        let id = id.into();
        let label = label.into();
        let concept = Concept::new(id.clone(), ConceptKind::Type).with_label(label.clone());
        self.label_index.insert(label, id.clone());
        self.concepts.insert(id, concept.clone());
        concept
    }

    /// 以显式 id 插入实例概念
    pub fn insert_instance_with_id(
        &mut self,
        id: impl Into<ConceptId>,
        type_id: &ConceptId,
    ) -> Concept {
        let id = id.into();
        let concept = Concept::new(id.clone(), ConceptKind::Instance);
        self.concepts.insert(id.clone(), concept.clone());
        self.isa.insert(id.clone(), type_id.clone());
        self.isa_rev.entry(type_id.clone()).or_default().push(id);
        concept
    }

    /// 以显式 id 插入关系概念
    pub fn insert_relation_with_id(
        &mut self,
        id: impl Into<ConceptId>,
        type_id: &ConceptId,
    ) -> Concept {
        let id = id.into();
        let concept = Concept::new(id.clone(), ConceptKind::Relation);
        self.concepts.insert(id.clone(), concept.clone());
        self.isa.insert(id.clone(), type_id.clone());
        self.isa_rev.entry(type_id.clone()).or_default().push(id);
        concept
    }

    /// 当前 scope 边数量（测试断言用）
    pub fn scope_edge_count(&self) -> usize {
        self.scopes.values().map(|v| v.len()).sum()
    }
}

impl GraphStore for MemoryGraph {
    fn concept(&self, id: &ConceptId) -> Option<Concept> {
        self.concepts.get(id).cloned()
    }

    fn concept_with_label(&self, label: &Label) -> Option<Concept> {
        self.label_index
            .get(label)
            .and_then(|id| self.concepts.get(id).cloned())
    }

    fn value_of(&self, concept: &ConceptId) -> Option<Value> {
        self.values.get(concept).cloned()
    }

    fn all_concepts(&self) -> GraphResult<Vec<Concept>> {
        let mut out: Vec<Concept> = self.concepts.values().cloned().collect();
        out.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(out)
    }

    fn type_of(&self, instance: &ConceptId) -> GraphResult<Option<Concept>> {
        Ok(self
            .isa
            .get(instance)
            .and_then(|t| self.concepts.get(t).cloned()))
    }

    fn instances_of(&self, type_id: &ConceptId) -> GraphResult<Vec<Concept>> {
        Ok(self.sorted(self.isa_rev.get(type_id)))
    }

    fn scopes_of(&self, outer: &ConceptId) -> GraphResult<Vec<Concept>> {
        Ok(self.sorted(self.scopes.get(outer)))
    }

    fn scoped_by(&self, scope: &ConceptId) -> GraphResult<Vec<Concept>> {
        Ok(self.sorted(self.scopes_rev.get(scope)))
    }

    fn role_players(&self, relation: &ConceptId) -> GraphResult<Vec<(Option<Label>, Concept)>> {
        let mut out: Vec<(Option<Label>, Concept)> = self
            .players
            .get(relation)
            .map(|v| {
                v.iter()
                    .filter_map(|(role, id)| {
                        self.concepts.get(id).cloned().map(|c| (role.clone(), c))
                    })
                    .collect()
            })
            .unwrap_or_default();
        out.sort_by(|a, b| a.1.id().cmp(b.1.id()));
        Ok(out)
    }

    fn relations_with_player(&self, player: &ConceptId) -> GraphResult<Vec<Concept>> {
        Ok(self.sorted(self.players_rev.get(player)))
    }

    fn put_type(&mut self, label: &Label) -> GraphResult<Concept> {
        if let Some(id) = self.label_index.get(label) {
            return self.require(&id.clone());
        }
        let id = self.fresh_id();
        Ok(self.insert_type_with_id(id, label.clone()))
    }

    fn put_instance(&mut self, type_id: &ConceptId) -> GraphResult<Concept> {
        self.require(type_id)?;
        let id = self.fresh_id();
        Ok(self.insert_instance_with_id(id, type_id))
    }

    fn put_relation(&mut self, type_id: &ConceptId) -> GraphResult<Concept> {
        self.require(type_id)?;
        let id = self.fresh_id();
        Ok(self.insert_relation_with_id(id, type_id))
    }

    fn set_value(&mut self, concept: &ConceptId, value: Value) -> GraphResult<()> {
        self.require(concept)?;
        self.values.insert(concept.clone(), value);
        Ok(())
    }

    fn apply_scope(&mut self, outer: &ConceptId, inner: &ConceptId) -> GraphResult<()> {
        self.require(outer)?;
        self.require(inner)?;
        let entry = self.scopes.entry(outer.clone()).or_default();
        if !entry.contains(inner) {
            entry.push(inner.clone());
            self.scopes_rev
                .entry(inner.clone())
                .or_default()
                .push(outer.clone());
        }
        Ok(())
    }

    fn remove_scope(&mut self, outer: &ConceptId, inner: &ConceptId) -> GraphResult<()> {
        // 幂等：边不存在时直接返回成功
        if let Some(entry) = self.scopes.get_mut(outer) {
            entry.retain(|id| id != inner);
        }
        if let Some(entry) = self.scopes_rev.get_mut(inner) {
            entry.retain(|id| id != outer);
        }
        Ok(())
    }

    fn add_role_player(
        &mut self,
        relation: &ConceptId,
        role: Option<&Label>,
        player: &ConceptId,
    ) -> GraphResult<()> {
        self.require(relation)?;
        self.require(player)?;
        self.players
            .entry(relation.clone())
            .or_default()
            .push((role.cloned(), player.clone()));
        let rels = self.players_rev.entry(player.clone()).or_default();
        if !rels.contains(relation) {
            rels.push(relation.clone());
        }
        Ok(())
    }
}
