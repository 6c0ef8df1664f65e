//! 图接口层
//!
//! 核心不拥有存储引擎：匹配与变更都通过 `GraphStore` trait 访问图，
//! 通过能力类型的 `Concept` 句柄引用图中的实体。
//! `memory` 子模块提供一个 HashMap 实现，供测试与内嵌调用方使用。

pub mod memory;

pub use memory::MemoryGraph;

use crate::core::error::{GraphResult, MutationError, MutationResult};
use crate::core::types::{ConceptId, Label};
use crate::core::value::Value;

/// 概念的能力分类
///
/// Relation 同时具备 Instance 的能力（它是某个关系类型的实例）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptKind {
    Type,
    Instance,
    Relation,
}

/// 概念句柄
///
/// 不透明标识加能力分类；生命周期归图存储层所有，核心只持有句柄。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Concept {
    id: ConceptId,
    kind: ConceptKind,
    label: Option<Label>,
}

impl Concept {
    pub fn new(id: ConceptId, kind: ConceptKind) -> Self {
        Self {
            id,
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn id(&self) -> &ConceptId {
        &self.id
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn is_type(&self) -> bool {
        self.kind == ConceptKind::Type
    }

    pub fn is_instance(&self) -> bool {
        matches!(self.kind, ConceptKind::Instance | ConceptKind::Relation)
    }

    pub fn is_relation(&self) -> bool {
        self.kind == ConceptKind::Relation
    }

    /// 能力转换：要求 Type 能力
    pub fn as_type(&self) -> MutationResult<&Concept> {
        if self.is_type() {
            Ok(self)
        } else {
            Err(MutationError::Capability {
                id: self.id.clone(),
                required: "Type",
            })
        }
    }

    /// 能力转换：要求 Instance 能力
    pub fn as_instance(&self) -> MutationResult<&Concept> {
        if self.is_instance() {
            Ok(self)
        } else {
            Err(MutationError::Capability {
                id: self.id.clone(),
                required: "Instance",
            })
        }
    }

    /// 能力转换：要求 Relation 能力
    pub fn as_relation(&self) -> MutationResult<&Concept> {
        if self.is_relation() {
            Ok(self)
        } else {
            Err(MutationError::Capability {
                id: self.id.clone(),
                required: "Relation",
            })
        }
    }
}

/// 图遍历与变更接口
///
/// 枚举方法返回确定性的顺序（按概念 id 升序），使相同图上的
/// 相同计划产生可复现的绑定序列。
pub trait GraphStore {
    // ==================== 查找 ====================

    fn concept(&self, id: &ConceptId) -> Option<Concept>;

    fn concept_with_label(&self, label: &Label) -> Option<Concept>;

    fn value_of(&self, concept: &ConceptId) -> Option<Value>;

    // ==================== 遍历 ====================
    //
    // 遍历方法可能触达真实存储后端，因此是可失败的；
    // 执行器会把失败连同触发它的片段上下文一起上抛。

    fn all_concepts(&self) -> GraphResult<Vec<Concept>>;

    /// 实例所属的类型（isa 正向）
    fn type_of(&self, instance: &ConceptId) -> GraphResult<Option<Concept>>;

    /// 类型的全部实例（isa 反向）
    fn instances_of(&self, type_id: &ConceptId) -> GraphResult<Vec<Concept>>;

    /// 外层概念携带的全部 scope 实例（scope 正向）
    fn scopes_of(&self, outer: &ConceptId) -> GraphResult<Vec<Concept>>;

    /// 以给定实例为 scope 的全部外层概念（scope 反向）
    fn scoped_by(&self, scope: &ConceptId) -> GraphResult<Vec<Concept>>;

    /// 关系的角色参与者
    fn role_players(&self, relation: &ConceptId) -> GraphResult<Vec<(Option<Label>, Concept)>>;

    /// 参与者所在的全部关系
    fn relations_with_player(&self, player: &ConceptId) -> GraphResult<Vec<Concept>>;

    // ==================== 变更 ====================

    fn put_type(&mut self, label: &Label) -> GraphResult<Concept>;

    fn put_instance(&mut self, type_id: &ConceptId) -> GraphResult<Concept>;

    fn put_relation(&mut self, type_id: &ConceptId) -> GraphResult<Concept>;

    fn set_value(&mut self, concept: &ConceptId, value: Value) -> GraphResult<()>;

    fn apply_scope(&mut self, outer: &ConceptId, inner: &ConceptId) -> GraphResult<()>;

    /// 移除 scope 关系；关系不存在时为无操作（幂等删除）
    fn remove_scope(&mut self, outer: &ConceptId, inner: &ConceptId) -> GraphResult<()>;

    fn add_role_player(
        &mut self,
        relation: &ConceptId,
        role: Option<&Label>,
        player: &ConceptId,
    ) -> GraphResult<()>;
}
