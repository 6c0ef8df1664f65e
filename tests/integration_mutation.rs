//! 变更集成测试
//!
//! 测试范围:
//! - mutation::InsertExecutor - 变量物化、解析表、插入语义
//! - mutation::DeleteExecutor - 删除契约与幂等性
//! - 错误传播: 变更错误中止语句中剩余属性，不自动回滚

mod common;

use common::var;

use semadb::core::error::MutationError;
use semadb::core::types::{ConceptId, Label, VarName};
use semadb::core::value::Value;
use semadb::graph::{GraphStore, MemoryGraph};
use semadb::mutation::{DeleteExecutor, InsertExecutor};
use semadb::pattern::predicate::{ConstraintSpec, Predicate};
use semadb::pattern::property::Property;

fn base_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    let module = graph.insert_type_with_id("module-1", "module");
    let thing_type = graph.insert_type_with_id("thing-type", "thing");
    graph.insert_instance_with_id("scope-1", thing_type.id());
    let _ = module;
    graph
}

// ==================== 插入 ====================

#[test]
fn test_insert_scope_success() {
    // 场景: x has-scope y，y 解析到 "scope-1"，x 是 Type 概念
    let mut graph = base_graph();
    let y = var("y").with_property(Property::Id {
        id: ConceptId::from("scope-1"),
    });
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope: y.clone() });

    let mut executor = InsertExecutor::new(&mut graph);
    let result = executor.insert_all(&[y, x]);
    assert!(result.is_ok(), "插入应该成功: {:?}", result.err());

    // applyScope 恰好调用一次
    assert_eq!(graph.scope_edge_count(), 1);
    let scopes = graph
        .scopes_of(&ConceptId::from("module-1"))
        .expect("遍历失败");
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].id(), &ConceptId::from("scope-1"));
}

#[test]
fn test_insert_unresolved_variable() {
    // 场景: y 无法解析 → UnresolvedVariableError，applyScope 从未被调用
    let mut graph = base_graph();
    let y = var("y");
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope: y.clone() });

    let mut executor = InsertExecutor::new(&mut graph);
    let result = executor.insert_all(&[y, x]);
    assert_eq!(
        result,
        Err(MutationError::UnresolvedVariable(VarName::from("y")))
    );
    assert_eq!(graph.scope_edge_count(), 0);
}

#[test]
fn test_insert_isa_creates_instance() {
    let mut graph = base_graph();
    let type_pattern = var("t").with_property(Property::TypeLabel {
        label: Label::from("thing"),
    });
    let x = var("x").with_property(Property::Isa { type_pattern });

    let mut executor = InsertExecutor::new(&mut graph);
    let created = executor.insert_all(std::slice::from_ref(&x)).expect("插入失败");
    assert_eq!(created.len(), 1);
    let instances = graph
        .instances_of(&ConceptId::from("thing-type"))
        .expect("遍历失败");
    assert_eq!(instances.len(), 2, "应新增一个 thing 实例");
}

#[test]
fn test_insert_value_sets_value() {
    let mut graph = base_graph();
    let predicate =
        Predicate::compile(ConstraintSpec::Equality(Value::String("alex".to_string())))
            .expect("编译失败");
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("scope-1"),
        })
        .with_property(Property::Value { predicate });

    let mut executor = InsertExecutor::new(&mut graph);
    executor.insert_all(std::slice::from_ref(&x)).expect("插入失败");
    assert_eq!(
        graph.value_of(&ConceptId::from("scope-1")),
        Some(Value::String("alex".to_string()))
    );
}

#[test]
fn test_insert_non_equality_value_rejected() {
    let mut graph = base_graph();
    let predicate = Predicate::compile(ConstraintSpec::Regex("a.*".to_string())).expect("编译失败");
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("scope-1"),
        })
        .with_property(Property::Value { predicate });

    let mut executor = InsertExecutor::new(&mut graph);
    let result = executor.insert_all(std::slice::from_ref(&x));
    assert!(matches!(
        result,
        Err(MutationError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_insert_aborts_remaining_properties() {
    // 第一条属性应用成功后第二条失败：语句中止，已应用的不回滚
    let mut graph = base_graph();
    let y = var("y").with_property(Property::Id {
        id: ConceptId::from("scope-1"),
    });
    let bad_predicate =
        Predicate::compile(ConstraintSpec::Regex("x+".to_string())).expect("编译失败");
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope: y.clone() })
        .with_property(Property::Value {
            predicate: bad_predicate,
        });

    let mut executor = InsertExecutor::new(&mut graph);
    let result = executor.insert_all(&[y, x]);
    assert!(matches!(
        result,
        Err(MutationError::UnsupportedOperation(_))
    ));
    // scope 已应用且未回滚（回滚属于存储层事务边界）
    assert_eq!(graph.scope_edge_count(), 1);
}

// ==================== 删除 ====================

#[test]
fn test_delete_scope_idempotent() {
    let mut graph = base_graph();
    graph
        .apply_scope(&ConceptId::from("module-1"), &ConceptId::from("scope-1"))
        .expect("应用 scope 失败");

    let y = var("y").with_property(Property::Id {
        id: ConceptId::from("scope-1"),
    });
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope: y });

    let mut executor = DeleteExecutor::new(&mut graph);
    assert!(executor.delete_all(std::slice::from_ref(&x)).is_ok());
    assert_eq!(graph.scope_edge_count(), 0);

    // 连续第二次删除不失败，图状态与第一次之后一致
    let mut executor = DeleteExecutor::new(&mut graph);
    assert!(executor.delete_all(std::slice::from_ref(&x)).is_ok());
    assert_eq!(graph.scope_edge_count(), 0);
}

#[test]
fn test_delete_without_id_fails() {
    let mut graph = base_graph();
    let y = var("y");
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope: y });

    let mut executor = DeleteExecutor::new(&mut graph);
    let result = executor.delete_all(std::slice::from_ref(&x));
    assert_eq!(
        result,
        Err(MutationError::DeleteRequiresId {
            property: "has-scope"
        })
    );
}

#[test]
fn test_delete_scope_on_non_type_is_capability_error() {
    let mut graph = base_graph();
    let y = var("y").with_property(Property::Id {
        id: ConceptId::from("scope-1"),
    });
    // 外层概念是实例
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("scope-1"),
        })
        .with_property(Property::HasScope { scope: y });

    let mut executor = DeleteExecutor::new(&mut graph);
    let result = executor.delete_all(std::slice::from_ref(&x));
    assert!(matches!(
        result,
        Err(MutationError::Capability {
            required: "Type",
            ..
        })
    ));
}
