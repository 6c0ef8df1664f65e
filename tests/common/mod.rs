//! 集成测试公共夹具
//!
//! 提供固定的图与 Schema 数据集，供各集成测试套件共享。

#![allow(dead_code)]

use std::sync::Arc;

use semadb::core::types::Label;
use semadb::graph::{GraphStore, MemoryGraph};
use semadb::pattern::property::Property;
use semadb::pattern::var_pattern::{Pattern, VarPattern};
use semadb::schema::{SchemaBuilder, SchemaSnapshot};

/// 带一条 scope 边的小图：
/// 类型 module-1（标签 module），实例 thing-1（类型 thing），
/// module-1 以 thing-1 为 scope。
pub fn scoped_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    let module = graph.insert_type_with_id("module-1", "module");
    let thing_type = graph.insert_type_with_id("thing-type", "thing");
    let thing = graph.insert_instance_with_id("thing-1", thing_type.id());
    graph
        .apply_scope(module.id(), thing.id())
        .expect("应用 scope 失败");
    graph
}

/// 家族数据集：
/// - 类型 Parent / Child / Person，关系 parenthood(parent, child)
/// - alice isa Parent；rel-1 = parenthood(parent: alice, child: bob)
/// - charlie 直接存储为 Child 实例；bob 的 Child 身份只能由规则推出
pub fn family_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    let parent_type = graph.insert_type_with_id("type-parent", "Parent");
    let child_type = graph.insert_type_with_id("type-child", "Child");
    let person_type = graph.insert_type_with_id("type-person", "Person");
    let parenthood_type = graph.insert_type_with_id("type-parenthood", "parenthood");

    let alice = graph.insert_instance_with_id("alice", parent_type.id());
    let bob = graph.insert_instance_with_id("bob", person_type.id());
    let charlie = graph.insert_instance_with_id("charlie", child_type.id());
    let _ = charlie;

    let rel = graph.insert_relation_with_id("rel-1", parenthood_type.id());
    graph
        .add_role_player(rel.id(), Some(&Label::from("parent")), alice.id())
        .expect("添加角色失败");
    graph
        .add_role_player(rel.id(), Some(&Label::from("child")), bob.id())
        .expect("添加角色失败");
    graph
}

/// 家族 Schema：含 "Parent 的孩子是 Child" 规则
pub fn family_schema() -> Arc<SchemaSnapshot> {
    let (when, then) = child_rule_parts();
    let schema = SchemaBuilder::new()
        .define_type("Parent")
        .define_type("Child")
        .define_type("Person")
        .define_relation(
            "parenthood",
            vec![Label::from("parent"), Label::from("child")],
        )
        .define_rule("child-rule", when, then)
        .build()
        .expect("Schema加载应该成功");
    Arc::new(schema)
}

/// 规则 "if a isa Parent and parenthood(parent: a, child: b) then b isa Child"
pub fn child_rule_parts() -> (Pattern, VarPattern) {
    let parent_type = var("tp").with_property(Property::TypeLabel {
        label: Label::from("Parent"),
    });
    let a = var("a").with_property(Property::Isa {
        type_pattern: parent_type,
    });
    let r = var("r")
        .with_property(Property::RolePlayer {
            role: Some(Label::from("parent")),
            player: var("a"),
        })
        .with_property(Property::RolePlayer {
            role: Some(Label::from("child")),
            player: var("b"),
        });
    let when = Pattern::new(vec![a, r]);

    let child_type = var("tc").with_property(Property::TypeLabel {
        label: Label::from("Child"),
    });
    let then = var("b").with_property(Property::Isa {
        type_pattern: child_type,
    });
    (when, then)
}

/// 查询 "$z isa Child"
pub fn child_query() -> Pattern {
    let child_type = var("tz").with_property(Property::TypeLabel {
        label: Label::from("Child"),
    });
    let z = var("z").with_property(Property::Isa {
        type_pattern: child_type,
    });
    Pattern::new(vec![z])
}

pub fn var(name: &str) -> VarPattern {
    VarPattern::new(name).expect("变量构造失败")
}
