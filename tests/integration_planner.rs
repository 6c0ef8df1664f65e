//! 规划与执行集成测试
//!
//! 测试范围:
//! - plan::sets - 等价片段集的语义等价性
//! - plan::planner - 贪心排序、确定性、不连通模式、批量规划
//! - cache - 计划缓存
//! - exec - 计划执行与取消

mod common;

use common::{scoped_graph, var};

use std::sync::Arc;

use semadb::cache::PlanCache;
use semadb::core::error::PlannerError;
use semadb::core::types::ConceptId;
use semadb::exec::{Bindings, MatchExecutor};
use semadb::pattern::property::Property;
use semadb::pattern::var_pattern::Pattern;
use semadb::plan::{
    EquivalentFragmentSet, Fragment, Planner, SelectivityEstimator,
};
use semadb::schema::stats::{EdgeStatistics, SchemaStatistics};

fn planner() -> Planner {
    Planner::new(SelectivityEstimator::new(Arc::new(SchemaStatistics::new())))
}

fn scoped_pattern() -> Pattern {
    let scope = var("y").with_property(Property::Id {
        id: ConceptId::from("thing-1"),
    });
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("module-1"),
        })
        .with_property(Property::HasScope { scope });
    Pattern::new(vec![x])
}

// ==================== 等价片段集 ====================

#[test]
fn test_fragment_set_members_yield_same_bindings() {
    // 对固定图执行等价片段集的每个成员，绑定集必须一致
    let graph = scoped_graph();
    let pattern = scoped_pattern();
    let sets = pattern.fragment_sets();

    let scope_set = sets
        .iter()
        .find(|s| {
            s.fragments()
                .iter()
                .any(|f| matches!(f, Fragment::ScopeOut { .. }))
        })
        .expect("应存在 scope 约束的片段集");
    assert!(scope_set.fragments().len() >= 2);

    let mut answer_sets: Vec<Vec<Bindings>> = Vec::new();
    for member in scope_set.fragments() {
        // 用 id 查找绑定两端，再单独执行该成员
        let member_sets: Vec<EquivalentFragmentSet> = sets
            .iter()
            .filter(|s| *s != scope_set)
            .cloned()
            .chain(std::iter::once(EquivalentFragmentSet::new(vec![
                member.clone(),
            ])))
            .collect();
        let plan = planner()
            .plan_sets(&member_sets, &pattern.declared_vars())
            .expect("规划失败");
        let mut rows = MatchExecutor::new(&graph).execute(&plan).expect("执行失败");
        rows.sort_by(|a, b| a.key_tuple().cmp(&b.key_tuple()));
        answer_sets.push(rows);
    }

    for pair in answer_sets.windows(2) {
        assert_eq!(pair[0], pair[1], "等价片段成员的答案集应一致");
    }
    assert_eq!(answer_sets[0].len(), 1);
}

// ==================== 规划器 ====================

#[test]
fn test_planner_deterministic_across_runs() {
    let pattern = scoped_pattern();
    let p = planner();
    let first = p.plan(&pattern).expect("规划失败");
    let second = p.plan(&pattern).expect("规划失败");
    assert_eq!(first, second, "相同模式的两次规划应产生相同片段顺序");
}

#[test]
fn test_planner_prefers_selective_start() {
    // 统计信息显示 isa 扇出巨大时，应从 id 查找进入而不是类型扫描
    let stats = Arc::new(SchemaStatistics::new());
    stats.update_edge_stats(EdgeStatistics {
        kind: "isa".to_string(),
        edge_count: 100_000,
        source_count: 10,
    });
    let p = Planner::new(SelectivityEstimator::new(stats));

    let type_pattern = var("t").with_property(Property::TypeLabel {
        label: "thing".into(),
    });
    let x = var("x")
        .with_property(Property::Id {
            id: ConceptId::from("thing-1"),
        })
        .with_property(Property::Isa { type_pattern });
    let plan = p.plan(&Pattern::new(vec![x])).expect("规划失败");

    assert!(
        matches!(plan.fragments()[0], Fragment::IdLookup { .. }),
        "首个片段应是 id 查找, 实际: {:?}",
        plan.fragments()[0]
    );
    // isa 约束应取正向（从已绑定实例到类型）而不是高扇出的反向
    assert!(plan
        .fragments()
        .iter()
        .any(|f| matches!(f, Fragment::IsaOut { .. })));
}

#[test]
fn test_disconnected_pattern_is_not_an_error() {
    let x = var("x").with_property(Property::Id {
        id: ConceptId::from("module-1"),
    });
    let z = var("z").with_property(Property::Id {
        id: ConceptId::from("thing-1"),
    });
    let plan = planner().plan(&Pattern::new(vec![x, z])).expect("规划失败");
    assert_eq!(plan.len(), 2);
}

#[test]
fn test_empty_fragment_set_is_unplannable() {
    let result = planner().plan_sets(&[EquivalentFragmentSet::new(Vec::new())], &[]);
    assert!(matches!(
        result,
        Err(PlannerError::UnplannableConstraint(_))
    ));
}

#[test]
fn test_plan_batch_matches_sequential() {
    let patterns = vec![scoped_pattern(), scoped_pattern(), scoped_pattern()];
    let p = planner();
    let batch = p.plan_batch(&patterns);
    assert_eq!(batch.len(), 3);
    let sequential = p.plan(&patterns[0]).expect("规划失败");
    for result in batch {
        assert_eq!(result.expect("批量规划失败"), sequential);
    }
}

// ==================== 计划缓存 ====================

#[test]
fn test_plan_cache_returns_identical_plan() {
    let cache = PlanCache::new(8);
    let p = planner();
    let pattern = scoped_pattern();
    let first = cache.get_or_plan(&p, &pattern).expect("规划失败");
    let second = cache.get_or_plan(&p, &pattern).expect("规划失败");
    assert!(Arc::ptr_eq(&first, &second));
}

// ==================== 执行 ====================

#[test]
fn test_full_pattern_execution() {
    let graph = scoped_graph();
    let pattern = scoped_pattern();
    let plan = planner().plan(&pattern).expect("规划失败");
    let rows = MatchExecutor::new(&graph).execute(&plan).expect("执行失败");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(
        row.get(&"x".into()).expect("x 应绑定").id(),
        &ConceptId::from("module-1")
    );
    assert_eq!(
        row.get(&"y".into()).expect("y 应绑定").id(),
        &ConceptId::from("thing-1")
    );
}
