//! 计划缓存
//!
//! 以模式的规范串为键缓存遍历计划。规划器对相同输入产生相同计划、
//! 谓词规范串稳定且无碰撞，两者共同保证缓存命中等价于重新规划。

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::core::error::PlanResult;
use crate::pattern::var_pattern::Pattern;
use crate::plan::planner::{Plan, Planner};

/// LRU 计划缓存
#[derive(Debug)]
pub struct PlanCache {
    inner: Mutex<LruCache<String, Arc<Plan>>>,
}

impl PlanCache {
    /// 创建指定容量的计划缓存；容量至少为 1
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// 命中则返回缓存的计划，否则规划并写入缓存
    pub fn get_or_plan(&self, planner: &Planner, pattern: &Pattern) -> PlanResult<Arc<Plan>> {
        let key = pattern.canonical_form();
        if let Some(plan) = self.inner.lock().get(&key) {
            log::trace!("计划缓存命中: {}", key);
            return Ok(plan.clone());
        }
        let plan = Arc::new(planner.plan(pattern)?);
        self.inner.lock().put(key, plan.clone());
        Ok(plan)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ConceptId;
    use crate::pattern::property::Property;
    use crate::pattern::var_pattern::VarPattern;
    use crate::plan::SelectivityEstimator;
    use crate::schema::stats::SchemaStatistics;

    fn sample_pattern() -> Pattern {
        let scope = VarPattern::new("y")
            .expect("变量构造失败")
            .with_property(Property::Id {
                id: ConceptId::from("thing-1"),
            });
        let x = VarPattern::new("x")
            .expect("变量构造失败")
            .with_property(Property::HasScope { scope });
        Pattern::new(vec![x])
    }

    #[test]
    fn test_cache_hit_returns_same_plan() {
        let planner = Planner::new(SelectivityEstimator::new(Arc::new(SchemaStatistics::new())));
        let cache = PlanCache::new(16);
        let pattern = sample_pattern();

        let first = cache.get_or_plan(&planner, &pattern).expect("规划失败");
        let second = cache.get_or_plan(&planner, &pattern).expect("规划失败");
        assert!(Arc::ptr_eq(&first, &second), "命中应返回同一份计划");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let planner = Planner::new(SelectivityEstimator::new(Arc::new(SchemaStatistics::new())));
        let cache = PlanCache::new(1);
        let a = sample_pattern();
        let b = Pattern::new(vec![VarPattern::new("z")
            .expect("变量构造失败")
            .with_property(Property::Id {
                id: ConceptId::from("other"),
            })]);

        cache.get_or_plan(&planner, &a).expect("规划失败");
        cache.get_or_plan(&planner, &b).expect("规划失败");
        assert_eq!(cache.len(), 1);
    }
}
