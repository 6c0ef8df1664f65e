//! 统计信息管理器模块
//!
//! 统一管理选择性估计所需的统计信息，提供线程安全的访问。
//! 写入来自存储侧的统计采集；查询侧在规划开始时读取。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::types::Label;

/// 类型统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStatistics {
    pub label: Label,
    /// 该类型的实例数量
    pub instance_count: u64,
    /// 实例属性值的不同取值数量
    pub distinct_values: u64,
}

/// 关系种类统计信息
///
/// 关系种类指一条边的语义类别（"isa" / "scope" / "role"）。
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStatistics {
    pub kind: String,
    /// 该种类的边数量
    pub edge_count: u64,
    /// 拥有至少一条该种类出边的源概念数量
    pub source_count: u64,
}

impl EdgeStatistics {
    /// 平均扇出：每个源概念沿该种类边的期望邻居数
    pub fn average_fanout(&self) -> f64 {
        if self.source_count == 0 {
            1.0
        } else {
            self.edge_count as f64 / self.source_count as f64
        }
    }
}

/// 统计信息管理器
#[derive(Debug, Default)]
pub struct SchemaStatistics {
    type_stats: Arc<RwLock<HashMap<Label, TypeStatistics>>>,
    edge_stats: Arc<RwLock<HashMap<String, EdgeStatistics>>>,
}

impl SchemaStatistics {
    /// 创建新的统计信息管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类型统计信息
    pub fn get_type_stats(&self, label: &Label) -> Option<TypeStatistics> {
        self.type_stats.read().get(label).cloned()
    }

    /// 更新类型统计信息
    pub fn update_type_stats(&self, stats: TypeStatistics) {
        self.type_stats.write().insert(stats.label.clone(), stats);
    }

    /// 获取类型的实例数量
    pub fn instance_count(&self, label: &Label) -> u64 {
        self.get_type_stats(label)
            .map(|s| s.instance_count)
            .unwrap_or(0)
    }

    /// 获取关系种类统计信息
    pub fn get_edge_stats(&self, kind: &str) -> Option<EdgeStatistics> {
        self.edge_stats.read().get(kind).cloned()
    }

    /// 更新关系种类统计信息
    pub fn update_edge_stats(&self, stats: EdgeStatistics) {
        self.edge_stats.write().insert(stats.kind.clone(), stats);
    }

    /// 关系种类的平均扇出；无统计时按 1.0 处理
    pub fn average_fanout(&self, kind: &str) -> f64 {
        self.get_edge_stats(kind)
            .map(|s| s.average_fanout())
            .unwrap_or(1.0)
    }

    /// 清除所有统计信息
    pub fn clear_all(&self) {
        self.type_stats.write().clear();
        self.edge_stats.write().clear();
    }

    /// 获取所有已统计的关系种类
    pub fn get_all_kinds(&self) -> Vec<String> {
        self.edge_stats.read().keys().cloned().collect()
    }
}

impl Clone for SchemaStatistics {
    fn clone(&self) -> Self {
        Self {
            type_stats: Arc::new(RwLock::new(self.type_stats.read().clone())),
            edge_stats: Arc::new(RwLock::new(self.edge_stats.read().clone())),
        }
    }
}
