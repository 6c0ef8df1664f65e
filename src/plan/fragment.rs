//! 遍历片段
//!
//! 片段是匹配计划的最小执行单元：一次边遍历、一次过滤或一次定点查找。
//! 片段从不变更图状态。每种片段携带默认代价，再由选择性估计器
//! 结合 Schema 统计信息细化。

use std::fmt;

use crate::core::types::{ConceptId, Label, VarName};
use crate::pattern::predicate::Predicate;

/// 单个遍历步骤
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// 按标签定位类型概念
    LabelLookup { var: VarName, label: Label },
    /// 按 id 定位概念
    IdLookup { var: VarName, id: ConceptId },
    /// isa 正向：实例 -> 类型
    IsaOut { instance: VarName, type_var: VarName },
    /// isa 反向：类型 -> 实例
    IsaIn { type_var: VarName, instance: VarName },
    /// scope 正向：外层概念 -> scope 实例
    ScopeOut { outer: VarName, scope: VarName },
    /// scope 反向：scope 实例 -> 外层概念
    ScopeIn { scope: VarName, outer: VarName },
    /// 角色正向：关系 -> 参与者
    RoleOut {
        relation: VarName,
        player: VarName,
        role: Option<Label>,
    },
    /// 角色反向：参与者 -> 关系
    RoleIn {
        player: VarName,
        relation: VarName,
        role: Option<Label>,
    },
    /// 按谓词过滤已绑定变量的值
    ValueFilter { var: VarName, predicate: Predicate },
    /// 无约束扫描，由规划器为不连通的模式插入
    Scan { var: VarName },
}

impl Fragment {
    /// 执行前必须已绑定的变量
    pub fn dependencies(&self) -> Vec<&VarName> {
        match self {
            Fragment::LabelLookup { .. } | Fragment::IdLookup { .. } | Fragment::Scan { .. } => {
                Vec::new()
            }
            Fragment::IsaOut { instance, .. } => vec![instance],
            Fragment::IsaIn { type_var, .. } => vec![type_var],
            Fragment::ScopeOut { outer, .. } => vec![outer],
            Fragment::ScopeIn { scope, .. } => vec![scope],
            Fragment::RoleOut { relation, .. } => vec![relation],
            Fragment::RoleIn { player, .. } => vec![player],
            Fragment::ValueFilter { var, .. } => vec![var],
        }
    }

    /// 执行后处于绑定状态的变量
    pub fn binds(&self) -> Vec<&VarName> {
        match self {
            Fragment::LabelLookup { var, .. }
            | Fragment::IdLookup { var, .. }
            | Fragment::ValueFilter { var, .. }
            | Fragment::Scan { var } => vec![var],
            Fragment::IsaOut { instance, type_var } => vec![instance, type_var],
            Fragment::IsaIn { type_var, instance } => vec![type_var, instance],
            Fragment::ScopeOut { outer, scope } => vec![outer, scope],
            Fragment::ScopeIn { scope, outer } => vec![scope, outer],
            Fragment::RoleOut {
                relation, player, ..
            } => vec![relation, player],
            Fragment::RoleIn {
                player, relation, ..
            } => vec![player, relation],
        }
    }

    /// 获取片段的默认代价估算
    pub fn base_cost(&self) -> f64 {
        match self {
            Fragment::IdLookup { .. } => 1.0,     // id 查找代价最低
            Fragment::LabelLookup { .. } => 2.0,  // 标签查找次之
            Fragment::ValueFilter { .. } => 3.0,  // 过滤不放大中间结果
            Fragment::IsaOut { .. } => 4.0,       // 实例到类型是 1:1
            Fragment::ScopeOut { .. } => 5.0,     // scope 扇出通常很小
            Fragment::RoleOut { .. } => 8.0,      // 角色参与者有限
            Fragment::ScopeIn { .. } => 20.0,     // 反向 scope 扇入较大
            Fragment::RoleIn { .. } => 25.0,      // 反向角色扇入较大
            Fragment::IsaIn { .. } => 50.0,       // 类型到实例扇出最大
            Fragment::Scan { .. } => 1000.0,      // 全图扫描代价最高
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::LabelLookup { var, label } => write!(f, "{} label {}", var, label),
            Fragment::IdLookup { var, id } => write!(f, "{} id {}", var, id),
            Fragment::IsaOut { instance, type_var } => {
                write!(f, "{} -isa-> {}", instance, type_var)
            }
            Fragment::IsaIn { type_var, instance } => {
                write!(f, "{} <-isa- {}", instance, type_var)
            }
            Fragment::ScopeOut { outer, scope } => write!(f, "{} -scope-> {}", outer, scope),
            Fragment::ScopeIn { scope, outer } => write!(f, "{} <-scope- {}", outer, scope),
            Fragment::RoleOut {
                relation,
                player,
                role,
            } => match role {
                Some(r) => write!(f, "{} -role[{}]-> {}", relation, r, player),
                None => write!(f, "{} -role-> {}", relation, player),
            },
            Fragment::RoleIn {
                player,
                relation,
                role,
            } => match role {
                Some(r) => write!(f, "{} <-role[{}]- {}", relation, r, player),
                None => write!(f, "{} <-role- {}", relation, player),
            },
            Fragment::ValueFilter { var, predicate } => {
                write!(f, "{} value {}", var, predicate)
            }
            Fragment::Scan { var } => write!(f, "scan {}", var),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_has_no_dependencies() {
        let frag = Fragment::IdLookup {
            var: VarName::from("x"),
            id: ConceptId::from("thing-1"),
        };
        assert!(frag.dependencies().is_empty());
        assert_eq!(frag.binds(), vec![&VarName::from("x")]);
    }

    #[test]
    fn test_edge_fragment_depends_on_start() {
        let frag = Fragment::ScopeOut {
            outer: VarName::from("x"),
            scope: VarName::from("y"),
        };
        assert_eq!(frag.dependencies(), vec![&VarName::from("x")]);
        assert_eq!(
            frag.binds(),
            vec![&VarName::from("x"), &VarName::from("y")]
        );
    }

    #[test]
    fn test_base_cost_ordering() {
        let id = Fragment::IdLookup {
            var: VarName::from("x"),
            id: ConceptId::from("a"),
        };
        let scan = Fragment::Scan {
            var: VarName::from("x"),
        };
        assert!(id.base_cost() < scan.base_cost());
    }
}
