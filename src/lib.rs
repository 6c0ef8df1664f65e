//! SemaDB - 语义图数据库的模式编译与推理引擎
//!
//! 本 crate 提供语义图数据库的核心子系统：把声明式图模式编译为
//! 保持等价性的遍历计划，并为规则推理器提供可重写的逻辑表示。
//! 存储引擎、网络服务层与查询文本解析器是外部协作方，
//! 通过 `graph`、`pattern` 模块的接口边界接入。

pub mod cache;
pub mod config;
pub mod core;
pub mod exec;
pub mod graph;
pub mod mutation;
pub mod pattern;
pub mod plan;
pub mod reasoner;
pub mod schema;
pub mod utils;
