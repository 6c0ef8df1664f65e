//! 推理层
//!
//! 原子化、规则合一与递归重写。

pub mod atom;
pub mod engine;
pub mod query;
pub mod unify;

pub use atom::{Atom, AtomKind, IdPredicateAtom, RelationAtom, TypeAtom, TypeEdge,
    ValuePredicateAtom};
pub use engine::ReasonerEngine;
pub use query::ReasonerQuery;
pub use unify::{unify_with_head, Unifier};
