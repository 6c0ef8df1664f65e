pub mod error;
pub mod types;
pub mod value;

// 错误和结果类型
pub use error::{
    ExecError, GraphError, MutationError, MutationResult, PatternError, PatternResult,
    PlannerError, ReasonerError, ReasonerResult, SchemaError, SemaError, SemaResult,
};

// 核心数据类型
pub use types::{ConceptId, Label, RuleId, VarName};
pub use value::{DataType, Value};
