//! 谓词编译器
//!
//! 把值约束规格（字面量、比较、包含、正则）编译为可执行的检验函数，
//! 并给出稳定的规范串形式。规范串参与谓词的结构化相等与缓存键，
//! 因此要求：语义相等的谓词规范串相同；转义后非逐字节相同的谓词不碰撞。

use regex::Regex;
use std::fmt;

use crate::core::error::{PatternError, PatternResult};
use crate::core::value::{DataType, Value};

/// 比较操作符（相等由 `ConstraintSpec::Equality` 单独表达）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Neq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
        }
    }

    fn matches(&self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            ComparisonOp::Neq => ord != Equal,
            ComparisonOp::Lt => ord == Less,
            ComparisonOp::Lte => ord != Greater,
            ComparisonOp::Gt => ord == Greater,
            ComparisonOp::Gte => ord != Less,
        }
    }
}

/// 值约束规格
///
/// 外部解析器产出的约束描述，经 `Predicate::compile` 编译后使用。
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintSpec {
    Equality(Value),
    Comparison(ComparisonOp, Value),
    Contains(String),
    Regex(String),
}

/// 编译后的值谓词
///
/// 检验函数对声明值域是纯且全的；作用于错误值域显式失败（TypeMismatch），
/// 调用方据此区分"值存在但类型错误"与"值不存在"。
#[derive(Debug, Clone)]
pub enum Predicate {
    Equality(Value),
    Comparison(ComparisonOp, Value),
    Contains(String),
    Regex {
        /// 原始正则文本，规范串与相等性以它为准
        source: String,
        /// 全串匹配语义：编译为 ^(?:source)$
        compiled: Regex,
    },
}

impl Predicate {
    /// 编译约束规格
    ///
    /// 非法正则返回 `InvalidConstraint`，在任何图访问之前失败。
    pub fn compile(spec: ConstraintSpec) -> PatternResult<Predicate> {
        match spec {
            ConstraintSpec::Equality(value) => Ok(Predicate::Equality(value)),
            ConstraintSpec::Comparison(op, value) => Ok(Predicate::Comparison(op, value)),
            ConstraintSpec::Contains(needle) => Ok(Predicate::Contains(needle)),
            ConstraintSpec::Regex(source) => {
                let compiled = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
                    PatternError::InvalidConstraint(format!("正则编译失败 /{}/: {}", source, e))
                })?;
                Ok(Predicate::Regex { source, compiled })
            }
        }
    }

    /// 对单个值求值
    pub fn test(&self, value: &Value) -> PatternResult<bool> {
        match self {
            Predicate::Equality(expected) => match expected.partial_compare(value) {
                Some(ord) => Ok(ord == std::cmp::Ordering::Equal),
                None => Err(PatternError::TypeMismatch {
                    expected: expected.data_type(),
                    actual: value.data_type(),
                }),
            },
            Predicate::Comparison(op, expected) => match value.partial_compare(expected) {
                Some(ord) => Ok(op.matches(ord)),
                None => Err(PatternError::TypeMismatch {
                    expected: expected.data_type(),
                    actual: value.data_type(),
                }),
            },
            Predicate::Contains(needle) => match value {
                Value::String(s) => Ok(s.contains(needle.as_str())),
                other => Err(PatternError::TypeMismatch {
                    expected: DataType::String,
                    actual: other.data_type(),
                }),
            },
            Predicate::Regex { compiled, .. } => match value {
                Value::String(s) => Ok(compiled.is_match(s)),
                other => Err(PatternError::TypeMismatch {
                    expected: DataType::String,
                    actual: other.data_type(),
                }),
            },
        }
    }

    /// 谓词声明的值域；比较类谓词的值域由其操作数决定
    pub fn data_type(&self) -> DataType {
        match self {
            Predicate::Equality(v) | Predicate::Comparison(_, v) => v.data_type(),
            Predicate::Contains(_) | Predicate::Regex { .. } => DataType::String,
        }
    }

    /// 规范串形式
    ///
    /// 可回写为等价的文本查询；正则用 `/.../` 包裹并转义 `\` 与 `/`。
    pub fn canonical_form(&self) -> String {
        match self {
            Predicate::Equality(v) => format!("= {}", v),
            Predicate::Comparison(op, v) => format!("{} {}", op.symbol(), v),
            Predicate::Contains(s) => format!("contains \"{}\"", escape_string(s)),
            Predicate::Regex { source, .. } => format!("/{}/", escape_regex(source)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_form())
    }
}

// 结构化相等：同变体同载荷即同一约束。Regex 按原始文本比较，
// 转义是单射的，文本相等与转义后相等互为充要。
impl PartialEq for Predicate {
    fn eq(&self, other: &Predicate) -> bool {
        match (self, other) {
            (Predicate::Equality(a), Predicate::Equality(b)) => a == b,
            (Predicate::Comparison(op_a, a), Predicate::Comparison(op_b, b)) => {
                op_a == op_b && a == b
            }
            (Predicate::Contains(a), Predicate::Contains(b)) => a == b,
            (Predicate::Regex { source: a, .. }, Predicate::Regex { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Predicate {}

impl std::hash::Hash for Predicate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Predicate::Equality(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            Predicate::Comparison(op, v) => {
                1u8.hash(state);
                op.hash(state);
                v.hash(state);
            }
            Predicate::Contains(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Predicate::Regex { source, .. } => {
                3u8.hash(state);
                source.hash(state);
            }
        }
    }
}

fn escape_regex(s: &str) -> String {
    s.replace('\\', "\\\\").replace('/', "\\/")
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
