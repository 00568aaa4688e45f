//! Predicate evaluation against a closed environment.
//!
//! The environment holds exactly two kinds of entries: the candidate's
//! bound parameter values (so a predicate may read sibling parameters)
//! and the names its binding exposed (constants, types, host functions).
//! Nothing else is reachable; evaluation cannot touch or mutate outer
//! process state.

use std::sync::Arc;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::value::Value;

use super::{BinaryOp, Expr, UnaryOp};

/// A function exposed to predicates at bind time.
pub type HostFn = Arc<dyn Fn(&[Value]) -> Result<Value, PredicateError> + Send + Sync>;

/// Evaluation failure. Explicit by construction: the evaluator returns
/// `Result`, so "predicate errored" and "predicate is false" are distinct
/// outcomes and the resolution policy chooses what to do with the former.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredicateError {
    #[error("unresolved name '{0}'")]
    UnresolvedName(String),

    #[error("unresolved function '{0}'")]
    UnresolvedFunction(String),

    #[error("operator '{op}' is not defined for {lhs} and {rhs}")]
    InvalidOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("operator '{op}' is not defined for {operand}")]
    InvalidOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[error("predicate evaluated to {found}, expected a boolean")]
    NotBoolean { found: &'static str },

    #[error("function '{function}' expected {expected} arguments, found {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{0}")]
    Host(String),
}

/// What resolution does when evaluating a candidate's predicate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredicatePolicy {
    /// Skip the candidate, exactly as if its predicate were false.
    #[default]
    Disqualify,
    /// Abort resolution and surface the evaluation failure to the caller.
    Propagate,
}

/// The closed evaluation environment for one candidate.
#[derive(Default)]
pub struct Env<'a> {
    values: FxHashMap<&'a str, &'a Value>,
    functions: FxHashMap<&'a str, &'a HostFn>,
}

impl<'a> Env<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value name. Later bindings shadow earlier ones, which is how
    /// parameter values take precedence over exposed constants.
    pub fn bind(&mut self, name: &'a str, value: &'a Value) {
        self.values.insert(name, value);
    }

    pub fn bind_fn(&mut self, name: &'a str, function: &'a HostFn) {
        self.functions.insert(name, function);
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, PredicateError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => self
                .values
                .get(name.as_str())
                .map(|v| (*v).clone())
                .ok_or_else(|| PredicateError::UnresolvedName(name.clone())),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expr::Call { function, args } => {
                let host = self
                    .functions
                    .get(function.as_str())
                    .ok_or_else(|| PredicateError::UnresolvedFunction(function.clone()))?;
                let args = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                host(&args)
            }
        }
    }

    /// Evaluate and require a boolean result.
    pub fn eval_bool(&self, expr: &Expr) -> Result<bool, PredicateError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(PredicateError::NotBoolean { found: other.kind() }),
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Value, PredicateError> {
        let value = self.eval(operand)?;
        match (op, value) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, Value::Int(v)) => Ok(Value::Int(-v)),
            (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
            (op, value) => Err(PredicateError::InvalidOperand {
                op: match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                },
                operand: value.kind(),
            }),
        }
    }

    fn eval_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Value, PredicateError> {
        // Boolean operators short-circuit; everything else is strict.
        match op {
            BinaryOp::And => {
                return Ok(Value::Bool(
                    self.expect_bool(lhs, "&&")? && self.expect_bool(rhs, "&&")?,
                ));
            }
            BinaryOp::Or => {
                return Ok(Value::Bool(
                    self.expect_bool(lhs, "||")? || self.expect_bool(rhs, "||")?,
                ));
            }
            _ => {}
        }

        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        match op {
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&lhs, &rhs))),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(&lhs, &rhs))),
            BinaryOp::Lt => compare(op, &lhs, &rhs).map(|o| Value::Bool(o.is_lt())),
            BinaryOp::Le => compare(op, &lhs, &rhs).map(|o| Value::Bool(o.is_le())),
            BinaryOp::Gt => compare(op, &lhs, &rhs).map(|o| Value::Bool(o.is_gt())),
            BinaryOp::Ge => compare(op, &lhs, &rhs).map(|o| Value::Bool(o.is_ge())),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                arithmetic(op, &lhs, &rhs)
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("short-circuited above"),
        }
    }

    fn expect_bool(&self, expr: &Expr, op: &'static str) -> Result<bool, PredicateError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(PredicateError::InvalidOperand {
                op,
                operand: other.kind(),
            }),
        }
    }
}

/// Equality with int/float promotion; values of unrelated shapes are
/// simply unequal rather than an error.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            OrderedFloat(*a as f64) == *b
        }
        _ => lhs == rhs,
    }
}

fn compare(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
) -> Result<std::cmp::Ordering, PredicateError> {
    let ordering = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.cmp(b),
        (Value::Int(a), Value::Float(b)) => OrderedFloat(*a as f64).cmp(b),
        (Value::Float(a), Value::Int(b)) => a.cmp(&OrderedFloat(*b as f64)),
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        _ => {
            return Err(PredicateError::InvalidOperands {
                op: op.token(),
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            })
        }
    };
    Ok(ordering)
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, PredicateError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => Ok(float_arithmetic(op, a.into_inner(), b.into_inner())),
        (Value::Int(a), Value::Float(b)) => Ok(float_arithmetic(op, *a as f64, b.into_inner())),
        (Value::Float(a), Value::Int(b)) => Ok(float_arithmetic(op, a.into_inner(), *b as f64)),
        _ => Err(PredicateError::InvalidOperands {
            op: op.token(),
            lhs: lhs.kind(),
            rhs: rhs.kind(),
        }),
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<Value, PredicateError> {
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.checked_div(b).ok_or(PredicateError::DivisionByZero)?,
        BinaryOp::Rem => a.checked_rem(b).ok_or(PredicateError::DivisionByZero)?,
        _ => unreachable!("not an arithmetic operator"),
    };
    Ok(Value::Int(result))
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> Value {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => unreachable!("not an arithmetic operator"),
    };
    Value::float(result)
}
