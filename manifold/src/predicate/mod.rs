//! Predicate expressions.
//!
//! A predicate is data, not source text: a small expression tree over the
//! parameter names of one implementation plus whatever names the binding
//! exposed. Evaluation happens in a closed environment (see [`eval`]);
//! a free name that the environment does not know is an evaluation
//! failure, never a silent default.
//!
//! `Display` renders the tree back to source text, which is what the
//! describe listing shows as the predicate of each parameter.

mod eval;

pub use eval::{Env, HostFn, PredicateError, PredicatePolicy};

use std::fmt;

use crate::value::Value;

/// A boolean expression guarding one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// A parameter or exposed constant/type name.
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Application of an exposed host function.
    Call {
        function: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn token(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
        }
    }
}

impl Expr {
    /// The constant-true predicate every unguarded parameter carries.
    pub fn truth() -> Self {
        Expr::Literal(Value::Bool(true))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn int(v: i64) -> Self {
        Expr::Literal(Value::Int(v))
    }

    pub fn float(v: f64) -> Self {
        Expr::Literal(Value::float(v))
    }

    pub fn str(v: impl Into<String>) -> Self {
        Expr::Literal(Value::Str(v.into()))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn call(function: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn not(self) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    pub fn neg(self) -> Self {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }

    fn binary(self, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::And, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Or, rhs)
    }

    pub fn eq(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Eq, rhs)
    }

    pub fn ne(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Ne, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Lt, rhs)
    }

    pub fn le(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Le, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Gt, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Ge, rhs)
    }

    pub fn add(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn sub(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Sub, rhs)
    }

    pub fn mul(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Mul, rhs)
    }

    pub fn div(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Div, rhs)
    }

    pub fn rem(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Rem, rhs)
    }

    /// Collect every free value name and every called function name.
    ///
    /// Bind-time signature validation checks these against the parameter
    /// set and the binding's exposed names.
    pub fn free_names(&self, values: &mut Vec<String>, functions: &mut Vec<String>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Name(name) => values.push(name.clone()),
            Expr::Unary { operand, .. } => operand.free_names(values, functions),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.free_names(values, functions);
                rhs.free_names(values, functions);
            }
            Expr::Call { function, args } => {
                functions.push(function.clone());
                for arg in args {
                    arg.free_names(values, functions);
                }
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => 6,
            Expr::Literal(_) | Expr::Name(_) | Expr::Call { .. } => 7,
        }
    }

    fn fmt_child(&self, parent: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Name(name) => write!(f, "{name}"),
            Expr::Unary { op, operand } => {
                let token = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                };
                write!(f, "{token}")?;
                operand.fmt_child(6, f)
            }
            Expr::Binary { op, lhs, rhs } => {
                lhs.fmt_child(op.precedence(), f)?;
                write!(f, " {} ", op.token())?;
                // Right operands of equal precedence keep their parens
                // unless the operator is associative.
                let associative = matches!(op, BinaryOp::And | BinaryOp::Or);
                if rhs.precedence() == op.precedence() && !associative {
                    write!(f, "({rhs})")
                } else {
                    rhs.fmt_child(op.precedence(), f)
                }
            }
            Expr::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
