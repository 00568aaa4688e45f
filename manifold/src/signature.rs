//! Signature model: the ordered parameter specs of one implementation.
//!
//! A [`Signature`] is what callers hand to `bind`: declared parameter
//! names, optional type names, optional predicate, optional default.
//! Binding validates it once against the namespace's type registry and
//! the binding's exposed names, producing the immutable [`ParamSpec`]
//! sequence the resolver works from. Validation failures surface as
//! [`SignatureError`] and leave the registry untouched.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::hierarchy::{TypeId, TypeRegistry};
use crate::predicate::Expr;
use crate::value::Value;

/// Bind-time signature validation failure.
#[derive(Debug, Error, PartialEq)]
pub enum SignatureError {
    #[error("duplicate parameter '{parameter}'")]
    DuplicateParameter { parameter: String },

    #[error("parameter '{parameter}' without a default follows a defaulted parameter")]
    DefaultOrdering { parameter: String },

    #[error("unknown type '{type_name}' declared for parameter '{parameter}'")]
    UnknownType {
        parameter: String,
        type_name: String,
    },

    #[error("unknown type '{type_name}' in extra types")]
    UnknownExtraType { type_name: String },

    #[error("predicate of parameter '{parameter}' references unresolved name '{name}'")]
    UnresolvedName { parameter: String, name: String },

    #[error("predicate of parameter '{parameter}' calls unresolved function '{name}'")]
    UnresolvedFunction { parameter: String, name: String },
}

/// The type constraint of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeConstraint {
    /// Matches any runtime type at distance zero.
    Any,
    Concrete(TypeId),
}

/// One validated formal parameter of a bound implementation.
///
/// Immutable once the implementation is bound; the declaration order here
/// is the order specificity vectors are computed in.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub position: usize,
    pub constraint: TypeConstraint,
    pub predicate: Expr,
    pub default: Option<Value>,
}

/// Builder for one declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    type_name: Option<String>,
    predicate: Option<Expr>,
    default: Option<Value>,
}

impl Param {
    /// A parameter with no declared type: matches anything.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            predicate: None,
            default: None,
        }
    }

    /// Constrain the parameter to a registered type name.
    pub fn ty(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Guard the parameter with a predicate expression.
    pub fn guard(mut self, predicate: Expr) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A declared signature, in parameter order.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Validate against the registry and exposed names, producing the
    /// parameter specs in declaration order.
    ///
    /// `exposed_values` are names predicates may reference as values
    /// (extra constants and extra types); `exposed_functions` are names
    /// predicates may call.
    pub(crate) fn build(
        self,
        types: &TypeRegistry,
        exposed_values: &FxHashSet<&str>,
        exposed_functions: &FxHashSet<&str>,
    ) -> Result<Vec<ParamSpec>, SignatureError> {
        let mut param_names: FxHashSet<String> = FxHashSet::default();
        for param in &self.params {
            if !param_names.insert(param.name.clone()) {
                return Err(SignatureError::DuplicateParameter {
                    parameter: param.name.clone(),
                });
            }
        }

        let mut saw_default = false;
        for param in &self.params {
            if param.default.is_some() {
                saw_default = true;
            } else if saw_default {
                return Err(SignatureError::DefaultOrdering {
                    parameter: param.name.clone(),
                });
            }
        }

        let mut specs = Vec::with_capacity(self.params.len());
        for (position, param) in self.params.into_iter().enumerate() {
            let constraint = match &param.type_name {
                None => TypeConstraint::Any,
                Some(type_name) => match types.lookup(type_name) {
                    Some(id) => TypeConstraint::Concrete(id),
                    None => {
                        return Err(SignatureError::UnknownType {
                            parameter: param.name,
                            type_name: type_name.clone(),
                        })
                    }
                },
            };

            let predicate = param.predicate.unwrap_or_else(Expr::truth);
            let mut value_names = Vec::new();
            let mut function_names = Vec::new();
            predicate.free_names(&mut value_names, &mut function_names);
            for name in value_names {
                if !param_names.contains(name.as_str()) && !exposed_values.contains(name.as_str())
                {
                    return Err(SignatureError::UnresolvedName {
                        parameter: param.name,
                        name,
                    });
                }
            }
            for name in function_names {
                if !exposed_functions.contains(name.as_str()) {
                    return Err(SignatureError::UnresolvedFunction {
                        parameter: param.name,
                        name,
                    });
                }
            }

            specs.push(ParamSpec {
                name: param.name,
                position,
                constraint,
                predicate,
                default: param.default,
            });
        }
        Ok(specs)
    }
}
