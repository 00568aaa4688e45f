//! The structured description listing.
//!
//! `Namespace::describe` is pure introspection: a serializable snapshot
//! of every binding, in binding order, whose `Display` is the diagnostic
//! text format. The wildcard type renders as `*`; type and predicate
//! source text are joined with `&`.

use std::fmt;

use serde::Serialize;

use crate::signature::TypeConstraint;

use super::Namespace;

/// Listing of every binding in a namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceListing {
    pub namespace: String,
    pub functions: Vec<FunctionListing>,
}

/// Listing of one function name's bound implementations, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionListing {
    pub name: String,
    pub implementations: Vec<ImplementationListing>,
}

/// Listing of one bound implementation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplementationListing {
    /// Zero-based position in the function's binding order.
    pub index: usize,
    pub bound_name: String,
    /// The callable's own name when it differs from the bound name.
    pub original_name: Option<String>,
    pub parameters: Vec<ParameterListing>,
}

/// Listing of one parameter: resolved type name (`*` for the wildcard)
/// and predicate source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterListing {
    pub name: String,
    pub ty: String,
    pub predicate: String,
}

pub(super) fn listing(namespace: &Namespace) -> NamespaceListing {
    let types = namespace.hierarchy();
    let functions = namespace
        .entries()
        .map(|(name, implementations)| FunctionListing {
            name: name.to_string(),
            implementations: implementations
                .iter()
                .enumerate()
                .map(|(index, implementation)| ImplementationListing {
                    index,
                    bound_name: implementation.bound_name().to_string(),
                    original_name: implementation.original_name().map(str::to_string),
                    parameters: implementation
                        .params()
                        .iter()
                        .map(|spec| ParameterListing {
                            name: spec.name.clone(),
                            ty: match spec.constraint {
                                TypeConstraint::Any => "*".to_string(),
                                TypeConstraint::Concrete(id) => types.name(id).to_string(),
                            },
                            predicate: spec.predicate.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    NamespaceListing {
        namespace: namespace.label().to_string(),
        functions,
    }
}

impl fmt::Display for NamespaceListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bound implementations:", self.namespace)?;
        for function in &self.functions {
            for implementation in &function.implementations {
                write!(f, "\n- {}: {}(", implementation.index, function.name)?;
                for (i, parameter) in implementation.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "{}: {} & {}",
                        parameter.name, parameter.ty, parameter.predicate
                    )?;
                }
                write!(f, ")")?;
                if let Some(original) = &implementation.original_name {
                    write!(f, " (re-bound '{original}')")?;
                }
            }
        }
        Ok(())
    }
}
