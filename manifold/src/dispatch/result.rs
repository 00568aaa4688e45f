//! Resolution error types.

use thiserror::Error;

use crate::predicate::PredicateError;
use crate::value::Value;

/// Error when no bound implementation matches a call.
///
/// Carries the original arguments so callers can report or retry the
/// exact call that failed to match.
#[derive(Debug, Clone, Error)]
#[error(
    "no matching implementation of '{function}' for {} positional and {} keyword argument(s)",
    .positional.len(),
    .keyword.len()
)]
pub struct NoMatchError {
    /// The function name that was called.
    pub function: String,
    /// The positional arguments provided.
    pub positional: Vec<Value>,
    /// The keyword arguments provided, in call order.
    pub keyword: Vec<(String, Value)>,
}

/// Call-time dispatch failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Resolution was requested for a name with zero bound implementations.
    #[error("no function bound to '{0}'")]
    UnknownFunction(String),

    /// Every bound implementation was rejected by argument binding, type
    /// filtering or predicate filtering.
    #[error(transparent)]
    NoMatch(#[from] NoMatchError),

    /// A predicate evaluation failure, surfaced under the propagating
    /// predicate policy.
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    /// The winning implementation's callable failed.
    #[error("implementation failed: {0}")]
    Implementation(String),
}

impl DispatchError {
    /// Shorthand for failing out of an implementation body.
    pub fn implementation(message: impl Into<String>) -> Self {
        DispatchError::Implementation(message.into())
    }
}
