//! Dispatch resolution.
//!
//! This module implements the resolution algorithm that selects which
//! bound implementation to invoke based on the runtime types of all
//! arguments together with per-parameter predicates.
//!
//! # Algorithm Overview
//!
//! 1. **Bind arguments**: fit the call's positional and keyword arguments
//!    onto each implementation's parameters, filling defaults
//! 2. **Filter by type**: per parameter, compute the ancestor distance from
//!    the argument's runtime type to the declared type; unrelated rejects
//! 3. **Filter by predicate**: evaluate each parameter's predicate in the
//!    candidate's closed environment
//! 4. **Rank**: sum of ancestor distances, lowest total wins; ties go to
//!    the earliest binding
//!
//! # Module Structure
//!
//! - [`types`] - Call representation and candidate/specificity types
//! - [`result`] - Resolution error types
//! - [`resolver`] - The resolution algorithm

mod resolver;
mod result;
mod types;


pub use resolver::Resolver;
pub use result::{DispatchError, NoMatchError};
pub use types::{Call, Candidate, ParamSpecificity};
