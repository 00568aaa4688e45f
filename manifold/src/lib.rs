//! Predicate-augmented multiple dispatch.
//!
//! A [`Namespace`] lets many independently-authored callables be bound
//! under the same function name, each guarded by per-parameter type
//! constraints and predicate expressions. At call time the resolver picks
//! the single best match: candidates are filtered by argument binding,
//! inheritance-aware type matching and predicate evaluation, then ranked
//! by summed ancestor distance with bind order breaking ties.
//!
//! # Example
//!
//! ```
//! use manifold::{Call, Expr, Namespace, Param, Signature, Value};
//!
//! let mut greetings = Namespace::new("greetings");
//! greetings.bind(
//!     "hello",
//!     Signature::new()
//!         .param(Param::new("name").ty("str"))
//!         .param(
//!             Param::new("lang")
//!                 .ty("str")
//!                 .guard(Expr::name("lang").eq(Expr::str("English"))),
//!         ),
//!     |_| Ok(Value::str("english greeting")),
//! )?;
//! greetings.bind(
//!     "hello",
//!     Signature::new()
//!         .param(Param::new("name").ty("str"))
//!         .param(Param::new("lang")),
//!     |_| Ok(Value::str("fallback greeting")),
//! )?;
//!
//! let call = Call::new().arg("Ada").arg("English");
//! assert_eq!(greetings.call("hello", &call)?, Value::str("english greeting"));
//!
//! let call = Call::new().arg("Ada").arg("Lojban");
//! assert_eq!(greetings.call("hello", &call)?, Value::str("fallback greeting"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dispatch;
pub mod hierarchy;
pub mod predicate;
pub mod registry;
pub mod signature;
pub mod value;

pub use dispatch::{Call, Candidate, DispatchError, NoMatchError, ParamSpecificity};
pub use hierarchy::{HierarchyError, TypeId, TypeRegistry};
pub use predicate::{Env, Expr, HostFn, PredicateError, PredicatePolicy};
pub use registry::{
    Binder, FunctionListing, ImplId, Implementation, ImplementationListing, Namespace,
    NamespaceListing, NativeFn, ParameterListing,
};
pub use signature::{Param, ParamSpec, Signature, SignatureError, TypeConstraint};
pub use value::{Instance, Value};
