//! The binding registry.
//!
//! A [`Namespace`] owns everything one dispatch domain needs: the type
//! graph, the interner for function names, and the append-only ordered
//! implementation lists per function name. Binding is the only mutation
//! and takes `&mut self`, which is the exclusive-writer discipline the
//! registry needs; resolution reads through `&self` and can never observe
//! a partially appended list. Implementations are immutable once bound.

mod describe;

pub use describe::{
    FunctionListing, ImplementationListing, NamespaceListing, ParameterListing,
};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use string_interner::{DefaultStringInterner, DefaultSymbol};
use tracing::debug;

use crate::dispatch::{Call, Candidate, DispatchError, Resolver};
use crate::hierarchy::{HierarchyError, TypeId, TypeRegistry};
use crate::predicate::{HostFn, PredicateError, PredicatePolicy};
use crate::signature::{ParamSpec, Signature, SignatureError};
use crate::value::Value;

/// The underlying callable of a bound implementation. Invoked with the
/// bound parameter values in declaration order, defaults filled.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync>;

/// Stable identity of a bound implementation within its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImplId(u32);

impl ImplId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// One callable bound under a function name. Immutable once bound.
pub struct Implementation {
    id: ImplId,
    bound_name: String,
    original_name: Option<String>,
    params: Vec<ParamSpec>,
    extra_types: Vec<(String, TypeId)>,
    constants: Vec<(String, Value)>,
    host_fns: Vec<(String, HostFn)>,
    callable: NativeFn,
}

impl Implementation {
    pub fn id(&self) -> ImplId {
        self.id
    }

    /// The function name this implementation is bound under.
    pub fn bound_name(&self) -> &str {
        &self.bound_name
    }

    /// The callable's own name when it was bound under a different one.
    /// Diagnostic metadata only; resolution never consults it.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The extra types this implementation requires, as registered.
    pub fn extra_types(&self) -> &[(String, TypeId)] {
        &self.extra_types
    }

    /// Exposed constant values, including one `Value::Type` per extra type.
    pub(crate) fn constants(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.constants.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub(crate) fn host_fns(&self) -> impl Iterator<Item = (&str, &HostFn)> {
        self.host_fns.iter().map(|(name, function)| (name.as_str(), function))
    }

    /// Invoke the underlying callable.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, DispatchError> {
        (self.callable)(args)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("id", &self.id)
            .field("bound_name", &self.bound_name)
            .field("original_name", &self.original_name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

struct FunctionEntry {
    name: String,
    implementations: Vec<Arc<Implementation>>,
}

/// A named registry of function-name → implementation-list bindings.
///
/// Always constructed fresh via [`Namespace::new`]; there is no shared
/// default namespace.
pub struct Namespace {
    label: String,
    interner: DefaultStringInterner,
    functions: IndexMap<DefaultSymbol, FunctionEntry>,
    types: TypeRegistry,
    policy: PredicatePolicy,
    next_impl: u32,
}

impl Namespace {
    /// A fresh, independently-owned namespace with the primitive types
    /// pre-registered.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            interner: DefaultStringInterner::default(),
            functions: IndexMap::new(),
            types: TypeRegistry::new(),
            policy: PredicatePolicy::default(),
            next_impl: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The namespace's type graph.
    pub fn hierarchy(&self) -> &TypeRegistry {
        &self.types
    }

    /// Register a type with its direct supertypes.
    pub fn register_type(
        &mut self,
        name: &str,
        supers: &[&str],
    ) -> Result<TypeId, HierarchyError> {
        self.types.register(name, supers)
    }

    /// Set what resolution does when a candidate's predicate fails to
    /// evaluate. The default disqualifies the candidate.
    pub fn set_predicate_policy(&mut self, policy: PredicatePolicy) {
        self.policy = policy;
    }

    pub fn predicate_policy(&self) -> PredicatePolicy {
        self.policy
    }

    /// Bind a callable under `name` with no extra configuration.
    ///
    /// Equivalent to `self.binder().bind(name, signature, callable)`; the
    /// three binding forms all funnel into [`Binder::bind`].
    pub fn bind<F>(
        &mut self,
        name: &str,
        signature: Signature,
        callable: F,
    ) -> Result<ImplId, SignatureError>
    where
        F: Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        self.binder().bind(name, signature, callable)
    }

    /// Start a configured binding: explicit bind name, extra types,
    /// exposed constants and functions.
    pub fn binder(&mut self) -> Binder<'_> {
        Binder {
            namespace: self,
            bind_name: None,
            extra_types: Vec::new(),
            constants: Vec::new(),
            host_fns: Vec::new(),
        }
    }

    /// The ordered implementations bound under `name`, oldest first.
    pub fn lookup(&self, name: &str) -> Result<&[Arc<Implementation>], DispatchError> {
        self.interner
            .get(name)
            .and_then(|symbol| self.functions.get(&symbol))
            .map(|entry| entry.implementations.as_slice())
            .ok_or_else(|| DispatchError::UnknownFunction(name.to_string()))
    }

    /// The implementation that would handle `call`, without invoking it.
    /// Pure: never mutates the registry.
    pub fn resolve(&self, name: &str, call: &Call) -> Result<Candidate, DispatchError> {
        let implementations = self.lookup(name)?;
        Resolver::new(&self.types, self.policy).resolve(name, call, implementations)
    }

    /// Every surviving candidate for `call`, best first. The list may be
    /// empty when nothing matches.
    pub fn rank(&self, name: &str, call: &Call) -> Result<Vec<Candidate>, DispatchError> {
        let implementations = self.lookup(name)?;
        Resolver::new(&self.types, self.policy).rank(call, implementations)
    }

    /// Resolve `call` and invoke the winner.
    pub fn call(&self, name: &str, call: &Call) -> Result<Value, DispatchError> {
        let candidate = self.resolve(name, call)?;
        candidate.implementation.invoke(&candidate.bound)
    }

    /// The structured listing of every binding; its `Display` is the
    /// human-readable description format.
    pub fn describe(&self) -> NamespaceListing {
        describe::listing(self)
    }

    /// One-line digest of the namespace's bindings.
    pub fn summary(&self) -> String {
        let functions = self.functions.len();
        let implementations: usize = self
            .functions
            .values()
            .map(|entry| entry.implementations.len())
            .sum();
        format!(
            "{} with {} function{} bound to {} implementation{}",
            self.label,
            functions,
            if functions == 1 { "" } else { "s" },
            implementations,
            if implementations == 1 { "" } else { "s" },
        )
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &[Arc<Implementation>])> {
        self.functions
            .values()
            .map(|entry| (entry.name.as_str(), entry.implementations.as_slice()))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("label", &self.label)
            .field("functions", &self.functions.len())
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}

/// A configured binding in progress.
///
/// Covers the configured-wrapper binding forms: set options, then apply
/// to a closure or to an already-defined `fn` item with [`Binder::bind`].
pub struct Binder<'ns> {
    namespace: &'ns mut Namespace,
    bind_name: Option<String>,
    extra_types: Vec<String>,
    constants: Vec<(String, Value)>,
    host_fns: Vec<(String, HostFn)>,
}

impl Binder<'_> {
    /// Bind under a different function name than the callable's own. The
    /// callable's name is kept as diagnostic metadata.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.bind_name = Some(name.into());
        self
    }

    /// Expose a registered type to the signature's predicates (reified as
    /// a `Value::Type` constant) and record it as required by the
    /// implementation.
    pub fn expose_type(mut self, type_name: impl Into<String>) -> Self {
        self.extra_types.push(type_name.into());
        self
    }

    /// Expose a constant to the signature's predicates.
    pub fn using_const(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.push((name.into(), value.into()));
        self
    }

    /// Expose a host function to the signature's predicates.
    pub fn using_fn(
        mut self,
        name: impl Into<String>,
        function: impl Fn(&[Value]) -> Result<Value, PredicateError> + Send + Sync + 'static,
    ) -> Self {
        self.host_fns.push((name.into(), Arc::new(function)));
        self
    }

    /// Validate the signature and append the implementation to the
    /// registry. On error the registry is left untouched.
    pub fn bind<F>(
        self,
        callable_name: &str,
        signature: Signature,
        callable: F,
    ) -> Result<ImplId, SignatureError>
    where
        F: Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        let namespace = self.namespace;

        let mut extra_types = Vec::with_capacity(self.extra_types.len());
        for type_name in self.extra_types {
            match namespace.types.lookup(&type_name) {
                Some(id) => extra_types.push((type_name, id)),
                None => return Err(SignatureError::UnknownExtraType { type_name }),
            }
        }

        let mut exposed_values: FxHashSet<&str> = self
            .constants
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        exposed_values.extend(extra_types.iter().map(|(name, _)| name.as_str()));
        let exposed_functions: FxHashSet<&str> = self
            .host_fns
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        let params = signature.build(&namespace.types, &exposed_values, &exposed_functions)?;

        let bound_name = self.bind_name.unwrap_or_else(|| callable_name.to_string());
        let original_name = if bound_name == callable_name {
            None
        } else {
            Some(callable_name.to_string())
        };

        let mut constants = self.constants;
        constants.extend(
            extra_types
                .iter()
                .map(|(name, id)| (name.clone(), Value::Type(*id))),
        );

        let id = ImplId(namespace.next_impl);
        namespace.next_impl += 1;

        let implementation = Arc::new(Implementation {
            id,
            bound_name: bound_name.clone(),
            original_name,
            params,
            extra_types,
            constants,
            host_fns: self.host_fns,
            callable: Arc::new(callable),
        });

        debug!(
            namespace = %namespace.label,
            function = %bound_name,
            arity = implementation.params.len(),
            id = id.index(),
            "bound implementation"
        );

        let symbol = namespace.interner.get_or_intern(&bound_name);
        namespace
            .functions
            .entry(symbol)
            .or_insert_with(|| FunctionEntry {
                name: bound_name,
                implementations: Vec::new(),
            })
            .implementations
            .push(implementation);

        Ok(id)
    }
}
