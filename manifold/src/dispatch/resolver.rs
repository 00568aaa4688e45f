//! The dispatch resolution algorithm.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::hierarchy::TypeRegistry;
use crate::predicate::{Env, PredicatePolicy};
use crate::registry::Implementation;
use crate::signature::{ParamSpec, TypeConstraint};
use crate::value::Value;

use super::result::{DispatchError, NoMatchError};
use super::types::{Call, Candidate, ParamSpecificity};

/// Resolution context: the type graph to measure ancestor distances in
/// and the policy for predicate evaluation failures.
pub struct Resolver<'a> {
    types: &'a TypeRegistry,
    policy: PredicatePolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(types: &'a TypeRegistry, policy: PredicatePolicy) -> Self {
        Self { types, policy }
    }

    /// Resolve a call against the ordered implementations bound to
    /// `function`, returning the single best candidate.
    ///
    /// Deterministic: a fixed implementation list and a fixed call always
    /// produce the same winner.
    pub fn resolve(
        &self,
        function: &str,
        call: &Call,
        implementations: &[Arc<Implementation>],
    ) -> Result<Candidate, DispatchError> {
        let ranked = self.rank(call, implementations)?;
        match ranked.into_iter().next() {
            Some(winner) => {
                debug!(
                    function,
                    bind_index = winner.bind_index,
                    score = winner.score(),
                    "resolved call"
                );
                Ok(winner)
            }
            None => {
                debug!(function, "no matching implementation");
                Err(NoMatchError {
                    function: function.to_string(),
                    positional: call.positional().to_vec(),
                    keyword: call
                        .keyword()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                }
                .into())
            }
        }
    }

    /// Every surviving candidate for `call`, best first.
    ///
    /// Ordering is by summed ancestor distance, then by binding order, so
    /// equally specific candidates keep their bind-time precedence. The
    /// list may be empty; `resolve` turns that into a failure.
    pub fn rank(
        &self,
        call: &Call,
        implementations: &[Arc<Implementation>],
    ) -> Result<Vec<Candidate>, DispatchError> {
        let mut candidates = Vec::new();
        for (bind_index, implementation) in implementations.iter().enumerate() {
            if let Some(candidate) = self.consider(bind_index, implementation, call)? {
                candidates.push(candidate);
            }
        }
        candidates.sort_by_key(|c| (c.score(), c.bind_index));
        Ok(candidates)
    }

    /// Run one implementation through argument binding, type filtering
    /// and predicate filtering. `Ok(None)` means rejected.
    fn consider(
        &self,
        bind_index: usize,
        implementation: &Arc<Implementation>,
        call: &Call,
    ) -> Result<Option<Candidate>, DispatchError> {
        let params = implementation.params();

        let Some(bound) = bind_arguments(params, call) else {
            trace!(bind_index, "rejected: arguments do not bind");
            return Ok(None);
        };

        let Some(specificity) = self.type_distances(params, &bound) else {
            trace!(bind_index, "rejected: type constraint unsatisfied");
            return Ok(None);
        };

        if !self.predicates_pass(implementation, &bound)? {
            trace!(bind_index, "rejected: predicate unsatisfied");
            return Ok(None);
        }

        Ok(Some(Candidate {
            implementation: Arc::clone(implementation),
            bind_index,
            bound,
            specificity,
        }))
    }

    /// Per-parameter ancestor distances, or `None` when any declared type
    /// is absent from its argument's ancestry.
    fn type_distances(
        &self,
        params: &[ParamSpec],
        bound: &[Value],
    ) -> Option<Vec<ParamSpecificity>> {
        params
            .iter()
            .zip(bound)
            .map(|(spec, value)| match spec.constraint {
                TypeConstraint::Any => Some(ParamSpecificity::Wildcard),
                TypeConstraint::Concrete(declared) => {
                    let runtime = value.type_of();
                    if runtime == declared {
                        Some(ParamSpecificity::Exact)
                    } else {
                        self.types
                            .ancestor_distance(runtime, declared)
                            .map(ParamSpecificity::Distance)
                    }
                }
            })
            .collect()
    }

    /// Evaluate every parameter's predicate in the candidate's closed
    /// environment. Evaluation failures are handled per the policy:
    /// disqualify treats them as predicate-false, propagate aborts the
    /// whole resolution.
    fn predicates_pass(
        &self,
        implementation: &Implementation,
        bound: &[Value],
    ) -> Result<bool, DispatchError> {
        let env = environment(implementation, bound);
        for spec in implementation.params() {
            match env.eval_bool(&spec.predicate) {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(error) => match self.policy {
                    PredicatePolicy::Disqualify => {
                        trace!(
                            parameter = %spec.name,
                            %error,
                            "predicate evaluation failed; candidate disqualified"
                        );
                        return Ok(false);
                    }
                    PredicatePolicy::Propagate => return Err(error.into()),
                },
            }
        }
        Ok(true)
    }
}

/// Fit the call's arguments onto the parameter specs: positionals
/// left-to-right, keywords by name, defaults for the rest. `None` when
/// the call cannot be bound (too many positionals, unknown or duplicate
/// keyword, missing argument without default).
fn bind_arguments(params: &[ParamSpec], call: &Call) -> Option<Vec<Value>> {
    if call.positional().len() > params.len() {
        return None;
    }

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, value) in slots.iter_mut().zip(call.positional()) {
        *slot = Some(value.clone());
    }

    for (name, value) in call.keyword() {
        let position = params.iter().position(|p| &p.name == name)?;
        if slots[position].is_some() {
            // Already filled positionally.
            return None;
        }
        slots[position] = Some(value.clone());
    }

    slots
        .into_iter()
        .zip(params)
        .map(|(slot, spec)| slot.or_else(|| spec.default.clone()))
        .collect()
}

/// The closed evaluation environment for one candidate: exposed names
/// first, bound parameter values second so parameters shadow.
fn environment<'c>(implementation: &'c Implementation, bound: &'c [Value]) -> Env<'c> {
    let mut env = Env::new();
    for (name, value) in implementation.constants() {
        env.bind(name, value);
    }
    for (name, function) in implementation.host_fns() {
        env.bind_fn(name, function);
    }
    for (spec, value) in implementation.params().iter().zip(bound) {
        env.bind(&spec.name, value);
    }
    env
}
