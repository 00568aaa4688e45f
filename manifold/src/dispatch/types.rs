//! Call representation and candidate types for dispatch resolution.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::registry::Implementation;
use crate::value::Value;

/// An invocation request: positional argument values plus keyword
/// arguments in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Call {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument. A repeated name overwrites the earlier
    /// value, mirroring how a keyword mapping behaves.
    pub fn kw(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &IndexMap<String, Value> {
        &self.keyword
    }
}

/// Per-parameter specificity of one eligible candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpecificity {
    /// Runtime type equals the declared type.
    Exact,
    /// Generalization steps up the hierarchy to the declared type.
    Distance(u32),
    /// No declared type; matches at distance zero without ever rejecting.
    Wildcard,
}

impl ParamSpecificity {
    /// Contribution to the candidate's summed specificity score.
    pub fn cost(self) -> u32 {
        match self {
            ParamSpecificity::Exact | ParamSpecificity::Wildcard => 0,
            ParamSpecificity::Distance(steps) => steps,
        }
    }
}

/// An implementation that survived argument binding, type filtering and
/// predicate filtering for one call, with its specificity vector.
/// Ephemeral: built per resolution, never persisted.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub implementation: Arc<Implementation>,
    /// Position of the implementation in its function's binding order;
    /// the tie-breaker between equally specific candidates.
    pub bind_index: usize,
    /// Bound parameter values in declaration order, defaults filled.
    pub bound: Vec<Value>,
    /// Per-parameter specificity in declaration order.
    pub specificity: Vec<ParamSpecificity>,
}

impl Candidate {
    /// Summed specificity score; lower is more specific.
    pub fn score(&self) -> u32 {
        self.specificity.iter().map(|s| s.cost()).sum()
    }
}
