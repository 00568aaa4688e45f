//! Runtime values that dispatch is performed over.
//!
//! Every argument of a call is a `Value`. Matching never looks at static
//! types; `Value::type_of` maps each value to a node in the registered
//! type hierarchy and the resolver works from there.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::hierarchy::TypeId;

/// A runtime value.
///
/// Floats are wrapped in `OrderedFloat` so values are `Eq` and can be
/// compared for exact equality in tests and predicate environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    Bytes(Vec<u8>),
    /// A registered type, reified as a value so predicates can reference
    /// the names exposed through a binding's extra types.
    Type(TypeId),
    /// An instance of a user-registered type.
    Instance(Instance),
}

/// An instance of a user-registered type: its type plus field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub ty: TypeId,
    pub fields: Vec<Value>,
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    pub fn str(v: impl Into<String>) -> Self {
        Value::Str(v.into())
    }

    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(v.into())
    }

    /// Construct an instance of a registered type.
    pub fn instance(ty: TypeId, fields: Vec<Value>) -> Self {
        Value::Instance(Instance { ty, fields })
    }

    /// The hierarchy node for this value's runtime type.
    pub fn type_of(&self) -> TypeId {
        match self {
            Value::Unit => TypeId::UNIT,
            Value::Bool(_) => TypeId::BOOL,
            Value::Int(_) => TypeId::INT,
            Value::Float(_) => TypeId::FLOAT,
            Value::Str(_) => TypeId::STR,
            Value::Bytes(_) => TypeId::BYTES,
            Value::Type(_) => TypeId::TYPE,
            Value::Instance(inst) => inst.ty,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(v.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    /// Short name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Type(_) => "type",
            Value::Instance(_) => "instance",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::Type(id) => write!(f, "type#{}", id.index()),
            Value::Instance(inst) => {
                write!(f, "#{}(", inst.ty.index())?;
                for (i, field) in inst.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::str(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_of_primitives() {
        assert_eq!(Value::Unit.type_of(), TypeId::UNIT);
        assert_eq!(Value::Bool(true).type_of(), TypeId::BOOL);
        assert_eq!(Value::int(7).type_of(), TypeId::INT);
        assert_eq!(Value::float(1.5).type_of(), TypeId::FLOAT);
        assert_eq!(Value::str("x").type_of(), TypeId::STR);
        assert_eq!(Value::bytes(*b"x").type_of(), TypeId::BYTES);
    }

    #[test]
    fn type_of_instance_is_its_registered_type() {
        let ty = TypeId::new(12);
        let v = Value::instance(ty, vec![Value::int(17)]);
        assert_eq!(v.type_of(), ty);
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(Value::str("blue").to_string(), "\"blue\"");
        assert_eq!(Value::int(42).to_string(), "42");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn float_values_are_eq() {
        assert_eq!(Value::float(2.5), Value::float(2.5));
        assert_ne!(Value::float(2.5), Value::float(2.6));
    }
}
