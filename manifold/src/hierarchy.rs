//! The type-registration graph.
//!
//! Dispatch needs exactly one capability from the type system: given a
//! concrete type and a candidate ancestor, return the minimal number of
//! generalization steps between them, or "unrelated". No host reflection is
//! involved; every type is registered explicitly with its direct
//! supertype(s), and [`TypeRegistry::ancestor_distance`] walks that graph.
//!
//! Primitive types are seeded at construction so `Value::type_of` can map
//! to them without a registry lookup. User types may declare primitive
//! supertypes (e.g. a `Red` that generalizes to `int`).

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Identifies a registered type. Dense, namespace-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const UNIT: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const FLOAT: TypeId = TypeId(3);
    pub const STR: TypeId = TypeId(4);
    pub const BYTES: TypeId = TypeId(5);
    pub const TYPE: TypeId = TypeId(6);

    pub fn new(index: u32) -> Self {
        TypeId(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Errors raised while registering types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("type '{0}' is already registered")]
    Duplicate(String),

    #[error("unknown supertype '{0}'")]
    UnknownSupertype(String),
}

#[derive(Debug, Clone)]
struct TypeInfo {
    name: String,
    supers: Vec<TypeId>,
}

/// The explicit type graph one namespace dispatches over.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    infos: Vec<TypeInfo>,
    by_name: FxHashMap<String, TypeId>,
}

impl TypeRegistry {
    /// A registry with the primitive types pre-registered.
    pub fn new() -> Self {
        let mut registry = Self {
            infos: Vec::new(),
            by_name: FxHashMap::default(),
        };
        for name in ["unit", "bool", "int", "float", "str", "bytes", "type"] {
            registry.insert(name, Vec::new());
        }
        debug_assert_eq!(registry.by_name["int"], TypeId::INT);
        debug_assert_eq!(registry.by_name["type"], TypeId::TYPE);
        registry
    }

    fn insert(&mut self, name: &str, supers: Vec<TypeId>) -> TypeId {
        let id = TypeId(self.infos.len() as u32);
        self.infos.push(TypeInfo {
            name: name.to_string(),
            supers,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Register a type with its direct supertypes (named).
    pub fn register(&mut self, name: &str, supers: &[&str]) -> Result<TypeId, HierarchyError> {
        if self.by_name.contains_key(name) {
            return Err(HierarchyError::Duplicate(name.to_string()));
        }
        let supers = supers
            .iter()
            .map(|s| {
                self.lookup(s)
                    .ok_or_else(|| HierarchyError::UnknownSupertype(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.insert(name, supers))
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.infos[id.0 as usize].name
    }

    /// Direct supertypes of `id`.
    pub fn supertypes(&self, id: TypeId) -> &[TypeId] {
        &self.infos[id.0 as usize].supers
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Minimal number of generalization steps from `sub` up to `ancestor`,
    /// or `None` when `ancestor` does not appear in `sub`'s ancestry.
    ///
    /// Breadth-first over the supertype graph, so with multiple supertypes
    /// the shortest chain wins.
    pub fn ancestor_distance(&self, sub: TypeId, ancestor: TypeId) -> Option<u32> {
        if sub == ancestor {
            return Some(0);
        }
        let mut seen = vec![false; self.infos.len()];
        let mut queue = VecDeque::new();
        seen[sub.0 as usize] = true;
        queue.push_back((sub, 0u32));
        while let Some((current, depth)) = queue.pop_front() {
            for &sup in self.supertypes(current) {
                if sup == ancestor {
                    return Some(depth + 1);
                }
                if !seen[sup.0 as usize] {
                    seen[sup.0 as usize] = true;
                    queue.push_back((sup, depth + 1));
                }
            }
        }
        None
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_hierarchy() -> (TypeRegistry, TypeId, TypeId, TypeId) {
        let mut reg = TypeRegistry::new();
        let red = reg.register("Red", &["int"]).unwrap();
        let crimson = reg.register("Crimson", &["Red"]).unwrap();
        let blue = reg.register("Blue", &["int"]).unwrap();
        (reg, red, crimson, blue)
    }

    #[test]
    fn distance_zero_for_same_type() {
        let (reg, red, _, _) = color_hierarchy();
        assert_eq!(reg.ancestor_distance(red, red), Some(0));
        assert_eq!(reg.ancestor_distance(TypeId::INT, TypeId::INT), Some(0));
    }

    #[test]
    fn distance_counts_generalization_steps() {
        let (reg, red, crimson, _) = color_hierarchy();
        assert_eq!(reg.ancestor_distance(crimson, red), Some(1));
        assert_eq!(reg.ancestor_distance(crimson, TypeId::INT), Some(2));
        assert_eq!(reg.ancestor_distance(red, TypeId::INT), Some(1));
    }

    #[test]
    fn unrelated_types_have_no_distance() {
        let (reg, red, crimson, blue) = color_hierarchy();
        assert_eq!(reg.ancestor_distance(red, blue), None);
        assert_eq!(reg.ancestor_distance(crimson, blue), None);
        assert_eq!(reg.ancestor_distance(TypeId::INT, red), None);
        assert_eq!(reg.ancestor_distance(TypeId::STR, TypeId::INT), None);
    }

    #[test]
    fn multiple_supertypes_take_shortest_chain() {
        let mut reg = TypeRegistry::new();
        let a = reg.register("A", &[]).unwrap();
        reg.register("B", &["A"]).unwrap();
        // C generalizes both through B (two steps) and directly to A.
        let c = reg.register("C", &["B", "A"]).unwrap();
        assert_eq!(reg.ancestor_distance(c, a), Some(1));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = TypeRegistry::new();
        reg.register("Red", &["int"]).unwrap();
        assert_eq!(
            reg.register("Red", &[]),
            Err(HierarchyError::Duplicate("Red".to_string()))
        );
        assert_eq!(
            reg.register("int", &[]),
            Err(HierarchyError::Duplicate("int".to_string()))
        );
    }

    #[test]
    fn unknown_supertype_fails() {
        let mut reg = TypeRegistry::new();
        assert_eq!(
            reg.register("Red", &["Color"]),
            Err(HierarchyError::UnknownSupertype("Color".to_string()))
        );
    }

    #[test]
    fn names_round_trip() {
        let (reg, red, _, _) = color_hierarchy();
        assert_eq!(reg.name(red), "Red");
        assert_eq!(reg.lookup("Red"), Some(red));
        assert_eq!(reg.lookup("Green"), None);
    }
}
