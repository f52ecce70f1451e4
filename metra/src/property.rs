//! Physical properties and the unit-lookup capability
//!
//! A property is a physical dimension measured by an ordered list of units.
//! Its `dimensions` factorization is kept reduced to fundamental properties;
//! a fundamental property's dimension is itself.

use crate::unit::UnitId;
use metra_core::Factorization;
use std::collections::HashMap;

/// Arena index of a property within its universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub(crate) u32);

/// A physical property measured within a universe
#[derive(Debug, Clone)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) names: Vec<String>,
    pub(crate) dimensions: Factorization<PropertyId>,
    pub(crate) base_unit: Option<UnitId>,
    pub(crate) units: Vec<UnitId>,
    pub(crate) units_by_name: HashMap<String, UnitId>,
}

impl Property {
    pub(crate) fn new(names: Vec<String>, dimensions: Factorization<PropertyId>) -> Self {
        debug_assert!(!names.is_empty());
        Self {
            name: names[0].clone(),
            names,
            dimensions,
            base_unit: None,
            units: Vec::new(),
            units_by_name: HashMap::new(),
        }
    }

    /// The primary name of this property
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All names of this property
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The dimensions of this property, reduced to fundamental properties
    pub fn dimensions(&self) -> &Factorization<PropertyId> {
        &self.dimensions
    }

    /// The canonical unit of this property; every conversion funnels
    /// through it
    pub fn base_unit(&self) -> Option<UnitId> {
        self.base_unit
    }

    /// A property is fundamental when its dimension is itself
    pub fn is_fundamental(&self) -> bool {
        self.dimensions.is_single_item()
    }

    /// A property is derived when its dimension is a product of other
    /// properties' dimensions
    pub fn is_derived(&self) -> bool {
        !self.is_fundamental()
    }
}

/// A scope that can resolve unit names: either a single property or a whole
/// universe. Callers wanting "look here first, then fall back there" compose
/// two scopes.
pub trait UnitScope {
    /// The unit registered under the given name, if any
    fn unit_named(&self, name: &str) -> Option<UnitId>;

    fn has_unit_named(&self, name: &str) -> bool {
        self.unit_named(name).is_some()
    }

    /// All named units in this scope, in registration order
    fn named_units(&self) -> &[UnitId];
}

impl UnitScope for Property {
    fn unit_named(&self, name: &str) -> Option<UnitId> {
        self.units_by_name.get(name).copied()
    }

    fn named_units(&self) -> &[UnitId] {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fundamental_property() {
        let id = PropertyId(0);
        let p = Property::new(
            vec!["length".to_string(), "distance".to_string()],
            Factorization::factor(id, 1),
        );
        assert_eq!(p.name(), "length");
        assert!(p.is_fundamental());
        assert!(!p.is_derived());
        assert!(p.base_unit().is_none());
    }

    #[test]
    fn test_derived_property() {
        let length = PropertyId(0);
        let time = PropertyId(1);
        let dims = Factorization::fraction(length, time);
        let p = Property::new(vec!["speed".to_string()], dims.clone());
        assert!(p.is_derived());
        assert_eq!(p.dimensions(), &dims);
    }

    #[test]
    fn test_unit_scope() {
        let mut p = Property::new(
            vec!["length".to_string()],
            Factorization::factor(PropertyId(0), 1),
        );
        p.units_by_name.insert("meter".to_string(), UnitId(7));
        p.units.push(UnitId(7));

        assert_eq!(p.unit_named("meter"), Some(UnitId(7)));
        assert!(p.has_unit_named("meter"));
        assert!(!p.has_unit_named("second"));
        assert_eq!(p.named_units(), &[UnitId(7)]);
    }
}
