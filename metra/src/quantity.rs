//! Quantities: a value expressed in a unit
//!
//! A quantity is an immutable pair of an exact rational value and a unit id.
//! Equality and hashing are structural; the dimension-aware relation that
//! converts before comparing is a separate operation taking the universe.

use crate::error::MetricError;
use crate::unit::UnitId;
use crate::universe::Universe;
use metra_core::Rational;
use std::cmp::Ordering;

/// A scalar value expressed in a unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    value: Rational,
    unit: UnitId,
}

impl Quantity {
    pub fn new(value: Rational, unit: UnitId) -> Self {
        Self { value, unit }
    }

    /// A quantity of 0 measured in the given unit
    pub fn zero(unit: UnitId) -> Self {
        Self::new(Rational::zero(), unit)
    }

    pub fn value(&self) -> &Rational {
        &self.value
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// This quantity expressed in another unit of the same property
    pub fn convert_to(&self, unit: UnitId, universe: &Universe) -> Result<Quantity, MetricError> {
        if unit == self.unit {
            return Ok(self.clone());
        }
        let value = universe.convert_value(self.unit, unit, &self.value)?;
        Ok(Quantity::new(value, unit))
    }

    /// Whether two quantities denote the same magnitude: their units must be
    /// compatible and the values equal after conversion
    pub fn equivalent_in(&self, other: &Quantity, universe: &Universe) -> bool {
        if self == other {
            return true;
        }
        match other.convert_to(self.unit, universe) {
            Ok(converted) => converted.value == self.value,
            Err(_) => false,
        }
    }

    /// Order two quantities of the same property
    pub fn compare_in(&self, other: &Quantity, universe: &Universe) -> Result<Ordering, MetricError> {
        let converted = other.convert_to(self.unit, universe)?;
        Ok(self.value.cmp(&converted.value))
    }

    /// Sum quantities into the destination unit
    ///
    /// An empty sum is zero at the destination and a single quantity is
    /// simply converted. A sum of two or more must not involve offset units:
    /// such quantities denote points on a scale, not amounts.
    pub fn sum(
        destination: UnitId,
        quantities: &[Quantity],
        universe: &Universe,
    ) -> Result<Quantity, MetricError> {
        if quantities.len() > 1
            && quantities
                .iter()
                .any(|q| universe.unit(q.unit).has_offset())
        {
            return Err(MetricError::NonAdditiveQuantities);
        }

        match quantities {
            [] => Ok(Quantity::zero(destination)),
            [single] => single.convert_to(destination, universe),
            [first, rest @ ..] => {
                let mut total = first.convert_to(destination, universe)?.value;
                for q in rest {
                    total = total.add(&q.convert_to(destination, universe)?.value);
                }
                Ok(Quantity::new(total, destination))
            }
        }
    }

    /// Render as `"value unit"` using the universe's number format; named
    /// units inflect with the value
    pub fn display(&self, universe: &Universe) -> String {
        let value = universe.number_format().apply(&self.value);
        let unit = universe.unit_display_for_value(self.unit, &self.value);
        format!("{value} {unit}")
    }
}
