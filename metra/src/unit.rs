//! Units of measurement
//!
//! A unit converts to the base unit of its property through
//! `base_value = value * multiplier + offset`. Units live in the arena of
//! their [`Universe`](crate::Universe) and reference each other by
//! [`UnitId`]; a derived unit additionally carries the factorization of
//! atomic units it was synthesized from. A derived combination that matches
//! no registered property is *invalid*: it exists so it can be named in
//! diagnostics, but it cannot participate in conversions.

use crate::prefix::UnitPrefix;
use crate::property::PropertyId;
use metra_core::{Factorization, Rational};
use metra_text::plural_of;

/// Arena index of a unit within its universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) u32);

/// A unit of measurement
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) property: Option<PropertyId>,
    pub(crate) long_name: Option<String>,
    pub(crate) short_name: Option<String>,
    pub(crate) names: Vec<String>,
    pub(crate) multiplier: Rational,
    pub(crate) offset: Rational,
    pub(crate) prefix: Option<UnitPrefix>,
    pub(crate) factors: Option<Factorization<UnitId>>,
}

impl Unit {
    /// A base unit: multiplier 1, offset 0
    pub(crate) fn base(
        property: PropertyId,
        long_names: &[String],
        short_names: &[String],
    ) -> Self {
        let (long_name, short_name, names) = process_names(long_names, short_names, None);
        Self {
            property: Some(property),
            long_name,
            short_name,
            names,
            multiplier: Rational::one(),
            offset: Rational::zero(),
            prefix: None,
            factors: None,
        }
    }

    /// An atomic unit defined relative to another unit of the same property;
    /// the conversion parameters compose with the referenced unit's own
    pub(crate) fn scaled(
        property: PropertyId,
        long_names: &[String],
        short_names: &[String],
        reference: &Unit,
        multiplier: Rational,
        offset: Rational,
    ) -> Self {
        let (long_name, short_name, names) = process_names(long_names, short_names, None);
        Self {
            property: Some(property),
            long_name,
            short_name,
            names,
            offset: offset.add(&multiplier.mul(&reference.offset)),
            multiplier: multiplier.mul(&reference.multiplier),
            prefix: None,
            factors: None,
        }
    }

    /// A prefixed variant of an atomic unit; prefixed units never carry an
    /// offset and no further prefix may be applied to them
    pub(crate) fn prefixed(
        property: PropertyId,
        long_names: &[String],
        short_names: &[String],
        reference: &Unit,
        prefix: UnitPrefix,
    ) -> Self {
        debug_assert!(reference.prefix.is_none());
        let (long_name, short_name, names) =
            process_names(long_names, short_names, Some(prefix));
        Self {
            property: Some(property),
            long_name,
            short_name,
            names,
            multiplier: prefix.multiplier().mul(&reference.multiplier),
            offset: Rational::zero(),
            prefix: Some(prefix),
            factors: None,
        }
    }

    /// A derived unit synthesized from a factorization of atomic units
    pub(crate) fn derived(
        property: PropertyId,
        factors: Factorization<UnitId>,
        multiplier: Rational,
    ) -> Self {
        debug_assert!(!factors.is_empty() && !factors.is_single_item());
        Self {
            property: Some(property),
            long_name: None,
            short_name: None,
            names: Vec::new(),
            multiplier,
            offset: Rational::zero(),
            prefix: None,
            factors: Some(factors),
        }
    }

    /// A derived combination that maps to no registered property
    pub(crate) fn invalid(factors: Factorization<UnitId>) -> Self {
        Self {
            property: None,
            long_name: None,
            short_name: None,
            names: Vec::new(),
            multiplier: Rational::one(),
            offset: Rational::zero(),
            prefix: None,
            factors: Some(factors),
        }
    }

    /// The property this unit measures; absent for invalid units
    pub fn property(&self) -> Option<PropertyId> {
        self.property
    }

    /// All names this unit is registered under
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The coefficient converting a value of this unit to its base unit
    pub fn multiplier(&self) -> &Rational {
        &self.multiplier
    }

    /// The additive offset of this unit with respect to its base unit
    pub fn offset(&self) -> &Rational {
        &self.offset
    }

    pub fn prefix(&self) -> Option<UnitPrefix> {
        self.prefix
    }

    /// The factorization this unit was derived from, if any
    pub fn factors(&self) -> Option<&Factorization<UnitId>> {
        self.factors.as_ref()
    }

    pub fn has_offset(&self) -> bool {
        !self.offset.is_zero()
    }

    pub fn is_derived(&self) -> bool {
        self.factors.is_some()
    }

    /// A unit is valid when it corresponds to a known property
    pub fn is_valid(&self) -> bool {
        self.property.is_some()
    }
}

/// Build the name index entries for a unit: each long name in singular and
/// plural form (and without a leading "degree " when present), plus the
/// short names. With a prefix, every name is the prefix concatenated with
/// the raw name.
fn process_names(
    long_names: &[String],
    short_names: &[String],
    prefix: Option<UnitPrefix>,
) -> (Option<String>, Option<String>, Vec<String>) {
    let mut names: Vec<String> = Vec::new();
    let mut push = |names: &mut Vec<String>, name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    match prefix {
        None => {
            for name in long_names {
                push(&mut names, name.clone());
                push(&mut names, plural_of(name));
                if let Some(stripped) = name.strip_prefix("degree ") {
                    push(&mut names, stripped.to_string());
                }
            }
            for name in short_names {
                push(&mut names, name.clone());
            }
            (
                long_names.first().cloned(),
                short_names.first().cloned(),
                names,
            )
        }
        Some(prefix) => {
            let long = prefix.long_name();
            let short = prefix.short_name();
            for name in long_names {
                push(&mut names, format!("{long}{name}"));
                push(&mut names, format!("{long}{}", plural_of(name)));
            }
            for name in short_names {
                push(&mut names, format!("{short}{name}"));
            }
            (
                long_names.first().map(|n| format!("{long}{n}")),
                short_names.first().map(|n| format!("{short}{n}")),
                names,
            )
        }
    }
}

/// One unit definition from the universe file, also covering the prefixed
/// variants it expands into
#[derive(Debug, Clone)]
pub(crate) struct UnitDefinition {
    pub long_names: Vec<String>,
    pub short_names: Vec<String>,
    pub base_unit_factors: Option<Factorization<String>>,
    pub multiplier: Rational,
    pub offset: Rational,
    pub prefixes: Vec<UnitPrefix>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_unit_names() {
        let unit = Unit::base(
            PropertyId(0),
            &strings(&["meter", "metre"]),
            &strings(&["m"]),
        );
        assert_eq!(
            unit.names(),
            &["meter", "meters", "metre", "metres", "m"]
        );
        assert_eq!(unit.long_name.as_deref(), Some("meter"));
        assert_eq!(unit.short_name.as_deref(), Some("m"));
        assert!(unit.multiplier().is_one());
        assert!(!unit.has_offset());
    }

    #[test]
    fn test_degree_names() {
        let unit = Unit::base(
            PropertyId(0),
            &strings(&["degree celcius"]),
            &strings(&["C"]),
        );
        assert_eq!(
            unit.names(),
            &["degree celcius", "degrees celcius", "celcius", "C"]
        );
    }

    #[test]
    fn test_scaled_unit_composition() {
        let kelvin = Unit::base(PropertyId(0), &strings(&["kelvin"]), &strings(&["K"]));
        let celcius = Unit::scaled(
            PropertyId(0),
            &strings(&["degree celcius"]),
            &strings(&["C"]),
            &kelvin,
            Rational::one(),
            Rational::from_decimal_str("273.15").unwrap(),
        );
        assert_eq!(celcius.multiplier(), &Rational::one());
        assert_eq!(
            celcius.offset(),
            &Rational::from_decimal_str("273.15").unwrap()
        );

        // Defining against an already-offset unit composes both parameters.
        let half = Unit::scaled(
            PropertyId(0),
            &strings(&["halfcelcius"]),
            &[],
            &celcius,
            Rational::new(1, 2).unwrap(),
            Rational::zero(),
        );
        assert_eq!(half.multiplier(), &Rational::new(1, 2).unwrap());
        assert_eq!(
            half.offset(),
            &Rational::from_decimal_str("136.575").unwrap()
        );
    }

    #[test]
    fn test_prefixed_unit() {
        let meter = Unit::base(PropertyId(0), &strings(&["meter"]), &strings(&["m"]));
        let milli = Unit::prefixed(
            PropertyId(0),
            &strings(&["meter"]),
            &strings(&["m"]),
            &meter,
            UnitPrefix::Milli,
        );
        assert_eq!(
            milli.names(),
            &["millimeter", "millimeters", "mm"]
        );
        assert_eq!(milli.multiplier(), &Rational::new(1, 1000).unwrap());
        assert!(!milli.has_offset());
        assert_eq!(milli.prefix(), Some(UnitPrefix::Milli));
    }

    #[test]
    fn test_uninflected_name_dedup() {
        // A name whose plural equals its singular is indexed only once.
        let unit = Unit::base(PropertyId(0), &strings(&["series"]), &[]);
        assert_eq!(unit.names(), &["series"]);
    }
}
