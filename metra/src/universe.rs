//! The universe registry
//!
//! A universe owns every property and unit parsed from its definition file,
//! arena-style: properties and units are addressed by [`PropertyId`] and
//! [`UnitId`]. After loading, the registry is frozen apart from the
//! derived-unit memoization cache, which grows as queries synthesize new
//! unit combinations; query evaluation therefore borrows the universe
//! mutably, making the single-writer rule a compile-time fact.

use crate::error::{Error, MetricError};
use crate::parser::Parser;
use crate::property::{Property, PropertyId, UnitScope};
use crate::query::ConversionQuery;
use crate::unit::{Unit, UnitDefinition, UnitId};
use metra_core::{Factorization, NumberFormat, Rational};
use metra_text::plural_of;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A universe of physical properties and the units that measure them
#[derive(Debug)]
pub struct Universe {
    properties: Vec<Property>,
    units: Vec<Unit>,
    properties_by_name: HashMap<String, PropertyId>,
    properties_by_dimensions: HashMap<Factorization<PropertyId>, PropertyId>,
    units_by_name: HashMap<String, UnitId>,
    named_units: Vec<UnitId>,
    units_by_factors: HashMap<Factorization<UnitId>, UnitId>,
    formatter: NumberFormat,
    universe_file: Option<PathBuf>,
    currency_file: Option<PathBuf>,
}

impl Universe {
    pub(crate) fn empty() -> Self {
        Self {
            properties: Vec::new(),
            units: Vec::new(),
            properties_by_name: HashMap::new(),
            properties_by_dimensions: HashMap::new(),
            units_by_name: HashMap::new(),
            named_units: Vec::new(),
            units_by_factors: HashMap::new(),
            formatter: NumberFormat::default(),
            universe_file: None,
            currency_file: None,
        }
    }

    /// Build a universe by parsing definitions from a string
    pub fn from_source(source: &str) -> Result<Self, Error> {
        let mut universe = Self::empty();
        Parser::parse_universe_source(&mut universe, source, None)?;
        Ok(universe)
    }

    /// Build a universe from a definition file; the currency cache file is
    /// inferred from the definition file's name
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let currency = default_currency_file(path);
        Self::load_with_files(path, currency)
    }

    /// Build a universe from a definition file and a currency cache file
    pub fn load_with_files(
        path: impl AsRef<Path>,
        currency: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let mut universe = Self::empty();
        universe.universe_file = Some(path.to_path_buf());
        universe.currency_file = Some(currency.as_ref().to_path_buf());
        Parser::parse_universe_source(&mut universe, &source, Some(path.to_path_buf()))?;
        Ok(universe)
    }

    /// Parse and evaluate a conversion query against this universe
    ///
    /// Takes `&mut self` because resolving a unit expression may synthesize
    /// and memoize a new derived unit.
    pub fn convert(&mut self, expression: &str) -> Result<ConversionQuery, Error> {
        Parser::parse_query(self, expression)
    }

    //
    // Accessors
    //

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.0 as usize]
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0 as usize]
    }

    pub fn properties(&self) -> impl Iterator<Item = (PropertyId, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyId(i as u32), p))
    }

    pub fn property_named(&self, name: &str) -> Option<PropertyId> {
        self.properties_by_name.get(name).copied()
    }

    pub fn has_property_named(&self, name: &str) -> bool {
        self.properties_by_name.contains_key(name)
    }

    /// The number formatter used when rendering quantities
    pub fn number_format(&self) -> &NumberFormat {
        &self.formatter
    }

    pub fn set_number_format(&mut self, formatter: NumberFormat) {
        self.formatter = formatter;
    }

    /// The definition file this universe was loaded from, if any
    pub fn universe_file(&self) -> Option<&Path> {
        self.universe_file.as_deref()
    }

    /// The file where currency definitions are cached, if any
    pub fn currency_file(&self) -> Option<&Path> {
        self.currency_file.as_deref()
    }

    //
    // Registration (construction phase only)
    //

    /// Register a property; `factors` holds the declared derivation for a
    /// derived property. The base unit of a derived property is synthesized
    /// from the base units of its dimensional factors.
    pub(crate) fn create_property(
        &mut self,
        names: Vec<String>,
        factors: Option<&Factorization<PropertyId>>,
    ) -> Result<PropertyId, MetricError> {
        debug_assert!(!names.is_empty());
        let id = PropertyId(self.properties.len() as u32);
        let is_derived = factors.map_or(false, |f| !f.is_empty() && !f.is_single_item());

        let dimensions = match factors {
            Some(f) if is_derived => self.reduce_property_dimensions(f),
            _ => Factorization::factor(id, 1),
        };

        for name in &names {
            if self.properties_by_name.contains_key(name) {
                return Err(MetricError::DuplicatePropertyName(name.clone()));
            }
        }
        if is_derived {
            // A derivation that collapses onto an existing dimension, be it
            // a derived sibling or a fundamental property, is a duplicate.
            let clash = self
                .properties_by_dimensions
                .get(&dimensions)
                .copied()
                .or_else(|| dimensions.single_item().copied());
            if let Some(original) = clash {
                return Err(MetricError::DuplicateDerivedProperty {
                    original: self.property(original).name.clone(),
                    duplicate: names[0].clone(),
                });
            }
        }

        for name in &names {
            self.properties_by_name.insert(name.clone(), id);
        }
        if is_derived {
            self.properties_by_dimensions.insert(dimensions.clone(), id);
        }
        self.properties.push(Property::new(names, dimensions));

        if is_derived {
            let declared = factors.expect("derived properties carry factors");
            let base_factors = declared.try_transform(|pid| {
                self.property(*pid)
                    .base_unit
                    .ok_or_else(|| MetricError::InvalidEmptyProperty(self.property(*pid).name.clone()))
            })?;
            let reduced = self.unroll_factors(&base_factors);
            let multiplier = self.combine_multipliers(&reduced)?;
            let base = Unit::derived(id, reduced, multiplier);
            self.register_unit(id, base)?;
        }

        Ok(id)
    }

    /// Register the units stemming from one unit definition: the core unit
    /// followed by its prefixed variants
    pub(crate) fn add_unit_definition(
        &mut self,
        pid: PropertyId,
        def: &UnitDefinition,
    ) -> Result<(), MetricError> {
        let core = match &def.base_unit_factors {
            Some(factors) if !factors.is_empty() => {
                let fu = self.unit_factors_for(factors)?;
                let reference_id = self.unit_for_factors(&fu)?;
                if self.unit(reference_id).property != Some(pid) {
                    return Err(MetricError::IncompatibleBaseUnit {
                        base: self.describe_unit(reference_id),
                        property: self.property(pid).name.clone(),
                    });
                }
                Unit::scaled(
                    pid,
                    &def.long_names,
                    &def.short_names,
                    self.unit(reference_id),
                    def.multiplier.clone(),
                    def.offset.clone(),
                )
            }
            _ => Unit::base(pid, &def.long_names, &def.short_names),
        };

        if core.multiplier().is_zero() {
            let label = def
                .long_names
                .first()
                .or_else(|| def.short_names.first())
                .cloned()
                .unwrap_or_default();
            return Err(MetricError::ZeroMultiplier(label));
        }

        let core_id = self.register_unit(pid, core)?;
        for prefix in &def.prefixes {
            let reference = self.unit(core_id).clone();
            let unit = Unit::prefixed(pid, &def.long_names, &def.short_names, &reference, *prefix);
            self.register_unit(pid, unit)?;
        }
        Ok(())
    }

    /// Seal a property once all its unit definitions were processed
    pub(crate) fn freeze_property(&mut self, pid: PropertyId) -> Result<(), MetricError> {
        let property = self.property(pid);
        if property.is_fundamental() && property.units.is_empty() {
            return Err(MetricError::InvalidEmptyProperty(property.name.clone()));
        }
        Ok(())
    }

    /// Register a unit to a property and to this universe's indexes. All
    /// names must be unique within the property and among the universe's
    /// atomic units; the first unit of a property becomes its base unit.
    pub(crate) fn register_unit(
        &mut self,
        pid: PropertyId,
        unit: Unit,
    ) -> Result<UnitId, MetricError> {
        for name in unit.names() {
            if self.property(pid).units_by_name.contains_key(name)
                || self.units_by_name.contains_key(name)
            {
                return Err(MetricError::DuplicateUnitName(name.clone()));
            }
        }

        let id = UnitId(self.units.len() as u32);
        let names = unit.names().to_vec();
        let factors = unit.factors().cloned();
        self.units.push(unit);

        let property = &mut self.properties[pid.0 as usize];
        for name in &names {
            property.units_by_name.insert(name.clone(), id);
        }
        if property.units.is_empty() {
            property.base_unit = Some(id);
        }
        property.units.push(id);

        match factors {
            Some(f) => {
                self.units_by_factors.insert(f, id);
            }
            None => {
                for name in names {
                    self.units_by_name.insert(name, id);
                }
                self.named_units.push(id);
            }
        }
        Ok(id)
    }

    //
    // Derived-unit synthesis
    //

    /// Map a factorization of unit names to the named units
    pub fn unit_factors_for(
        &self,
        names: &Factorization<String>,
    ) -> Result<Factorization<UnitId>, MetricError> {
        names.try_transform(|name| {
            self.unit_named(name)
                .ok_or_else(|| MetricError::UnknownUnitName(name.clone()))
        })
    }

    /// The unit corresponding to a factorization, synthesizing and memoizing
    /// it on first sight
    ///
    /// Derived factors are unrolled into their own factorizations before
    /// lookup, so `(m/s) * kg` and `m * kg / s` resolve to the same unit. A
    /// single remaining item is that unit itself. A combination whose
    /// reduced dimensions match no registered property yields an invalid
    /// unit.
    pub fn unit_for_factors(
        &mut self,
        factors: &Factorization<UnitId>,
    ) -> Result<UnitId, MetricError> {
        let reduced = self.unroll_factors(factors);
        if let Some(&single) = reduced.single_item() {
            return Ok(single);
        }
        if let Some(&id) = self.units_by_factors.get(&reduced) {
            return Ok(id);
        }

        let dimensions = reduced.transform(|uid| self.factor_property(*uid));
        let dimensions = self.reduce_property_dimensions(&dimensions);
        let property = match dimensions.single_item() {
            Some(&p) => Some(p),
            None => self.properties_by_dimensions.get(&dimensions).copied(),
        };

        let unit = match property {
            Some(p) => {
                let multiplier = self.combine_multipliers(&reduced)?;
                Unit::derived(p, reduced.clone(), multiplier)
            }
            None => Unit::invalid(reduced.clone()),
        };

        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        self.units_by_factors.insert(reduced, id);
        Ok(id)
    }

    /// Expand derived factors so only atomic units remain
    fn unroll_factors(&self, factors: &Factorization<UnitId>) -> Factorization<UnitId> {
        let mut result = Factorization::empty();
        for (uid, exp) in factors.factors() {
            match self.unit(*uid).factors() {
                Some(inner) => result = result.mul(&inner.pow(exp)),
                None => result = result.mul_item(*uid, exp),
            }
        }
        result
    }

    /// Reduce a property factorization until only fundamental properties
    /// remain
    pub(crate) fn reduce_property_dimensions(
        &self,
        factors: &Factorization<PropertyId>,
    ) -> Factorization<PropertyId> {
        let mut result = Factorization::empty();
        for (pid, exp) in factors.factors() {
            let property = self.property(*pid);
            if property.is_fundamental() {
                result = result.mul_item(*pid, exp);
            } else {
                result = result.mul(&property.dimensions.pow(exp));
            }
        }
        result
    }

    /// The property of an atomic factor unit
    fn factor_property(&self, id: UnitId) -> PropertyId {
        self.unit(id)
            .property()
            .expect("factor units are atomic and belong to a property")
    }

    /// The combined multiplier of a derived unit's factors; none of the
    /// factors may carry an offset
    fn combine_multipliers(
        &self,
        factors: &Factorization<UnitId>,
    ) -> Result<Rational, MetricError> {
        let mut result = Rational::one();
        for (uid, exp) in factors.factors() {
            let unit = self.unit(*uid);
            if unit.has_offset() {
                return Err(MetricError::OffsetUnitInDerivation(
                    self.unit_long_name(*uid),
                ));
            }
            result = result.mul(&unit.multiplier().pow(exp)?);
        }
        Ok(result)
    }

    //
    // Conversion
    //

    /// Whether two units measure the same dimensions; invalid units are
    /// compatible with nothing
    pub fn compatible(&self, a: UnitId, b: UnitId) -> bool {
        match (self.unit(a).property(), self.unit(b).property()) {
            (Some(pa), Some(pb)) => {
                self.property(pa).dimensions == self.property(pb).dimensions
            }
            _ => false,
        }
    }

    pub(crate) fn check_compatible(&self, from: UnitId, to: UnitId) -> Result<(), MetricError> {
        if self.compatible(from, to) {
            Ok(())
        } else {
            Err(MetricError::IncompatibleUnits {
                src: self.describe_unit(from),
                dest: self.describe_unit(to),
            })
        }
    }

    /// Whether this unit is the base unit of its property
    pub fn is_base_unit(&self, id: UnitId) -> bool {
        self.unit(id)
            .property()
            .map_or(false, |pid| self.property(pid).base_unit == Some(id))
    }

    /// Convert a value between two compatible units, funneling through the
    /// base unit of their shared property
    pub fn convert_value(
        &self,
        from: UnitId,
        to: UnitId,
        value: &Rational,
    ) -> Result<Rational, MetricError> {
        self.check_compatible(from, to)?;
        if from == to {
            return Ok(value.clone());
        }
        let base = self.value_in_base(from, value);
        self.value_from_base(to, &base)
    }

    fn value_in_base(&self, id: UnitId, value: &Rational) -> Rational {
        if self.is_base_unit(id) {
            return value.clone();
        }
        let unit = self.unit(id);
        value.mul(unit.multiplier()).add(unit.offset())
    }

    fn value_from_base(&self, id: UnitId, value: &Rational) -> Result<Rational, MetricError> {
        if self.is_base_unit(id) {
            return Ok(value.clone());
        }
        let unit = self.unit(id);
        Ok(value.sub(unit.offset()).div(unit.multiplier())?)
    }

    /// Order two compatible units: a unit with a larger multiplier is the
    /// smaller unit
    pub fn compare_units(&self, a: UnitId, b: UnitId) -> Result<std::cmp::Ordering, MetricError> {
        self.check_compatible(a, b)?;
        Ok(self.unit(b).multiplier().cmp(self.unit(a).multiplier()))
    }

    //
    // Naming
    //

    /// The abbreviated name of a unit, falling back to the long name and
    /// then to its factors expression
    pub fn unit_short_name(&self, id: UnitId) -> String {
        let unit = self.unit(id);
        if let Some(name) = &unit.short_name {
            return name.clone();
        }
        if let Some(name) = &unit.long_name {
            return name.clone();
        }
        match unit.factors() {
            Some(f) => f.to_fraction_string(|uid| self.unit_short_name(*uid)),
            None => String::new(),
        }
    }

    /// The long name of a unit, falling back to the short name and then to
    /// its factors expression
    pub fn unit_long_name(&self, id: UnitId) -> String {
        let unit = self.unit(id);
        if let Some(name) = &unit.long_name {
            return name.clone();
        }
        if let Some(name) = &unit.short_name {
            return name.clone();
        }
        match unit.factors() {
            Some(f) => f.to_fraction_string(|uid| self.unit_short_name(*uid)),
            None => String::new(),
        }
    }

    /// The plural form of a unit's long name; short names do not pluralize
    pub fn unit_plural_name(&self, id: UnitId) -> String {
        let unit = self.unit(id);
        if let Some(name) = &unit.long_name {
            return plural_of(name);
        }
        if let Some(name) = &unit.short_name {
            return name.clone();
        }
        match unit.factors() {
            Some(f) => f.to_fraction_string(|uid| self.unit_long_name(*uid)),
            None => String::new(),
        }
    }

    /// The name to print next to a value: derived units render as their
    /// factors in short names, named units inflect with the value
    pub fn unit_display_for_value(&self, id: UnitId, value: &Rational) -> String {
        let unit = self.unit(id);
        if let Some(f) = unit.factors() {
            return f.to_fraction_string(|uid| self.unit_short_name(*uid));
        }
        if value.is_one() {
            self.unit_long_name(id)
        } else {
            self.unit_plural_name(id)
        }
    }

    /// Describe a unit for diagnostics
    pub(crate) fn describe_unit(&self, id: UnitId) -> String {
        let unit = self.unit(id);
        match unit.property() {
            Some(pid) => format!(
                "{} (a unit of {})",
                self.unit_plural_name(id),
                self.property(pid).name
            ),
            None => format!(
                "{} (an unknown and invalid unit)",
                self.unit_short_name(id)
            ),
        }
    }
}

impl UnitScope for Universe {
    fn unit_named(&self, name: &str) -> Option<UnitId> {
        self.units_by_name.get(name).copied()
    }

    fn named_units(&self) -> &[UnitId] {
        &self.named_units
    }
}

/// The currency cache that goes with a universe file: `foo.txt` maps to
/// `foo-currencies.txt`
fn default_currency_file(universe_file: &Path) -> PathBuf {
    let stem = universe_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = universe_file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".txt".to_string());
    universe_file.with_file_name(format!("{stem}-currencies{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::UnitPrefix;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn plain_def(long: &[&str], short: &[&str]) -> UnitDefinition {
        UnitDefinition {
            long_names: names(long),
            short_names: names(short),
            base_unit_factors: None,
            multiplier: Rational::one(),
            offset: Rational::zero(),
            prefixes: Vec::new(),
        }
    }

    fn scaled_def(
        long: &[&str],
        short: &[&str],
        multiplier: Rational,
        base: Factorization<String>,
    ) -> UnitDefinition {
        UnitDefinition {
            long_names: names(long),
            short_names: names(short),
            base_unit_factors: Some(base),
            multiplier,
            offset: Rational::zero(),
            prefixes: Vec::new(),
        }
    }

    /// length (meter with milli/kilo, foot), time (second, hour),
    /// speed = length/time
    fn build_universe() -> Universe {
        let mut u = Universe::empty();

        let length = u.create_property(names(&["length"]), None).unwrap();
        let mut meter = plain_def(&["meter"], &["m"]);
        meter.prefixes = vec![UnitPrefix::Milli, UnitPrefix::Kilo];
        u.add_unit_definition(length, &meter).unwrap();
        u.add_unit_definition(
            length,
            &scaled_def(
                &["foot"],
                &["ft"],
                Rational::from_decimal_str("0.3048").unwrap(),
                Factorization::factor("meter".to_string(), 1),
            ),
        )
        .unwrap();
        u.freeze_property(length).unwrap();

        let time = u.create_property(names(&["time"]), None).unwrap();
        u.add_unit_definition(time, &plain_def(&["second"], &["s"])).unwrap();
        u.add_unit_definition(
            time,
            &scaled_def(
                &["hour"],
                &["h"],
                Rational::from_integer(3600),
                Factorization::factor("second".to_string(), 1),
            ),
        )
        .unwrap();
        u.freeze_property(time).unwrap();

        let length_id = u.property_named("length").unwrap();
        let time_id = u.property_named("time").unwrap();
        let speed_factors = Factorization::fraction(length_id, time_id);
        let speed = u
            .create_property(names(&["speed"]), Some(&speed_factors))
            .unwrap();
        u.freeze_property(speed).unwrap();

        u
    }

    #[test]
    fn test_name_lookup() {
        let u = build_universe();
        assert!(u.has_unit_named("meter"));
        assert!(u.has_unit_named("meters"));
        assert!(u.has_unit_named("m"));
        assert!(u.has_unit_named("millimeters"));
        assert!(u.has_unit_named("km"));
        assert!(!u.has_unit_named("mile"));
        assert!(u.has_property_named("length"));
        assert!(!u.has_property_named("mass"));
    }

    #[test]
    fn test_conversion_laws() {
        let u = build_universe();
        let m = u.unit_named("meter").unwrap();
        let km = u.unit_named("km").unwrap();
        let ft = u.unit_named("foot").unwrap();
        let x = Rational::new(7, 3).unwrap();

        // Identity.
        assert_eq!(u.convert_value(m, m, &x).unwrap(), x);
        assert_eq!(u.convert_value(km, km, &x).unwrap(), x);

        // Round trips through the base unit and between siblings.
        let there = u.convert_value(km, ft, &x).unwrap();
        let back = u.convert_value(ft, km, &there).unwrap();
        assert_eq!(back, x);

        // Composition: km -> m -> ft equals km -> ft.
        let via = u
            .convert_value(m, ft, &u.convert_value(km, m, &x).unwrap())
            .unwrap();
        assert_eq!(via, there);

        // A known value.
        assert_eq!(
            u.convert_value(km, m, &Rational::one()).unwrap(),
            Rational::from_integer(1000)
        );
    }

    #[test]
    fn test_incompatible_units() {
        let u = build_universe();
        let m = u.unit_named("meter").unwrap();
        let s = u.unit_named("second").unwrap();
        let err = u.convert_value(m, s, &Rational::one());
        assert!(matches!(
            err,
            Err(MetricError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_derived_property_base_unit() {
        let u = build_universe();
        let speed = u.property_named("speed").unwrap();
        let base = u.property(speed).base_unit().unwrap();
        let unit = u.unit(base);
        assert!(unit.is_derived());
        assert!(unit.multiplier().is_one());
        assert_eq!(u.unit_short_name(base), "m / s");
        assert!(u.is_base_unit(base));
    }

    #[test]
    fn test_derived_unit_synthesis_and_memoization() {
        let mut u = build_universe();
        let km = u.unit_named("km").unwrap();
        let h = u.unit_named("hour").unwrap();
        let factors = Factorization::fraction(km, h);

        let kmh = u.unit_for_factors(&factors).unwrap();
        let unit = u.unit(kmh);
        assert!(unit.is_valid());
        assert_eq!(
            unit.multiplier(),
            &Rational::new(1000, 3600).unwrap()
        );

        // Same factors, same unit instance.
        let again = u.unit_for_factors(&factors).unwrap();
        assert_eq!(kmh, again);

        // A single item resolves to the unit itself.
        let single = Factorization::factor(km, 1);
        assert_eq!(u.unit_for_factors(&single).unwrap(), km);
    }

    #[test]
    fn test_invalid_derived_unit() {
        let mut u = build_universe();
        let m = u.unit_named("meter").unwrap();
        let s = u.unit_named("second").unwrap();
        // m * s matches no property.
        let factors = Factorization::factor(m, 1).mul_item(s, 1);
        let id = u.unit_for_factors(&factors).unwrap();
        assert!(!u.unit(id).is_valid());

        let err = u.convert_value(id, m, &Rational::one());
        assert!(matches!(err, Err(MetricError::IncompatibleUnits { .. })));
    }

    #[test]
    fn test_unrolling_derived_factors() {
        let mut u = build_universe();
        let speed = u.property_named("speed").unwrap();
        let speed_base = u.property(speed).base_unit().unwrap();
        let s = u.unit_named("second").unwrap();
        let m = u.unit_named("meter").unwrap();

        // (m/s) * s unrolls to plain m.
        let factors = Factorization::factor(speed_base, 1).mul_item(s, 1);
        assert_eq!(u.unit_for_factors(&factors).unwrap(), m);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut u = build_universe();
        let time = u.property_named("time").unwrap();
        let err = u.add_unit_definition(time, &plain_def(&["second"], &[]));
        assert!(matches!(err, Err(MetricError::DuplicateUnitName(_))));

        // Universe-wide uniqueness: "m" is taken by length.
        let err = u.add_unit_definition(time, &plain_def(&["moment"], &["m"]));
        assert!(matches!(err, Err(MetricError::DuplicateUnitName(_))));

        let err = u.create_property(names(&["time"]), None);
        assert!(matches!(err, Err(MetricError::DuplicatePropertyName(_))));
    }

    #[test]
    fn test_duplicate_derived_property_rejected() {
        let mut u = build_universe();
        let length = u.property_named("length").unwrap();
        let time = u.property_named("time").unwrap();
        let factors = Factorization::fraction(length, time);
        let err = u.create_property(names(&["velocity"]), Some(&factors));
        assert!(matches!(
            err,
            Err(MetricError::DuplicateDerivedProperty { .. })
        ));
    }

    #[test]
    fn test_empty_fundamental_property_rejected() {
        let mut u = Universe::empty();
        let p = u.create_property(names(&["mass"]), None).unwrap();
        let err = u.freeze_property(p);
        assert!(matches!(err, Err(MetricError::InvalidEmptyProperty(_))));
    }

    #[test]
    fn test_offset_unit_conversion() {
        let mut u = Universe::empty();
        let temp = u.create_property(names(&["temperature"]), None).unwrap();
        u.add_unit_definition(temp, &plain_def(&["kelvin"], &["K"])).unwrap();
        let mut celcius = scaled_def(
            &["degree celcius"],
            &["C"],
            Rational::one(),
            Factorization::factor("kelvin".to_string(), 1),
        );
        celcius.offset = Rational::from_decimal_str("273.15").unwrap();
        u.add_unit_definition(temp, &celcius).unwrap();
        u.freeze_property(temp).unwrap();

        let k = u.unit_named("K").unwrap();
        let c = u.unit_named("celcius").unwrap();
        assert_eq!(
            u.convert_value(c, k, &Rational::zero()).unwrap(),
            Rational::from_decimal_str("273.15").unwrap()
        );
        assert_eq!(
            u.convert_value(k, c, &Rational::from_decimal_str("273.15").unwrap())
                .unwrap(),
            Rational::zero()
        );
    }

    #[test]
    fn test_offset_unit_cannot_derive() {
        let mut u = Universe::empty();
        let temp = u.create_property(names(&["temperature"]), None).unwrap();
        u.add_unit_definition(temp, &plain_def(&["kelvin"], &["K"])).unwrap();
        let mut celcius = scaled_def(
            &["celcius"],
            &["C"],
            Rational::one(),
            Factorization::factor("kelvin".to_string(), 1),
        );
        celcius.offset = Rational::from_decimal_str("273.15").unwrap();
        u.add_unit_definition(temp, &celcius).unwrap();
        let time = u.create_property(names(&["time"]), None).unwrap();
        u.add_unit_definition(time, &plain_def(&["second"], &["s"])).unwrap();

        let c = u.unit_named("celcius").unwrap();
        let s = u.unit_named("second").unwrap();
        let factors = Factorization::fraction(c, s);
        let err = u.unit_for_factors(&factors);
        assert!(matches!(
            err,
            Err(MetricError::OffsetUnitInDerivation(_))
        ));
    }

    #[test]
    fn test_incompatible_base_unit() {
        let mut u = build_universe();
        let time = u.property_named("time").unwrap();
        let err = u.add_unit_definition(
            time,
            &scaled_def(
                &["myriameter"],
                &[],
                Rational::from_integer(10000),
                Factorization::factor("meter".to_string(), 1),
            ),
        );
        assert!(matches!(
            err,
            Err(MetricError::IncompatibleBaseUnit { .. })
        ));
    }

    #[test]
    fn test_unit_ordering() {
        let u = build_universe();
        let m = u.unit_named("meter").unwrap();
        let km = u.unit_named("km").unwrap();
        // The kilometer has the larger multiplier, so it is the smaller unit.
        assert_eq!(
            u.compare_units(km, m).unwrap(),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            u.compare_units(m, km).unwrap(),
            std::cmp::Ordering::Greater
        );
    }

    #[test]
    fn test_default_currency_file() {
        assert_eq!(
            default_currency_file(Path::new("/tmp/universe.txt")),
            PathBuf::from("/tmp/universe-currencies.txt")
        );
        assert_eq!(
            default_currency_file(Path::new("defs")),
            PathBuf::from("defs-currencies.txt")
        );
    }
}
