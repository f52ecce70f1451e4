//! Formal products of items raised to integer exponents
//!
//! A factorization depicts the algebraic expression of a product without ever
//! evaluating it. Each item carries a nonzero exponent; an item whose
//! accumulated exponent reaches zero drops out. Values are immutable and
//! every operation returns a new factorization, so they are safe to use as
//! map keys. Insertion order is preserved for deterministic rendering but is
//! not semantically significant.

use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A multiset of items with nonzero integer exponents
#[derive(Clone)]
pub struct Factorization<T> {
    factors: IndexMap<T, i32>,
}

impl<T: Eq + Hash + Clone> Factorization<T> {
    // ========== Factory methods ==========

    /// The empty factorization, the multiplicative identity
    pub fn empty() -> Self {
        Self {
            factors: IndexMap::new(),
        }
    }

    /// The factorization `item^exponent`; an exponent of zero yields empty
    pub fn factor(item: T, exponent: i32) -> Self {
        let mut factors = IndexMap::new();
        if exponent != 0 {
            factors.insert(item, exponent);
        }
        Self { factors }
    }

    /// The factorization `numerator / denominator`
    pub fn fraction(numerator: T, denominator: T) -> Self {
        if numerator == denominator {
            return Self::empty();
        }
        let mut factors = IndexMap::new();
        factors.insert(numerator, 1);
        factors.insert(denominator, -1);
        Self { factors }
    }

    /// The product of the given items, collapsing duplicates
    pub fn product(items: impl IntoIterator<Item = T>) -> Self {
        let mut factors = IndexMap::new();
        for item in items {
            apply(&mut factors, item, 1);
        }
        Self { factors }
    }

    // ========== Queries ==========

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True when exactly one item is present, whatever its exponent
    pub fn is_single_factor(&self) -> bool {
        self.factors.len() == 1
    }

    /// True when exactly one item is present with exponent 1
    pub fn is_single_item(&self) -> bool {
        self.single_item().is_some()
    }

    /// The only `(item, exponent)` pair, if there is exactly one
    pub fn single_factor(&self) -> Option<(&T, i32)> {
        if self.factors.len() == 1 {
            self.factors.iter().next().map(|(item, exp)| (item, *exp))
        } else {
            None
        }
    }

    /// The only item, if there is exactly one and its exponent is 1
    pub fn single_item(&self) -> Option<&T> {
        match self.single_factor() {
            Some((item, 1)) => Some(item),
            _ => None,
        }
    }

    /// Iterate over `(item, exponent)` pairs in insertion order
    pub fn factors(&self) -> impl Iterator<Item = (&T, i32)> {
        self.factors.iter().map(|(item, exp)| (item, *exp))
    }

    /// Iterate over the items in insertion order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.factors.keys()
    }

    /// The exponent of an item, or 0 when absent
    pub fn exponent_of(&self, item: &T) -> i32 {
        self.factors.get(item).copied().unwrap_or(0)
    }

    // ========== Arithmetic ==========

    /// `self * item^exponent`
    pub fn mul_item(&self, item: T, exponent: i32) -> Self {
        if exponent == 0 {
            return self.clone();
        }
        let mut factors = self.factors.clone();
        apply(&mut factors, item, exponent);
        Self { factors }
    }

    /// `self / item^exponent`
    pub fn div_item(&self, item: T, exponent: i32) -> Self {
        self.mul_item(item, -exponent)
    }

    /// `self * other`
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut factors = self.factors.clone();
        for (item, exp) in &other.factors {
            apply(&mut factors, item.clone(), *exp);
        }
        Self { factors }
    }

    /// `self / other`
    pub fn div(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut factors = self.factors.clone();
        for (item, exp) in &other.factors {
            apply(&mut factors, item.clone(), -exp);
        }
        Self { factors }
    }

    /// `self^exp`
    pub fn pow(&self, exp: i32) -> Self {
        if exp == 0 {
            return Self::empty();
        }
        if exp == 1 {
            return self.clone();
        }
        let factors = self
            .factors
            .iter()
            .map(|(item, e)| (item.clone(), e * exp))
            .collect();
        Self { factors }
    }

    /// `self^-1`
    pub fn inverse(&self) -> Self {
        self.pow(-1)
    }

    /// The factors with positive exponents
    pub fn numerator(&self) -> Self {
        let factors = self
            .factors
            .iter()
            .filter(|(_, exp)| **exp > 0)
            .map(|(item, exp)| (item.clone(), *exp))
            .collect();
        Self { factors }
    }

    /// The factors with negative exponents, inverted to make them positive
    pub fn denominator(&self) -> Self {
        let factors = self
            .factors
            .iter()
            .filter(|(_, exp)| **exp < 0)
            .map(|(item, exp)| (item.clone(), -exp))
            .collect();
        Self { factors }
    }

    // ========== Transformation ==========

    /// Map every item through `f`, collapsing items that map to equal values
    /// and dropping entries whose exponents cancel out
    pub fn transform<U, F>(&self, f: F) -> Factorization<U>
    where
        U: Eq + Hash + Clone,
        F: Fn(&T) -> U,
    {
        let mut factors = IndexMap::new();
        for (item, exp) in &self.factors {
            apply(&mut factors, f(item), *exp);
        }
        Factorization { factors }
    }

    /// Like [`transform`](Self::transform) with a fallible mapping
    pub fn try_transform<U, E, F>(&self, f: F) -> Result<Factorization<U>, E>
    where
        U: Eq + Hash + Clone,
        F: Fn(&T) -> Result<U, E>,
    {
        let mut factors = IndexMap::new();
        for (item, exp) in &self.factors {
            apply(&mut factors, f(item)?, *exp);
        }
        Ok(Factorization { factors })
    }

    // ========== Rendering ==========

    /// Render as a fraction, e.g. `"kg m / s^2"`; the `/ 1` denominator is
    /// omitted and the empty factorization renders as `"1"`
    pub fn to_fraction_string(&self, item_fmt: impl Fn(&T) -> String) -> String {
        let num = side_string(&self.numerator(), &item_fmt);
        let den = side_string(&self.denominator(), &item_fmt);
        if den == "1" {
            num
        } else {
            format!("{num} / {den}")
        }
    }

    /// Render as a flat product with all-positive exponents, numerator terms
    /// before denominator terms, e.g. `"kg m s^2"`
    pub fn to_canonical_string(&self, item_fmt: impl Fn(&T) -> String) -> String {
        let num = side_string(&self.numerator(), &item_fmt);
        let den = side_string(&self.denominator(), &item_fmt);
        if den == "1" {
            num
        } else if num == "1" {
            den
        } else {
            format!("{num} {den}")
        }
    }
}

/// Render one side of a factorization; all exponents assumed positive
fn side_string<T: Eq + Hash + Clone>(
    side: &Factorization<T>,
    item_fmt: &impl Fn(&T) -> String,
) -> String {
    if side.is_empty() {
        return "1".to_string();
    }
    side.factors()
        .map(|(item, exp)| {
            if exp == 1 {
                item_fmt(item)
            } else {
                format!("{}^{}", item_fmt(item), exp)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold `item^exponent` into the map, removing entries that cancel to zero
fn apply<T: Eq + Hash>(map: &mut IndexMap<T, i32>, item: T, exponent: i32) {
    let total = map.get(&item).copied().unwrap_or(0) + exponent;
    if total == 0 {
        map.shift_remove(&item);
    } else {
        map.insert(item, total);
    }
}

impl<T: Eq + Hash> PartialEq for Factorization<T> {
    fn eq(&self, other: &Self) -> bool {
        self.factors == other.factors
    }
}

impl<T: Eq + Hash> Eq for Factorization<T> {}

impl<T: Eq + Hash> Hash for Factorization<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent so it agrees with map equality: combine the
        // per-entry hashes commutatively.
        let mut combined: u64 = 0;
        for (item, exp) in &self.factors {
            let mut entry = DefaultHasher::new();
            item.hash(&mut entry);
            exp.hash(&mut entry);
            combined = combined.wrapping_add(entry.finish());
        }
        state.write_u64(combined);
        state.write_usize(self.factors.len());
    }
}

impl<T: Eq + Hash + Clone + fmt::Debug> fmt::Debug for Factorization<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factorization(")?;
        write!(
            f,
            "{}",
            self.to_fraction_string(|item| format!("{item:?}"))
        )?;
        write!(f, ")")
    }
}

impl<T: Eq + Hash + Clone> Default for Factorization<T> {
    fn default() -> Self {
        Self::empty()
    }
}
