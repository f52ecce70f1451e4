//! SI decimal and IEC binary unit prefixes
//!
//! A closed enumeration: each prefix carries a long name, a short name and a
//! rational multiplier of the form base^scale with base 10 or 2. Name
//! indexes are built eagerly as immutable tables.

use metra_core::Rational;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The valid prefixes that scale a base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitPrefix {
    // SI prefixes, base 10
    Yotta,
    Zetta,
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Deca,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
    Zepto,
    Yocto,
    // IEC binary prefixes, base 2
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
    Zebi,
    Yobi,
}

use UnitPrefix::*;

/// Every prefix, in conventional order
pub const ALL_PREFIXES: [UnitPrefix; 28] = [
    Yotta, Zetta, Exa, Peta, Tera, Giga, Mega, Kilo, Hecto, Deca, Deci, Centi, Milli, Micro,
    Nano, Pico, Femto, Atto, Zepto, Yocto, Kibi, Mebi, Gibi, Tebi, Pebi, Exbi, Zebi, Yobi,
];

static LONG_NAMES: LazyLock<HashMap<&'static str, UnitPrefix>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for prefix in ALL_PREFIXES {
        map.insert(prefix.long_name(), prefix);
    }
    // Accepted alternative spellings.
    map.insert("deka", Deca);
    map.insert("mili", Milli);
    map
});

static SHORT_NAMES: LazyLock<HashMap<&'static str, UnitPrefix>> = LazyLock::new(|| {
    ALL_PREFIXES.iter().map(|p| (p.short_name(), *p)).collect()
});

impl UnitPrefix {
    /// The long name, e.g. `"kilo"`
    pub fn long_name(self) -> &'static str {
        match self {
            Yotta => "yotta",
            Zetta => "zetta",
            Exa => "exa",
            Peta => "peta",
            Tera => "tera",
            Giga => "giga",
            Mega => "mega",
            Kilo => "kilo",
            Hecto => "hecto",
            Deca => "deca",
            Deci => "deci",
            Centi => "centi",
            Milli => "milli",
            Micro => "micro",
            Nano => "nano",
            Pico => "pico",
            Femto => "femto",
            Atto => "atto",
            Zepto => "zepto",
            Yocto => "yocto",
            Kibi => "kibi",
            Mebi => "mebi",
            Gibi => "gibi",
            Tebi => "tebi",
            Pebi => "pebi",
            Exbi => "exbi",
            Zebi => "zebi",
            Yobi => "yobi",
        }
    }

    /// The short name, e.g. `"k"`
    pub fn short_name(self) -> &'static str {
        match self {
            Yotta => "Y",
            Zetta => "Z",
            Exa => "E",
            Peta => "P",
            Tera => "T",
            Giga => "G",
            Mega => "M",
            Kilo => "k",
            Hecto => "h",
            Deca => "da",
            Deci => "d",
            Centi => "c",
            Milli => "m",
            Micro => "u",
            Nano => "n",
            Pico => "p",
            Femto => "f",
            Atto => "a",
            Zepto => "z",
            Yocto => "y",
            Kibi => "Ki",
            Mebi => "Mi",
            Gibi => "Gi",
            Tebi => "Ti",
            Pebi => "Pi",
            Exbi => "Ei",
            Zebi => "Zi",
            Yobi => "Yi",
        }
    }

    /// The base and scale such that the multiplier is base^scale
    fn base_and_scale(self) -> (i64, i32) {
        match self {
            Yotta => (10, 24),
            Zetta => (10, 21),
            Exa => (10, 18),
            Peta => (10, 15),
            Tera => (10, 12),
            Giga => (10, 9),
            Mega => (10, 6),
            Kilo => (10, 3),
            Hecto => (10, 2),
            Deca => (10, 1),
            Deci => (10, -1),
            Centi => (10, -2),
            Milli => (10, -3),
            Micro => (10, -6),
            Nano => (10, -9),
            Pico => (10, -12),
            Femto => (10, -15),
            Atto => (10, -18),
            Zepto => (10, -21),
            Yocto => (10, -24),
            Kibi => (2, 10),
            Mebi => (2, 20),
            Gibi => (2, 30),
            Tebi => (2, 40),
            Pebi => (2, 50),
            Exbi => (2, 60),
            Zebi => (2, 70),
            Yobi => (2, 80),
        }
    }

    /// The factor by which this prefix multiplies a unit
    pub fn multiplier(self) -> Rational {
        let (base, scale) = self.base_and_scale();
        Rational::from_integer(base)
            .pow(scale)
            .expect("prefix bases are nonzero")
    }

    /// Look up a prefix by its long name (case-sensitive)
    pub fn by_long_name(name: &str) -> Option<UnitPrefix> {
        LONG_NAMES.get(name).copied()
    }

    /// Look up a prefix by its short name (case-sensitive)
    pub fn by_short_name(name: &str) -> Option<UnitPrefix> {
        SHORT_NAMES.get(name).copied()
    }

    /// Look up a prefix by long name, falling back to short name
    pub fn by_name(name: &str) -> Option<UnitPrefix> {
        Self::by_long_name(name).or_else(|| Self::by_short_name(name))
    }

    pub fn is_valid_long_prefix(name: &str) -> bool {
        LONG_NAMES.contains_key(name)
    }

    pub fn is_valid_short_prefix(name: &str) -> bool {
        SHORT_NAMES.contains_key(name)
    }
}
