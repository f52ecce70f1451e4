//! Currency definitions loaded from a local JSON cache
//!
//! The cache holds a base currency code, per-code exchange rates and
//! display names, in the shape produced by the public exchange-rate feeds:
//! `{ "base": ..., "rates": {...}, "names": {...}, "timestamp": ..., "local": ... }`.
//! The engine itself never goes to the network; refreshing the cache is the
//! operator's concern. Each currency becomes one unit of the money property,
//! with the reciprocal of its rate as the multiplier against the base
//! currency.

use crate::error::Error;
use crate::property::PropertyId;
use crate::unit::UnitDefinition;
use crate::universe::Universe;
use metra_core::{Factorization, Rational};
use metra_text::plural_of;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;

/// Currency codes ignored even when present in the cache, because their
/// names clash with units of other properties (e.g. CUP, the Cuban Peso)
const IGNORED_CURRENCIES: &[&str] = &["CUP"];

/// The on-disk currency cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CurrencyCache {
    pub base: String,
    pub rates: BTreeMap<String, serde_json::Number>,
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub local: bool,
}

/// Load the currency cache and register the money property with one unit
/// per usable currency
pub(crate) fn load_currency_property(
    universe: &mut Universe,
    names: Vec<String>,
    aliases: &HashMap<String, Vec<String>>,
) -> Result<PropertyId, Error> {
    let path = universe
        .currency_file()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "no currency cache file is configured for this universe",
            )
        })?
        .to_path_buf();

    let text = fs::read_to_string(&path)?;
    let cache: CurrencyCache = serde_json::from_str(&text)?;
    log::info!(
        "Currency exchange rates loaded from {} (timestamp {:?}, local: {})",
        path.display(),
        cache.timestamp,
        cache.local,
    );

    let definitions = unit_definitions(&cache, aliases)?;
    let pid = universe.create_property(names, None)?;
    for def in &definitions {
        universe.add_unit_definition(pid, def)?;
    }
    universe.freeze_property(pid)?;
    Ok(pid)
}

/// Turn the cache into unit definitions: the base currency first with a
/// multiplier of 1, then every other code with the reciprocal of its rate
fn unit_definitions(
    cache: &CurrencyCache,
    aliases: &HashMap<String, Vec<String>>,
) -> Result<Vec<UnitDefinition>, Error> {
    let base_code = cache.base.as_str();
    let base_factors = Factorization::factor(base_code.to_string(), 1);
    let mut result = Vec::with_capacity(cache.rates.len() + 1);

    let base_name = cache
        .names
        .get(base_code)
        .cloned()
        .unwrap_or_else(|| base_code.to_string());
    result.push(currency_definition(
        base_code,
        &base_name,
        None,
        Rational::one(),
        aliases,
    ));

    for (code, rate) in &cache.rates {
        if code == base_code || IGNORED_CURRENCIES.contains(&code.as_str()) {
            continue;
        }
        let Some(name) = cache.names.get(code) else {
            continue;
        };
        let rate = rate_to_rational(rate)?;
        if rate.is_zero() {
            continue;
        }
        result.push(currency_definition(
            code,
            name,
            Some(base_factors.clone()),
            rate.reciprocal().map_err(crate::error::MetricError::from)?,
            aliases,
        ));
    }

    Ok(result)
}

fn currency_definition(
    code: &str,
    name: &str,
    base_factors: Option<Factorization<String>>,
    multiplier: Rational,
    aliases: &HashMap<String, Vec<String>>,
) -> UnitDefinition {
    let mut long_names = vec![name.to_string()];
    let lower = name.to_lowercase();
    if lower != name {
        long_names.push(lower);
    }
    if let Some(extra) = aliases.get(code) {
        for alias in extra {
            if !long_names.contains(alias) {
                long_names.push(alias.clone());
            }
        }
    }

    let mut short_names = vec![code.to_string()];
    let code_lower = code.to_lowercase();
    if code_lower != code {
        short_names.push(code_lower);
    }

    UnitDefinition {
        long_names,
        short_names,
        base_unit_factors: base_factors,
        multiplier,
        offset: Rational::zero(),
        prefixes: Vec::new(),
    }
}

/// JSON rates arrive as integers or doubles; integers convert exactly and
/// doubles decompose to the exact dyadic rational they store
fn rate_to_rational(rate: &serde_json::Number) -> Result<Rational, Error> {
    if let Some(n) = rate.as_i64() {
        return Ok(Rational::from_integer(n));
    }
    let value = rate.as_f64().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unrepresentable exchange rate {rate}"),
        )
    })?;
    Ok(Rational::from_f64(value).map_err(crate::error::MetricError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::UnitScope;
    use std::path::PathBuf;

    fn cache_json() -> String {
        r#"{
            "base": "USD",
            "rates": { "USD": 1, "EUR": 0.5, "GBP": 0.25, "XXX": 0.0, "CUP": 24.0, "NON": 2.0 },
            "names": { "USD": "US Dollar", "EUR": "Euro", "GBP": "British Pound", "XXX": "Void", "CUP": "Cuban Peso" },
            "timestamp": 1346531677,
            "local": true
        }"#
        .to_string()
    }

    fn write_cache(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("test-currencies.json");
        fs::write(&path, cache_json()).unwrap();
        path
    }

    #[test]
    fn test_cache_round_trip() {
        let cache: CurrencyCache = serde_json::from_str(&cache_json()).unwrap();
        assert_eq!(cache.base, "USD");
        assert!(cache.local);
        assert_eq!(cache.timestamp, Some(1346531677));
        let back = serde_json::to_string(&cache).unwrap();
        let again: CurrencyCache = serde_json::from_str(&back).unwrap();
        assert_eq!(again.rates.len(), cache.rates.len());
    }

    #[test]
    fn test_unit_definitions_filtering() {
        let cache: CurrencyCache = serde_json::from_str(&cache_json()).unwrap();
        let defs = unit_definitions(&cache, &HashMap::new()).unwrap();
        let codes: Vec<&str> = defs
            .iter()
            .map(|d| d.short_names[0].as_str())
            .collect();

        // The base comes first; zero rates, unnamed codes and the deny
        // list are dropped.
        assert_eq!(codes, ["USD", "EUR", "GBP"]);

        let euro = &defs[1];
        assert_eq!(euro.long_names, ["Euro", "euro"]);
        assert_eq!(euro.short_names, ["EUR", "eur"]);
        assert_eq!(euro.multiplier, Rational::from_integer(2));
    }

    #[test]
    fn test_aliases_extend_long_names() {
        let cache: CurrencyCache = serde_json::from_str(&cache_json()).unwrap();
        let mut aliases = HashMap::new();
        aliases.insert(
            "GBP".to_string(),
            vec!["quid".to_string(), "quids".to_string()],
        );
        let defs = unit_definitions(&cache, &aliases).unwrap();
        let pound = defs.iter().find(|d| d.short_names[0] == "GBP").unwrap();
        assert!(pound.long_names.contains(&"quid".to_string()));
    }

    #[test]
    fn test_currency_block_end_to_end() {
        let dir = std::env::temp_dir().join("metra-currency-test");
        fs::create_dir_all(&dir).unwrap();
        let cache = write_cache(&dir);
        let universe_path = dir.join("test.txt");
        fs::write(
            &universe_path,
            "length { meter (m); }\nmoney, currency $ { GBP: quid; }\n",
        )
        .unwrap();

        let mut u = Universe::load_with_files(&universe_path, &cache).unwrap();
        assert!(u.has_property_named("money"));
        assert!(u.has_unit_named("USD"));
        assert!(u.has_unit_named("Euro"));
        assert!(u.has_unit_named("euros"));
        assert!(u.has_unit_named("quid"));
        assert!(!u.has_unit_named("CUP"));

        let query = u.convert("10 euros in usd").unwrap();
        assert_eq!(query.result().value(), &Rational::from_integer(20));
    }

    #[test]
    fn test_missing_cache_skips_currency_property() {
        // Parsing continues when the cache cannot be loaded.
        let u = Universe::from_source("length { meter (m); }\nmoney $ {}\n").unwrap();
        assert!(u.has_unit_named("meter"));
        assert!(!u.has_property_named("money"));
    }
}
