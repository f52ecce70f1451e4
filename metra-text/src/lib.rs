//! Metra Text - Rule-based word inflection
//!
//! A small rule engine for mapping words between forms, plus the English
//! plural/singular rule tables built on it. Unit names registered in a
//! universe are pluralized through [`plural_of`]; outputs are rendered with
//! the singular or plural form according to the quantity.

mod english;
mod rule;

pub use english::{plural_inflector, plural_of, singular_inflector, singular_of};
pub use rule::{Rule, RuleBasedInflector};
