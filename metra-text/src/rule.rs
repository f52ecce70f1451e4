//! A rule states how a word changes from one form to another
//!
//! Rules pair an applicability test with an action. Builder combinators
//! derive restricted rules from existing ones; an inflector scans an ordered
//! rule list and applies the first rule that matches.

use regex::{Captures, Regex};
use std::collections::HashSet;

/// Callback handed to rule actions so phrase rules can inflect a sub-phrase
/// with the full rule set
pub type Recurse<'a> = &'a dyn Fn(&str) -> String;

type Applies = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Action = Box<dyn Fn(&str, Recurse) -> String + Send + Sync>;

/// A single inflection rule
pub struct Rule {
    applies: Applies,
    action: Action,
}

/// Compile a pattern that must cover the whole word
fn full_match(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("inflection rule pattern")
}

impl Rule {
    // ========== Constructors ==========

    /// The identity rule: applies to every word and leaves it unchanged
    pub fn identity() -> Self {
        Self {
            applies: Box::new(|_| true),
            action: Box::new(|word, _| word.to_string()),
        }
    }

    /// Applies to words fully matching `pattern`; rewrites with `replacement`
    /// (group references in `${n}` form)
    pub fn pattern(pattern: &str, replacement: &str) -> Self {
        let re = full_match(pattern);
        let matcher = re.clone();
        let replacement = replacement.to_string();
        Self {
            applies: Box::new(move |word| re.is_match(word)),
            action: Box::new(move |word, _| {
                matcher.replace(word, replacement.as_str()).into_owned()
            }),
        }
    }

    /// Applies to words fully matching `pattern`; rewrites by invoking `f` on
    /// the captures, with a recursion callback for phrase rules
    pub fn pattern_with<F>(pattern: &str, f: F) -> Self
    where
        F: Fn(&Captures, Recurse) -> String + Send + Sync + 'static,
    {
        let re = full_match(pattern);
        let matcher = re.clone();
        Self {
            applies: Box::new(move |word| re.is_match(word)),
            action: Box::new(move |word, recurse| {
                let caps = matcher.captures(word).expect("checked by applies");
                f(&caps, recurse)
            }),
        }
    }

    /// Applies to words ending with the suffix pattern, replacing the suffix
    ///
    /// The part before the suffix is group 1 and the matching suffix group 2,
    /// so groups inside the suffix pattern itself are numbered from 3 on and
    /// the replacement may reference any of them.
    pub fn suffix(suffix: &str, new_suffix: &str) -> Self {
        Self::pattern(&format!("(?i)(.*)({suffix})$"), &format!("${{1}}{new_suffix}"))
    }

    /// Like [`suffix`](Self::suffix) for any of the given suffix patterns
    pub fn suffix_any(suffixes: &[&str], new_suffix: &str) -> Self {
        Self::pattern(
            &format!("(?i)(.*)({})$", suffixes.join("|")),
            &format!("${{1}}{new_suffix}"),
        )
    }

    /// A lookup table of irregular words, matched case-insensitively
    pub fn irregulars(mapping: &[(&str, &str)]) -> Self {
        let table: Vec<(String, String)> = mapping
            .iter()
            .map(|(from, to)| (from.to_lowercase(), to.to_string()))
            .collect();
        let keys: HashSet<String> = table.iter().map(|(from, _)| from.clone()).collect();
        Self {
            applies: Box::new(move |word| keys.contains(&word.to_lowercase())),
            action: Box::new(move |word, _| {
                let lower = word.to_lowercase();
                table
                    .iter()
                    .find(|(from, _)| *from == lower)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| word.to_string())
            }),
        }
    }

    /// A single irregular word
    pub fn irregular(original: &str, inflected: &str) -> Self {
        Self::irregulars(&[(original, inflected)])
    }

    // ========== Combinators ==========

    /// Restrict to the given words, compared case-insensitively
    pub fn only_for_words<I, S>(self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        let applies = self.applies;
        Self {
            applies: Box::new(move |word| applies(word) && set.contains(&word.to_lowercase())),
            action: self.action,
        }
    }

    /// Exclude the given words, compared case-insensitively
    pub fn except_for_words<I, S>(self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        let applies = self.applies;
        Self {
            applies: Box::new(move |word| applies(word) && !set.contains(&word.to_lowercase())),
            action: self.action,
        }
    }

    /// Restrict to words fully matching the pattern
    pub fn for_words_matching(self, pattern: &str) -> Self {
        let re = full_match(pattern);
        let applies = self.applies;
        Self {
            applies: Box::new(move |word| applies(word) && re.is_match(word)),
            action: self.action,
        }
    }

    /// Restrict to words not matching the pattern
    pub fn for_words_not_matching(self, pattern: &str) -> Self {
        let re = full_match(pattern);
        let applies = self.applies;
        Self {
            applies: Box::new(move |word| applies(word) && !re.is_match(word)),
            action: self.action,
        }
    }

    /// Restrict to words ending with the suffix pattern
    pub fn for_words_ending_with(self, pattern: &str) -> Self {
        self.for_words_matching(&format!("(?i).*(?:{pattern})"))
    }

    /// Restrict to words not ending with the suffix pattern
    pub fn for_words_not_ending_with(self, pattern: &str) -> Self {
        self.for_words_not_matching(&format!("(?i).*(?:{pattern})"))
    }

    /// Restrict by an arbitrary predicate
    pub fn constrained_by<P>(self, condition: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let applies = self.applies;
        Self {
            applies: Box::new(move |word| applies(word) && condition(word)),
            action: self.action,
        }
    }

    // ========== Application ==========

    /// Whether this rule applies to the word
    pub fn applies_to(&self, word: &str) -> bool {
        (self.applies)(word)
    }

    /// Apply this rule; the caller must have checked applicability
    pub fn apply_to(&self, word: &str, recurse: Recurse) -> String {
        (self.action)(word, recurse)
    }
}

/// An inflector driven by an ordered list of rules, highest priority first
#[derive(Default)]
pub struct RuleBasedInflector {
    rules: Vec<Rule>,
}

impl RuleBasedInflector {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Add a rule ahead of all existing rules
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Add rules ahead of all existing rules, keeping their relative order
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) {
        let mut new_rules: Vec<Rule> = rules.into_iter().collect();
        new_rules.extend(self.rules.drain(..));
        self.rules = new_rules;
    }

    /// Inflect a word: surrounding whitespace is preserved, the first
    /// applicable rule runs on the inner word, and the letter case of the
    /// input is matched on the result
    pub fn apply(&self, word: &str) -> String {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return word.to_string();
        }
        let start = word.len() - word.trim_start().len();
        let pre = &word[..start];
        let post = &word[start + trimmed.len()..];
        let inflected = self.apply_rules(trimmed);
        format!("{pre}{}{post}", match_case(trimmed, inflected))
    }

    /// Run the first applicable rule; a word no rule covers stays unchanged
    fn apply_rules(&self, word: &str) -> String {
        for rule in &self.rules {
            if rule.applies_to(word) {
                return rule.apply_to(word, &|inner| self.apply(inner));
            }
        }
        word.to_string()
    }
}

/// Give the inflected word the letter casing of the original: all-uppercase
/// stays all-uppercase and a capitalized word stays capitalized
fn match_case(original: &str, inflected: String) -> String {
    if !original.chars().any(|c| c.is_lowercase()) {
        return inflected.to_uppercase();
    }
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = inflected.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => inflected,
        };
    }
    inflected
}
