//! Recursive-descent parser for universe definitions and conversion queries
//!
//! Both grammars share one tokenizer. The words `plus`, `and`, `per` and
//! `PI` are registered as keywords while parsing; the query separators `in`,
//! `to` and `as` stay plain words and are recognized at the parser level so
//! they can still appear inside unit names elsewhere.
//!
//! The parser does not recover: the first syntactic or semantic failure
//! aborts with a diagnostic carrying line, column and filename.

use crate::currency;
use crate::error::{Error, MetricError, SyntaxError};
use crate::prefix::UnitPrefix;
use crate::property::UnitScope;
use crate::quantity::Quantity;
use crate::query::ConversionQuery;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::unit::{UnitDefinition, UnitId};
use crate::universe::Universe;
use metra_core::{Factorization, Rational};
use metra_text::plural_of;
use std::collections::HashMap;
use std::path::PathBuf;

/// Words separating the quantities from the destination unit in a query
const SEPARATORS: &[&str] = &["in", "to", "as"];

/// Word prefixes that scale a unit's exponent rather than naming a unit
const DIMENSION_PREFIXES: &[&str] = &["square", "cubic", "inverse"];

pub(crate) struct Parser<'a> {
    universe: &'a mut Universe,
    tokenizer: Tokenizer,
    tok: Token,
}

impl<'a> Parser<'a> {
    /// Parse a universe definition into the given (empty) universe
    pub(crate) fn parse_universe_source(
        universe: &'a mut Universe,
        source: &str,
        file: Option<PathBuf>,
    ) -> Result<(), Error> {
        let mut tokenizer = Tokenizer::new(source);
        tokenizer.set_file(file);
        let mut parser = Self::init(universe, tokenizer)?;
        let result = parser.parse_file();
        parser.locate(result)
    }

    /// Parse a conversion query against the given universe
    pub(crate) fn parse_query(
        universe: &'a mut Universe,
        query: &str,
    ) -> Result<ConversionQuery, Error> {
        let tokenizer = Tokenizer::new(query);
        let mut parser = Self::init(universe, tokenizer)?;
        let result = parser.parse_conversion_query();
        parser.locate(result)
    }

    fn init(universe: &'a mut Universe, mut tokenizer: Tokenizer) -> Result<Self, Error> {
        tokenizer.add_keywords(&["plus", "and", "per", "PI"]);
        let tok = match tokenizer.next_token() {
            Ok(tok) => tok,
            Err(e) => return Err(Error::Syntax(tokenizer.locate(e))),
        };
        Ok(Self {
            universe,
            tokenizer,
            tok,
        })
    }

    /// Attach the source filename to syntax errors bubbling out
    fn locate<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        result.map_err(|e| match e {
            Error::Syntax(s) => Error::Syntax(self.tokenizer.locate(s)),
            other => other,
        })
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.tok = self.tokenizer.next_token()?;
        Ok(())
    }

    fn unexpected(&self) -> SyntaxError {
        self.tok.error(format!("Unexpected token {}", self.tok))
    }

    //
    // Universe grammar
    //

    fn parse_file(&mut self) -> Result<(), Error> {
        loop {
            self.parse_property_definition()?;
            if self.tok.is(TokenKind::Eof) {
                break;
            }
        }
        Ok(())
    }

    fn parse_property_definition(&mut self) -> Result<(), Error> {
        let names = self.parse_names_list()?;
        if names.is_empty() {
            return Err(self.unexpected().into());
        }

        if self.tok.is(TokenKind::Dollar) {
            self.advance()?;
            let aliases = self.parse_currency_aliases()?;
            // Currency definitions come from an external feed; losing them
            // degrades the universe but does not invalidate it.
            if let Err(e) = currency::load_currency_property(self.universe, names, &aliases) {
                log::error!("Currency definitions were not loaded: {e}");
            }
            return Ok(());
        }

        let mut dimension_factors = None;
        if self.tok.is(TokenKind::Equals) {
            self.advance()?;
            let names_factorization = self.parse_factorization()?;
            let factors = names_factorization.try_transform(|name| {
                self.universe
                    .property_named(name)
                    .ok_or_else(|| MetricError::UnknownPropertyName(name.clone()))
            })?;
            dimension_factors = Some(factors);
        }

        self.tok.check_kind(&[TokenKind::LBrace])?;
        self.advance()?;

        let pid = self
            .universe
            .create_property(names, dimension_factors.as_ref())?;
        while !self.tok.is(TokenKind::RBrace) {
            let def = self.parse_unit_definition()?;
            self.universe.add_unit_definition(pid, &def)?;
        }
        self.advance()?;

        self.universe.freeze_property(pid)?;
        Ok(())
    }

    fn parse_currency_aliases(&mut self) -> Result<HashMap<String, Vec<String>>, SyntaxError> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();

        self.tok.check_kind(&[TokenKind::LBrace])?;
        self.advance()?;

        while !self.tok.is(TokenKind::RBrace) {
            let code = self.tok.word()?.to_string();
            self.advance()?;
            self.tok.check_kind(&[TokenKind::Colon])?;
            self.advance()?;

            let aliases = self.parse_names_list()?;
            self.tok.check_kind(&[TokenKind::Semicolon])?;
            self.advance()?;

            let entry = result.entry(code).or_default();
            let mut push = |entry: &mut Vec<String>, name: String| {
                if !entry.contains(&name) {
                    entry.push(name);
                }
            };
            for alias in aliases {
                push(entry, alias.clone());
                push(entry, plural_of(&alias));
                let lower = alias.to_lowercase();
                if lower != alias {
                    push(entry, lower.clone());
                    push(entry, plural_of(&lower));
                }
            }
        }
        self.advance()?;

        Ok(result)
    }

    fn parse_unit_definition(&mut self) -> Result<UnitDefinition, SyntaxError> {
        let mut prefixes = Vec::new();
        if self.tok.is(TokenKind::LBrace) {
            self.advance()?;
            prefixes = self.parse_prefixes()?;
            self.tok.check_kind(&[TokenKind::RBrace])?;
            self.advance()?;
        }

        let long_names = self.parse_names_list()?;
        let mut short_names = Vec::new();
        if self.tok.is(TokenKind::LParen) {
            self.advance()?;
            short_names = self.parse_names_list()?;
            self.tok.check_kind(&[TokenKind::RParen])?;
            self.advance()?;
        }

        let mut multiplier = Rational::one();
        let mut offset = Rational::zero();
        let mut base_unit_factors = None;
        if self.tok.is(TokenKind::Equals) {
            self.advance()?;
            multiplier = self.parse_number()?;
            base_unit_factors = Some(self.parse_factorization()?);
            if self.tok.is_one_of(&[TokenKind::Plus, TokenKind::Minus]) {
                offset = self.parse_number()?;
            }
        }

        self.tok.check_kind(&[TokenKind::Semicolon])?;
        self.advance()?;

        Ok(UnitDefinition {
            long_names,
            short_names,
            base_unit_factors,
            multiplier,
            offset,
            prefixes,
        })
    }

    //
    // Names, numbers and prefixes
    //

    /// Consecutive words join into one multi-word name
    fn parse_name(&mut self) -> Result<String, SyntaxError> {
        let mut words = Vec::new();
        loop {
            words.push(self.tok.word()?.to_string());
            self.advance()?;
            if !self.tok.is(TokenKind::Word) {
                break;
            }
        }
        Ok(words.join(" "))
    }

    fn parse_names_list(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut result = Vec::new();
        if self.tok.is(TokenKind::Word) {
            result.push(self.parse_name()?);
        }
        while self.tok.is(TokenKind::Comma) {
            self.advance()?;
            result.push(self.parse_name()?);
        }
        Ok(result)
    }

    /// Parse a unit name greedily: after `square`, `cubic` or `inverse` the
    /// next word is consumed unconditionally; further words are appended
    /// while the name so far does not resolve to a known unit and the next
    /// token is a word other than a query separator
    fn parse_unit_name(&mut self) -> Result<String, SyntaxError> {
        let first = self.tok.word()?.to_string();
        let mut parts = vec![first.clone()];
        self.advance()?;

        if DIMENSION_PREFIXES.contains(&first.as_str()) {
            parts.push(self.tok.word()?.to_string());
            self.advance()?;
        }

        let mut result = parts.join(" ");
        if self.universe.has_unit_named(&result) {
            return Ok(result);
        }

        while self.tok.is(TokenKind::Word) {
            let word = self.tok.word()?.to_string();
            if SEPARATORS.contains(&word.as_str()) {
                break;
            }
            self.advance()?;
            parts.push(word);
            result = parts.join(" ");
            if self.universe.has_unit_named(&result) {
                return Ok(result);
            }
        }

        Ok(result)
    }

    fn parse_unit_expression(&mut self) -> Result<UnitId, Error> {
        let names = self.parse_factorization()?;
        let factors = self.universe.unit_factors_for(&names)?;
        Ok(self.universe.unit_for_factors(&factors)?)
    }

    /// The numeric value of the current token: an explicit number or the
    /// `PI` constant. With `force`, a non-number is a syntax error;
    /// otherwise it yields `None` and the token is left in place.
    fn token_number(&self, force: bool) -> Result<Option<Rational>, SyntaxError> {
        if self.tok.is_word("PI") {
            return Ok(Some(Rational::pi()));
        }
        if self.tok.is(TokenKind::Number) {
            return Ok(Some(self.tok.number()?.clone()));
        }
        if force {
            self.tok.check_kind(&[TokenKind::Number])?;
        }
        Ok(None)
    }

    /// Parse a numeric value: an optional sign, then `<num>`,
    /// `<num> * <num>`, `<num> / <num>` or `<num> * <num> / <num>`, where
    /// `<num>` is a number token or `PI`. Yields 1 when no number is
    /// present, leaving the current token untouched.
    fn parse_number(&mut self) -> Result<Rational, SyntaxError> {
        let mut signum = 1;
        if self.tok.is_one_of(&[TokenKind::Plus, TokenKind::Minus]) {
            signum = if self.tok.is(TokenKind::Plus) { 1 } else { -1 };
            self.advance()?;
        }

        let mut num = match self.token_number(false)? {
            Some(n) => n,
            None => return Ok(Rational::one()),
        };
        self.advance()?;

        if self.tok.is(TokenKind::Star) {
            self.advance()?;
            let factor = self.require_number()?;
            num = num.mul(&factor);
            self.advance()?;
        }

        if self.tok.is(TokenKind::Slash) {
            self.advance()?;
            let divisor = self.require_number()?;
            num = num
                .div(&divisor)
                .map_err(|e| self.tok.error(e.to_string()))?;
            self.advance()?;
        }

        Ok(if signum < 0 { num.neg() } else { num })
    }

    fn require_number(&self) -> Result<Rational, SyntaxError> {
        self.token_number(true)?
            .ok_or_else(|| self.unexpected())
    }

    fn parse_prefix(&mut self) -> Result<UnitPrefix, SyntaxError> {
        let name = self.tok.word()?;
        let prefix = UnitPrefix::by_long_name(name)
            .ok_or_else(|| self.tok.error(format!("Invalid prefix name {name}")))?;
        self.advance()?;
        Ok(prefix)
    }

    fn parse_prefixes(&mut self) -> Result<Vec<UnitPrefix>, SyntaxError> {
        let mut prefixes = vec![self.parse_prefix()?];
        while self.tok.is(TokenKind::Comma) {
            self.advance()?;
            let prefix = self.parse_prefix()?;
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        Ok(prefixes)
    }

    //
    // Query grammar
    //

    fn parse_conversion_query(&mut self) -> Result<ConversionQuery, Error> {
        let quantities = self.parse_quantities()?;

        let query = if self.tok.is(TokenKind::Eof) {
            ConversionQuery::new(quantities, None, self.universe)?
        } else {
            let destination = self.parse_unit_expression()?;
            ConversionQuery::new(quantities, Some(destination), self.universe)?
        };

        self.tok.check_kind(&[TokenKind::Eof])?;
        Ok(query)
    }

    fn parse_quantity(&mut self) -> Result<Quantity, Error> {
        let value = self.parse_number()?;
        let unit = self.parse_unit_expression()?;
        Ok(Quantity::new(value, unit))
    }

    /// A series of quantities bound by `and`, `plus`, a comma or a bare
    /// sign, optionally closed by one of the separator words
    fn parse_quantities(&mut self) -> Result<Vec<Quantity>, Error> {
        let mut quantities = vec![self.parse_quantity()?];

        while !self.tok.is_one_of(&[TokenKind::Word, TokenKind::Eof]) {
            if self.tok.is(TokenKind::Comma) {
                self.advance()?;
            }
            if self.tok.is_any_word(&["and", "plus"]) {
                self.advance()?;
            }
            quantities.push(self.parse_quantity()?);
        }

        if !self.tok.is(TokenKind::Eof) {
            let word = self.tok.word()?;
            if !SEPARATORS.contains(&word) {
                return Err(self.unexpected().into());
            }
            self.advance()?;
        }

        Ok(quantities)
    }

    //
    // Factorization parsing
    //

    fn parse_exponent(&mut self) -> Result<i32, SyntaxError> {
        if !self.tok.is(TokenKind::Caret) {
            return Ok(1);
        }
        self.advance()?;

        let mut signum = 1;
        if self.tok.is_one_of(&[TokenKind::Plus, TokenKind::Minus]) {
            signum = if self.tok.is(TokenKind::Plus) { 1 } else { -1 };
            self.advance()?;
        }

        let exp = self
            .tok
            .number()?
            .to_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| self.tok.error("Invalid exponent"))?;
        self.advance()?;
        Ok(exp * signum)
    }

    fn parse_factor(&mut self) -> Result<Factorization<String>, SyntaxError> {
        if self.tok.is(TokenKind::LParen) {
            self.advance()?;
            let factorization = self.parse_factorization()?;
            self.tok.check_kind(&[TokenKind::RParen])?;
            self.advance()?;
            let exp = self.parse_exponent()?;
            return Ok(factorization.pow(exp));
        }

        let mut name = self.parse_unit_name()?;
        let mut exp = self.parse_exponent()?;
        if let Some(rest) = name.strip_prefix("cubic ") {
            exp *= 3;
            name = rest.to_string();
        } else if let Some(rest) = name.strip_prefix("square ") {
            exp *= 2;
            name = rest.to_string();
        } else if let Some(rest) = name.strip_prefix("inverse ") {
            exp = -exp;
            name = rest.to_string();
        }
        Ok(Factorization::factor(name, exp))
    }

    /// Factors joined by `*` or simple adjacency
    fn parse_factor_multiplication(&mut self) -> Result<Factorization<String>, SyntaxError> {
        let mut factorization = self.parse_factor()?;
        while self
            .tok
            .is_one_of(&[TokenKind::Star, TokenKind::LParen, TokenKind::Word])
            && !self.tok.is_any_word(SEPARATORS)
        {
            if self.tok.is(TokenKind::Star) {
                self.advance()?;
            }
            factorization = factorization.mul(&self.parse_factor()?);
        }
        Ok(factorization)
    }

    /// Like multiplication, but `/` and `per` also continue the product:
    /// everything after the first division stays in the denominator
    fn parse_factor_division(&mut self) -> Result<Factorization<String>, SyntaxError> {
        let mut factorization = self.parse_factor()?;
        while (self.tok.is_one_of(&[
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::LParen,
            TokenKind::Word,
        ]) || self.tok.is_word("per"))
            && !self.tok.is_any_word(SEPARATORS)
        {
            if self.tok.is_one_of(&[TokenKind::Star, TokenKind::Slash]) || self.tok.is_word("per")
            {
                self.advance()?;
            }
            factorization = factorization.mul(&self.parse_factor()?);
        }
        Ok(factorization)
    }

    fn parse_factorization(&mut self) -> Result<Factorization<String>, SyntaxError> {
        let mut factorization = self.parse_factor_multiplication()?;
        if self.tok.is(TokenKind::Slash) || self.tok.is_word("per") {
            self.advance()?;
            factorization = factorization.div(&self.parse_factor_division()?);
        }
        Ok(factorization)
    }
}
