//! Splits a stream of characters into tokens
//!
//! The tokenizer is stateful: `next_token` advances, `current_token` reads
//! the last token returned, and `set_current` rewinds to an earlier token.
//! The keyword set is mutable during parsing so that context-sensitive
//! keywords can be scoped to one grammar.
//!
//! Tokens are plain values. Each one carries the cursor state captured right
//! after it was scanned, which makes rewinding exact even when the target
//! token was followed by newlines.

use crate::error::SyntaxError;
use metra_core::Rational;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// The types of token recognizable by a [`Tokenizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A character with no special meaning
    Unknown,
    /// An end-of-line sequence; only returned when the tokenizer was created
    /// with the option to recognize them
    Eol,
    /// End of input; always the last token returned
    Eof,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Equals,
    Comma,
    Colon,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Dollar,
    /// A numeric literal; its value is an exact [`Rational`]
    Number,
    /// A word: a letter or underscore followed by word characters
    Word,
    /// A word currently registered as a keyword
    Keyword,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Eol => "EOL",
            TokenKind::Eof => "EOF",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Equals => "EQUALS",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Caret => "CARET",
            TokenKind::Dollar => "DOLLAR",
            TokenKind::Number => "NUMBER",
            TokenKind::Word => "WORD",
            TokenKind::Keyword => "KEYWORD",
        };
        f.write_str(name)
    }
}

/// The payload of a token
#[derive(Debug, Clone, PartialEq)]
enum TokenValue {
    None,
    Word(String),
    Number(Rational),
    Unknown(char),
}

/// A token scanned from the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    value: TokenValue,
    text: String,
    position: usize,
    length: usize,
    line: usize,
    column: usize,
    // Cursor state immediately after this token was scanned.
    end_position: usize,
    end_line: usize,
    end_column: usize,
    // Identity of the tokenizer that produced this token.
    origin: u64,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The index where this token starts in the input
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of characters of this token in the input
    pub fn length(&self) -> usize {
        self.length
    }

    /// The 1-based line where this token starts
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1-based position of this token within its line
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for a word or keyword with the given text
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Keyword)
            && matches!(&self.value, TokenValue::Word(w) if w == word)
    }

    pub fn is_one_of(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// True for a word or keyword whose text is one of the given words
    pub fn is_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.is_word(w))
    }

    /// The text of a word token
    pub fn word(&self) -> Result<&str, SyntaxError> {
        self.check_kind(&[TokenKind::Word])?;
        match &self.value {
            TokenValue::Word(w) => Ok(w),
            _ => unreachable!("word tokens carry a word value"),
        }
    }

    /// The text of a keyword token
    pub fn keyword(&self) -> Result<&str, SyntaxError> {
        self.check_kind(&[TokenKind::Keyword])?;
        match &self.value {
            TokenValue::Word(w) => Ok(w),
            _ => unreachable!("keyword tokens carry a word value"),
        }
    }

    /// The text of a word or keyword token
    pub fn word_or_keyword(&self) -> Result<&str, SyntaxError> {
        self.check_kind(&[TokenKind::Word, TokenKind::Keyword])?;
        match &self.value {
            TokenValue::Word(w) => Ok(w),
            _ => unreachable!("word tokens carry a word value"),
        }
    }

    /// The numeric value of a number token
    pub fn number(&self) -> Result<&Rational, SyntaxError> {
        self.check_kind(&[TokenKind::Number])?;
        match &self.value {
            TokenValue::Number(n) => Ok(n),
            _ => unreachable!("number tokens carry a numeric value"),
        }
    }

    /// The character of an unknown token
    pub fn unknown_character(&self) -> Result<char, SyntaxError> {
        self.check_kind(&[TokenKind::Unknown])?;
        match self.value {
            TokenValue::Unknown(c) => Ok(c),
            _ => unreachable!("unknown tokens carry a character"),
        }
    }

    /// Ensure this token's kind is one of the expected ones
    pub fn check_kind(&self, kinds: &[TokenKind]) -> Result<(), SyntaxError> {
        if self.is_one_of(kinds) {
            Ok(())
        } else {
            Err(self.error(format!("Unexpected token {self}")))
        }
    }

    /// A syntax error located at this token
    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.line, self.column, None)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::Unknown(c) => write!(f, "{} '{}'", self.kind, c),
            TokenValue::None => write!(f, "{}", self.kind),
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}

static NEXT_TOKENIZER_ID: AtomicU64 = AtomicU64::new(1);

/// Splits a character buffer into [`Token`]s
pub struct Tokenizer {
    input: Vec<char>,
    file: Option<PathBuf>,
    pos: usize,
    line: usize,
    column: usize,
    return_eol: bool,
    current: Option<Token>,
    keywords: HashSet<String>,
    id: u64,
}

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\r' && c != '\n'
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Tokenizer {
    /// A tokenizer over a string, ignoring end-of-line sequences
    pub fn new(input: &str) -> Self {
        Self::with_eol_tokens(input, false)
    }

    /// A tokenizer over a string; when `return_eol` is set, end-of-line
    /// sequences are returned as [`TokenKind::Eol`] tokens instead of being
    /// skipped as whitespace
    pub fn with_eol_tokens(input: &str, return_eol: bool) -> Self {
        Self {
            input: input.chars().collect(),
            file: None,
            pos: 0,
            line: 1,
            column: 1,
            return_eol,
            current: None,
            keywords: HashSet::new(),
            id: NEXT_TOKENIZER_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// A tokenizer over the contents of a file
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut tokenizer = Self::new(&fs::read_to_string(path)?);
        tokenizer.file = Some(path.to_path_buf());
        Ok(tokenizer)
    }

    /// Attach a source label used in diagnostics
    pub fn set_file(&mut self, file: Option<PathBuf>) {
        self.file = file;
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// The 1-based line currently being scanned
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1-based position within the line currently being scanned
    pub fn column(&self) -> usize {
        self.column
    }

    /// Register words to be recognized as keywords from now on
    pub fn add_keywords(&mut self, keywords: &[&str]) {
        for k in keywords {
            self.keywords.insert((*k).to_string());
        }
    }

    /// Stop recognizing the given words as keywords
    pub fn remove_keywords(&mut self, keywords: &[&str]) {
        for k in keywords {
            self.keywords.remove(*k);
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// The last token returned by [`next_token`](Self::next_token)
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Rewind (or fast-forward) so that the next call to `next_token`
    /// returns the token that originally followed `tok`
    ///
    /// Panics when handed a token from another tokenizer.
    pub fn set_current(&mut self, tok: &Token) {
        assert!(tok.origin == self.id, "token from another tokenizer");
        self.pos = tok.end_position;
        self.line = tok.end_line;
        self.column = tok.end_column;
        self.current = Some(tok.clone());
    }

    /// A syntax error at the current scan position, labeled with this
    /// tokenizer's file
    pub fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.line, self.column, self.file.clone())
    }

    /// Attach this tokenizer's file label to a token-located error
    pub(crate) fn locate(&self, err: SyntaxError) -> SyntaxError {
        match self.file.clone() {
            Some(file) => SyntaxError::new(err.message(), err.line(), err.column(), Some(file)),
            None => err,
        }
    }

    /// Parses and returns the next token in the input
    ///
    /// Panics when called again after the end-of-input token was returned.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        assert!(
            self.current.as_ref().map_or(true, |t| t.kind != TokenKind::Eof),
            "tokenizer already consumed its end-of-input token"
        );

        loop {
            while self.pos < self.input.len() && is_inline_whitespace(self.input[self.pos]) {
                self.advance()?;
            }

            if self.pos >= self.input.len() {
                let token = self.make_token(
                    TokenKind::Eof,
                    TokenValue::None,
                    String::new(),
                    self.pos,
                    0,
                    self.column,
                );
                return Ok(self.finish(token));
            }

            let c = self.input[self.pos];
            match c {
                '\n' if self.pos > 0 && self.input[self.pos - 1] == '\r' => {
                    // Second half of a \r\n pair; the \r already counted.
                    self.pos += 1;
                }
                '\n' | '\r' => {
                    if self.return_eol {
                        let token = self.make_token(
                            TokenKind::Eol,
                            TokenValue::None,
                            String::new(),
                            self.pos,
                            1,
                            self.column,
                        );
                        self.line += 1;
                        self.column = 0;
                        self.advance()?;
                        return Ok(self.finish(token));
                    }
                    self.line += 1;
                    self.column = 0;
                    self.advance()?;
                }
                '(' => return self.single_char(TokenKind::LParen),
                ')' => return self.single_char(TokenKind::RParen),
                '{' => return self.single_char(TokenKind::LBrace),
                '}' => return self.single_char(TokenKind::RBrace),
                '=' => return self.single_char(TokenKind::Equals),
                ',' => return self.single_char(TokenKind::Comma),
                ':' => return self.single_char(TokenKind::Colon),
                ';' => return self.single_char(TokenKind::Semicolon),
                '+' => return self.single_char(TokenKind::Plus),
                '-' => return self.single_char(TokenKind::Minus),
                '*' => return self.single_char(TokenKind::Star),
                '$' => return self.single_char(TokenKind::Dollar),
                '^' => return self.single_char(TokenKind::Caret),
                '#' => self.skip_line_comment()?,
                '/' => {
                    if self.peek(1) == Some('/') {
                        self.skip_line_comment()?;
                    } else if self.peek(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        return self.single_char(TokenKind::Slash);
                    }
                }
                '.' => return self.parse_number(),
                c if c.is_ascii_digit() => return self.parse_number(),
                c if is_word_start(c) => return self.parse_word(),
                c => {
                    let token = self.make_token(
                        TokenKind::Unknown,
                        TokenValue::Unknown(c),
                        c.to_string(),
                        self.pos,
                        1,
                        self.column,
                    );
                    self.advance()?;
                    return Ok(self.finish(token));
                }
            }
        }
    }

    //
    // Scanning helpers
    //

    fn peek(&self, ahead: usize) -> Option<char> {
        self.input.get(self.pos + ahead).copied()
    }

    /// Move past the current character; fails at the end of input
    fn advance(&mut self) -> Result<(), SyntaxError> {
        if self.pos >= self.input.len() {
            return Err(self.error_here("Unexpected end of input"));
        }
        self.pos += 1;
        self.column += 1;
        Ok(())
    }

    fn make_token(
        &self,
        kind: TokenKind,
        value: TokenValue,
        text: String,
        position: usize,
        length: usize,
        column: usize,
    ) -> Token {
        Token {
            kind,
            value,
            text,
            position,
            length,
            line: self.line,
            column,
            end_position: 0,
            end_line: 0,
            end_column: 0,
            origin: self.id,
        }
    }

    /// Capture the post-token cursor, remember the token and hand it out
    fn finish(&mut self, mut token: Token) -> Token {
        token.end_position = self.pos;
        token.end_line = self.line;
        token.end_column = self.column;
        self.current = Some(token.clone());
        token
    }

    fn single_char(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        let c = self.input[self.pos];
        let token = self.make_token(kind, TokenValue::None, c.to_string(), self.pos, 1, self.column);
        self.advance()?;
        Ok(self.finish(token))
    }

    fn parse_word(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let start_column = self.column;

        loop {
            self.advance()?;
            if self.pos >= self.input.len() || !is_word_part(self.input[self.pos]) {
                break;
            }
        }

        // A hyphen joins two words only when a word start follows it.
        while self.input.get(self.pos) == Some(&'-')
            && self.peek(1).is_some_and(is_word_start)
        {
            self.advance()?;
            loop {
                self.advance()?;
                if self.pos >= self.input.len() || !is_word_part(self.input[self.pos]) {
                    break;
                }
            }
        }

        let word: String = self.input[start..self.pos].iter().collect();
        let kind = if self.keywords.contains(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Word
        };
        let token = self.make_token(
            kind,
            TokenValue::Word(word.clone()),
            word,
            start,
            self.pos - start,
            start_column,
        );
        Ok(self.finish(token))
    }

    fn parse_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let start_column = self.column;
        let invalid = |t: &Tokenizer| t.error_here("Invalid number format");

        // Integer part; digit separators are allowed here.
        if self.input[self.pos] != '.' {
            loop {
                self.advance()?;
                match self.input.get(self.pos) {
                    Some(c) if c.is_ascii_digit() || *c == '_' || *c == '\'' => {}
                    _ => break,
                }
            }
        }

        // Fractional part: a dot must be followed by at least one digit.
        if self.input.get(self.pos) == Some(&'.') {
            self.advance()?;
            match self.input.get(self.pos) {
                Some(c) if c.is_ascii_digit() => {}
                _ => return Err(invalid(self)),
            }
            self.advance()?;
            while self.input.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
                self.advance()?;
            }
        }

        // Exponent part: an optional sign and at least one digit.
        if matches!(self.input.get(self.pos).copied(), Some('e' | 'E')) {
            self.advance()?;
            self.advance()?;
            if matches!(self.input[self.pos - 1], '+' | '-') {
                self.advance()?;
            }
            if !self.input[self.pos - 1].is_ascii_digit() {
                return Err(invalid(self));
            }
            while self.input.get(self.pos).is_some_and(|c| c.is_ascii_digit()) {
                self.advance()?;
            }
        }

        // The number cannot run into a word or a second dot.
        if self
            .input
            .get(self.pos)
            .is_some_and(|c| is_word_start(*c) || *c == '.')
        {
            return Err(invalid(self));
        }

        let text: String = self.input[start..self.pos].iter().collect();
        let cleaned: String = text.chars().filter(|c| *c != '_' && *c != '\'').collect();
        let value = Rational::from_decimal_str(&cleaned)
            .map_err(|_| invalid(self))?;

        let token = self.make_token(
            TokenKind::Number,
            TokenValue::Number(value),
            text,
            start,
            self.pos - start,
            start_column,
        );
        Ok(self.finish(token))
    }

    /// Skip a `//` or `#` comment; leaves the cursor on the terminating
    /// end-of-line character, if any
    fn skip_line_comment(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.advance()?;
            match self.input.get(self.pos).copied() {
                None | Some('\r') | Some('\n') => return Ok(()),
                _ => {}
            }
        }
    }

    /// Skip a `/* ... */` comment, tracking line numbers across it
    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        self.advance()?;
        self.advance()?;

        while self.pos < self.input.len() {
            match self.input[self.pos] {
                '\n' if self.pos > 0 && self.input[self.pos - 1] == '\r' => {
                    self.pos += 1;
                    continue;
                }
                '\n' | '\r' => {
                    self.line += 1;
                    self.column = 0;
                }
                '*' if self.peek(1) == Some('/') => {
                    self.advance()?;
                    self.advance()?;
                    return Ok(());
                }
                _ => {}
            }
            self.advance()?;
        }

        Err(self.error_here("Unexpected end of input inside comment block"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tokens(t: &mut Tokenizer) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = t.next_token().unwrap();
            let done = tok.is(TokenKind::Eof);
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_keywords() {
        let mut t = Tokenizer::new("public final void dummy(final String void)");
        t.add_keywords(&["public", "void"]);

        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Keyword);
        assert_eq!(tok.keyword().unwrap(), "public");

        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Word);
        assert_eq!(tok.word().unwrap(), "final");

        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Keyword);
        assert_eq!(tok.keyword().unwrap(), "void");

        t.add_keywords(&["final"]);
        t.remove_keywords(&["void"]);

        t.next_token().unwrap(); // dummy
        t.next_token().unwrap(); // (

        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Keyword);
        assert_eq!(tok.keyword().unwrap(), "final");

        t.next_token().unwrap(); // String

        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Word);
        assert_eq!(tok.word().unwrap(), "void");
    }

    #[test]
    fn test_line_numbers() {
        let text = "One\nTwo 2\r\nThree //3\rFour\n\rSix/*\nSeven\n*/Eight";
        let mut t = Tokenizer::new(text);

        let expected = [
            ("One", 1),
            ("Two", 2),
            ("2", 2),
            ("Three", 3),
            ("Four", 4),
            ("Six", 6),
            ("Eight", 8),
        ];
        for (text, line) in expected {
            let tok = t.next_token().unwrap();
            assert_eq!(tok.line(), line, "line of {text:?}");
            assert_eq!(t.line(), line);
        }

        let eof = t.next_token().unwrap();
        assert_eq!(eof.kind(), TokenKind::Eof);
        assert_eq!(eof.line(), 8);
    }

    #[test]
    fn test_line_positions() {
        let mut t = Tokenizer::new("One Five Ten\n 2  5  Eight 14");

        for column in [1, 5, 10, 2, 5, 8, 14] {
            let tok = t.next_token().unwrap();
            assert_eq!(tok.column(), column, "column of {tok}");
        }

        let eof = t.next_token().unwrap();
        assert_eq!(eof.kind(), TokenKind::Eof);
        assert_eq!(eof.column(), 16);
    }

    #[test]
    fn test_parsing_words() {
        let text = "first-word second-2\nthird3\r-fourth4\
                    /* no words */fifth--sixth final7-word8 # 5 more extra comment words here";
        let mut t = Tokenizer::new(text);

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "first-word");

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "second");

        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Minus);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Number);

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "third3");

        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Minus);

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "fourth4");

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "fifth");

        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Minus);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Minus);

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "sixth");

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "final7-word8");

        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Eof);
    }

    #[test]
    fn test_parsing_numbers() {
        let text = "0.0 11e-1 2.2e0//4 5.5e-3\n3.3/*5.5\n4 ignored*/.44e1 5.5 and6";
        let mut t = Tokenizer::new(text);

        for digit in 0..=5 {
            let tok = t.next_token().unwrap();
            let expected =
                Rational::from_decimal_str(&format!("{digit}.{digit}")).unwrap();
            assert_eq!(tok.number().unwrap(), &expected, "token {tok}");
        }

        let tok = t.next_token().unwrap();
        assert_eq!(tok.word().unwrap(), "and6");
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Eof);
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        for input in ["12et", "345t", "72ee", "216e", "34.5.2", "23."] {
            let mut t = Tokenizer::new(input);
            assert!(
                t.next_token().is_err(),
                "should reject malformed number {input:?}"
            );
        }
    }

    #[test]
    fn test_number_separators() {
        let mut t = Tokenizer::new("9_460_730 1'000'000");
        let tok = t.next_token().unwrap();
        assert_eq!(tok.number().unwrap(), &Rational::from_integer(9_460_730));
        let tok = t.next_token().unwrap();
        assert_eq!(tok.number().unwrap(), &Rational::from_integer(1_000_000));
    }

    const INTEGRALITY_TEXT: &str = concat!(
        "/**",
        " * Force is what changes an object's velocity or shape.",
        " */",
        "force =mass*acceleration ${\n",
        "  newton,Newton (N,n)=.31 kg m per s^2;\n",
        "  dyne= 1e-5 g*cm/s^ 2;\n",
        "  cc=cubic centimeter;\n",
        "  fahrenheit =-5/9 K+273.15;",
        "}\n",
    );

    #[derive(Debug)]
    enum Expected {
        Kind(TokenKind),
        Word(&'static str),
        Number(&'static str),
    }

    fn integrality_expected() -> Vec<Expected> {
        use Expected::*;
        use TokenKind as TK;
        vec![
            // force = mass * acceleration ${
            Word("force"),
            Kind(TK::Equals),
            Word("mass"),
            Kind(TK::Star),
            Word("acceleration"),
            Kind(TK::Dollar),
            Kind(TK::LBrace),
            // newton,Newton (N,n)
            Word("newton"),
            Kind(TK::Comma),
            Word("Newton"),
            Kind(TK::LParen),
            Word("N"),
            Kind(TK::Comma),
            Word("n"),
            Kind(TK::RParen),
            // = .31 kg m per s^2;
            Kind(TK::Equals),
            Number(".31"),
            Word("kg"),
            Word("m"),
            Word("per"),
            Word("s"),
            Kind(TK::Caret),
            Number("2"),
            Kind(TK::Semicolon),
            // dyne = 1e-5 g*cm/s^ 2;
            Word("dyne"),
            Kind(TK::Equals),
            Number("1e-5"),
            Word("g"),
            Kind(TK::Star),
            Word("cm"),
            Kind(TK::Slash),
            Word("s"),
            Kind(TK::Caret),
            Number("2"),
            Kind(TK::Semicolon),
            // cc = cubic centimeter;
            Word("cc"),
            Kind(TK::Equals),
            Word("cubic"),
            Word("centimeter"),
            Kind(TK::Semicolon),
            // fahrenheit = -5/9 K+273.15;
            Word("fahrenheit"),
            Kind(TK::Equals),
            Kind(TK::Minus),
            Number("5"),
            Kind(TK::Slash),
            Number("9"),
            Word("K"),
            Kind(TK::Plus),
            Number("273.15"),
            Kind(TK::Semicolon),
            // }
            Kind(TK::RBrace),
            Kind(TK::Eof),
        ]
    }

    #[test]
    fn test_integrality() {
        let mut t = Tokenizer::new(INTEGRALITY_TEXT);
        t.add_keywords(&["cubic", "per"]);
        let tokens = all_tokens(&mut t);
        let expected = integrality_expected();
        assert_eq!(tokens.len(), expected.len());

        for (tok, exp) in tokens.iter().zip(&expected) {
            match exp {
                Expected::Kind(kind) => assert_eq!(tok.kind(), *kind, "token {tok}"),
                Expected::Word(w) => {
                    if t.is_keyword(w) {
                        assert_eq!(tok.keyword().unwrap(), *w);
                    } else {
                        assert_eq!(tok.word().unwrap(), *w);
                    }
                }
                Expected::Number(n) => {
                    let expected = Rational::from_decimal_str(n).unwrap();
                    assert_eq!(tok.number().unwrap(), &expected);
                }
            }
        }
    }

    #[test]
    fn test_set_current() {
        let mut t = Tokenizer::new(INTEGRALITY_TEXT);
        let tokens = all_tokens(&mut t);

        // Jump around in a fixed scrambled order; after each rewind the next
        // token must be the one that originally followed.
        let len = tokens.len();
        let order: Vec<usize> = (0..len)
            .rev()
            .chain((0..len).filter(|i| i % 2 == 0))
            .chain((0..len).filter(|i| i % 2 == 1))
            .collect();
        for pos in order {
            if pos + 1 == len {
                continue;
            }
            t.set_current(&tokens[pos]);
            assert_eq!(t.next_token().unwrap(), tokens[pos + 1], "after token {pos}");
        }
    }

    #[test]
    fn test_set_current_across_newlines() {
        let mut t = Tokenizer::new("one\r\ntwo\nthree");
        let tokens = all_tokens(&mut t);
        // Rewind to the first token; rescanning must reproduce line numbers.
        t.set_current(&tokens[0]);
        let two = t.next_token().unwrap();
        assert_eq!(two.word().unwrap(), "two");
        assert_eq!(two.line(), 2);
        let three = t.next_token().unwrap();
        assert_eq!(three.line(), 3);
    }

    #[test]
    #[should_panic(expected = "end-of-input")]
    fn test_next_token_past_eof_panics() {
        let mut t = Tokenizer::new("word");
        t.next_token().unwrap();
        t.next_token().unwrap(); // EOF
        let _ = t.next_token();
    }

    #[test]
    #[should_panic(expected = "another tokenizer")]
    fn test_set_current_foreign_token_panics() {
        let mut a = Tokenizer::new("one");
        let mut b = Tokenizer::new("one");
        let tok = a.next_token().unwrap();
        b.set_current(&tok);
    }

    #[test]
    fn test_eol_tokens() {
        let mut t = Tokenizer::with_eol_tokens("a\nb", true);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Word);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Eol);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Word);
        assert_eq!(t.next_token().unwrap().kind(), TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut t = Tokenizer::new("a /* never closed");
        t.next_token().unwrap();
        assert!(t.next_token().is_err());
    }

    #[test]
    fn test_unknown_character() {
        let mut t = Tokenizer::new("%");
        let tok = t.next_token().unwrap();
        assert_eq!(tok.kind(), TokenKind::Unknown);
        assert_eq!(tok.unknown_character().unwrap(), '%');
    }
}
