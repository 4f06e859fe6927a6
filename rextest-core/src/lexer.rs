//! Lexer for tokenizing regex patterns
//!
//! This module provides a tokenizer that converts regex pattern strings
//! into a stream of position-tagged tokens for parsing. Positions count
//! characters, not bytes. The lexer is mode aware: with the unicode flag
//! escapes are strict and `\u{...}` / `\p{...}` are recognised.

use crate::ast::Quantifier;
use crate::chars;
use crate::error::{LexerErrorKind, RegexError, Result, Span};
use std::fmt;

/// A token in a regex pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left parenthesis `(`
    LeftParen,
    /// Non-capturing group marker `(?:`
    NonCapturing,
    /// Named group opener `(?<name>`
    NamedGroupStart(String),
    /// Lookahead opener `(?=`
    Lookahead,
    /// Negative lookahead opener `(?!`
    NegativeLookahead,
    /// Lookbehind opener `(?<=`
    Lookbehind,
    /// Negative lookbehind opener `(?<!`
    NegativeLookbehind,
    /// Right parenthesis `)`
    RightParen,
    /// Left bracket `[` (start of character class)
    LeftBracket,
    /// Right bracket `]` (end of character class)
    RightBracket,
    /// Pipe `|` (alternation)
    Pipe,
    /// Caret `^` (start anchor or negation in character class)
    Caret,
    /// Dollar `$` (end anchor)
    Dollar,
    /// Dot `.` (any character)
    Dot,
    /// `*`, `+`, `?` or a complete `{n,m}`, with an optional lazy `?`
    Quantifier(Quantifier),
    /// An escaped character, already resolved (`\n`, `\x41`, `\.`)
    Escape(char),
    /// A backreference by number (e.g., \1, \2)
    BackrefNumber(u32),
    /// A backreference by name (e.g., \k<name>)
    BackrefName(String),
    /// Word character shorthand (\w)
    WordChar,
    /// Non-word character shorthand (\W)
    NonWordChar,
    /// Digit shorthand (\d)
    Digit,
    /// Non-digit shorthand (\D)
    NonDigit,
    /// Whitespace shorthand (\s)
    Whitespace,
    /// Non-whitespace shorthand (\S)
    NonWhitespace,
    /// Word boundary assertion (\b)
    WordBoundary,
    /// Non-word boundary assertion (\B)
    NonWordBoundary,
    /// Property escape `\p{name}` or `\P{name}`
    Property { name: String, negated: bool },
    /// A literal character
    Literal(char),
    /// End of input
    Eof,
}

impl Token {
    /// The shorthand letter for `\d \D \w \W \s \S` tokens
    pub fn shorthand(&self) -> Option<char> {
        match self {
            Token::WordChar => Some('w'),
            Token::NonWordChar => Some('W'),
            Token::Digit => Some('d'),
            Token::NonDigit => Some('D'),
            Token::Whitespace => Some('s'),
            Token::NonWhitespace => Some('S'),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "`(`"),
            Token::NonCapturing => write!(f, "`(?:`"),
            Token::NamedGroupStart(name) => write!(f, "named group `{}`", name),
            Token::Lookahead => write!(f, "`(?=`"),
            Token::NegativeLookahead => write!(f, "`(?!`"),
            Token::Lookbehind => write!(f, "`(?<=`"),
            Token::NegativeLookbehind => write!(f, "`(?<!`"),
            Token::RightParen => write!(f, "`)`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Caret => write!(f, "`^`"),
            Token::Dollar => write!(f, "`$`"),
            Token::Dot => write!(f, "`.`"),
            Token::Quantifier(q) => write!(f, "quantifier `{}`", q),
            Token::Escape(c) => write!(f, "escape `{}`", c.escape_default()),
            Token::BackrefNumber(n) => write!(f, "backref `\\{}`", n),
            Token::BackrefName(name) => write!(f, "backref `\\k<{}>`", name),
            Token::WordChar => write!(f, "shorthand `\\w`"),
            Token::NonWordChar => write!(f, "shorthand `\\W`"),
            Token::Digit => write!(f, "shorthand `\\d`"),
            Token::NonDigit => write!(f, "shorthand `\\D`"),
            Token::Whitespace => write!(f, "shorthand `\\s`"),
            Token::NonWhitespace => write!(f, "shorthand `\\S`"),
            Token::WordBoundary => write!(f, "boundary `\\b`"),
            Token::NonWordBoundary => write!(f, "boundary `\\B`"),
            Token::Property { name, negated } => {
                write!(f, "property `\\{}{{{}}}`", if *negated { 'P' } else { 'p' }, name)
            }
            Token::Literal(c) => write!(f, "literal `{}`", c),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// A token together with the pattern characters it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer for tokenizing regex patterns
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    unicode: bool,
    /// Whether we're currently inside a character class
    in_char_class: bool,
    /// Whether the next class token is the first one after `[`
    class_start: bool,
}

impl Lexer {
    /// Create a new lexer in the default (non-unicode) mode
    pub fn new(input: &str) -> Self {
        Self::with_mode(input, false)
    }

    /// Create a new lexer, strict when `unicode` is set
    pub fn with_mode(input: &str, unicode: bool) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
            unicode,
            in_char_class: false,
            class_start: false,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.position += 1;
        Some(c)
    }

    fn error(&self, position: usize, kind: LexerErrorKind) -> RegexError {
        RegexError::lexer(position, kind)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<SpannedToken> {
        let start = self.position;
        let token = if self.in_char_class {
            self.class_token(start)?
        } else {
            self.pattern_token(start)?
        };
        Ok(SpannedToken {
            token,
            span: Span::new(start, self.position),
        })
    }

    /// Tokenize the entire input, ending with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn pattern_token(&mut self, start: usize) -> Result<Token> {
        let Some(c) = self.current() else {
            return Ok(Token::Eof);
        };
        let token = match c {
            '\\' => {
                self.bump();
                self.read_escape(start)?
            }
            '(' => {
                self.bump();
                self.read_group_open(start)?
            }
            '[' => {
                self.bump();
                self.in_char_class = true;
                self.class_start = true;
                Token::LeftBracket
            }
            '*' | '+' | '?' => {
                self.bump();
                let quantifier = match c {
                    '*' => Quantifier::zero_or_more(),
                    '+' => Quantifier::one_or_more(),
                    _ => Quantifier::optional(),
                };
                self.finish_quantifier(quantifier)
            }
            '{' => match self.scan_braced() {
                Some((min, max, consumed)) => {
                    self.position += consumed;
                    self.finish_quantifier(Quantifier::range(min, max))
                }
                None if self.unicode => {
                    return Err(self.error(start, LexerErrorKind::LoneQuantifierBracket));
                }
                None => {
                    self.bump();
                    Token::Literal('{')
                }
            },
            '}' | ']' if self.unicode => {
                return Err(self.error(start, LexerErrorKind::LoneQuantifierBracket));
            }
            _ => {
                self.bump();
                match c {
                    ')' => Token::RightParen,
                    '|' => Token::Pipe,
                    '^' => Token::Caret,
                    '$' => Token::Dollar,
                    '.' => Token::Dot,
                    c => Token::Literal(c),
                }
            }
        };
        Ok(token)
    }

    fn class_token(&mut self, start: usize) -> Result<Token> {
        let Some(c) = self.bump() else {
            return Err(self.error(start, LexerErrorKind::UnclosedCharacterClass));
        };
        let first = std::mem::take(&mut self.class_start);
        let token = match c {
            '^' if first => Token::Caret,
            ']' => {
                self.in_char_class = false;
                Token::RightBracket
            }
            '\\' => self.read_class_escape(start)?,
            c => Token::Literal(c),
        };
        Ok(token)
    }

    /// A lazy `?` directly after a quantifier
    fn finish_quantifier(&mut self, quantifier: Quantifier) -> Token {
        if self.current() == Some('?') {
            self.bump();
            Token::Quantifier(quantifier.lazy())
        } else {
            Token::Quantifier(quantifier)
        }
    }

    /// Scan a complete `{n}`, `{n,}` or `{n,m}` at the current position
    /// without consuming it. Returns the bounds and the characters used.
    fn scan_braced(&self) -> Option<(u32, Option<u32>, usize)> {
        let mut offset = 1;
        let (min, digits) = self.scan_number(offset);
        if digits == 0 {
            return None;
        }
        offset += digits;
        let max = if self.peek_at(offset) == Some(',') {
            offset += 1;
            let (max, digits) = self.scan_number(offset);
            offset += digits;
            (digits > 0).then_some(max)
        } else {
            Some(min)
        };
        if self.peek_at(offset) != Some('}') {
            return None;
        }
        Some((min, max, offset + 1))
    }

    /// Decimal digits at `offset`, saturating at `u32::MAX`
    fn scan_number(&self, offset: usize) -> (u32, usize) {
        let mut value: u32 = 0;
        let mut count = 0;
        while let Some(d) = self.peek_at(offset + count).and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(d);
            count += 1;
        }
        (value, count)
    }

    /// `count` hex digits at `offset`, without consuming them
    fn scan_hex(&self, offset: usize, count: usize) -> Option<u32> {
        let mut value = 0;
        for i in 0..count {
            value = value * 16 + self.peek_at(offset + i)?.to_digit(16)?;
        }
        Some(value)
    }

    /// Read a group opener after `(`
    fn read_group_open(&mut self, start: usize) -> Result<Token> {
        if self.current() != Some('?') {
            return Ok(Token::LeftParen);
        }
        self.bump();
        let token = match self.bump() {
            Some(':') => Token::NonCapturing,
            Some('=') => Token::Lookahead,
            Some('!') => Token::NegativeLookahead,
            Some('<') => match self.current() {
                Some('=') => {
                    self.bump();
                    Token::Lookbehind
                }
                Some('!') => {
                    self.bump();
                    Token::NegativeLookbehind
                }
                _ => Token::NamedGroupStart(self.read_group_name(start)?),
            },
            _ => return Err(self.error(start, LexerErrorKind::InvalidGroup)),
        };
        Ok(token)
    }

    /// Read `name>` after a `<`
    fn read_group_name(&mut self, start: usize) -> Result<String> {
        self.try_read_group_name().ok_or_else(|| {
            let rest: String = self.chars[self.position..]
                .iter()
                .take_while(|c| **c != '>')
                .collect();
            self.error(start, LexerErrorKind::InvalidGroupName(rest))
        })
    }

    /// Read `name>` after a `<`, leaving the position untouched on failure
    fn try_read_group_name(&mut self) -> Option<String> {
        let mut name = String::new();
        let mut offset = 0;
        loop {
            let c = self.peek_at(offset)?;
            if c == '>' {
                break;
            }
            let valid = if name.is_empty() {
                c.is_alphabetic() || c == '$' || c == '_'
            } else {
                c.is_alphanumeric() || matches!(c, '$' | '_' | '\u{200C}' | '\u{200D}')
            };
            if !valid {
                return None;
            }
            name.push(c);
            offset += 1;
        }
        if name.is_empty() {
            return None;
        }
        self.position += offset + 1;
        Some(name)
    }

    /// Read an escape sequence outside a class (backslash already consumed)
    fn read_escape(&mut self, start: usize) -> Result<Token> {
        let Some(c) = self.bump() else {
            return Err(self.error(start, LexerErrorKind::TrailingBackslash));
        };
        let token = match c {
            'w' => Token::WordChar,
            'W' => Token::NonWordChar,
            'd' => Token::Digit,
            'D' => Token::NonDigit,
            's' => Token::Whitespace,
            'S' => Token::NonWhitespace,
            'b' => Token::WordBoundary,
            'B' => Token::NonWordBoundary,
            '1'..='9' => {
                let (rest, digits) = self.scan_number(0);
                self.position += digits;
                let lead = c.to_digit(10).unwrap_or(0);
                let scale = 10u32.saturating_pow(digits as u32);
                Token::BackrefNumber(lead.saturating_mul(scale).saturating_add(rest))
            }
            'k' if self.current() == Some('<') => {
                self.bump();
                match self.try_read_group_name() {
                    Some(name) => Token::BackrefName(name),
                    None if self.unicode => {
                        return Err(self.error(start, LexerErrorKind::InvalidGroupName(String::new())));
                    }
                    None => {
                        // Not a reference: the `<` is read again as a literal
                        self.position -= 1;
                        Token::Escape('k')
                    }
                }
            }
            'p' | 'P' if self.unicode => self.read_property(start, c == 'P')?,
            c => Token::Escape(self.read_char_escape(c, start, false)?),
        };
        Ok(token)
    }

    /// Read an escape sequence inside a class (backslash already consumed)
    fn read_class_escape(&mut self, start: usize) -> Result<Token> {
        let Some(c) = self.bump() else {
            return Err(self.error(start, LexerErrorKind::TrailingBackslash));
        };
        let token = match c {
            'w' => Token::WordChar,
            'W' => Token::NonWordChar,
            'd' => Token::Digit,
            'D' => Token::NonDigit,
            's' => Token::Whitespace,
            'S' => Token::NonWhitespace,
            'b' => Token::Escape('\u{8}'),
            '-' if self.unicode => Token::Escape('-'),
            'p' | 'P' if self.unicode => self.read_property(start, c == 'P')?,
            c => Token::Escape(self.read_char_escape(c, start, true)?),
        };
        Ok(token)
    }

    /// Resolve a character escape whose letter `c` was just consumed
    fn read_char_escape(&mut self, c: char, start: usize, in_class: bool) -> Result<char> {
        let resolved = match c {
            't' => '\t',
            'n' => '\n',
            'v' => '\u{B}',
            'f' => '\u{C}',
            'r' => '\r',
            '0' if !self.current().is_some_and(|d| d.is_ascii_digit()) => '\0',
            '0'..='7' if !self.unicode => self.read_legacy_octal(c),
            'c' => match self.current() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.bump();
                    char::from(letter as u8 % 32)
                }
                _ if self.unicode => {
                    return Err(self.error(start, LexerErrorKind::InvalidEscape('c')));
                }
                _ => {
                    // `\c` without a letter is a literal backslash; `c` is read again
                    self.position -= 1;
                    '\\'
                }
            },
            'x' => match self.scan_hex(0, 2) {
                Some(value) => {
                    self.position += 2;
                    char::from_u32(value).unwrap_or('\u{FFFD}')
                }
                None if self.unicode => {
                    return Err(self.error(start, LexerErrorKind::InvalidHexEscape));
                }
                None => 'x',
            },
            'u' => self.read_unicode_escape(start)?,
            c if self.unicode => {
                if chars::is_syntax_char(c) || (in_class && c == '-') {
                    c
                } else {
                    return Err(self.error(start, LexerErrorKind::InvalidEscape(c)));
                }
            }
            c => c,
        };
        Ok(resolved)
    }

    /// Up to three octal digits (value at most 0o377), first already consumed
    fn read_legacy_octal(&mut self, first: char) -> char {
        let mut value = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.current().and_then(|c| c.to_digit(8)) {
                Some(d) if value * 8 + d <= 0o377 => {
                    value = value * 8 + d;
                    self.bump();
                }
                _ => break,
            }
        }
        char::from_u32(value).unwrap_or('\0')
    }

    /// `\uHHHH`, a surrogate pair of them, or `\u{H...}` in unicode mode
    fn read_unicode_escape(&mut self, start: usize) -> Result<char> {
        if self.unicode && self.current() == Some('{') {
            let mut offset = 1;
            let mut value: u32 = 0;
            while let Some(d) = self.peek_at(offset).and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(d);
                offset += 1;
            }
            if offset == 1 || self.peek_at(offset) != Some('}') {
                return Err(self.error(start, LexerErrorKind::InvalidUnicodeEscape));
            }
            self.position += offset + 1;
            return match char::from_u32(value) {
                Some(c) => Ok(c),
                None if (0xD800..=0xDFFF).contains(&value) => Ok('\u{FFFD}'),
                None => Err(self.error(start, LexerErrorKind::InvalidUnicodeEscape)),
            };
        }
        let Some(high) = self.scan_hex(0, 4) else {
            if self.unicode {
                return Err(self.error(start, LexerErrorKind::InvalidUnicodeEscape));
            }
            return Ok('u');
        };
        self.position += 4;
        let low = if (0xD800..=0xDBFF).contains(&high)
            && self.current() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            self.scan_hex(2, 4)
                .filter(|low| (0xDC00..=0xDFFF).contains(low))
        } else {
            None
        };
        if let Some(low) = low {
            self.position += 6;
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return Ok(char::from_u32(combined).unwrap_or('\u{FFFD}'));
        }
        // Lone surrogates have no `char` representation
        Ok(char::from_u32(high).unwrap_or('\u{FFFD}'))
    }

    /// `{name}` after `\p` or `\P`
    fn read_property(&mut self, start: usize, negated: bool) -> Result<Token> {
        if self.current() != Some('{') {
            return Err(self.error(start, LexerErrorKind::InvalidPropertyName(String::new())));
        }
        let name: String = self.chars[self.position + 1..]
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == '_' || **c == '=')
            .collect();
        let close = self.position + 1 + name.chars().count();
        if self.chars.get(close) != Some(&'}') || !chars::is_known_property(&name) {
            return Err(self.error(start, LexerErrorKind::InvalidPropertyName(name)));
        }
        self.position = close + 1;
        Ok(Token::Property { name, negated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn unicode_tokens(input: &str) -> Result<Vec<Token>> {
        Ok(Lexer::with_mode(input, true)
            .tokenize()?
            .into_iter()
            .map(|t| t.token)
            .collect())
    }

    #[test]
    fn test_literal_sequence() {
        assert_eq!(
            tokens("abc"),
            vec![
                Token::Literal('a'),
                Token::Literal('b'),
                Token::Literal('c'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokens(""), vec![Token::Eof]);
    }

    #[test]
    fn test_group_openers() {
        assert_eq!(
            tokens("((?:(?<year>(?=(?!(?<=(?<!"),
            vec![
                Token::LeftParen,
                Token::NonCapturing,
                Token::NamedGroupStart("year".to_string()),
                Token::Lookahead,
                Token::NegativeLookahead,
                Token::Lookbehind,
                Token::NegativeLookbehind,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_group_name() {
        let err = Lexer::new("(?<1a>x)").tokenize().unwrap_err();
        assert!(matches!(
            err,
            RegexError::Lexer {
                position: 0,
                kind: LexerErrorKind::InvalidGroupName(_)
            }
        ));
        assert!(Lexer::new("(?x)").tokenize().is_err());
    }

    #[test]
    fn test_quantifiers() {
        assert_eq!(
            tokens("a*b+?c?d{2}e{2,}f{2,5}?"),
            vec![
                Token::Literal('a'),
                Token::Quantifier(Quantifier::zero_or_more()),
                Token::Literal('b'),
                Token::Quantifier(Quantifier::one_or_more().lazy()),
                Token::Literal('c'),
                Token::Quantifier(Quantifier::optional()),
                Token::Literal('d'),
                Token::Quantifier(Quantifier::range(2, Some(2))),
                Token::Literal('e'),
                Token::Quantifier(Quantifier::range(2, None)),
                Token::Literal('f'),
                Token::Quantifier(Quantifier::range(2, Some(5)).lazy()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_incomplete_brace_is_literal() {
        assert_eq!(
            tokens("a{,3}"),
            vec![
                Token::Literal('a'),
                Token::Literal('{'),
                Token::Literal(','),
                Token::Literal('3'),
                Token::Literal('}'),
                Token::Eof,
            ]
        );
        assert!(unicode_tokens("a{,3}").is_err());
        assert!(unicode_tokens("a}").is_err());
    }

    #[test]
    fn test_anchors_and_alternation() {
        assert_eq!(
            tokens("^a|b$"),
            vec![
                Token::Caret,
                Token::Literal('a'),
                Token::Pipe,
                Token::Literal('b'),
                Token::Dollar,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_character_class() {
        assert_eq!(
            tokens("[^a-c\\d.*]"),
            vec![
                Token::LeftBracket,
                Token::Caret,
                Token::Literal('a'),
                Token::Literal('-'),
                Token::Literal('c'),
                Token::Digit,
                Token::Literal('.'),
                Token::Literal('*'),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_caret_after_class_start_is_literal() {
        assert_eq!(
            tokens("[a^]"),
            vec![
                Token::LeftBracket,
                Token::Literal('a'),
                Token::Literal('^'),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_backspace_in_class() {
        assert_eq!(
            tokens("[\\b]\\b"),
            vec![
                Token::LeftBracket,
                Token::Escape('\u{8}'),
                Token::RightBracket,
                Token::WordBoundary,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unclosed_class() {
        let err = Lexer::new("[abc").tokenize().unwrap_err();
        assert_eq!(
            err,
            RegexError::lexer(4, LexerErrorKind::UnclosedCharacterClass)
        );
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(
            tokens("\\t\\n\\x41\\u00e9\\cJ\\0\\."),
            vec![
                Token::Escape('\t'),
                Token::Escape('\n'),
                Token::Escape('A'),
                Token::Escape('é'),
                Token::Escape('\n'),
                Token::Escape('\0'),
                Token::Escape('.'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_surrogate_pair_escape() {
        assert_eq!(
            tokens("\\uD83D\\uDE00\\uD800"),
            vec![
                Token::Escape('😀'),
                Token::Escape('\u{FFFD}'),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_braced_unicode_escape() {
        assert_eq!(
            unicode_tokens("\\u{1F600}").unwrap(),
            vec![Token::Escape('😀'), Token::Eof]
        );
        assert!(unicode_tokens("\\u{110000}").is_err());
    }

    #[test]
    fn test_loose_escapes_outside_unicode() {
        assert_eq!(
            tokens("\\q\\xZ\\c"),
            vec![
                Token::Escape('q'),
                Token::Escape('x'),
                Token::Literal('Z'),
                Token::Escape('\\'),
                Token::Literal('c'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_strict_escapes_in_unicode() {
        assert!(matches!(
            unicode_tokens("\\q"),
            Err(RegexError::Lexer {
                kind: LexerErrorKind::InvalidEscape('q'),
                ..
            })
        ));
        assert!(unicode_tokens("\\/").is_ok());
        assert!(unicode_tokens("[\\-]").is_ok());
        assert!(unicode_tokens("\\-").is_err());
    }

    #[test]
    fn test_trailing_backslash() {
        let err = Lexer::new("ab\\").tokenize().unwrap_err();
        assert_eq!(err, RegexError::lexer(2, LexerErrorKind::TrailingBackslash));
    }

    #[test]
    fn test_backreferences() {
        assert_eq!(
            tokens("\\1\\12\\k<name>"),
            vec![
                Token::BackrefNumber(1),
                Token::BackrefNumber(12),
                Token::BackrefName("name".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_named_reference_outside_unicode() {
        assert_eq!(
            tokens("\\k<"),
            vec![Token::Escape('k'), Token::Literal('<'), Token::Eof]
        );
    }

    #[test]
    fn test_properties() {
        assert_eq!(
            unicode_tokens("\\p{L}\\P{Lu}").unwrap(),
            vec![
                Token::Property {
                    name: "L".to_string(),
                    negated: false
                },
                Token::Property {
                    name: "Lu".to_string(),
                    negated: true
                },
                Token::Eof,
            ]
        );
        assert!(unicode_tokens("\\p{Nope}").is_err());
        // Outside unicode mode `\p` is an identity escape
        assert_eq!(tokens("\\p"), vec![Token::Escape('p'), Token::Eof]);
    }

    #[test]
    fn test_spans_count_characters() {
        let spanned = Lexer::new("é\\d").tokenize().unwrap();
        assert_eq!(spanned[0].span, Span::new(0, 1));
        assert_eq!(spanned[1].span, Span::new(1, 3));
    }
}
