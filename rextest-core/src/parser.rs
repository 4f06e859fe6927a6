//! Parser for regex patterns
//!
//! This module provides a recursive descent parser that converts
//! tokens into an Abstract Syntax Tree (AST).
//!
//! Grammar (in order of precedence, lowest to highest):
//!   regex       := alternation
//!   alternation := sequence ( '|' sequence )*
//!   sequence    := quantified*
//!   quantified  := atom quantifier?
//!   quantifier  := ( '*' | '+' | '?' | '{' number (',' number?)? '}' ) '?'?
//!   atom        := literal | anchor | group | lookaround | char_class | '.'
//!                | backref | shorthand | property | escape
//!   anchor      := '^' | '$' | '\b' | '\B'
//!   group       := '(' alternation ')' | '(?:' alternation ')'
//!                | '(?<' identifier '>' alternation ')'
//!   lookaround  := ( '(?=' | '(?!' | '(?<=' | '(?<!' ) alternation ')'
//!   char_class  := '[' '^'? class_item* ']'
//!   class_item  := class_atom | class_atom '-' class_atom
//!   backref     := '\' number | '\k<' identifier '>'
//!
//! Capture indices are assigned in the order left parentheses appear. A
//! numeric escape is a backreference only when that many groups exist in
//! the whole pattern; otherwise it is a legacy octal escape outside
//! unicode mode and an error inside it.

use crate::ast::{ClassItem, Expr, Quantifier};
use crate::error::{ParseError, RegexError, Result, Span};
use crate::lexer::{Lexer, SpannedToken, Token};

/// Parser for regex patterns
pub struct Parser {
    tokens: Vec<SpannedToken>,
    index: usize,
    unicode: bool,
    /// Capturing groups in the whole pattern
    capture_total: u32,
    has_named_groups: bool,
    next_group_index: u32,
}

/// A class atom before range handling
enum ClassAtom {
    Char(char),
    Set(ClassItem),
}

impl Parser {
    /// Create a parser in the default (non-unicode) mode
    pub fn new(input: &str) -> Result<Self> {
        Self::with_mode(input, false)
    }

    /// Create a parser, strict when `unicode` is set
    pub fn with_mode(input: &str, unicode: bool) -> Result<Self> {
        let tokens = Lexer::with_mode(input, unicode).tokenize()?;
        let capture_total = tokens
            .iter()
            .filter(|t| matches!(t.token, Token::LeftParen | Token::NamedGroupStart(_)))
            .count() as u32;
        let has_named_groups = tokens
            .iter()
            .any(|t| matches!(t.token, Token::NamedGroupStart(_)));
        Ok(Parser {
            tokens,
            index: 0,
            unicode,
            capture_total,
            has_named_groups,
            next_group_index: 1,
        })
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.index)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Advance to the next token
    fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    fn error(&self, kind: ParseError) -> RegexError {
        RegexError::parse(self.span().start, kind)
    }

    fn unexpected(&self, expected: &str) -> RegexError {
        self.error(ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current().to_string(),
        })
    }

    /// Parse the entire input and return the AST
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_alternation()?;

        match self.current() {
            Token::Eof => Ok(expr),
            Token::RightParen => Err(self.error(ParseError::UnmatchedParen)),
            _ => Err(self.unexpected("EOF")),
        }
    }

    /// Parse alternation (lowest precedence)
    /// alternation := sequence ( '|' sequence )*
    fn parse_alternation(&mut self) -> Result<Expr> {
        let mut alternatives = vec![self.parse_sequence()?];

        while *self.current() == Token::Pipe {
            self.advance(); // consume '|'
            alternatives.push(self.parse_sequence()?);
        }

        Ok(Expr::alternation(alternatives))
    }

    /// Parse a sequence (concatenation)
    /// sequence := quantified*
    fn parse_sequence(&mut self) -> Result<Expr> {
        let mut expressions = Vec::new();

        while !self.is_sequence_end() {
            expressions.push(self.parse_quantified()?);
        }

        Ok(Expr::sequence(expressions))
    }

    /// Check if we've reached the end of a sequence
    fn is_sequence_end(&self) -> bool {
        matches!(self.current(), Token::Eof | Token::RightParen | Token::Pipe)
    }

    /// Parse a quantified expression
    /// quantified := atom quantifier?
    fn parse_quantified(&mut self) -> Result<Expr> {
        let atom = self.parse_atom()?;

        let Token::Quantifier(quantifier) = *self.current() else {
            return Ok(atom);
        };
        if !self.is_quantifiable(&atom) {
            return Err(self.error(ParseError::NothingToRepeat));
        }
        self.check_bounds(quantifier)?;
        self.advance();
        Ok(Expr::quantified(atom, quantifier))
    }

    /// Assertions cannot be repeated, except lookahead outside unicode mode
    fn is_quantifiable(&self, atom: &Expr) -> bool {
        match atom {
            Expr::Lookahead(_) | Expr::NegativeLookahead(_) => !self.unicode,
            other => !other.is_assertion(),
        }
    }

    fn check_bounds(&self, quantifier: Quantifier) -> Result<()> {
        match quantifier.max {
            Some(max) if max < quantifier.min => Err(self.error(ParseError::QuantifierOutOfOrder)),
            _ => Ok(()),
        }
    }

    /// Parse an atom (the most basic unit)
    fn parse_atom(&mut self) -> Result<Expr> {
        let expr = match self.current().clone() {
            // With named groups `\k` only starts a `\k<name>` reference
            Token::Escape('k') if self.has_named_groups => {
                return Err(self.error(ParseError::InvalidNamedReference));
            }
            Token::Literal(c) | Token::Escape(c) => Expr::literal(c),
            Token::Dot => Expr::any(),
            Token::Caret => Expr::StartAnchor,
            Token::Dollar => Expr::EndAnchor,
            Token::WordBoundary => Expr::WordBoundary,
            Token::NonWordBoundary => Expr::NonWordBoundary,
            token @ (Token::WordChar
            | Token::NonWordChar
            | Token::Digit
            | Token::NonDigit
            | Token::Whitespace
            | Token::NonWhitespace) => Expr::Shorthand(token.shorthand().unwrap_or('w')),
            Token::Property { name, negated } => {
                Expr::char_class(false, vec![ClassItem::Property { name, negated }])
            }
            Token::BackrefNumber(n) => self.numeric_escape(n)?,
            Token::BackrefName(name) => self.named_escape(name)?,
            Token::LeftParen
            | Token::NonCapturing
            | Token::NamedGroupStart(_)
            | Token::Lookahead
            | Token::NegativeLookahead
            | Token::Lookbehind
            | Token::NegativeLookbehind => return self.parse_group(),
            Token::LeftBracket => return self.parse_char_class(),
            Token::Quantifier(_) => return Err(self.error(ParseError::NothingToRepeat)),
            Token::Eof => return Err(self.unexpected("expression")),
            Token::RightParen | Token::RightBracket | Token::Pipe => {
                return Err(self.unexpected("expression"));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Parse any parenthesized construct, opener at the current token
    fn parse_group(&mut self) -> Result<Expr> {
        let open = self.span();
        let opener = self.current().clone();
        let index = if matches!(opener, Token::LeftParen | Token::NamedGroupStart(_)) {
            let index = self.next_group_index;
            self.next_group_index += 1;
            index
        } else {
            0
        };
        self.advance();

        let inner = self.parse_alternation()?;
        if *self.current() != Token::RightParen {
            return Err(RegexError::parse(open.start, ParseError::UnterminatedGroup));
        }
        self.advance(); // consume ')'

        let expr = match opener {
            Token::LeftParen => Expr::group(index, inner),
            Token::NamedGroupStart(name) => Expr::named_group(index, name, inner),
            Token::NonCapturing => Expr::non_capturing_group(inner),
            Token::Lookahead => Expr::Lookahead(Box::new(inner)),
            Token::NegativeLookahead => Expr::NegativeLookahead(Box::new(inner)),
            Token::Lookbehind => Expr::Lookbehind(Box::new(inner)),
            _ => Expr::NegativeLookbehind(Box::new(inner)),
        };
        Ok(expr)
    }

    /// `\N`: a backreference when group N exists, otherwise a legacy escape
    fn numeric_escape(&mut self, n: u32) -> Result<Expr> {
        if n <= self.capture_total {
            return Ok(Expr::backreference(n));
        }
        if self.unicode {
            return Err(self.error(ParseError::InvalidBackreference(n)));
        }

        let digits: Vec<char> = n.to_string().chars().collect();
        let octal_len = digits
            .iter()
            .take(3)
            .take_while(|d| d.is_digit(8))
            .scan(0u32, |value, d| {
                *value = *value * 8 + d.to_digit(8).unwrap_or(0);
                (*value <= 0o377).then_some(())
            })
            .count();
        let (head, rest) = if octal_len == 0 {
            (digits[0], &digits[1..])
        } else {
            let value = digits[..octal_len]
                .iter()
                .fold(0, |acc, d| acc * 8 + d.to_digit(8).unwrap_or(0));
            (char::from_u32(value).unwrap_or('\0'), &digits[octal_len..])
        };

        // Remaining digits become literal tokens after this one
        let span = self.span();
        let literals: Vec<SpannedToken> = rest
            .iter()
            .map(|d| SpannedToken {
                token: Token::Literal(*d),
                span,
            })
            .collect();
        self.tokens
            .splice(self.index + 1..self.index + 1, literals);
        Ok(Expr::literal(head))
    }

    /// `\k<name>`: a reference when the pattern has named groups
    fn named_escape(&mut self, name: String) -> Result<Expr> {
        if self.has_named_groups {
            return Ok(Expr::named_backreference(name));
        }
        if self.unicode {
            return Err(self.error(ParseError::InvalidNamedReference));
        }
        let span = self.span();
        let literals: Vec<SpannedToken> = name
            .chars()
            .chain(std::iter::once('>'))
            .map(|c| SpannedToken {
                token: Token::Literal(c),
                span,
            })
            .collect();
        let mut replacement = vec![SpannedToken {
            token: Token::Literal('<'),
            span,
        }];
        replacement.extend(literals);
        self.tokens
            .splice(self.index + 1..self.index + 1, replacement);
        Ok(Expr::literal('k'))
    }

    /// Parse a character class
    /// char_class := '[' '^'? class_item* ']'
    fn parse_char_class(&mut self) -> Result<Expr> {
        self.advance(); // consume '['

        let negated = *self.current() == Token::Caret;
        if negated {
            self.advance();
        }

        let mut items = Vec::new();
        loop {
            match self.current() {
                Token::RightBracket => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.unexpected("`]`")),
                _ => self.parse_class_item(&mut items)?,
            }
        }

        Ok(Expr::char_class(negated, items))
    }

    /// Parse one class atom or range, pushing the resulting items
    fn parse_class_item(&mut self, items: &mut Vec<ClassItem>) -> Result<()> {
        let start = self.parse_class_atom()?;

        let is_dash = *self.current() == Token::Literal('-');
        let next_closes = matches!(
            self.tokens.get(self.index + 1).map(|t| &t.token),
            Some(Token::RightBracket) | None
        );
        if !is_dash || next_closes {
            items.push(Self::class_item(start));
            return Ok(());
        }

        self.advance(); // consume '-'
        let end = self.parse_class_atom()?;
        match (start, end) {
            (ClassAtom::Char(from), ClassAtom::Char(to)) => {
                if from > to {
                    return Err(self.error(ParseError::RangeOutOfOrder));
                }
                items.push(ClassItem::Range(from, to));
            }
            _ if self.unicode => return Err(self.error(ParseError::InvalidClassRange)),
            (start, end) => {
                // `[\d-z]` outside unicode mode is a union with a literal dash
                items.push(Self::class_item(start));
                items.push(ClassItem::Char('-'));
                items.push(Self::class_item(end));
            }
        }
        Ok(())
    }

    fn class_item(atom: ClassAtom) -> ClassItem {
        match atom {
            ClassAtom::Char(c) => ClassItem::Char(c),
            ClassAtom::Set(item) => item,
        }
    }

    fn parse_class_atom(&mut self) -> Result<ClassAtom> {
        let atom = match self.current().clone() {
            Token::Escape('k') if self.has_named_groups => {
                return Err(self.error(ParseError::InvalidNamedReference));
            }
            Token::Literal(c) | Token::Escape(c) => ClassAtom::Char(c),
            Token::Property { name, negated } => {
                ClassAtom::Set(ClassItem::Property { name, negated })
            }
            token => match token.shorthand() {
                Some(c) => ClassAtom::Set(ClassItem::Shorthand(c)),
                None => return Err(self.unexpected("class member")),
            },
        };
        self.advance();
        Ok(atom)
    }
}

/// Parse a pattern in the default (non-unicode) mode
pub fn parse(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}

/// Parse a pattern, strict when `unicode` is set
pub fn parse_with_mode(input: &str, unicode: bool) -> Result<Expr> {
    Parser::with_mode(input, unicode)?.parse()
}
