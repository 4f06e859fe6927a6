//! Error types for the regex engine
//!
//! Errors are categorized by their source: lexing, parsing, flag parsing,
//! group registration, or compilation. Every variant renders to the
//! diagnostic message shown to the user when a pattern fails to compile.

use crate::flags::FlagError;
use crate::groups::GroupRegistryError;
use thiserror::Error;

/// The main error type for the regex engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexError {
    /// Errors that occur during lexing/tokenization
    #[error("lexer error at position {position}: {kind}")]
    Lexer {
        /// Position (in characters) in the pattern where the error occurred
        position: usize,
        /// The specific kind of lexer error
        kind: LexerErrorKind,
    },

    /// Errors that occur during parsing
    #[error("parse error at position {position}: {kind}")]
    Parse {
        /// Position (in characters) in the pattern where the error occurred
        position: usize,
        /// The specific kind of parse error
        kind: ParseError,
    },

    /// The flag string could not be parsed
    #[error(transparent)]
    Flags(#[from] FlagError),

    /// Capture group names or named references are inconsistent
    #[error("{0}")]
    Groups(#[from] GroupRegistryError),

    /// Errors that occur while building the automaton
    #[error("compilation error: {0}")]
    Compile(String),
}

impl RegexError {
    /// Position in the pattern the error points at, if it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            RegexError::Lexer { position, .. } | RegexError::Parse { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    pub(crate) fn lexer(position: usize, kind: LexerErrorKind) -> Self {
        RegexError::Lexer { position, kind }
    }

    pub(crate) fn parse(position: usize, kind: ParseError) -> Self {
        RegexError::Parse { position, kind }
    }
}

/// Specific kinds of lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    /// A backslash at the very end of the pattern
    #[error("\\ at end of pattern")]
    TrailingBackslash,

    /// Unclosed character class (e.g., `[abc` without `]`)
    #[error("unterminated character class")]
    UnclosedCharacterClass,

    /// Invalid escape sequence
    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),

    /// Malformed `\u` escape
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,

    /// Malformed `\x` escape
    #[error("invalid hexadecimal escape")]
    InvalidHexEscape,

    /// Invalid group name
    #[error("invalid capture group name '{0}'")]
    InvalidGroupName(String),

    /// `(?` followed by something that is not a known group kind
    #[error("invalid group")]
    InvalidGroup,

    /// A `{`, `}` or `]` that does not belong to any construct (unicode mode)
    #[error("lone quantifier brackets")]
    LoneQuantifierBracket,

    /// Unknown `\p{...}` property
    #[error("invalid property name '{0}'")]
    InvalidPropertyName(String),
}

/// Errors that occur during parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected
        expected: String,
        /// What was actually found
        found: String,
    },

    /// A `(` without its `)`
    #[error("unterminated group")]
    UnterminatedGroup,

    /// A `)` without its `(`
    #[error("unmatched ')'")]
    UnmatchedParen,

    /// A quantifier with nothing to repeat
    #[error("nothing to repeat")]
    NothingToRepeat,

    /// `{n,m}` with `n > m`
    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder,

    /// `[z-a]`
    #[error("range out of order in character class")]
    RangeOutOfOrder,

    /// A shorthand class used as a range endpoint (unicode mode)
    #[error("invalid character class")]
    InvalidClassRange,

    /// A numeric back-reference to a group that does not exist (unicode mode)
    #[error("invalid escape '\\{0}'")]
    InvalidBackreference(u32),

    /// `\k<name>` in a pattern without named groups (unicode mode)
    #[error("invalid named reference")]
    InvalidNamedReference,
}

/// Char positions `start..end` of a token in the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// Result type alias for regex operations
pub type Result<T> = std::result::Result<T, RegexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = RegexError::Lexer {
            position: 5,
            kind: LexerErrorKind::InvalidEscape('q'),
        };
        assert_eq!(
            err.to_string(),
            "lexer error at position 5: invalid escape '\\q'"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = RegexError::parse(0, ParseError::UnterminatedGroup);
        assert_eq!(err.to_string(), "parse error at position 0: unterminated group");
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn test_parse_error_unexpected_token() {
        let err = ParseError::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "EOF".to_string(),
        };
        assert_eq!(err.to_string(), "expected `)`, found EOF");
    }

    #[test]
    fn test_quantifier_order_display() {
        assert_eq!(
            ParseError::QuantifierOutOfOrder.to_string(),
            "numbers out of order in {} quantifier"
        );
    }

    #[test]
    fn test_flags_error_is_transparent() {
        let err: RegexError = FlagError::Unknown('x').into();
        assert_eq!(err.to_string(), "invalid flag 'x'");
        assert_eq!(err.position(), None);
    }
}
