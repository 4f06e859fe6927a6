//! Rextest Core Library
//!
//! The engine behind a pattern match/replace workbench: an ECMAScript
//! flavoured regex compiler and matcher, match enumeration, `$` replacement
//! templates and highlight projection, tied together by a pure pipeline from
//! inputs to displayed state.

pub mod ast;
mod chars;
pub mod clipboard;
pub mod engine;
pub mod error;
pub mod flags;
pub mod groups;
pub mod highlight;
pub mod inspect;
pub mod lexer;
pub mod matches;
pub mod nfa;
pub mod parser;
pub mod replace;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::Expr;
pub use clipboard::{ClipboardError, ClipboardSink, MemoryClipboard, copy_text, copy_view};
pub use engine::{Match, Regex};
pub use error::{LexerErrorKind, ParseError, RegexError, Result, Span};
pub use flags::{Flag, FlagError, FlagSet};
pub use groups::{GroupCollector, GroupInfo, GroupRegistry, GroupRegistryError};
pub use highlight::{Highlight, HighlightSegment};
pub use inspect::{PatternReport, inspect};
pub use lexer::{Lexer, Token};
pub use matches::{GroupRecord, MatchList, MatchRecord, Matches, enumerate};
pub use nfa::{Nfa, State, StateId, Transition};
pub use parser::{Parser, parse, parse_with_mode};
pub use replace::{Rendered, Replacement, ReplacementPart, render};
pub use view::{
    CompileFailure, Inputs, MatchViewState, PatternSpec, ReplaceViewState, ViewMode, ViewState,
    Workbench, compute_match_state,
};

/// Compile `pattern` with a flag string such as `"gi"`
///
/// # Example
/// ```
/// let re = rextest_core::compile("(\\w+)@(\\w+)", "").unwrap();
/// let m = re.find("user@host").unwrap();
/// assert_eq!(m.group_str("user@host", 2), Some("host"));
/// ```
pub fn compile(pattern: &str, flags: &str) -> Result<Regex> {
    Regex::with_flags(pattern, flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let state = compute_match_state(&Inputs {
            spec: PatternSpec::new("(\\w+)@(\\w+)", FlagSet::new()),
            subject: "mail user@host now".to_string(),
            template: String::new(),
            mode: ViewMode::Match,
        });
        let ViewState::Match(view) = state else {
            panic!("expected match state");
        };
        assert_eq!(view.matches.matches[0].text, "user@host");
        assert_eq!(view.segments.len(), 3);
    }

    #[test]
    fn test_compile_with_flag_string() {
        assert!(compile("A", "i").unwrap().is_match("a"));
        assert!(matches!(compile("a", "gg"), Err(RegexError::Flags(_))));
    }
}
