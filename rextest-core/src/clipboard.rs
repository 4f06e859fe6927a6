//! Copying results to the system clipboard
//!
//! The core never talks to a clipboard itself. Front ends provide a
//! [`ClipboardSink`] and report any failure; the view state is unaffected.

use crate::view::ViewState;
use thiserror::Error;

/// Errors from a clipboard write
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The view has no matches or output to copy
    #[error("nothing to copy")]
    NothingToCopy,

    /// No clipboard is available on this system
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard rejected the write
    #[error("failed to write clipboard: {0}")]
    Write(String),
}

/// Something that can receive text, usually the system clipboard
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A sink that keeps the last write in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The text a copy action would place on the clipboard: matched texts one
/// per line in match mode, the output in replace mode.
pub fn copy_text(state: &ViewState) -> Option<String> {
    match state {
        ViewState::Match(view) if !view.is_empty() => Some(
            view.matches
                .matches
                .iter()
                .map(|m| m.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        ViewState::Replace(view) => Some(view.output.clone()),
        _ => None,
    }
}

/// Copy the current results to `sink`, returning the number of bytes written
pub fn copy_view(state: &ViewState, sink: &mut impl ClipboardSink) -> Result<usize, ClipboardError> {
    let text = copy_text(state).ok_or(ClipboardError::NothingToCopy)?;
    sink.write_text(&text)?;
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagSet;
    use crate::view::{Inputs, PatternSpec, ViewMode, compute_match_state};

    struct Broken;

    impl ClipboardSink for Broken {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }
    }

    fn state(pattern: &str, flags: &str, subject: &str, mode: ViewMode) -> ViewState {
        let flags: FlagSet = flags.parse().unwrap();
        compute_match_state(&Inputs {
            spec: PatternSpec::new(pattern, flags),
            subject: subject.to_string(),
            template: "[$&]".to_string(),
            mode,
        })
    }

    #[test]
    fn test_copy_matches_one_per_line() {
        let mut sink = MemoryClipboard::default();
        let written = copy_view(&state("\\d+", "g", "a1 b22", ViewMode::Match), &mut sink).unwrap();
        assert_eq!(sink.contents.as_deref(), Some("1\n22"));
        assert_eq!(written, 4);
    }

    #[test]
    fn test_copy_replacement_output() {
        let mut sink = MemoryClipboard::default();
        copy_view(&state("b", "", "abc", ViewMode::Replace), &mut sink).unwrap();
        assert_eq!(sink.contents.as_deref(), Some("a[b]c"));
    }

    #[test]
    fn test_nothing_to_copy() {
        let mut sink = MemoryClipboard::default();
        assert_eq!(
            copy_view(&ViewState::Idle, &mut sink),
            Err(ClipboardError::NothingToCopy)
        );
        assert_eq!(
            copy_view(&state("x", "g", "abc", ViewMode::Match), &mut sink),
            Err(ClipboardError::NothingToCopy)
        );
        assert_eq!(sink.contents, None);
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let view = state("a", "g", "aa", ViewMode::Match);
        let err = copy_view(&view, &mut Broken).unwrap_err();
        assert_eq!(err.to_string(), "clipboard unavailable: no display");
    }
}
