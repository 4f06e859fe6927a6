//! Highlight projection
//!
//! Maps match records onto the subject, one classification per character,
//! and coalesces the result into runs for renderers.

use crate::matches::MatchRecord;

/// Classification of one subject character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Matched,
    Plain,
}

/// A maximal run of characters with the same classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSegment {
    pub kind: Highlight,
    pub text: String,
    /// Byte offset of the run start
    pub start: usize,
    /// Byte offset just past the run
    pub end: usize,
}

/// Classify every character of `subject`: `Matched` when its byte offset
/// lies inside at least one record's `[start, end)`.
///
/// Records may come in any order; overlapping or touching records neither
/// leave gaps nor count twice.
pub fn project(subject: &str, matches: &[MatchRecord]) -> Vec<Highlight> {
    let mut spans: Vec<(usize, usize)> = matches
        .iter()
        .filter(|m| m.start < m.end)
        .map(|m| (m.start, m.end))
        .collect();
    spans.sort_unstable();

    let mut next = 0;
    let mut covered_until = 0;
    subject
        .char_indices()
        .map(|(offset, _)| {
            while next < spans.len() && spans[next].0 <= offset {
                covered_until = covered_until.max(spans[next].1);
                next += 1;
            }
            if offset < covered_until {
                Highlight::Matched
            } else {
                Highlight::Plain
            }
        })
        .collect()
}

/// The projection of `matches` as runs of equal classification
pub fn segments(subject: &str, matches: &[MatchRecord]) -> Vec<HighlightSegment> {
    let classes = project(subject, matches);
    let mut runs: Vec<HighlightSegment> = Vec::new();

    for ((offset, c), kind) in subject.char_indices().zip(classes) {
        match runs.last_mut() {
            Some(run) if run.kind == kind => {
                run.text.push(c);
                run.end = offset + c.len_utf8();
            }
            _ => runs.push(HighlightSegment {
                kind,
                text: c.to_string(),
                start: offset,
                end: offset + c.len_utf8(),
            }),
        }
    }
    runs
}
