//! Match enumeration
//!
//! Walks a compiled pattern over a subject and flattens every match and
//! participating capture group into plain records for display.

use crate::engine::{Haystack, Match, Regex};
use tracing::trace;

/// One match of the pattern in the subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The matched text
    pub text: String,
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset just past the match
    pub end: usize,
}

impl MatchRecord {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A participating capture group of one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Index of the owning match in [`MatchList::matches`]
    pub match_index: usize,
    /// 1-based capture index
    pub index: u32,
    /// Group name, for named groups
    pub name: Option<String>,
    /// The captured text
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Matches in left-to-right order, and their groups in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchList {
    pub matches: Vec<MatchRecord>,
    pub groups: Vec<GroupRecord>,
}

impl MatchList {
    /// No match was found
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Groups belonging to match `match_index`
    pub fn groups_for(&self, match_index: usize) -> impl Iterator<Item = &GroupRecord> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.match_index == match_index)
    }
}

/// Iterator over successive matches, created by [`Regex::find_iter`].
///
/// Each search resumes where the previous match ended. After a zero-length
/// match the next search starts one character later, so the iterator always
/// terminates. With the sticky flag the iterator stops at the first position
/// where the anchored search fails.
pub struct Matches<'r> {
    regex: &'r Regex,
    hay: Haystack,
    /// Character position of the next search; `None` once exhausted
    next: Option<usize>,
}

impl<'r> Matches<'r> {
    pub(crate) fn new(regex: &'r Regex, text: &str) -> Self {
        Matches {
            regex,
            hay: Haystack::new(text),
            next: Some(0),
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let from = self.next?;
        let Some(found) = self.regex.exec_prepared(&self.hay, from) else {
            self.next = None;
            return None;
        };
        let end = self.hay.char_index(found.end);
        let resume = if found.is_empty() { end + 1 } else { end };
        self.next = (resume <= self.hay.len()).then_some(resume);
        Some(found)
    }
}

/// Enumerate matches of `regex` in `subject`.
///
/// With `global` every non-overlapping match is returned; otherwise at most
/// the first. The global bit is taken from the caller, not the regex, so a
/// compiled pattern can serve both modes.
pub fn enumerate(regex: &Regex, subject: &str, global: bool) -> MatchList {
    let found: Vec<Match> = if global {
        regex.find_iter(subject).collect()
    } else {
        regex.find(subject).into_iter().collect()
    };
    trace!(
        pattern = regex.pattern(),
        global,
        matches = found.len(),
        "enumerated matches"
    );

    let mut list = MatchList::default();
    for (match_index, m) in found.iter().enumerate() {
        list.matches.push(MatchRecord {
            text: m.as_str(subject).to_string(),
            start: m.start,
            end: m.end,
        });
        for (slot, span) in m.groups.iter().enumerate() {
            let Some((start, end)) = *span else {
                continue;
            };
            let index = slot as u32 + 1;
            list.groups.push(GroupRecord {
                match_index,
                index,
                name: regex.groups().name_of(index).map(str::to_string),
                text: subject[start..end].to_string(),
                start,
                end,
            });
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagSet;

    fn spans(pattern: &str, flags: &str, subject: &str) -> Vec<(usize, usize)> {
        let regex = Regex::with_flags(pattern, flags).unwrap();
        enumerate(&regex, subject, regex.flags().global)
            .matches
            .iter()
            .map(|m| (m.start, m.end))
            .collect()
    }

    #[test]
    fn test_global_literal() {
        assert_eq!(spans("a", "g", "aaa"), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_non_global_returns_first_only() {
        assert_eq!(spans("a", "", "aaa"), vec![(0, 1)]);
        assert!(spans("x", "", "aaa").is_empty());
    }

    #[test]
    fn test_zero_length_matches_advance() {
        assert_eq!(
            spans("a*", "g", "baa"),
            vec![(0, 0), (1, 3), (3, 3)]
        );
        assert_eq!(
            spans("", "g", "ab"),
            vec![(0, 0), (1, 1), (2, 2)]
        );
    }

    #[test]
    fn test_zero_length_advance_steps_over_whole_characters() {
        // 'é' is two bytes; the empty pattern still matches once per boundary
        assert_eq!(spans("", "g", "é"), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn test_global_sticky_stops_at_first_gap() {
        assert_eq!(spans("a", "gy", "aaba"), vec![(0, 1), (1, 2)]);
        assert!(spans("a", "y", "ba").is_empty());
    }

    #[test]
    fn test_groups_skip_non_participating() {
        let regex = Regex::new("(a)|(b)", FlagSet::new().with(crate::flags::Flag::Global, true))
            .unwrap();
        let list = enumerate(&regex, "ab", true);
        assert_eq!(list.len(), 2);
        assert_eq!(list.groups.len(), 2);
        assert_eq!((list.groups[0].match_index, list.groups[0].index), (0, 1));
        assert_eq!((list.groups[1].match_index, list.groups[1].index), (1, 2));
        assert_eq!(list.groups_for(1).count(), 1);
    }

    #[test]
    fn test_email_groups() {
        let regex = Regex::new("(\\w+)@(\\w+)", FlagSet::new()).unwrap();
        let list = enumerate(&regex, "user@host", false);
        assert_eq!(list.matches.len(), 1);
        assert_eq!(list.matches[0].text, "user@host");
        let texts: Vec<_> = list.groups.iter().map(|g| (g.index, g.text.as_str())).collect();
        assert_eq!(texts, vec![(1, "user"), (2, "host")]);
    }

    #[test]
    fn test_named_group_records_carry_name() {
        let regex = Regex::new("(?<word>\\w+)", FlagSet::new()).unwrap();
        let list = enumerate(&regex, "hi", false);
        assert_eq!(list.groups[0].name.as_deref(), Some("word"));
    }

    #[test]
    fn test_find_iter_matches_enumerate() {
        let regex = Regex::new("\\d+", FlagSet::new()).unwrap();
        let found: Vec<_> = regex.find_iter("a1b22c333").map(|m| (m.start, m.end)).collect();
        assert_eq!(found, vec![(1, 2), (3, 5), (6, 9)]);
    }
}
