//! Regex matching engine with backreference and lookaround support
//!
//! This module provides the actual regex matching functionality: a
//! backtracking executor over the NFA. Transitions are tried in priority
//! order and every choice point is kept on an explicit stack, so the first
//! accepting path found is the leftmost-first match of the host dialect.
//!
//! Positions handed in and out are byte offsets into the subject. The
//! executor itself walks characters.

use crate::ast::ClassItem;
use crate::chars::{self, is_line_terminator};
use crate::error::{RegexError, Result};
use crate::flags::FlagSet;
use crate::groups::{GroupCollector, GroupRegistry};
use crate::matches::Matches;
use crate::nfa::{Nfa, StateId, Transition};
use crate::parser::parse_with_mode;
use std::collections::HashMap;
use tracing::debug;

/// Mode flags that change how transitions match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// Case insensitive matching (i)
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries (m)
    pub multiline: bool,
    /// Dot matches line terminators (s)
    pub dotall: bool,
    /// Unicode case folding (u)
    pub unicode: bool,
    /// Anchor every search at its start position (y)
    pub sticky: bool,
}

impl From<FlagSet> for ModeFlags {
    fn from(flags: FlagSet) -> Self {
        ModeFlags {
            case_insensitive: flags.ignore_case,
            multiline: flags.multiline,
            dotall: flags.dot_all,
            unicode: flags.unicode,
            sticky: flags.sticky,
        }
    }
}

/// A match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The start position of the match (byte offset)
    pub start: usize,
    /// The end position of the match (byte offset, exclusive)
    pub end: usize,
    /// Captured groups in declaration order; `None` when the group did not
    /// participate
    pub groups: Vec<Option<(usize, usize)>>,
    /// Participating named groups (name -> (start, end))
    pub named_groups: HashMap<String, (usize, usize)>,
}

impl Match {
    /// Get the matched text
    pub fn as_str<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// Whether the match consumed nothing
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get a capture group by index (1-based)
    pub fn group(&self, n: u32) -> Option<(usize, usize)> {
        let slot = usize::try_from(n).ok()?.checked_sub(1)?;
        self.groups.get(slot).copied().flatten()
    }

    /// Get a named capture group
    pub fn named_group(&self, name: &str) -> Option<(usize, usize)> {
        self.named_groups.get(name).copied()
    }

    /// Get the text of a capture group
    pub fn group_str<'a>(&self, input: &'a str, n: u32) -> Option<&'a str> {
        self.group(n).map(|(start, end)| &input[start..end])
    }

    /// Get the text of a named capture group
    pub fn named_group_str<'a>(&self, input: &'a str, name: &str) -> Option<&'a str> {
        self.named_group(name).map(|(start, end)| &input[start..end])
    }
}

/// A subject decoded once for repeated searches
pub(crate) struct Haystack {
    chars: Vec<char>,
    /// Byte offset of every character, plus the total length
    offsets: Vec<usize>,
}

impl Haystack {
    pub(crate) fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(text.len());
        Haystack {
            chars,
            offsets,
        }
    }

    /// Number of characters
    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Byte offset of character position `pos`
    pub(crate) fn byte_offset(&self, pos: usize) -> usize {
        self.offsets[pos.min(self.chars.len())]
    }

    /// Character position of byte offset `byte`, rounded up to the next
    /// character boundary
    pub(crate) fn char_index(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&offset| offset < byte)
    }
}

/// The regex engine
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    flags: FlagSet,
    mode: ModeFlags,
    nfa: Nfa,
    registry: GroupRegistry,
}

impl Regex {
    /// Compile a regex pattern under `flags`
    pub fn new(pattern: &str, flags: FlagSet) -> Result<Self> {
        let compiled = Self::compile(pattern, flags);
        match &compiled {
            Ok(regex) => debug!(
                pattern,
                flags = %flags,
                groups = regex.group_count(),
                states = regex.nfa.states.len(),
                "compiled pattern"
            ),
            Err(err) => debug!(pattern, flags = %flags, error = %err, "pattern failed to compile"),
        }
        compiled
    }

    /// Compile a regex pattern with a flag string such as `"gi"`
    pub fn with_flags(pattern: &str, flags: &str) -> Result<Self> {
        let flags: FlagSet = flags.parse().map_err(RegexError::Flags)?;
        Self::new(pattern, flags)
    }

    fn compile(pattern: &str, flags: FlagSet) -> Result<Self> {
        let ast = parse_with_mode(pattern, flags.unicode)?;
        let registry = GroupCollector::collect(&ast)?;
        let nfa = Nfa::from_expr(&ast, &registry)?;
        Ok(Regex {
            pattern: pattern.to_string(),
            flags,
            mode: ModeFlags::from(flags),
            nfa,
            registry,
        })
    }

    /// The pattern source
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The flags the pattern was compiled with
    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    /// The compiled automaton
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Number of capture groups
    pub fn group_count(&self) -> usize {
        self.registry.group_count()
    }

    /// The capture group registry
    pub fn groups(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Group names in declaration order, `None` for unnamed groups
    pub fn group_names(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.registry.groups().iter().map(|g| g.name.as_deref())
    }

    /// Check if the pattern matches anywhere in the input
    pub fn is_match(&self, input: &str) -> bool {
        self.find(input).is_some()
    }

    /// Find the first match in the input
    pub fn find(&self, input: &str) -> Option<Match> {
        self.exec_at(input, 0)
    }

    /// Search from byte offset `from`. With the sticky flag the match must
    /// start exactly there.
    pub fn exec_at(&self, input: &str, from: usize) -> Option<Match> {
        let hay = Haystack::new(input);
        let from = hay.char_index(from);
        self.exec_prepared(&hay, from)
    }

    /// Iterate over successive non-overlapping matches
    pub fn find_iter<'r>(&'r self, input: &str) -> Matches<'r> {
        Matches::new(self, input)
    }

    /// Search from character position `from` of a decoded subject
    pub(crate) fn exec_prepared(&self, hay: &Haystack, from: usize) -> Option<Match> {
        if from > hay.len() {
            return None;
        }
        let executor = Executor {
            nfa: &self.nfa,
            hay,
            mode: self.mode,
        };
        let mut caps = Captures::new(&self.nfa);
        let last = if self.mode.sticky { from } else { hay.len() };
        for start in from..=last {
            if let Some(end) = executor.run(&mut caps, self.nfa.start, self.nfa.accept, start, None)
            {
                return Some(self.build_match(hay, start, end, &caps));
            }
        }
        None
    }

    fn build_match(&self, hay: &Haystack, start: usize, end: usize, caps: &Captures) -> Match {
        let groups: Vec<Option<(usize, usize)>> = caps.slots[1..]
            .iter()
            .map(|slot| slot.map(|(s, e)| (hay.byte_offset(s), hay.byte_offset(e))))
            .collect();
        let named_groups = self
            .registry
            .groups()
            .iter()
            .filter_map(|info| {
                let name = info.name.clone()?;
                let span = groups.get(info.index as usize - 1).copied().flatten()?;
                Some((name, span))
            })
            .collect();
        Match {
            start: hay.byte_offset(start),
            end: hay.byte_offset(end),
            groups,
            named_groups,
        }
    }
}

/// Mutable capture state of one search
#[derive(Debug, Clone)]
struct Captures {
    /// Committed captures by group index; slot 0 is unused
    slots: Vec<Option<(usize, usize)>>,
    /// Start positions of groups that are currently open
    open: Vec<Option<usize>>,
    /// Start positions of the current iteration per repeat slot
    loops: Vec<usize>,
    /// Completed iterations per counted loop
    counters: Vec<u32>,
}

impl Captures {
    fn new(nfa: &Nfa) -> Self {
        Captures {
            slots: vec![None; nfa.group_count + 1],
            open: vec![None; nfa.group_count + 1],
            loops: vec![usize::MAX; nfa.loop_slots],
            counters: vec![0; nfa.counters],
        }
    }

    /// Set counter `counter`, pushing the frame that undoes it
    fn set_counter(&mut self, counter: usize, value: u32, stack: &mut Vec<Frame>) {
        stack.push(Frame::RestoreCounter {
            counter,
            value: self.counters[counter],
        });
        self.counters[counter] = value;
    }
}

/// An entry on the backtrack stack
enum Frame {
    /// Try transition `next` of `state` at `pos`
    Step {
        state: StateId,
        pos: usize,
        next: usize,
    },
    RestoreCapture {
        group: usize,
        value: Option<(usize, usize)>,
    },
    RestoreOpen {
        group: usize,
        value: Option<usize>,
    },
    RestoreLoop {
        slot: usize,
        value: usize,
    },
    RestoreCounter {
        counter: usize,
        value: u32,
    },
    /// Undo everything a successful lookaround captured
    RestoreSlots(Vec<Option<(usize, usize)>>),
}

struct Executor<'a> {
    nfa: &'a Nfa,
    hay: &'a Haystack,
    mode: ModeFlags,
}

impl Executor<'_> {
    /// Run from `entry` at `pos` until `accept` is reached (at `required_end`
    /// when given). Returns the end position. On failure `caps` is left as
    /// it was on entry.
    fn run(
        &self,
        caps: &mut Captures,
        entry: StateId,
        accept: StateId,
        pos: usize,
        required_end: Option<usize>,
    ) -> Option<usize> {
        let mut stack = vec![Frame::Step {
            state: entry,
            pos,
            next: 0,
        }];

        while let Some(frame) = stack.pop() {
            let (state, pos, next) = match frame {
                Frame::Step { state, pos, next } => (state, pos, next),
                Frame::RestoreCapture { group, value } => {
                    caps.slots[group] = value;
                    continue;
                }
                Frame::RestoreOpen { group, value } => {
                    caps.open[group] = value;
                    continue;
                }
                Frame::RestoreLoop { slot, value } => {
                    caps.loops[slot] = value;
                    continue;
                }
                Frame::RestoreCounter { counter, value } => {
                    caps.counters[counter] = value;
                    continue;
                }
                Frame::RestoreSlots(slots) => {
                    caps.slots = slots;
                    continue;
                }
            };

            if state == accept {
                if required_end.is_none_or(|end| end == pos) {
                    return Some(pos);
                }
                continue;
            }

            let transitions = &self.nfa.states[state].transitions;
            let Some((transition, target)) = transitions.get(next) else {
                continue;
            };
            if next + 1 < transitions.len() {
                stack.push(Frame::Step {
                    state,
                    pos,
                    next: next + 1,
                });
            }
            if let Some(new_pos) = self.step(transition, caps, pos, &mut stack) {
                stack.push(Frame::Step {
                    state: *target,
                    pos: new_pos,
                    next: 0,
                });
            }
        }

        None
    }

    /// Take one transition at `pos`, returning the new position. Any state
    /// change pushes the frame that undoes it.
    fn step(
        &self,
        transition: &Transition,
        caps: &mut Captures,
        pos: usize,
        stack: &mut Vec<Frame>,
    ) -> Option<usize> {
        match transition {
            Transition::Char(expected) => {
                let c = self.hay.char_at(pos)?;
                self.chars_equal(*expected, c).then_some(pos + 1)
            }
            Transition::Any => {
                let c = self.hay.char_at(pos)?;
                (self.mode.dotall || !is_line_terminator(c)).then_some(pos + 1)
            }
            Transition::CharClass { negated, items } => {
                let c = self.hay.char_at(pos)?;
                (self.class_matches(items, c) != *negated).then_some(pos + 1)
            }
            Transition::Epsilon => Some(pos),
            Transition::GroupStart(group) => {
                let group = *group as usize;
                stack.push(Frame::RestoreOpen {
                    group,
                    value: caps.open[group],
                });
                caps.open[group] = Some(pos);
                Some(pos)
            }
            Transition::GroupEnd(group) => {
                let group = *group as usize;
                let start = caps.open[group]?;
                stack.push(Frame::RestoreCapture {
                    group,
                    value: caps.slots[group],
                });
                caps.slots[group] = Some((start, pos));
                Some(pos)
            }
            Transition::Backref(group) => {
                // A group that has not participated matches the empty string
                let Some((start, end)) = caps.slots.get(*group as usize).copied().flatten() else {
                    return Some(pos);
                };
                let len = end - start;
                if pos + len > self.hay.len() {
                    return None;
                }
                let equal = (0..len)
                    .all(|i| self.chars_equal(self.hay.chars[start + i], self.hay.chars[pos + i]));
                equal.then_some(pos + len)
            }
            Transition::StartAnchor => {
                let at_start = pos == 0
                    || (self.mode.multiline && is_line_terminator(self.hay.chars[pos - 1]));
                at_start.then_some(pos)
            }
            Transition::EndAnchor => {
                let at_end = pos == self.hay.len()
                    || (self.mode.multiline && is_line_terminator(self.hay.chars[pos]));
                at_end.then_some(pos)
            }
            Transition::WordBoundary => self.is_word_boundary(pos).then_some(pos),
            Transition::NonWordBoundary => (!self.is_word_boundary(pos)).then_some(pos),
            Transition::ResetGroups(lo, hi) => {
                for group in *lo as usize..=*hi as usize {
                    if caps.slots[group].is_some() {
                        stack.push(Frame::RestoreCapture {
                            group,
                            value: caps.slots[group],
                        });
                        caps.slots[group] = None;
                    }
                }
                Some(pos)
            }
            Transition::RepeatEnter(slot) => {
                stack.push(Frame::RestoreLoop {
                    slot: *slot,
                    value: caps.loops[*slot],
                });
                caps.loops[*slot] = pos;
                Some(pos)
            }
            Transition::RepeatCheck(slot) => (caps.loops[*slot] != pos).then_some(pos),
            Transition::CounterInit(counter) => {
                caps.set_counter(*counter, 0, stack);
                Some(pos)
            }
            Transition::CounterBelow(counter, bound) => {
                bound.is_none_or(|bound| caps.counters[*counter] < bound).then_some(pos)
            }
            Transition::CounterAtLeast(counter, bound) => {
                (caps.counters[*counter] >= *bound).then_some(pos)
            }
            Transition::CounterIncrement(counter) => {
                let next = caps.counters[*counter].saturating_add(1);
                caps.set_counter(*counter, next, stack);
                Some(pos)
            }
            Transition::CounterCheck { counter, slot, min } => {
                if caps.loops[*slot] != pos {
                    return Some(pos);
                }
                if caps.counters[*counter] > *min {
                    return None;
                }
                // The remaining mandatory iterations would match empty the
                // same way
                caps.set_counter(*counter, *min, stack);
                Some(pos)
            }
            Transition::Look {
                kind,
                start,
                accept,
            } => {
                let snapshot = caps.slots.clone();
                let matched = if kind.is_behind() {
                    (0..=pos).any(|from| self.run(caps, *start, *accept, from, Some(pos)).is_some())
                } else {
                    self.run(caps, *start, *accept, pos, None).is_some()
                };
                match (matched, kind.is_negative()) {
                    (true, false) => {
                        stack.push(Frame::RestoreSlots(snapshot));
                        Some(pos)
                    }
                    (true, true) => {
                        caps.slots = snapshot;
                        None
                    }
                    (false, false) => None,
                    (false, true) => Some(pos),
                }
            }
        }
    }

    fn chars_equal(&self, a: char, b: char) -> bool {
        a == b
            || (self.mode.case_insensitive
                && chars::canonicalize(a, self.mode.unicode)
                    == chars::canonicalize(b, self.mode.unicode))
    }

    fn class_matches(&self, items: &[ClassItem], c: char) -> bool {
        if !self.mode.case_insensitive {
            return items.iter().any(|item| item_matches(item, c, false));
        }
        let fold_words = self.mode.unicode;
        let canonical = chars::canonicalize(c, self.mode.unicode);
        chars::case_variants(c, self.mode.unicode)
            .filter(|v| chars::canonicalize(*v, self.mode.unicode) == canonical)
            .any(|v| items.iter().any(|item| item_matches(item, v, fold_words)))
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        let is_word = |c: char| {
            chars::is_word_char_folded(c, self.mode.unicode, self.mode.case_insensitive)
        };
        let before = pos > 0 && is_word(self.hay.chars[pos - 1]);
        let after = self.hay.char_at(pos).is_some_and(is_word);
        before != after
    }
}

/// `fold_words` widens `\w`/`\W` to the case-folded word set
fn item_matches(item: &ClassItem, c: char, fold_words: bool) -> bool {
    match item {
        ClassItem::Char(x) => *x == c,
        ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
        ClassItem::Shorthand('w') => chars::is_word_char_folded(c, fold_words, fold_words),
        ClassItem::Shorthand('W') => !chars::is_word_char_folded(c, fold_words, fold_words),
        ClassItem::Shorthand(s) => chars::shorthand_matches(*s, c),
        ClassItem::Property { name, negated } => {
            chars::property_matches(name, c).unwrap_or(false) != *negated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern, FlagSet::new()).unwrap()
    }

    fn re_flags(pattern: &str, flags: &str) -> Regex {
        Regex::with_flags(pattern, flags).unwrap()
    }

    fn span(regex: &Regex, input: &str) -> Option<(usize, usize)> {
        regex.find(input).map(|m| (m.start, m.end))
    }

    #[test]
    fn test_regex_literal_match() {
        let regex = re("abc");
        assert!(regex.is_match("abc"));
        assert!(regex.is_match("xabcy"));
        assert!(!regex.is_match("ab"));
        assert!(!regex.is_match("xyz"));
    }

    #[test]
    fn test_regex_alternation_prefers_first() {
        assert_eq!(span(&re("a|ab"), "ab"), Some((0, 1)));
        assert_eq!(span(&re("ab|a"), "ab"), Some((0, 2)));
    }

    #[test]
    fn test_greedy_and_lazy() {
        assert_eq!(span(&re("a+"), "baaa"), Some((1, 4)));
        assert_eq!(span(&re("a+?"), "baaa"), Some((1, 2)));
        assert_eq!(span(&re("<.*>"), "<a><b>"), Some((0, 6)));
        assert_eq!(span(&re("<.*?>"), "<a><b>"), Some((0, 3)));
        assert_eq!(span(&re("a{2,3}"), "aaaa"), Some((0, 3)));
        assert_eq!(span(&re("a{2,3}?"), "aaaa"), Some((0, 2)));
    }

    #[test]
    fn test_star_matches_empty_at_start() {
        assert_eq!(span(&re("a*"), "baaa"), Some((0, 0)));
    }

    #[test]
    fn test_regex_dot_and_dotall() {
        assert!(!re("a.b").is_match("a\nb"));
        assert!(!re("a.b").is_match("a\u{2028}b"));
        assert!(re_flags("a.b", "s").is_match("a\nb"));
        assert!(re("a.b").is_match("a b"));
    }

    #[test]
    fn test_groups_capture_last_iteration() {
        let input = "abcd";
        let m = re("(\\w)+").find(input).unwrap();
        assert_eq!(m.group_str(input, 1), Some("d"));
    }

    #[test]
    fn test_captures_reset_each_iteration() {
        let input = "ab";
        let m = re("(?:(a)|b)+").find(input).unwrap();
        assert_eq!(m.as_str(input), "ab");
        assert_eq!(m.group(1), None);
    }

    #[test]
    fn test_non_participating_group() {
        let input = "b";
        let m = re("(a)?b").find(input).unwrap();
        assert_eq!(m.group(1), None);
        assert_eq!(m.groups.len(), 1);
    }

    #[test]
    fn test_backreference() {
        let regex = re("(\\w)\\1");
        assert_eq!(span(&regex, "abccd"), Some((2, 4)));
        // A reference to a group that did not participate matches empty
        assert_eq!(span(&re("(a)?\\1b"), "b"), Some((0, 1)));
    }

    #[test]
    fn test_named_groups() {
        let input = "2024-05";
        let m = re("(?<year>\\d{4})-(?<month>\\d\\d)").find(input).unwrap();
        assert_eq!(m.named_group_str(input, "year"), Some("2024"));
        assert_eq!(m.named_group_str(input, "month"), Some("05"));
        assert_eq!(m.group_str(input, 2), Some("05"));
        assert!(re("(?<a>x)\\k<a>").is_match("xx"));
    }

    #[test]
    fn test_empty_iterations_are_rejected() {
        // (a*)* must not loop forever and the outer group ends after "aa"
        let input = "aab";
        let m = re("(a*)*b").find(input).unwrap();
        assert_eq!(m.as_str(input), "aab");
        assert_eq!(re("(?:)*").find("x").map(|m| (m.start, m.end)), Some((0, 0)));
    }

    #[test]
    fn test_anchors_and_multiline() {
        assert_eq!(span(&re("^b"), "a\nb"), None);
        assert_eq!(span(&re_flags("^b", "m"), "a\nb"), Some((2, 3)));
        assert_eq!(span(&re("a$"), "a\nb"), None);
        assert_eq!(span(&re_flags("a$", "m"), "a\nb"), Some((0, 1)));
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(span(&re("\\bcat\\b"), "concat cat"), Some((7, 10)));
        assert_eq!(span(&re("\\Bcat"), "cat concat"), Some((7, 10)));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(re_flags("HELLO", "i").is_match("hello"));
        assert!(re_flags("[a-z]+", "i").is_match("ABC"));
        assert!(re_flags("(a)\\1", "i").is_match("aA"));
        assert!(!re("HELLO").is_match("hello"));
        // Non-ASCII characters never fold into ASCII outside unicode mode
        assert!(!re_flags("s", "i").is_match("\u{17F}"));
    }

    #[test]
    fn test_unicode_case_folding() {
        assert!(re_flags("s", "iu").is_match("\u{17F}"));
        assert!(re_flags("[\u{17F}]", "iu").is_match("S"));
        assert!(re_flags("[a-z]", "iu").is_match("\u{17F}"));
        assert!(re_flags("\u{3C3}", "iu").is_match("\u{3C2}"));
        assert!(!re_flags("\\W", "iu").is_match("\u{17F}"));
        assert!(re_flags("\\W", "i").is_match("\u{17F}"));
    }

    #[test]
    fn test_word_boundary_with_folded_word_chars() {
        let subject = "\u{17F}bA\u{E9}{}1";
        assert_eq!(span(&re_flags("\\b", "iu"), subject), Some((0, 0)));
        assert_eq!(span(&re_flags("\\b", "i"), subject), Some((2, 2)));
        assert_eq!(span(&re_flags("\\b", "u"), subject), Some((2, 2)));
    }

    #[test]
    fn test_lookahead() {
        assert_eq!(span(&re("a(?=b)"), "acab"), Some((2, 3)));
        assert_eq!(span(&re("a(?!b)"), "abac"), Some((2, 3)));
        // Captures inside a positive lookahead are kept
        let input = "abc";
        let m = re("(?=(\\w+))a").find(input).unwrap();
        assert_eq!(m.group_str(input, 1), Some("abc"));
    }

    #[test]
    fn test_lookbehind() {
        assert_eq!(span(&re("(?<=\\$)\\d+"), "cost: $42"), Some((7, 9)));
        assert_eq!(span(&re("(?<!\\$)\\b\\d+"), "$42 17"), Some((4, 6)));
    }

    #[test]
    fn test_sticky_anchors_search() {
        let regex = re_flags("b", "y");
        assert!(regex.exec_at("ab", 0).is_none());
        assert_eq!(regex.exec_at("ab", 1).map(|m| m.start), Some(1));
    }

    #[test]
    fn test_byte_offsets_with_multibyte_text() {
        let input = "héllo wörld";
        let m = re("w\\w*").find(input);
        // \w is ASCII only, so the match stops before 'ö'
        assert_eq!(m.map(|m| (m.start, m.end)), Some((7, 8)));
        let m = re("ö").find(input).unwrap();
        assert_eq!(m.as_str(input), "ö");
    }

    #[test]
    fn test_exec_at_past_end() {
        assert!(re("").exec_at("ab", 2).is_some());
        assert!(re("").exec_at("ab", 3).is_none());
    }

    #[test]
    fn test_unicode_property() {
        let regex = re_flags("\\p{Lu}+", "u");
        let input = "abcÉTÉ";
        assert_eq!(regex.find(input).map(|m| m.as_str(input)), Some("ÉTÉ"));
    }

    #[test]
    fn test_compile_errors() {
        assert!(Regex::new("(", FlagSet::new()).is_err());
        assert!(Regex::new("[", FlagSet::new()).is_err());
        assert!(matches!(
            Regex::with_flags("a", "gq"),
            Err(RegexError::Flags(_))
        ));
        assert!(matches!(
            Regex::new("(?<a>x)(?<a>y)", FlagSet::new()),
            Err(RegexError::Groups(_))
        ));
    }

    #[test]
    fn test_metadata() {
        let regex = re_flags("(a)(?<n>b)", "gi");
        assert_eq!(regex.pattern(), "(a)(?<n>b)");
        assert_eq!(regex.flags().to_flag_string(), "gi");
        assert_eq!(regex.group_count(), 2);
        assert_eq!(regex.group_names().collect::<Vec<_>>(), vec![None, Some("n")]);
    }

    #[test]
    fn test_haystack_offsets() {
        let hay = Haystack::new("aé");
        assert_eq!(hay.len(), 2);
        assert_eq!(hay.byte_offset(1), 1);
        assert_eq!(hay.byte_offset(2), 3);
        assert_eq!(hay.char_index(1), 1);
        assert_eq!(hay.char_index(2), 2);
        assert_eq!(hay.char_index(3), 2);
        assert_eq!(hay.char_index(4), 3);
    }
}
