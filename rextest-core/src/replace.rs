//! Replacement string handling
//!
//! Templates use the host dialect's `$` substitutions:
//! - `$$` for a literal dollar sign
//! - `$&` for the entire match
//! - `` $` `` and `$'` for the text before and after the match
//! - `$1` to `$99` for numbered groups
//! - `$<name>` for named groups
//!
//! Anything that does not form a valid substitution is copied literally, so
//! parsing a template never fails.

use crate::engine::{Match, Regex};
use crate::groups::GroupRegistry;
use tracing::trace;

/// A part of a replacement string
#[derive(Debug, Clone, PartialEq)]
pub enum ReplacementPart {
    /// Literal text
    Literal(String),
    /// Numbered group (`$1`, `$12`)
    Group(u32),
    /// Named group (`$<name>`)
    NamedGroup(String),
    /// Entire match (`$&`)
    EntireMatch,
    /// Subject text before the match (`` $` ``)
    Prefix,
    /// Subject text after the match (`$'`)
    Suffix,
}

/// A parsed replacement string
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    parts: Vec<ReplacementPart>,
}

impl Replacement {
    /// Parse a replacement template against the groups of a pattern.
    ///
    /// `$n` and `$nn` only refer to groups that exist; the two-digit form
    /// wins when both would. `$<` is literal when the pattern has no named
    /// groups.
    pub fn parse(template: &str, registry: &GroupRegistry) -> Self {
        let chars: Vec<char> = template.chars().collect();
        let group_count = registry.group_count() as u32;
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c != '$' {
                literal.push(c);
                i += 1;
                continue;
            }

            let (part, consumed) = match chars.get(i + 1) {
                Some('$') => (ReplacementPart::Literal("$".to_string()), 2),
                Some('&') => (ReplacementPart::EntireMatch, 2),
                Some('`') => (ReplacementPart::Prefix, 2),
                Some('\'') => (ReplacementPart::Suffix, 2),
                Some(d) if d.is_ascii_digit() => {
                    let first = d.to_digit(10).unwrap_or(0);
                    let two = chars
                        .get(i + 2)
                        .and_then(|c| c.to_digit(10))
                        .map(|second| first * 10 + second);
                    match two {
                        Some(n) if (1..=group_count).contains(&n) => (ReplacementPart::Group(n), 3),
                        _ if (1..=group_count).contains(&first) => {
                            (ReplacementPart::Group(first), 2)
                        }
                        _ => (ReplacementPart::Literal("$".to_string()), 1),
                    }
                }
                Some('<') if registry.has_named_groups() => {
                    match chars[i + 2..].iter().position(|c| *c == '>') {
                        Some(len) => {
                            let name: String = chars[i + 2..i + 2 + len].iter().collect();
                            (ReplacementPart::NamedGroup(name), len + 3)
                        }
                        None => (ReplacementPart::Literal("$<".to_string()), 2),
                    }
                }
                _ => (ReplacementPart::Literal("$".to_string()), 1),
            };

            match part {
                ReplacementPart::Literal(text) => literal.push_str(&text),
                part => {
                    if !literal.is_empty() {
                        parts.push(ReplacementPart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(part);
                }
            }
            i += consumed;
        }

        if !literal.is_empty() {
            parts.push(ReplacementPart::Literal(literal));
        }

        Replacement { parts }
    }

    /// Append the expansion for match `m` of `subject` to `out`
    pub fn apply_into(&self, out: &mut String, subject: &str, m: &Match) {
        for part in &self.parts {
            match part {
                ReplacementPart::Literal(text) => out.push_str(text),
                ReplacementPart::Group(n) => out.push_str(m.group_str(subject, *n).unwrap_or("")),
                ReplacementPart::NamedGroup(name) => {
                    out.push_str(m.named_group_str(subject, name).unwrap_or(""))
                }
                ReplacementPart::EntireMatch => out.push_str(m.as_str(subject)),
                ReplacementPart::Prefix => out.push_str(&subject[..m.start]),
                ReplacementPart::Suffix => out.push_str(&subject[m.end..]),
            }
        }
    }

    /// Get the parts of the replacement
    pub fn parts(&self) -> &[ReplacementPart] {
        &self.parts
    }
}

/// The output of a replacement pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    /// Number of matches that were substituted
    pub replaced: usize,
}

/// Replace the first match of `regex` in `subject`, or every match when
/// `global` is set. Zero-length matches advance exactly as enumeration does.
pub fn render(regex: &Regex, subject: &str, template: &str, global: bool) -> Rendered {
    let replacement = Replacement::parse(template, regex.groups());
    let found: Vec<Match> = if global {
        regex.find_iter(subject).collect()
    } else {
        regex.find(subject).into_iter().collect()
    };

    let mut output = String::with_capacity(subject.len());
    let mut last = 0;
    for m in &found {
        output.push_str(&subject[last..m.start]);
        replacement.apply_into(&mut output, subject, m);
        last = m.end;
    }
    output.push_str(&subject[last..]);

    trace!(
        pattern = regex.pattern(),
        global,
        replaced = found.len(),
        "rendered replacement"
    );
    Rendered {
        output,
        replaced: found.len(),
    }
}

impl Regex {
    /// Replace matches in `subject` using `template`. Every match is replaced
    /// when the pattern carries the global flag, otherwise only the first.
    pub fn replace(&self, subject: &str, template: &str) -> String {
        render(self, subject, template, self.flags().global).output
    }
}
