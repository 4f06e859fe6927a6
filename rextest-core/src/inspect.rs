//! Pattern inspection
//!
//! Compiles a pattern and reports what the engine made of it: the
//! normalized source, the syntax tree, the capture groups and the size of
//! the automaton.

use crate::engine::Regex;
use crate::error::Result;
use crate::flags::FlagSet;
use crate::groups::GroupInfo;
use crate::parser::parse_with_mode;
use std::fmt;

/// What the engine made of a pattern
#[derive(Debug, Clone)]
pub struct PatternReport {
    /// The pattern as given
    pub pattern: String,
    /// Canonical flag string
    pub flags: String,
    /// The pattern re-rendered from its syntax tree
    pub normalized: String,
    /// The syntax tree (debug format)
    pub ast: String,
    /// Capture groups in declaration order
    pub groups: Vec<GroupInfo>,
    /// Number of automaton states
    pub states: usize,
    /// Number of automaton transitions
    pub transitions: usize,
}

/// Compile `pattern` under `flags` and describe the result
///
/// # Example
/// ```
/// use rextest_core::{inspect, FlagSet};
///
/// let report = inspect("(?<year>\\d{4})", FlagSet::new()).unwrap();
/// assert_eq!(report.groups.len(), 1);
/// assert_eq!(report.groups[0].name.as_deref(), Some("year"));
/// ```
pub fn inspect(pattern: &str, flags: FlagSet) -> Result<PatternReport> {
    let regex = Regex::new(pattern, flags)?;
    let ast = parse_with_mode(pattern, flags.unicode)?;

    Ok(PatternReport {
        pattern: pattern.to_string(),
        flags: flags.to_flag_string(),
        normalized: ast.to_string(),
        ast: format!("{:?}", ast),
        groups: regex.groups().groups().to_vec(),
        states: regex.nfa().states.len(),
        transitions: regex.nfa().transition_count(),
    })
}

impl fmt::Display for PatternReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pattern:    /{}/{}", self.pattern, self.flags)?;
        writeln!(f, "Normalized: /{}/{}", self.normalized, self.flags)?;
        writeln!(f, "AST:        {}", self.ast)?;
        writeln!(
            f,
            "Automaton:  {} states, {} transitions",
            self.states, self.transitions
        )?;
        if self.groups.is_empty() {
            write!(f, "Groups:     none")
        } else {
            write!(f, "Groups:")?;
            for group in &self.groups {
                match &group.name {
                    Some(name) => write!(f, "\n  {}: {}", group.index, name)?,
                    None => write!(f, "\n  {}", group.index)?,
                }
            }
            Ok(())
        }
    }
}
