//! Flag composition
//!
//! Six independent toggles map to a flag string. Serialization walks
//! [`Flag::CANONICAL`] so equal sets always produce the same string,
//! regardless of the order the toggles were flipped in.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single matching flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Enumerate every non-overlapping match (g)
    Global,
    /// Case insensitive matching (i)
    IgnoreCase,
    /// `^` and `$` match at line boundaries (m)
    Multiline,
    /// `.` matches line terminators (s)
    DotAll,
    /// Strict syntax, `\u{...}` and `\p{...}` escapes (u)
    Unicode,
    /// Matches must start exactly at the search position (y)
    Sticky,
}

impl Flag {
    /// Every flag paired with its code, in serialization order
    pub const CANONICAL: [(Flag, char); 6] = [
        (Flag::Global, 'g'),
        (Flag::IgnoreCase, 'i'),
        (Flag::Multiline, 'm'),
        (Flag::DotAll, 's'),
        (Flag::Unicode, 'u'),
        (Flag::Sticky, 'y'),
    ];

    /// The single-character code of this flag
    pub fn code(self) -> char {
        Self::CANONICAL
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, code)| *code)
            .unwrap_or('?')
    }

    /// Look up a flag by its code
    pub fn from_code(code: char) -> Option<Flag> {
        Self::CANONICAL
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(flag, _)| *flag)
    }
}

/// Errors produced when parsing a flag string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlagError {
    /// A code that is not one of `gimsuy`
    #[error("invalid flag '{0}'")]
    Unknown(char),
    /// The same code given twice
    #[error("duplicate flag '{0}'")]
    Duplicate(char),
}

/// The set of active flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlagSet {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl FlagSet {
    /// An empty flag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from the six toggles, in canonical order
    pub fn from_toggles(
        global: bool,
        ignore_case: bool,
        multiline: bool,
        dot_all: bool,
        unicode: bool,
        sticky: bool,
    ) -> Self {
        FlagSet {
            global,
            ignore_case,
            multiline,
            dot_all,
            unicode,
            sticky,
        }
    }

    /// Whether `flag` is enabled
    pub fn contains(&self, flag: Flag) -> bool {
        match flag {
            Flag::Global => self.global,
            Flag::IgnoreCase => self.ignore_case,
            Flag::Multiline => self.multiline,
            Flag::DotAll => self.dot_all,
            Flag::Unicode => self.unicode,
            Flag::Sticky => self.sticky,
        }
    }

    /// Enable or disable `flag`
    pub fn set(&mut self, flag: Flag, enabled: bool) {
        let slot = match flag {
            Flag::Global => &mut self.global,
            Flag::IgnoreCase => &mut self.ignore_case,
            Flag::Multiline => &mut self.multiline,
            Flag::DotAll => &mut self.dot_all,
            Flag::Unicode => &mut self.unicode,
            Flag::Sticky => &mut self.sticky,
        };
        *slot = enabled;
    }

    /// Copy of this set with `flag` set to `enabled`
    pub fn with(mut self, flag: Flag, enabled: bool) -> Self {
        self.set(flag, enabled);
        self
    }

    /// Copy of this set with the global bit cleared.
    ///
    /// The global bit only selects the enumeration mode, so two sets that
    /// differ only in it compile to the same automaton.
    pub fn without_global(self) -> Self {
        self.with(Flag::Global, false)
    }

    /// Enabled flags in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::CANONICAL
            .iter()
            .map(|(flag, _)| *flag)
            .filter(|flag| self.contains(*flag))
    }

    /// Serialize to the canonical flag string (`gimsuy` order)
    pub fn to_flag_string(&self) -> String {
        self.iter().map(Flag::code).collect()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_flag_string())
    }
}

impl FromStr for FlagSet {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = FlagSet::default();
        for code in s.chars() {
            let flag = Flag::from_code(code).ok_or(FlagError::Unknown(code))?;
            if flags.contains(flag) {
                return Err(FlagError::Duplicate(code));
            }
            flags.set(flag, true);
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_serializes_to_empty_string() {
        assert_eq!(FlagSet::new().to_flag_string(), "");
    }

    #[test]
    fn test_all_flags_in_canonical_order() {
        let flags = FlagSet::from_toggles(true, true, true, true, true, true);
        assert_eq!(flags.to_flag_string(), "gimsuy");
    }

    #[test]
    fn test_toggle_order_does_not_change_serialization() {
        let mut a = FlagSet::new();
        a.set(Flag::Sticky, true);
        a.set(Flag::Global, true);
        a.set(Flag::Multiline, true);

        let mut b = FlagSet::new();
        b.set(Flag::Multiline, true);
        b.set(Flag::Global, true);
        b.set(Flag::Sticky, true);

        assert_eq!(a, b);
        assert_eq!(a.to_flag_string(), "gmy");
        assert_eq!(b.to_string(), "gmy");
    }

    #[test]
    fn test_canonical_table_order() {
        let codes: String = Flag::CANONICAL.iter().map(|(_, c)| *c).collect();
        assert_eq!(codes, "gimsuy");
    }

    #[test]
    fn test_parse_any_order() {
        let flags: FlagSet = "yig".parse().unwrap();
        assert!(flags.global && flags.ignore_case && flags.sticky);
        assert!(!flags.multiline);
        assert_eq!(flags.to_flag_string(), "giy");
    }

    #[test]
    fn test_parse_rejects_unknown_and_duplicate() {
        assert_eq!("gx".parse::<FlagSet>(), Err(FlagError::Unknown('x')));
        assert_eq!("gig".parse::<FlagSet>(), Err(FlagError::Duplicate('g')));
    }

    #[test]
    fn test_without_global() {
        let flags: FlagSet = "gi".parse().unwrap();
        assert_eq!(flags.without_global().to_flag_string(), "i");
    }

    #[test]
    fn test_code_round_trip() {
        for (flag, code) in Flag::CANONICAL {
            assert_eq!(flag.code(), code);
            assert_eq!(Flag::from_code(code), Some(flag));
        }
    }
}
