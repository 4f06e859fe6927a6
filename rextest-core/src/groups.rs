//! Capture group table
//!
//! Named and unnamed groups share one numbering, 1-based, in the order their
//! left parentheses appear. Names are unique per pattern and every `\k<name>`
//! must resolve to one of them, wherever in the pattern it appears.

use crate::ast::Expr;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

/// One capturing group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInfo {
    /// 1-based capture index
    pub index: u32,
    /// `Some` for `(?<name>...)`
    pub name: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupRegistryError {
    #[error("duplicate capture group name '{0}'")]
    DuplicateGroupName(String),
    #[error("invalid named capture referenced '{0}'")]
    UndefinedBackreference(String),
}

/// The groups of one pattern, indexable by number and by name
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Vec<GroupInfo>,
    by_name: HashMap<String, u32>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next group and return its index
    pub fn register_group(&mut self, name: Option<String>) -> Result<u32, GroupRegistryError> {
        let index = self.groups.len() as u32 + 1;
        if let Some(name) = &name {
            match self.by_name.entry(name.clone()) {
                Entry::Occupied(_) => {
                    return Err(GroupRegistryError::DuplicateGroupName(name.clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }
        self.groups.push(GroupInfo { index, name });
        Ok(index)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All groups, ordered by index
    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    pub fn get_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Name of group `index`, `None` when unnamed or out of range
    pub fn name_of(&self, index: u32) -> Option<&str> {
        let slot = (index as usize).checked_sub(1)?;
        self.groups.get(slot)?.name.as_deref()
    }

    pub fn has_named_groups(&self) -> bool {
        !self.by_name.is_empty()
    }

    fn resolve(&self, name: &str) -> Result<u32, GroupRegistryError> {
        self.get_by_name(name)
            .ok_or_else(|| GroupRegistryError::UndefinedBackreference(name.to_string()))
    }
}

/// Builds a [`GroupRegistry`] from a parsed pattern
pub struct GroupCollector;

impl GroupCollector {
    /// Register every capturing group, then resolve named back-references.
    /// Forward references are fine.
    pub fn collect(expr: &Expr) -> Result<GroupRegistry, GroupRegistryError> {
        let mut nodes = Vec::new();
        expr.walk(&mut |node| nodes.push(node));

        let mut registry = GroupRegistry::new();
        for node in &nodes {
            match node {
                Expr::Group { index, .. } => {
                    let assigned = registry.register_group(None)?;
                    debug_assert_eq!(assigned, *index);
                }
                Expr::NamedGroup { index, name, .. } => {
                    let assigned = registry.register_group(Some(name.clone()))?;
                    debug_assert_eq!(assigned, *index);
                }
                _ => {}
            }
        }
        for node in &nodes {
            if let Expr::NamedBackreference(name) = node {
                registry.resolve(name)?;
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn test_mixed_groups_number_sequentially() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.register_group(None), Ok(1));
        assert_eq!(registry.register_group(named("year")), Ok(2));
        assert_eq!(registry.register_group(None), Ok(3));

        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.get_by_name("year"), Some(2));
        assert_eq!(registry.name_of(2), Some("year"));
        assert_eq!(registry.name_of(3), None);
        assert_eq!(registry.name_of(0), None);
        assert_eq!(registry.name_of(9), None);
        assert!(registry.has_named_groups());
    }

    #[test]
    fn test_unnamed_only() {
        let mut registry = GroupRegistry::new();
        registry.register_group(None).unwrap();
        assert!(!registry.has_named_groups());
        assert_eq!(
            registry.groups(),
            &[GroupInfo {
                index: 1,
                name: None
            }]
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = GroupRegistry::new();
        registry.register_group(named("n")).unwrap();
        assert_eq!(
            registry.register_group(named("n")),
            Err(GroupRegistryError::DuplicateGroupName("n".to_string()))
        );
        assert_eq!(registry.group_count(), 1);
        assert_eq!(
            GroupRegistryError::DuplicateGroupName("n".to_string()).to_string(),
            "duplicate capture group name 'n'"
        );
    }

    #[test]
    fn test_collect_follows_left_parens() {
        // (x(?<inner>y))(z)
        let expr = Expr::sequence(vec![
            Expr::group(
                1,
                Expr::sequence(vec![
                    Expr::literal('x'),
                    Expr::named_group(2, "inner", Expr::literal('y')),
                ]),
            ),
            Expr::group(3, Expr::literal('z')),
        ]);
        let registry = GroupCollector::collect(&expr).unwrap();
        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.get_by_name("inner"), Some(2));
    }

    #[test]
    fn test_collect_resolves_named_references() {
        let forward = Expr::sequence(vec![
            Expr::named_backreference("later"),
            Expr::named_group(1, "later", Expr::literal('x')),
        ]);
        assert!(GroupCollector::collect(&forward).is_ok());

        let unknown = Expr::sequence(vec![
            Expr::named_group(1, "a", Expr::literal('x')),
            Expr::named_backreference("b"),
        ]);
        assert_eq!(
            GroupCollector::collect(&unknown).unwrap_err().to_string(),
            "invalid named capture referenced 'b'"
        );
    }
}
