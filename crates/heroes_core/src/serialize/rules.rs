//! Exclusion rules for nested serialization.
//!
//! A rule is written `-path.to.field` and is resolved relative to the node
//! being serialized. Descending into a relationship strips the leading
//! segment, so `-hero_powers.hero` on a hero removes the `hero` key from
//! every rendered link.

use super::SerializeError;
use std::collections::BTreeSet;

/// Set of excluded dotted paths relative to the current node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    excluded: BTreeSet<String>,
}

impl RuleSet {
    /// Parses `-a.b.c` style rules.
    ///
    /// # Errors
    /// - Rules without the leading `-`.
    /// - Rules with an empty path segment (`-a..b`, `-`).
    pub fn parse(rules: &[&str]) -> Result<Self, SerializeError> {
        let mut set = Self::default();
        for rule in rules {
            let path = rule
                .strip_prefix('-')
                .ok_or_else(|| SerializeError::InvalidRule((*rule).to_string()))?;
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(SerializeError::InvalidRule((*rule).to_string()));
            }
            set.excluded.insert(path.to_string());
        }
        Ok(set)
    }

    /// Adds every rule of `other` to this set.
    pub fn merge(&mut self, other: &RuleSet) {
        self.excluded.extend(other.excluded.iter().cloned());
    }

    /// Whether `key` is excluded at the current level.
    pub fn excludes(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    /// Rules that apply inside the relationship named `key`.
    pub fn descend(&self, key: &str) -> RuleSet {
        let excluded = self
            .excluded
            .iter()
            .filter_map(|path| path.strip_prefix(key)?.strip_prefix('.'))
            .map(str::to_string)
            .collect();
        RuleSet { excluded }
    }
}

#[cfg(test)]
mod tests {
    use super::RuleSet;
    use crate::serialize::SerializeError;

    #[test]
    fn descend_strips_the_matching_prefix_only() {
        let rules = RuleSet::parse(&["-hero_powers.hero", "-hero_powers_extra.x", "-id"]).unwrap();
        assert!(rules.excludes("id"));
        assert!(!rules.excludes("hero_powers"));

        let inner = rules.descend("hero_powers");
        assert!(inner.excludes("hero"));
        assert!(!inner.excludes("x"));
        assert!(!inner.excludes("id"));
    }

    #[test]
    fn merge_unions_rules() {
        let mut rules = RuleSet::parse(&["-hero"]).unwrap();
        rules.merge(&RuleSet::parse(&["-power.hero_powers"]).unwrap());
        assert!(rules.excludes("hero"));
        assert!(rules.descend("power").excludes("hero_powers"));
    }

    #[test]
    fn malformed_rules_are_rejected() {
        for rule in ["hero", "-", "-a..b", "-a."] {
            assert!(
                matches!(RuleSet::parse(&[rule]), Err(SerializeError::InvalidRule(_))),
                "`{rule}` should be rejected"
            );
        }
    }
}
