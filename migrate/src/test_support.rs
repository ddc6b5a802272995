//! Test-only helpers for constructing rules and rulesets.

use regex::Regex;

use crate::rule::{Rule, RuleKind, RuleSet};

/// Literal replacement rule with no guard.
pub fn replace(name: &str, pattern: &str, replacement: &str) -> Rule {
    Rule {
        name: name.to_string(),
        kind: RuleKind::Replace {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        },
        only_if_contains: Vec::new(),
        only_if_absent: Vec::new(),
    }
}

/// Regex replacement rule with no guard. Panics on an invalid pattern,
/// which is fine for test fixtures.
pub fn regex_replace(name: &str, pattern: &str, replacement: &str) -> Rule {
    Rule {
        name: name.to_string(),
        kind: RuleKind::RegexReplace {
            pattern: Regex::new(pattern).expect("test regex"),
            replacement: replacement.to_string(),
        },
        only_if_contains: Vec::new(),
        only_if_absent: Vec::new(),
    }
}

/// Insertion rule with no guard.
pub fn insert_after(name: &str, anchor: &str, insertion: &str) -> Rule {
    Rule {
        name: name.to_string(),
        kind: RuleKind::InsertAfter {
            anchor: Regex::new(anchor).expect("test regex"),
            insertion: insertion.to_string(),
        },
        only_if_contains: Vec::new(),
        only_if_absent: Vec::new(),
    }
}

/// Ruleset from explicit rules.
pub fn ruleset(name: &str, rules: Vec<Rule>) -> RuleSet {
    RuleSet {
        name: name.to_string(),
        rules,
    }
}
