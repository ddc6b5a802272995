//! Rule and RuleSet: the text transformation model.
//!
//! A [`Rule`] is a single named edit over file content, guarded by an
//! applicability check against the whole file. The guard is what makes
//! rules idempotent: a rule that inserts a declaration carries an
//! `only_if_absent` marker for that declaration, so a second run is a
//! no-op instead of a duplicate insertion.
//!
//! Rules are total functions over content. Everything that can fail
//! (regex compilation, name collisions) is rejected when the manifest
//! is loaded, so applying a rule never errors mid-run.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// A single named text transformation with an applicability guard.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique within the owning ruleset, slug format.
    pub name: String,
    pub kind: RuleKind,
    /// Every marker must be present in the file for the rule to apply.
    pub only_if_contains: Vec<String>,
    /// Every marker must be absent from the file for the rule to apply.
    pub only_if_absent: Vec<String>,
}

/// The edit a rule performs when its guard passes.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Literal substring replacement of every occurrence.
    Replace { pattern: String, replacement: String },
    /// Regex replacement of every match, `$n` capture interpolation.
    RegexReplace { pattern: Regex, replacement: String },
    /// Insert text immediately after the end of the first anchor match.
    ///
    /// All-or-nothing: either the anchor matches and the insertion lands
    /// at exactly that point, or the content is returned unchanged.
    InsertAfter { anchor: Regex, insertion: String },
}

/// Outcome of applying one rule to one file's content.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub content: String,
    /// True iff the output differs from the input.
    pub applied: bool,
}

impl Rule {
    /// Check the applicability guard against the whole file content.
    pub fn applies_to(&self, content: &str) -> bool {
        self.only_if_contains
            .iter()
            .all(|marker| content.contains(marker.as_str()))
            && self
                .only_if_absent
                .iter()
                .all(|marker| !content.contains(marker.as_str()))
    }

    /// Apply the rule: guard first, then the edit.
    ///
    /// A failed guard is a silent no-op, never an error.
    pub fn apply(&self, content: &str) -> RuleOutcome {
        if !self.applies_to(content) {
            debug!(rule = %self.name, "guard not satisfied, skipping");
            return RuleOutcome {
                content: content.to_string(),
                applied: false,
            };
        }
        let new_content = match &self.kind {
            RuleKind::Replace {
                pattern,
                replacement,
            } => content.replace(pattern.as_str(), replacement),
            RuleKind::RegexReplace {
                pattern,
                replacement,
            } => pattern.replace_all(content, replacement.as_str()).into_owned(),
            RuleKind::InsertAfter { anchor, insertion } => match anchor.find(content) {
                Some(found) => {
                    let mut out = String::with_capacity(content.len() + insertion.len());
                    out.push_str(&content[..found.end()]);
                    out.push_str(insertion);
                    out.push_str(&content[found.end()..]);
                    out
                }
                None => content.to_string(),
            },
        };
        let applied = new_content != content;
        RuleOutcome {
            content: new_content,
            applied,
        }
    }
}

/// Ordered collection of rules applied as a unit to one file.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// Per-rule record within a file's change report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleApplication {
    /// Qualified as `ruleset/rule` so counts aggregate unambiguously.
    pub rule: String,
    pub applied: bool,
}

impl RuleSet {
    /// Apply every rule in declared order; output of rule *i* feeds
    /// rule *i+1*. No rule is ever skipped because an earlier rule was
    /// a no-op.
    pub fn apply(&self, content: &str) -> (String, Vec<RuleApplication>) {
        let mut current = content.to_string();
        let mut applications = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let outcome = rule.apply(&current);
            applications.push(RuleApplication {
                rule: format!("{}/{}", self.name, rule.name),
                applied: outcome.applied,
            });
            current = outcome.content;
        }
        (current, applications)
    }
}
