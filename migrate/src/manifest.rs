//! Manifest parsing and validation.
//!
//! A manifest is a TOML file declaring named rulesets and the ordered
//! list of files they apply to. It is loaded once at run start and
//! immutable afterwards; a malformed manifest is fatal before any file
//! is touched. See `demos/riverpod_migration.toml` for a full example.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;

use crate::rule::{Rule, RuleKind, RuleSet};

/// Raw manifest document as deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    rulesets: Vec<RuleSetDecl>,
    #[serde(default)]
    entries: Vec<EntryDecl>,
}

#[derive(Debug, Clone, Deserialize)]
struct RuleSetDecl {
    name: String,
    #[serde(default)]
    rules: Vec<RuleDecl>,
}

#[derive(Debug, Clone, Deserialize)]
struct RuleDecl {
    name: String,
    #[serde(flatten)]
    kind: RuleKindDecl,
    #[serde(default)]
    only_if_contains: Vec<String>,
    #[serde(default)]
    only_if_absent: Vec<String>,
}

/// Rule kinds as written in the manifest. Patterns are raw strings
/// here; they are compiled (and thereby validated) during load.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RuleKindDecl {
    Replace { pattern: String, replacement: String },
    RegexReplace { pattern: String, replacement: String },
    InsertAfter { anchor: String, insertion: String },
}

#[derive(Debug, Clone, Deserialize)]
struct EntryDecl {
    path: PathBuf,
    rulesets: Vec<String>,
}

/// One manifest entry: a file and the rulesets to apply, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Relative to the migration root.
    pub path: PathBuf,
    pub rulesets: Vec<String>,
}

/// Validated, compiled manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    rulesets: Vec<RuleSet>,
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Load, validate, and compile a manifest from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read manifest {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("manifest {}", path.display()))
    }

    /// Parse and validate manifest TOML from a string.
    pub fn parse_str(contents: &str) -> Result<Self> {
        let raw: ManifestFile = toml::from_str(contents).context("parse manifest toml")?;
        compile(raw)
    }

    /// Look up a ruleset by name. Entries only reference validated
    /// names, so a miss indicates a caller bug, not bad input.
    pub fn ruleset(&self, name: &str) -> Option<&RuleSet> {
        self.rulesets.iter().find(|set| set.name == name)
    }
}

fn compile(raw: ManifestFile) -> Result<Manifest> {
    if raw.entries.is_empty() {
        bail!("entries must be a non-empty array");
    }

    let mut rulesets = Vec::with_capacity(raw.rulesets.len());
    for set in &raw.rulesets {
        validate_slug(&set.name).with_context(|| format!("ruleset {:?}", set.name))?;
        if rulesets
            .iter()
            .any(|compiled: &RuleSet| compiled.name == set.name)
        {
            bail!("duplicate ruleset name {:?}", set.name);
        }
        if set.rules.is_empty() {
            bail!("ruleset {:?} has no rules", set.name);
        }
        let mut rules = Vec::with_capacity(set.rules.len());
        for decl in &set.rules {
            let rule = compile_rule(decl)
                .with_context(|| format!("ruleset {:?} rule {:?}", set.name, decl.name))?;
            if rules.iter().any(|existing: &Rule| existing.name == rule.name) {
                bail!("ruleset {:?} has duplicate rule name {:?}", set.name, rule.name);
            }
            rules.push(rule);
        }
        rulesets.push(RuleSet {
            name: set.name.clone(),
            rules,
        });
    }

    let mut entries = Vec::with_capacity(raw.entries.len());
    for (index, decl) in raw.entries.iter().enumerate() {
        validate_entry_path(&decl.path).with_context(|| format!("entries[{index}]"))?;
        if decl.rulesets.is_empty() {
            bail!("entries[{index}] ({}) lists no rulesets", decl.path.display());
        }
        for name in &decl.rulesets {
            if !rulesets.iter().any(|set| set.name == *name) {
                bail!(
                    "entries[{index}] ({}) references unknown ruleset {:?}",
                    decl.path.display(),
                    name
                );
            }
        }
        entries.push(Entry {
            path: decl.path.clone(),
            rulesets: decl.rulesets.clone(),
        });
    }

    Ok(Manifest { rulesets, entries })
}

fn compile_rule(decl: &RuleDecl) -> Result<Rule> {
    validate_slug(&decl.name)?;
    let kind = match &decl.kind {
        RuleKindDecl::Replace {
            pattern,
            replacement,
        } => {
            if pattern.is_empty() {
                bail!("replace pattern must be non-empty");
            }
            RuleKind::Replace {
                pattern: pattern.clone(),
                replacement: replacement.clone(),
            }
        }
        RuleKindDecl::RegexReplace {
            pattern,
            replacement,
        } => RuleKind::RegexReplace {
            pattern: compile_regex(pattern)?,
            replacement: replacement.clone(),
        },
        RuleKindDecl::InsertAfter { anchor, insertion } => {
            if insertion.is_empty() {
                bail!("insert_after insertion must be non-empty");
            }
            RuleKind::InsertAfter {
                anchor: compile_regex(anchor)?,
                insertion: insertion.clone(),
            }
        }
    };
    Ok(Rule {
        name: decl.name.clone(),
        kind,
        only_if_contains: decl.only_if_contains.clone(),
        only_if_absent: decl.only_if_absent.clone(),
    })
}

fn compile_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("compile pattern {pattern:?}"))
}

fn validate_slug(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("name must be non-empty");
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("name {name:?} must use [a-z0-9_-] only");
    }
    Ok(())
}

fn validate_entry_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("path must be non-empty");
    }
    if path.is_absolute() {
        bail!("path {} must be relative to the migration root", path.display());
    }
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        bail!("path {} must not contain '..'", path.display());
    }
    Ok(())
}
