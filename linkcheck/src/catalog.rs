//! Catalog parsing: newspaper and magazine records from a JSON file.
//!
//! The catalog groups records under two top-level arrays. Only the
//! fields the checker needs are read; missing names fall back to
//! `"Unknown"` and missing language/country to `"unknown"`, matching
//! the report vocabulary downstream reviewers expect.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which top-level catalog array a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Newspapers,
    Magazines,
}

/// One catalog record, read-only input to the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub category: Category,
    pub name: String,
    /// Raw website field, unvalidated; may be absent or malformed.
    pub url: Option<String>,
    pub language: String,
    pub country: String,
}

impl LinkRecord {
    /// The probe-able URL, if the record has one.
    ///
    /// A missing or non-`http` website means the record is skipped,
    /// not treated as dead: "unknown" is distinct from "dead".
    pub fn website(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|url| url.starts_with("http"))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    newspapers: Vec<RecordDecl>,
    #[serde(default)]
    magazines: Vec<RecordDecl>,
}

#[derive(Debug, Deserialize)]
struct RecordDecl {
    name: Option<String>,
    language: Option<String>,
    country: Option<String>,
    #[serde(default)]
    contact: ContactDecl,
}

#[derive(Debug, Default, Deserialize)]
struct ContactDecl {
    website: Option<String>,
}

/// Load all records, newspapers first then magazines, preserving
/// catalog order within each category. Parse failure is fatal.
pub fn load_records(path: &Path) -> Result<Vec<LinkRecord>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    parse_records(&contents).with_context(|| format!("catalog {}", path.display()))
}

/// Parse catalog JSON from a string.
pub fn parse_records(contents: &str) -> Result<Vec<LinkRecord>> {
    let raw: CatalogFile = serde_json::from_str(contents).context("parse catalog json")?;
    let mut records = Vec::with_capacity(raw.newspapers.len() + raw.magazines.len());
    for decl in raw.newspapers {
        records.push(record(Category::Newspapers, decl));
    }
    for decl in raw.magazines {
        records.push(record(Category::Magazines, decl));
    }
    Ok(records)
}

fn record(category: Category, decl: RecordDecl) -> LinkRecord {
    LinkRecord {
        category,
        name: decl.name.unwrap_or_else(|| "Unknown".to_string()),
        url: decl.contact.website,
        language: decl.language.unwrap_or_else(|| "unknown".to_string()),
        country: decl.country.unwrap_or_else(|| "unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_categories_in_order() {
        let input = r#"{
            "newspapers": [
                {"name": "Xinhua Daily", "language": "zh", "country": "CN",
                 "contact": {"website": "https://example.com"}}
            ],
            "magazines": [
                {"name": "Monthly Review", "language": "en", "country": "US",
                 "contact": {"website": "http://example.org"}}
            ]
        }"#;
        let records = parse_records(input).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Newspapers);
        assert_eq!(records[0].name, "Xinhua Daily");
        assert_eq!(records[1].category, Category::Magazines);
        assert_eq!(records[1].website(), Some("http://example.org"));
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let input = r#"{"newspapers": [{"contact": {}}]}"#;
        let records = parse_records(input).expect("parse");
        assert_eq!(records[0].name, "Unknown");
        assert_eq!(records[0].language, "unknown");
        assert_eq!(records[0].country, "unknown");
        assert_eq!(records[0].website(), None);
    }

    #[test]
    fn non_http_website_is_not_probeable() {
        let input = r#"{"magazines": [
            {"name": "A", "contact": {"website": "ftp://example.com"}},
            {"name": "B", "contact": {"website": "example.com"}}
        ]}"#;
        let records = parse_records(input).expect("parse");
        assert!(records.iter().all(|record| record.website().is_none()));
    }

    #[test]
    fn malformed_catalog_is_fatal() {
        let err = parse_records("{not json").expect_err("malformed");
        assert!(format!("{err:#}").contains("parse catalog json"));
    }
}
