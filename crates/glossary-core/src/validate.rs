//! Field-presence, shape and word-count rules for term files.
//!
//! Validation never stops at the first problem: every violation in every file
//! is collected so a single run reports everything that needs fixing.
//!
//! The policy lives in [`ValidationRules`]. Its `Default` is the built-in
//! policy; a rules file (written in the same YAML subset) can override any
//! subset of fields.

use crate::corpus::{slugify, term_files};
use crate::error::{GlossaryError, Result};
use crate::parser::parse;
use crate::value::Value;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Validation policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub required_fields: Vec<String>,
    pub parts_of_speech: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub licenses: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    pub max_short_def_words: usize,
    pub min_long_def_words: usize,
    pub max_long_def_words: usize,
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_fields: [
                "term",
                "aliases",
                "categories",
                "roles",
                "part_of_speech",
                "short_def",
                "long_def",
                "audiences",
                "examples",
                "governance",
                "relationships",
                "citations",
                "license",
                "status",
                "last_reviewed",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            parts_of_speech: set(&[
                "noun",
                "noun_phrase",
                "verb",
                "adjective",
                "process",
                "concept",
            ]),
            statuses: set(&["draft", "reviewed", "approved", "deprecated"]),
            licenses: set(&["CC BY-SA 4.0"]),
            roles: set(&[
                "product",
                "engineering",
                "data_science",
                "policy",
                "legal",
                "security",
                "communications",
            ]),
            max_short_def_words: 40,
            min_long_def_words: 80,
            max_long_def_words: 220,
        }
    }
}

impl ValidationRules {
    /// Load a rules file. Fields it leaves out keep their default values.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GlossaryError::io(path, e))?;
        Self::from_yaml(&text)
    }

    /// Parse rules from YAML-subset text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value = parse(text)?;
        let json = serde_json::to_value(&value)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Replace the required field list with the `required` array of a JSON
    /// schema file. A schema without `required` leaves the list unchanged.
    pub fn with_schema(mut self, schema_path: &Path) -> Result<Self> {
        #[derive(Deserialize)]
        struct Schema {
            required: Option<Vec<String>>,
        }

        let text =
            fs::read_to_string(schema_path).map_err(|e| GlossaryError::io(schema_path, e))?;
        let schema: Schema = serde_json::from_str(&text)?;
        if let Some(required) = schema.required {
            self.required_fields = required;
        }
        Ok(self)
    }
}

/// A single rule violation in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Result of validating a directory.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub files_checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate every `*.yml` file in `dir`.
///
/// Unreadable or unparsable files become violations; only a failure to list
/// the directory is an error.
pub fn validate_dir(dir: &Path, rules: &ValidationRules) -> Result<ValidationReport> {
    let files = term_files(dir)?;
    let mut report = ValidationReport {
        files_checked: files.len(),
        violations: Vec::new(),
    };

    for path in &files {
        let found = match fs::read_to_string(path) {
            Ok(text) => match parse(&text) {
                Ok(data) => validate_document(path, &data, rules),
                Err(err) => vec![violation(path, err.to_string())],
            },
            Err(err) => vec![violation(path, format!("could not read file: {err}"))],
        };
        debug!(path = %path.display(), violations = found.len(), "validated term");
        report.violations.extend(found);
    }

    info!(
        dir = %dir.display(),
        files = report.files_checked,
        violations = report.violations.len(),
        "validation finished"
    );
    Ok(report)
}

fn violation(path: &Path, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Check one parsed document against `rules`, returning every violation.
pub fn validate_document(path: &Path, data: &Value, rules: &ValidationRules) -> Vec<Violation> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(violation(path, message));

    let Some(map) = data.as_mapping() else {
        fail("top-level YAML must define a mapping".to_string());
        return errors;
    };

    for field in &rules.required_fields {
        if !map.contains_key(field) {
            fail(format!("missing required field '{field}'"));
        }
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match map.get("term").and_then(Value::as_str) {
        Some(term) if slugify(term) != stem => {
            fail(format!("term '{term}' should match filename slug '{stem}'"));
        }
        Some(_) => {}
        None => fail("'term' must be a string".to_string()),
    }

    for field in ["aliases", "categories"] {
        if !is_string_list(map.get(field), false) {
            fail(format!("'{field}' must be a non-empty list of strings"));
        }
    }

    let roles = map.get("roles");
    if is_string_list(roles, false) {
        let invalid: BTreeSet<&str> = roles
            .map(Value::string_items)
            .unwrap_or_default()
            .into_iter()
            .filter(|role| !rules.roles.contains(*role))
            .collect();
        if !invalid.is_empty() {
            fail(format!(
                "roles {} are invalid (expected subset of {})",
                list_repr(invalid.iter().copied()),
                list_repr(rules.roles.iter().map(String::as_str)),
            ));
        }
    } else {
        fail("'roles' must be a non-empty list of strings".to_string());
    }

    if !in_set(map.get("part_of_speech"), &rules.parts_of_speech) {
        fail(format!(
            "part_of_speech '{}' is invalid",
            describe(map.get("part_of_speech"))
        ));
    }

    match map.get("short_def").and_then(Value::as_str) {
        Some(short_def) => {
            let words = count_words(short_def);
            if words > rules.max_short_def_words {
                fail(format!(
                    "short_def has {words} words (max {})",
                    rules.max_short_def_words
                ));
            }
        }
        None => fail("'short_def' must be a string".to_string()),
    }

    match map.get("long_def").and_then(Value::as_str) {
        Some(long_def) => {
            let words = count_words(long_def);
            if words < rules.min_long_def_words || words > rules.max_long_def_words {
                fail(format!(
                    "long_def has {words} words (expected {}-{})",
                    rules.min_long_def_words, rules.max_long_def_words
                ));
            }
        }
        None => fail("'long_def' must be a string".to_string()),
    }

    match map.get("audiences").and_then(Value::as_mapping) {
        Some(audiences) => {
            for audience in ["exec", "engineer"] {
                if !is_non_blank_str(audiences.get(audience)) {
                    fail(format!("audiences.{audience} must be a non-empty string"));
                }
            }
        }
        None => fail("'audiences' must be a mapping with exec/engineer keys".to_string()),
    }

    match map.get("examples").and_then(Value::as_mapping) {
        Some(examples) => {
            for key in ["do", "dont"] {
                if !is_string_list(examples.get(key), false) {
                    fail(format!("examples.{key} must include at least one example"));
                }
            }
        }
        None => fail("'examples' must define 'do' and 'dont' lists".to_string()),
    }

    match map.get("governance").and_then(Value::as_mapping) {
        Some(governance) => {
            if let Some(tags) = governance.get("nist_rmf_tags") {
                if !is_string_list(Some(tags), false) {
                    fail("governance.nist_rmf_tags must be a list of strings".to_string());
                }
            }
            if let Some(notes) = governance.get("risk_notes") {
                if notes.as_str().is_none() {
                    fail("governance.risk_notes must be a string when provided".to_string());
                }
            }
        }
        None => fail("'governance' must be a mapping".to_string()),
    }

    match map.get("relationships").and_then(Value::as_mapping) {
        Some(relationships) => {
            for key in ["broader", "narrower", "related"] {
                if let Some(value) = relationships.get(key) {
                    if !is_string_list(Some(value), true) {
                        fail(format!("relationships.{key} must be a list of strings"));
                    }
                }
            }
        }
        None => fail("'relationships' must be a mapping".to_string()),
    }

    match map.get("citations").and_then(Value::as_sequence) {
        Some(citations) if !citations.is_empty() => {
            for (idx, citation) in citations.iter().enumerate() {
                let n = idx + 1;
                let Some(citation) = citation.as_mapping() else {
                    fail(format!("citation #{n} must be a mapping"));
                    continue;
                };
                if !is_non_blank_str(citation.get("source")) {
                    fail(format!("citation #{n} missing 'source'"));
                }
                let url_ok = citation
                    .get("url")
                    .and_then(Value::as_str)
                    .is_some_and(|url| url.starts_with("http"));
                if !url_ok {
                    fail(format!("citation #{n} has invalid 'url'"));
                }
            }
        }
        _ => fail("'citations' must contain at least one entry".to_string()),
    }

    if !in_set(map.get("license"), &rules.licenses) {
        fail(format!(
            "license '{}' must be one of {}",
            describe(map.get("license")),
            list_repr(rules.licenses.iter().map(String::as_str)),
        ));
    }

    if !in_set(map.get("status"), &rules.statuses) {
        fail(format!(
            "status '{}' is not valid",
            describe(map.get("status"))
        ));
    }

    match map.get("last_reviewed").and_then(Value::as_str) {
        Some(date) => {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                fail(format!(
                    "last_reviewed '{date}' is not ISO date (YYYY-MM-DD)"
                ));
            }
        }
        None => fail("'last_reviewed' must be an ISO date string".to_string()),
    }

    errors
}

/// Whitespace-separated word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A list whose items are all non-blank strings; empty lists pass only when
/// `allow_empty` is set.
fn is_string_list(value: Option<&Value>, allow_empty: bool) -> bool {
    let Some(items) = value.and_then(Value::as_sequence) else {
        return false;
    };
    if items.is_empty() && !allow_empty {
        return false;
    }
    items.iter().all(|item| is_non_blank_str(Some(item)))
}

fn is_non_blank_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn in_set(value: Option<&Value>, allowed: &BTreeSet<String>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| allowed.contains(s))
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}

fn list_repr<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}
