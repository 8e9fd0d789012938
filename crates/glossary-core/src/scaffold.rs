//! Scaffold new term files.
//!
//! The template only uses constructs the parser understands (quoted scalars,
//! block lists, a list of mappings and one `>-` folded block), so a freshly
//! generated file always parses back to exactly the fields written here.

use crate::corpus::{slugify, TERM_EXTENSION};
use crate::error::{GlossaryError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SHORT_PLACEHOLDER: &str = "TODO: Add a 1-2 sentence short definition (<=320 characters).";
const LONG_PLACEHOLDER: &str =
    "TODO: Draft a longer definition (80-220 words) covering purpose, actors, and governance.";
const EXEC_PLACEHOLDER: &str = "Explain why this matters for strategy, risk, or customer outcomes.";
const ENGINEER_PLACEHOLDER: &str = "Outline implementation, data, or operational expectations.";

/// Render the scaffold for `term`, stamped with `today`.
pub fn build_template(term: &str, today: NaiveDate) -> String {
    format!(
        r#"term: {term}
aliases:
  - {alias}
categories:
  - "TODO category"
roles:
  - "product"
  - "engineering"
part_of_speech: "concept"
short_def: "{SHORT_PLACEHOLDER}"
long_def: >-
  {LONG_PLACEHOLDER}
audiences:
  exec: "{EXEC_PLACEHOLDER}"
  engineer: "{ENGINEER_PLACEHOLDER}"
examples:
  do:
    - "TODO: Add a best-practice example."
  dont:
    - "TODO: Add an anti-pattern example."
governance:
  nist_rmf_tags:
    - "TODO"
  risk_notes: "TODO: Capture risks or controls."
relationships:
  broader:
    - "TODO"
  related:
    - "TODO"
citations:
  - source: "TODO: Primary reference"
    url: "https://example.com"
license: "CC BY-SA 4.0"
status: "draft"
last_reviewed: "{today}"
"#,
        term = quote(&term.to_lowercase()),
        alias = quote(&title_case(term)),
        today = today.format("%Y-%m-%d"),
    )
}

/// Write a scaffold for `term` to `<dir>/<slug>.yml`, creating `dir`.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn scaffold(dir: &Path, term: &str, overwrite: bool, today: NaiveDate) -> Result<PathBuf> {
    let destination = dir.join(format!("{}.{TERM_EXTENSION}", slugify(term)));
    if destination.exists() && !overwrite {
        return Err(GlossaryError::AlreadyExists { path: destination });
    }

    fs::create_dir_all(dir).map_err(|e| GlossaryError::io(dir, e))?;
    fs::write(&destination, build_template(term, today))
        .map_err(|e| GlossaryError::io(&destination, e))?;
    info!(path = %destination.display(), "created scaffold");
    Ok(destination)
}

/// Wrap `s` in double quotes, escaping embedded quotes as `\"`.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Uppercase the first letter of every run of letters and lowercase the rest:
/// `"retrieval-augmented generation"` → `"Retrieval-Augmented Generation"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
