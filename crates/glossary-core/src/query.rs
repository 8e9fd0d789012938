//! Read-only queries over a loaded [`Corpus`].
//!
//! A [`TermQuery`] is a set of optional filters combined with AND. All
//! comparisons are case-insensitive:
//!
//! - `q` -- substring of the term, any alias, or the short definition
//! - `category` / `role` / `alias` -- equal to one entry of that list field
//! - `status` -- equal to the status field
//!
//! Documents missing a field are treated as having an empty value for it, so
//! they simply fail filters on that field.

use crate::corpus::{Corpus, Document};
use serde::Serialize;
use std::collections::BTreeSet;

/// Optional filters for [`Corpus::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub alias: Option<String>,
    pub role: Option<String>,
}

impl TermQuery {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Does `document` satisfy every filter that is set?
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let term = document.str_field("term").unwrap_or_default();
            let short_def = document.str_field("short_def").unwrap_or_default();
            let hit = contains_ci(term, &needle)
                || contains_ci(short_def, &needle)
                || document
                    .list_field("aliases")
                    .iter()
                    .any(|alias| contains_ci(alias, &needle));
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !any_eq_ci(&document.list_field("categories"), category) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if !any_eq_ci(&document.list_field("roles"), role) {
                return false;
            }
        }
        if let Some(alias) = &self.alias {
            if !any_eq_ci(&document.list_field("aliases"), alias) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            let actual = document.str_field("status").unwrap_or_default();
            if actual.to_lowercase() != status.to_lowercase() {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn any_eq_ci(items: &[&str], wanted: &str) -> bool {
    let wanted = wanted.to_lowercase();
    items.iter().any(|item| item.to_lowercase() == wanted)
}

/// Corpus-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub description: String,
    pub count: usize,
    /// Distinct categories across all terms, sorted.
    pub categories: Vec<String>,
    /// Distinct roles across all terms, sorted.
    pub roles: Vec<String>,
}

impl Corpus {
    /// Documents matching `query`, in corpus order.
    pub fn search(&self, query: &TermQuery) -> Vec<&Document> {
        self.iter().filter(|d| query.matches(d)).collect()
    }

    pub fn summary(&self) -> Summary {
        let mut categories = BTreeSet::new();
        let mut roles = BTreeSet::new();
        for document in self {
            categories.extend(document.list_field("categories").into_iter().map(str::to_string));
            roles.extend(document.list_field("roles").into_iter().map(str::to_string));
        }
        Summary {
            name: "AI Glossary".to_string(),
            description: "Structured, citation-backed AI glossary".to_string(),
            count: self.len(),
            categories: categories.into_iter().collect(),
            roles: roles.into_iter().collect(),
        }
    }
}
