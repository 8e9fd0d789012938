//! Load a directory of term files into a slug-keyed [`Corpus`].
//!
//! Each file is parsed on its own; a failure in one file is recorded in the
//! [`LoadReport`] and loading moves on to the next. Files are read in sorted
//! path order and a later file whose slug collides with an earlier one
//! replaces it.

use crate::error::{GlossaryError, Result};
use crate::parser::parse_path;
use crate::value::Value;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension of term files inside a data directory.
pub const TERM_EXTENSION: &str = "yml";

/// Normalize a term name into its slug.
///
/// Trims, lowercases, turns spaces and underscores into hyphens and collapses
/// repeated hyphens: `"  Retrieval  augmented_Generation "` →
/// `"retrieval-augmented-generation"`.
pub fn slugify(term: &str) -> String {
    let mut slug = String::with_capacity(term.len());
    for c in term.trim().to_lowercase().chars() {
        let c = if c == ' ' || c == '_' { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}

/// List the `*.yml` files directly inside `dir`, sorted by path.
pub fn term_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| GlossaryError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GlossaryError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TERM_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// One parsed term file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub slug: String,
    pub source: PathBuf,
    /// The parsed root mapping.
    pub data: Value,
}

impl Document {
    /// Wrap a parsed value. The root must be a mapping; the slug comes from a
    /// scalar `term` field, falling back to the file stem.
    pub fn new(source: &Path, data: Value) -> Result<Self> {
        if data.as_mapping().is_none() {
            return Err(GlossaryError::NotAMapping {
                path: source.to_path_buf(),
            });
        }
        let canonical = match data.get("term") {
            Some(term @ (Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_))) => {
                term.to_string()
            }
            _ => file_stem(source),
        };
        Ok(Self {
            slug: slugify(&canonical),
            source: source.to_path_buf(),
            data,
        })
    }

    /// Read and parse a single term file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = parse_path(path)?;
        Self::new(path, data)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// A string field, or `None` when missing or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// The string items of a list field; missing or malformed lists read as empty.
    pub fn list_field(&self, key: &str) -> Vec<&str> {
        self.field(key).map(Value::string_items).unwrap_or_default()
    }

    /// The full document as JSON, with `slug` and `_source_file` appended.
    pub fn to_json(&self) -> Result<JsonValue> {
        let mut object = match serde_json::to_value(&self.data)? {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        object.insert("slug".to_string(), JsonValue::String(self.slug.clone()));
        object.insert(
            "_source_file".to_string(),
            JsonValue::String(self.source.display().to_string()),
        );
        Ok(JsonValue::Object(object))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parsed documents keyed by slug, in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing (in place) any document with the same slug.
    /// Returns the replaced document.
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        match self.documents.iter_mut().find(|d| d.slug == document.slug) {
            Some(slot) => Some(std::mem::replace(slot, document)),
            None => {
                self.documents.push(document);
                None
            }
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load every term file in `dir`.
    ///
    /// Only a failure to list the directory is returned as an error; per-file
    /// failures are collected in [`LoadReport::failures`].
    pub fn load_dir(dir: &Path) -> Result<LoadReport> {
        let files = term_files(dir)?;
        let mut report = LoadReport {
            files_read: files.len(),
            ..LoadReport::default()
        };

        for path in &files {
            match Document::load(path) {
                Ok(document) => {
                    debug!(path = %path.display(), slug = %document.slug, "loaded term");
                    if let Some(previous) = report.corpus.insert(document) {
                        warn!(
                            slug = %previous.slug,
                            replaced = %previous.source.display(),
                            by = %path.display(),
                            "duplicate slug"
                        );
                    }
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping term file");
                    report.failures.push(err);
                }
            }
        }

        info!(
            dir = %dir.display(),
            files = report.files_read,
            terms = report.corpus.len(),
            failures = report.failures.len(),
            "corpus loaded"
        );
        Ok(report)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Outcome of [`Corpus::load_dir`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub corpus: Corpus,
    pub failures: Vec<GlossaryError>,
    pub files_read: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
