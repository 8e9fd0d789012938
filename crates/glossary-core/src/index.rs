//! Search-index and glossary payload projections over a loaded [`Corpus`].

use crate::corpus::{Corpus, Document};
use crate::error::Result;
use crate::value::Value;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

/// Flat record used by client-side search and listing pages.
///
/// Field values are copied from the document as they are. Missing list fields
/// are empty lists; missing scalar fields are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub term: Value,
    pub aliases: Value,
    pub categories: Value,
    pub roles: Value,
    pub short_def: Value,
    pub nist_rmf_tags: Value,
    pub status: Value,
    pub slug: String,
}

impl SearchEntry {
    pub fn from_document(document: &Document) -> Self {
        let nist_rmf_tags = document
            .field("governance")
            .and_then(|governance| governance.get("nist_rmf_tags"));

        Self {
            term: scalar_or_null(document.field("term")),
            aliases: list_or_empty(document.field("aliases")),
            categories: list_or_empty(document.field("categories")),
            roles: list_or_empty(document.field("roles")),
            short_def: scalar_or_null(document.field("short_def")),
            nist_rmf_tags: list_or_empty(nist_rmf_tags),
            status: scalar_or_null(document.field("status")),
            slug: document.slug.clone(),
        }
    }
}

fn scalar_or_null(value: Option<&Value>) -> Value {
    value.cloned().unwrap_or(Value::Null)
}

fn list_or_empty(value: Option<&Value>) -> Value {
    value
        .cloned()
        .unwrap_or_else(|| Value::Sequence(Vec::new()))
}

/// Project every document in the corpus into a [`SearchEntry`].
pub fn build_search_index(corpus: &Corpus) -> Vec<SearchEntry> {
    corpus.iter().map(SearchEntry::from_document).collect()
}

/// The full glossary payload: `{"terms": [...]}` where each term is the whole
/// document plus its `slug` and `_source_file`.
pub fn glossary_payload(corpus: &Corpus) -> Result<JsonValue> {
    let terms = corpus
        .iter()
        .map(Document::to_json)
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ "terms": terms }))
}
