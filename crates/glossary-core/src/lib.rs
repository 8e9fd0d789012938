//! # glossary-core
//!
//! Pure-Rust parser for the restricted YAML dialect used by the glossary term
//! files, together with the tooling that consumes the parsed documents.
//!
//! The grammar is deliberately small: block mappings, block sequences,
//! sequence items that open a nested mapping (`- key: value`), plain and
//! quoted scalars, and folded `>` / `>-` text blocks. Flow collections,
//! anchors, tags and multi-document streams are not supported.
//!
//! ## Quick start
//!
//! ```rust
//! use glossary_core::{parse, Value};
//!
//! let doc = parse("term: \"agent\"\nroles:\n  - product\n  - policy\n").unwrap();
//! assert_eq!(doc.get("term").and_then(Value::as_str), Some("agent"));
//! assert_eq!(doc.get("roles").and_then(Value::as_sequence).map(|r| r.len()), Some(2));
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: text → [`Value`] (the indentation-driven recursive descent)
//! - [`scalar`]: scalar type inference for leaf text
//! - [`value`]: the [`Value`] tree and its ordered [`Mapping`]
//! - [`corpus`]: load a directory of term files keyed by slug
//! - [`index`]: search-index and glossary payload projections
//! - [`query`]: read-only filtering over a loaded corpus
//! - [`related`]: TF-IDF related-term suggestions
//! - [`validate`]: field-presence / word-count rules for term files
//! - [`scaffold`]: generate new term files in the supported grammar
//! - [`error`]: error types

pub mod corpus;
pub mod error;
pub mod index;
pub mod parser;
pub mod query;
pub mod related;
pub mod scalar;
pub mod scaffold;
pub mod validate;
pub mod value;

pub use corpus::{slugify, Corpus, Document, LoadReport};
pub use error::GlossaryError;
pub use index::{build_search_index, glossary_payload, SearchEntry};
pub use parser::{parse, parse_path, Parser};
pub use query::{Summary, TermQuery};
pub use related::{related_markdown, related_terms, RelatedTerm, RelatedTerms};
pub use scalar::parse_scalar;
pub use scaffold::{build_template, scaffold};
pub use validate::{validate_dir, validate_document, ValidationReport, ValidationRules, Violation};
pub use value::{Mapping, Value};
