//! Related-term suggestions from TF-IDF similarity.
//!
//! Each document is reduced to one text (term, short and long definitions,
//! aliases, categories), tokenized into lowercase word runs and turned into an
//! L2-normalized TF-IDF vector:
//!
//! - `tf = count / tokens_in_document`
//! - `idf = ln((documents + 1) / (documents_with_token + 1)) + 1`
//!
//! Similarity is the dot product of two vectors. Every document gets the
//! `top_k` most similar *other* documents, best first, with scores rounded to
//! three decimals. Equal scores put the later document first.

use crate::corpus::{Corpus, Document};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Number of suggestions kept per term by default.
pub const DEFAULT_TOP_K: usize = 8;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// One suggestion for a term.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RelatedTerm {
    pub slug: String,
    pub title: String,
    pub score: f64,
}

/// Suggestions keyed by slug, in corpus order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedTerms {
    entries: Vec<(String, Vec<RelatedTerm>)>,
}

impl RelatedTerms {
    pub fn get(&self, slug: &str) -> Option<&[RelatedTerm]> {
        self.entries
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, related)| related.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RelatedTerm])> {
        self.entries
            .iter()
            .map(|(slug, related)| (slug.as_str(), related.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RelatedTerms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (slug, related) in &self.entries {
            map.serialize_entry(slug, related)?;
        }
        map.end()
    }
}

type Vector = BTreeMap<String, f64>;

/// Rank every document's `top_k` nearest neighbours.
pub fn related_terms(corpus: &Corpus, top_k: usize) -> RelatedTerms {
    let documents: Vec<&Document> = corpus.iter().collect();
    let texts: Vec<String> = documents.iter().map(|d| document_text(d)).collect();
    let vectors = tfidf_vectors(&texts);

    let entries = documents
        .iter()
        .enumerate()
        .map(|(i, document)| {
            let mut scores: Vec<(f64, usize)> = vectors
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, other)| (cosine(&vectors[i], other), j))
                .collect();
            scores.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)));
            scores.truncate(top_k);

            let related = scores
                .into_iter()
                .map(|(score, j)| RelatedTerm {
                    slug: documents[j].slug.clone(),
                    title: title(documents[j]),
                    score: round3(score),
                })
                .collect();
            (document.slug.clone(), related)
        })
        .collect();

    debug!(terms = documents.len(), top_k, "related terms ranked");
    RelatedTerms { entries }
}

/// Markdown snippet listing `related` as links under `base_url`.
pub fn related_markdown(related: &[RelatedTerm], base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut lines = vec!["\n**Related terms**\n".to_string(), String::new()];
    for term in related {
        lines.push(format!("- [{}]({base}/{}/)", term.title, term.slug));
    }
    lines.join("\n") + "\n"
}

fn document_text(document: &Document) -> String {
    [
        document.str_field("term").unwrap_or_default().to_string(),
        document.str_field("short_def").unwrap_or_default().to_string(),
        document.str_field("long_def").unwrap_or_default().to_string(),
        document.list_field("aliases").join(" "),
        document.list_field("categories").join(" "),
    ]
    .join(" ")
}

/// Display title: a scalar `term`, else the slug.
fn title(document: &Document) -> String {
    match document.field("term") {
        Some(term) if term.as_sequence().is_none() && term.as_mapping().is_none() => {
            term.to_string()
        }
        _ => document.slug.clone(),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn tfidf_vectors(texts: &[String]) -> Vec<Vector> {
    let counts: Vec<BTreeMap<String, usize>> = texts
        .iter()
        .map(|text| {
            let mut bucket = BTreeMap::new();
            for token in tokenize(text) {
                *bucket.entry(token).or_insert(0) += 1;
            }
            bucket
        })
        .collect();

    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for bucket in &counts {
        for token in bucket.keys() {
            *doc_freq.entry(token.as_str()).or_insert(0) += 1;
        }
    }
    let total_docs = texts.len() as f64;

    counts
        .iter()
        .map(|bucket| {
            let total_terms = bucket.values().sum::<usize>().max(1) as f64;
            let weights: Vector = bucket
                .iter()
                .map(|(token, count)| {
                    let df = doc_freq.get(token.as_str()).copied().unwrap_or(0) as f64;
                    let idf = ((total_docs + 1.0) / (df + 1.0)).ln() + 1.0;
                    (token.clone(), *count as f64 / total_terms * idf)
                })
                .collect();
            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            let norm = if norm == 0.0 { 1.0 } else { norm };
            weights
                .into_iter()
                .map(|(token, weight)| (token, weight / norm))
                .collect()
        })
        .collect()
}

fn cosine(a: &Vector, b: &Vector) -> f64 {
    let (small, large) = if a.len() > b.len() { (b, a) } else { (a, b) };
    small
        .iter()
        .map(|(token, weight)| weight * large.get(token).copied().unwrap_or(0.0))
        .sum()
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
