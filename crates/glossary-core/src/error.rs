//! Error types for parsing and processing glossary documents.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while parsing or processing glossary files.
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// A line inside a mapping block has no `:` separator.
    /// `line` is 1-based and refers to the original text; `text` is the raw line.
    #[error("{}line {line}: unsupported mapping line: {text}", location(.path))]
    Syntax {
        path: Option<PathBuf>,
        line: usize,
        text: String,
    },

    /// A file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON conversion or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root was expected to be a mapping.
    #[error("{}: top-level YAML must define a mapping", .path.display())]
    NotAMapping { path: PathBuf },

    /// A scaffold target already exists and overwriting was not requested.
    #[error("{} already exists", .path.display())]
    AlreadyExists { path: PathBuf },
}

impl GlossaryError {
    /// Build a [`GlossaryError::Io`] for `path`.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        GlossaryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("{}: ", path.display()),
        None => String::new(),
    }
}

/// Convenience alias used throughout glossary-core.
pub type Result<T> = std::result::Result<T, GlossaryError>;
