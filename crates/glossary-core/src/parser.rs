//! Indentation-driven recursive-descent parser for the glossary YAML subset.
//!
//! The parser walks a list of lines with a single cursor. Four mutually
//! recursive routines share it:
//!
//! - `parse_block` peeks the next significant line and dispatches to the
//!   sequence parser (line starts with `- `) or the mapping parser.
//! - `parse_mapping` consumes `key: value` lines at one depth. An empty value
//!   recurses into `parse_block` two columns deeper; `>` / `>-` reads a folded
//!   block; anything else goes through [`parse_scalar`].
//! - `parse_sequence` consumes `- item` lines at one depth.
//! - `parse_nested_item` handles `- key: value` items by re-framing the item
//!   and its continuation lines as a standalone mapping and parsing it with a
//!   child [`Parser`] whose base indent is shifted, so the child sees the
//!   item's keys at column 0 without any line being rewritten.
//!
//! # Key design decisions
//!
//! - **Block depth is fixed on entry**: the indent a block is entered with is
//!   the minimum for all of its lines. The first shallower line ends the block
//!   and is left for the parent to re-read.
//! - **Prose guard for sequence items**: `- Silence alerts: skip postmortems`
//!   stays a string because the text before its first colon contains a space.
//!   Only items like `- name: value` (no space before the colon) open a map.
//!   Items that start with a quote are always scalars.
//! - **Line numbers survive re-framing**: a child parser carries the offset of
//!   its first line so syntax errors always point at the original text.

use crate::error::{GlossaryError, Result};
use crate::scalar::parse_scalar;
use crate::value::{Mapping, Value};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a complete document into its root value.
///
/// An empty document (or one holding only blanks and comments) is an empty
/// mapping.
pub fn parse(text: &str) -> Result<Value> {
    Parser::new(text).parse()
}

/// Read `path` as UTF-8 and parse it. Syntax errors carry the path.
pub fn parse_path(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| GlossaryError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "parsing file");
    Parser::with_path(&text, path).parse()
}

/// Parser state: the line list, the cursor, and the base indent that every
/// indentation measurement is taken relative to.
#[derive(Debug)]
pub struct Parser<'a> {
    lines: Vec<Cow<'a, str>>,
    base_indent: usize,
    index: usize,
    /// Number of original lines that precede `lines[0]`.
    line_offset: usize,
    path: Option<&'a Path>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().map(Cow::Borrowed).collect(),
            base_indent: 0,
            index: 0,
            line_offset: 0,
            path: None,
        }
    }

    /// Like [`Parser::new`], but syntax errors report `path`.
    pub fn with_path(text: &'a str, path: &'a Path) -> Self {
        Self {
            path: Some(path),
            ..Self::new(text)
        }
    }

    /// Parse the whole input as one block at depth 0.
    pub fn parse(mut self) -> Result<Value> {
        let value = self.parse_block(0)?;
        self.warn_trailing();
        Ok(value)
    }

    fn parse_block(&mut self, indent: usize) -> Result<Value> {
        let Some(idx) = self.next_significant() else {
            return Ok(Value::Mapping(Mapping::new()));
        };
        let line = &self.lines[idx];
        if self.indent(line) < indent {
            return Ok(Value::Mapping(Mapping::new()));
        }
        if sequence_item(line.trim()).is_some() {
            self.parse_sequence(indent)
        } else {
            self.parse_mapping(indent)
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Value> {
        let mut map = Mapping::new();

        while let Some(idx) = self.next_significant() {
            let line = &self.lines[idx];
            let trimmed = line.trim();
            if self.indent(line) < indent || sequence_item(trimmed).is_some() {
                break;
            }
            let Some((key, rest)) = trimmed.split_once(':') else {
                return Err(self.syntax_error(idx));
            };
            let key = key.trim().to_string();
            let rest = rest.trim().to_string();
            self.index += 1;

            let value = match rest.as_str() {
                ">" | ">-" => Value::String(self.parse_folded(indent)),
                "" => self.parse_block(indent + 2)?,
                scalar => parse_scalar(scalar),
            };
            map.insert(key, value);
        }

        Ok(Value::Mapping(map))
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Value> {
        let mut items = Vec::new();

        while let Some(idx) = self.next_significant() {
            let line = &self.lines[idx];
            if self.indent(line) < indent {
                break;
            }
            let Some(content) = sequence_item(line.trim()) else {
                break;
            };
            let content = content.to_string();
            self.index += 1;

            let value = if content.is_empty() {
                self.parse_block(indent + 2)?
            } else if opens_nested_mapping(&content) {
                self.parse_nested_item(indent, &content)?
            } else {
                parse_scalar(&content)
            };
            items.push(value);
        }

        Ok(Value::Sequence(items))
    }

    /// Parse a `- key: value` item plus every following line indented deeper
    /// than the dash (blank lines included) as one mapping.
    ///
    /// The cursor is already past the dash line.
    fn parse_nested_item(&mut self, indent: usize, first: &str) -> Result<Value> {
        let item_line = self.index - 1;
        let mut end = self.index;
        while end < self.lines.len() {
            let line = &self.lines[end];
            if !line.trim().is_empty() && self.indent(line) <= indent {
                break;
            }
            end += 1;
        }

        let base_indent = self.base_indent + indent + 2;
        let mut lines = Vec::with_capacity(end - item_line);
        lines.push(Cow::Owned(format!("{}{}", " ".repeat(base_indent), first)));
        lines.extend(
            self.lines[self.index..end]
                .iter()
                .map(|line| Cow::Borrowed(&**line)),
        );

        let mut child = Parser {
            lines,
            base_indent,
            index: 0,
            line_offset: self.line_offset + item_line,
            path: self.path,
        };
        let value = child.parse_block(0)?;
        child.warn_trailing();

        self.index = end;
        Ok(value)
    }

    /// Read a folded block for a key at `indent`.
    ///
    /// Lines indented at least two columns past the key are joined with single
    /// spaces; blank lines end a paragraph. Paragraphs are joined with `\n\n`.
    fn parse_folded(&mut self, indent: usize) -> String {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut i = self.index;

        while i < self.lines.len() {
            let line = &self.lines[i];
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
                i += 1;
                continue;
            }
            if self.indent(line) < indent + 2 {
                break;
            }
            current.push(trimmed);
            i += 1;
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        self.index = i;
        paragraphs.join("\n\n")
    }

    /// Skip blank and comment lines; return the index of the next significant
    /// line without consuming it.
    fn next_significant(&mut self) -> Option<usize> {
        while self.index < self.lines.len() {
            let trimmed = self.lines[self.index].trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                self.index += 1;
                continue;
            }
            return Some(self.index);
        }
        None
    }

    /// Indentation of `line` relative to this parser's base indent.
    fn indent(&self, line: &str) -> usize {
        absolute_indent(line).saturating_sub(self.base_indent)
    }

    fn syntax_error(&self, idx: usize) -> GlossaryError {
        GlossaryError::Syntax {
            path: self.path.map(Path::to_path_buf),
            line: self.line_offset + idx + 1,
            text: self.lines[idx].to_string(),
        }
    }

    fn warn_trailing(&mut self) {
        if let Some(idx) = self.next_significant() {
            warn!(
                path = ?self.path,
                line = self.line_offset + idx + 1,
                text = %self.lines[idx],
                "ignoring lines after the end of the block"
            );
        }
    }
}

/// Count leading space characters. Tabs are not indentation.
fn absolute_indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Content after a `- ` marker, if `trimmed` is a sequence entry. A bare `-`
/// is not an entry, so inside a mapping it is a syntax error.
fn sequence_item(trimmed: &str) -> Option<&str> {
    trimmed.strip_prefix("- ")
}

/// Does a sequence item open a nested mapping (`- key: value`)?
///
/// True when the item has a colon and the text before the first colon has no
/// space once trimmed. Quoted items are always scalars.
fn opens_nested_mapping(content: &str) -> bool {
    if content.trim_start().starts_with(['"', '\'']) {
        return false;
    }
    match content.split_once(':') {
        Some((key, _)) => !key.trim().contains(' '),
        None => false,
    }
}
