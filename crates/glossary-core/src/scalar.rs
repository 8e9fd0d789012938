//! Scalar inference: turn a leaf text fragment into a typed [`Value`].

use crate::value::Value;

/// Parse a trimmed text fragment into a scalar value.
///
/// Inference order: empty → quoted string → bool → null → integer → float →
/// plain string. Quotes are checked first so that `"true"` stays a string.
///
/// - `"..."` strips the quotes and unescapes `\"`; no other escapes are read.
/// - `'...'` strips the quotes and keeps the content literally.
/// - `true`/`false` and `null`/`none`/`~` match case-insensitively.
/// - An all-ASCII-digit string is an integer; one too large for `i64` falls
///   through to float inference.
/// - Anything else is returned unchanged as a string.
pub fn parse_scalar(text: &str) -> Value {
    let s = text.trim();

    if s.is_empty() {
        return Value::String(String::new());
    }

    if let Some(inner) = strip_wrapping(s, '"') {
        return Value::String(inner.replace("\\\"", "\""));
    }
    if let Some(inner) = strip_wrapping(s, '\'') {
        return Value::String(inner.to_string());
    }

    let lowered = s.to_lowercase();
    match lowered.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "none" | "~" => return Value::Null,
        _ => {}
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = s.parse::<i64>() {
            return Value::Int(n);
        }
    }

    if let Ok(x) = s.parse::<f64>() {
        return Value::Float(x);
    }

    Value::String(s.to_string())
}

/// Content between the outer `quote` characters, if `s` starts and ends with
/// one. A lone quote character counts as wrapped and yields `""`.
fn strip_wrapping(s: &str, quote: char) -> Option<&str> {
    if !(s.starts_with(quote) && s.ends_with(quote)) {
        return None;
    }
    Some(s.get(1..s.len() - 1).unwrap_or_default())
}
