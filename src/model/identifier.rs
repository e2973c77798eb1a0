//! DOT identifier rules
//!
//! DOT accepts three forms of ID: a bare identifier, a numeral and a
//! double-quoted string. This module decides which form a given string needs
//! and produces the escaped text.

use crate::constants::grammar::RESERVED_WORDS;
use crate::error::LineageError;

/// Returns true if `word` is one of DOT's keywords (case-insensitive).
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Returns true if `text` can be emitted without quotes as an identifier:
/// ASCII letters, digits and underscores, not starting with a digit, and not a
/// keyword.
pub fn is_bare_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_reserved(text)
}

/// Returns true if `text` matches DOT's numeral form
/// `[-]?(.[0-9]+ | [0-9]+(.[0-9]*)?)`.
pub fn is_numeral(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() {
        return false;
    }

    match digits.split_once('.') {
        None => digits.chars().all(|c| c.is_ascii_digit()),
        Some((whole, fraction)) => {
            let whole_ok = whole.chars().all(|c| c.is_ascii_digit());
            let fraction_ok = fraction.chars().all(|c| c.is_ascii_digit());
            whole_ok && fraction_ok && !(whole.is_empty() && fraction.is_empty())
        }
    }
}

/// Escape a string for use between double quotes.
///
/// Quotes and backslashes are escaped and line breaks become `\n`.
pub fn escape_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap `text` in double quotes after escaping it.
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape_quoted(text))
}

/// Format a node, cluster or graph name as a DOT ID.
///
/// Identifiers and numerals stay bare, everything else is quoted.
pub fn format_id(name: &str) -> String {
    if is_bare_identifier(name) || is_numeral(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Validate a node, cluster or graph name.
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), LineageError> {
    if name.is_empty() {
        return Err(LineageError::InvalidIdentifier {
            kind,
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if name.contains('\0') {
        return Err(LineageError::InvalidIdentifier {
            kind,
            name: name.replace('\0', "\\0"),
            reason: "name contains a NUL byte".to_string(),
        });
    }
    Ok(())
}
