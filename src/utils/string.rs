//! String manipulation utilities

/// Separator between segments of a qualified name
pub const SEGMENT_SEPARATOR: char = '.';

/// Pluralize a word based on count
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Last segment of a qualified name (`uqbar.io.Timer` → `Timer`)
pub fn leaf_segment(name: &str) -> &str {
    name.rsplit(SEGMENT_SEPARATOR).next().unwrap_or(name)
}

/// Proper prefixes of a qualified name, shortest first
/// (`a.b.C` → `a`, `a.b`).
pub fn enclosing_paths(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices(SEGMENT_SEPARATOR)
        .map(move |(index, _)| &name[..index])
}

/// Whether `name` is `prefix` itself or lies below it
pub fn is_within(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEGMENT_SEPARATOR),
        None => false,
    }
}
