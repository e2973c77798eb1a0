//! Structural facts fed into the graph builder
//!
//! A fact set is an ordered list of records, each naming a package, module or
//! class by its qualified name. Classes carry their base classes in
//! declaration order. Fact sets are usually produced by an introspection step
//! and stored as JSON or TOML:
//!
//! ```json
//! {
//!   "name": "uqbar",
//!   "records": [
//!     { "name": "uqbar", "kind": "package" },
//!     { "name": "uqbar.io", "kind": "module" },
//!     { "name": "uqbar.io.Timer", "kind": "class", "bases": ["builtins.object"] }
//!   ]
//! }
//! ```

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;
use tracing::debug;

use crate::error::{JsonParseError, LineageError, TomlParseError};
use crate::model::{StyleMap, StyleValue};

/// What a fact record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Package,
    Module,
    Class,
}

impl ElementKind {
    /// Packages and modules become clusters; classes become nodes
    pub fn is_container(self) -> bool {
        matches!(self, ElementKind::Package | ElementKind::Module)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactRecord {
    #[serde(alias = "qualified_name")]
    pub name: String,
    pub kind: ElementKind,
    /// Base classes by qualified name, in declaration order
    #[serde(default)]
    pub bases: Vec<String>,
    /// Attribute hints copied onto the generated node or cluster
    #[serde(default)]
    pub style: StyleMap,
}

impl FactRecord {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bases: Vec::new(),
            style: StyleMap::new(),
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Package)
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Module)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Class)
    }

    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases.extend(bases.into_iter().map(Into::into));
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: StyleValue) -> Self {
        self.style.insert(name.into(), value);
        self
    }
}

/// Ordered collection of fact records
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FactSet {
    /// Optional graph name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub records: Vec<FactRecord>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_record(mut self, record: FactRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn push(&mut self, record: FactRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &FactRecord> {
        self.records
            .iter()
            .filter(|record| record.kind == ElementKind::Class)
    }

    pub fn containers(&self) -> impl Iterator<Item = &FactRecord> {
        self.records.iter().filter(|record| record.kind.is_container())
    }

    /// Load a fact set, choosing the format from the file extension
    /// (`.json` or `.toml`).
    pub fn load(path: &Path) -> Result<Self, LineageError> {
        let content = std::fs::read_to_string(path).map_err(|e| LineageError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file = path.display().to_string();

        let facts = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&file, &content)?,
            Some("toml") => Self::from_toml_str(&file, &content)?,
            _ => {
                return Err(LineageError::ConfigurationError {
                    message: format!("Unsupported fact file '{file}': expected .json or .toml"),
                });
            }
        };

        debug!(file = %file, records = facts.len(), "loaded fact set");
        Ok(facts)
    }

    /// Parse a JSON fact set; `file` names the source in diagnostics.
    pub fn from_json_str(file: &str, content: &str) -> Result<Self, LineageError> {
        serde_json::from_str(content).map_err(|e| {
            let span = json_error_offset(content, e.line(), e.column())
                .map(|offset| SourceSpan::new(offset.into(), 1));

            LineageError::JsonParseError(Box::new(JsonParseError {
                file: file.to_string(),
                source_code: NamedSource::new(file, content.to_string()),
                span,
                source: e,
            }))
        })
    }

    /// Parse a TOML fact set (`[[records]]` tables).
    pub fn from_toml_str(file: &str, content: &str) -> Result<Self, LineageError> {
        toml::from_str(content).map_err(|e| {
            let span = e
                .span()
                .map(|span| SourceSpan::new(span.start.into(), span.end - span.start));

            LineageError::TomlParseError(Box::new(TomlParseError {
                file: file.to_string(),
                source_code: NamedSource::new(file, content.to_string()),
                span,
                source: e,
            }))
        })
    }
}

/// Byte offset of a 1-based line/column position reported by serde_json
fn json_error_offset(content: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let offset = line_start + column.saturating_sub(1);
    (offset < content.len()).then_some(offset)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_json_facts() {
        let json = r#"{
            "name": "uqbar",
            "records": [
                { "name": "uqbar", "kind": "package" },
                { "qualified_name": "uqbar.io.Timer", "kind": "class",
                  "bases": ["builtins.object"], "style": { "color": "red", "penwidth": 2 } }
            ]
        }"#;

        let facts = FactSet::from_json_str("facts.json", json).unwrap();
        assert_eq!(facts.name.as_deref(), Some("uqbar"));
        assert_eq!(facts.len(), 2);
        assert_eq!(facts.containers().count(), 1);

        let timer = facts.classes().next().unwrap();
        assert_eq!(timer.name, "uqbar.io.Timer");
        assert_eq!(timer.bases, vec!["builtins.object"]);
        assert_eq!(timer.style.get("penwidth"), Some(&StyleValue::Integer(2)));
    }

    #[test]
    fn test_parse_toml_facts() {
        let toml = r#"
            [[records]]
            name = "pkg.mod"
            kind = "module"

            [[records]]
            name = "pkg.mod.Derived"
            kind = "class"
            bases = ["pkg.mod.Base1", "pkg.mod.Base2"]
        "#;

        let facts = FactSet::from_toml_str("facts.toml", toml).unwrap();
        assert!(facts.name.is_none());
        let derived = facts.classes().next().unwrap();
        assert_eq!(derived.bases, vec!["pkg.mod.Base1", "pkg.mod.Base2"]);
        assert!(derived.style.is_empty());
    }

    #[test]
    fn test_invalid_json_reports_span() {
        let err = FactSet::from_json_str("bad.json", "{\n  \"records\": [,]\n}").unwrap_err();
        match err {
            LineageError::JsonParseError(inner) => {
                assert_eq!(inner.file, "bad.json");
                assert!(inner.span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{ "records": [ { "name": "x", "kind": "function" } ] }"#;
        assert!(matches!(
            FactSet::from_json_str("x.json", json),
            Err(LineageError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_invalid_toml_reports_diagnostic() {
        let err = FactSet::from_toml_str("bad.toml", "[[records]\nname = 1").unwrap_err();
        assert!(matches!(err, LineageError::TomlParseError(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "records": [ {{ "name": "A", "kind": "class" }} ] }}"#).unwrap();
        let facts = FactSet::load(file.path()).unwrap();
        assert_eq!(facts.len(), 1);

        let other = NamedTempFile::new().unwrap();
        assert!(matches!(
            FactSet::load(other.path()),
            Err(LineageError::ConfigurationError { .. })
        ));

        assert!(matches!(
            FactSet::load(Path::new("/nonexistent/facts.json")),
            Err(LineageError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_record_builders() {
        let record = FactRecord::class("A")
            .with_bases(["B", "C"])
            .with_style("shape", StyleValue::Text("box".into()));
        assert_eq!(record.kind, ElementKind::Class);
        assert_eq!(record.bases, vec!["B", "C"]);
        assert_eq!(record.style.len(), 1);
        assert!(FactRecord::package("p").kind.is_container());
    }

    #[test]
    fn test_json_error_offset() {
        assert_eq!(json_error_offset("ab\ncd", 2, 2), Some(4));
        assert_eq!(json_error_offset("ab", 0, 0), None);
        assert_eq!(json_error_offset("ab", 1, 10), None);
    }
}
