use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid TOML syntax in '{file}'")]
#[diagnostic(
    code(graph_lineage::toml_parse_error),
    help("Check the TOML syntax near the highlighted position")
)]
pub struct TomlParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("syntax error here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: toml::de::Error,
}

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid JSON in '{file}'")]
#[diagnostic(
    code(graph_lineage::json_parse_error),
    help("Fact files must be a JSON object with a `records` array")
)]
pub struct JsonParseError {
    pub file: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("parse error here")]
    pub span: Option<SourceSpan>,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Error, Debug, Diagnostic)]
pub enum LineageError {
    #[error("Invalid attribute name '{name}'")]
    #[diagnostic(
        code(graph_lineage::invalid_attribute_name),
        help("Attribute names must be non-empty and contain only letters, digits and underscores")
    )]
    InvalidAttributeName { name: String },

    #[error("Invalid value for attribute '{name}': {reason}")]
    #[diagnostic(
        code(graph_lineage::invalid_attribute_value),
        help("The value cannot be represented in DOT; remove NUL bytes or balance the label brackets")
    )]
    InvalidAttributeValue { name: String, reason: String },

    #[error("Invalid {kind} name '{name}': {reason}")]
    #[diagnostic(
        code(graph_lineage::invalid_identifier),
        help("Names must be non-empty and must not contain NUL bytes")
    )]
    InvalidIdentifier {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Cluster name '{name}' is already used in this graph")]
    #[diagnostic(
        code(graph_lineage::duplicate_cluster_name),
        help("Cluster names are unique graph-wide; pick a different name or reuse the existing cluster")
    )]
    DuplicateClusterName { name: String },

    #[error("Edge references node '{endpoint}' which is not registered in this graph")]
    #[diagnostic(
        code(graph_lineage::dangling_edge_reference),
        help("Create both endpoint nodes in the same graph before creating the edge")
    )]
    DanglingEdgeReference { endpoint: String },

    #[error("Cluster handle #{index} does not belong to this graph")]
    #[diagnostic(
        code(graph_lineage::unknown_cluster),
        help("Only pass cluster handles returned by the same graph")
    )]
    UnknownCluster { index: usize },

    #[error("Failed to read file '{path}'")]
    #[diagnostic(
        code(graph_lineage::io_error),
        help("Check if the file exists and you have read permissions")
    )]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    TomlParseError(Box<TomlParseError>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    JsonParseError(Box<JsonParseError>),

    #[error("String formatting error")]
    #[diagnostic(
        code(graph_lineage::fmt_error),
        help("This is likely an internal error - please report it")
    )]
    Fmt(#[from] std::fmt::Error),

    #[error("IO error")]
    #[diagnostic(
        code(graph_lineage::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(graph_lineage::config_error),
        help("Check your command arguments and configuration")
    )]
    ConfigurationError { message: String },
}

impl LineageError {
    pub(crate) fn invalid_value(name: &str, reason: impl Into<String>) -> Self {
        LineageError::InvalidAttributeValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
