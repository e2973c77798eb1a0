//! Style configuration file
//!
//! ```toml
//! directed = true
//! graph_name = "api"
//! placeholders = "shared"
//! shared_placeholder = "builtins"
//! cluster_labels = true
//! class_labels = true
//!
//! [graph]
//! rankdir = "LR"
//!
//! [node]
//! shape = "box"
//! fontname = "Arial"
//!
//! [edge]
//! arrowhead = "empty"
//!
//! [cluster]
//! style = "rounded"
//!
//! [placeholder]
//! style = "dashed"
//! ```

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;
use tracing::debug;

use crate::builder::{BuilderOptions, PlaceholderPolicy};
use crate::cli::PlaceholderMode;
use crate::constants::builder::SHARED_PLACEHOLDER_NAME;
use crate::error::{LineageError, TomlParseError};
use crate::model::{StyleMap, style_to_attributes};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub directed: Option<bool>,
    pub graph_name: Option<String>,
    pub placeholders: Option<PlaceholderMode>,
    pub shared_placeholder: Option<String>,
    pub cluster_labels: Option<bool>,
    pub class_labels: Option<bool>,
    pub graph: StyleMap,
    pub node: StyleMap,
    pub edge: StyleMap,
    pub cluster: StyleMap,
    pub placeholder: StyleMap,
}

impl StyleConfig {
    pub fn load(path: &Path) -> Result<Self, LineageError> {
        let content = std::fs::read_to_string(path).map_err(|e| LineageError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml_str(&path.display().to_string(), &content)?;
        debug!(file = %path.display(), "loaded style configuration");
        Ok(config)
    }

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

    /// Builder options described by this file. Command-line overrides are
    /// applied by the caller afterwards.
    pub fn builder_options(&self) -> Result<BuilderOptions, LineageError> {
        let defaults = BuilderOptions::default();
        let placeholders = match self.placeholders {
            Some(mode) => self.placeholder_policy(mode),
            None => defaults.placeholders,
        };

        Ok(BuilderOptions {
            directed: self.directed.unwrap_or(defaults.directed),
            graph_name: self.graph_name.clone(),
            placeholders,
            cluster_labels: self.cluster_labels.unwrap_or(defaults.cluster_labels),
            class_labels: self.class_labels.unwrap_or(defaults.class_labels),
            lineage: None,
            graph_attributes: style_to_attributes(&self.graph)?,
            node_defaults: style_to_attributes(&self.node)?,
            edge_defaults: style_to_attributes(&self.edge)?,
            cluster_attributes: style_to_attributes(&self.cluster)?,
            placeholder_attributes: style_to_attributes(&self.placeholder)?,
        })
    }

    /// Policy for `mode`, honoring the configured shared placeholder name
    pub fn placeholder_policy(&self, mode: PlaceholderMode) -> PlaceholderPolicy {
        match mode {
            PlaceholderMode::PerName => PlaceholderPolicy::PerName,
            PlaceholderMode::Shared => PlaceholderPolicy::Shared(
                self.shared_placeholder
                    .clone()
                    .unwrap_or_else(|| SHARED_PLACEHOLDER_NAME.to_string()),
            ),
        }
    }
}

/// Builder options from an optional style file plus command-line overrides.
/// `--undirected` wins over `directed` in the file; an explicit
/// placeholder mode wins over `placeholders`.
pub fn resolve_builder_options(
    style: Option<&Path>,
    placeholders: Option<PlaceholderMode>,
    undirected: bool,
) -> Result<BuilderOptions, LineageError> {
    let config = match style {
        Some(path) => StyleConfig::load(path)?,
        None => StyleConfig::default(),
    };
    let mut options = config.builder_options()?;
    if undirected {
        options.directed = false;
    }
    if let Some(mode) = placeholders {
        options.placeholders = config.placeholder_policy(mode);
    }
    Ok(options)
}
