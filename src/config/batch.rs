//! Batch command configuration

use std::path::PathBuf;

use crate::cli::PlaceholderMode;
use crate::common::{ConfigBuilder, missing_field};
use crate::constants::output::DEFAULT_FACT_PATTERN;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Glob matched against fact file names
    pub pattern: String,
    pub style: Option<PathBuf>,
    pub placeholders: Option<PlaceholderMode>,
    pub undirected: bool,
}

impl BatchConfig {
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    paths: Option<Vec<PathBuf>>,
    output_dir: Option<PathBuf>,
    pattern: Option<String>,
    style: Option<PathBuf>,
    placeholders: Option<PlaceholderMode>,
    undirected: bool,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    pub fn with_pattern(mut self, pattern: String) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_style(mut self, style: Option<PathBuf>) -> Self {
        self.style = style;
        self
    }

    pub fn with_placeholders(mut self, placeholders: Option<PlaceholderMode>) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }
}

impl ConfigBuilder for BatchConfigBuilder {
    type Config = BatchConfig;

    fn build(self) -> Result<Self::Config, crate::error::LineageError> {
        let paths = self.paths.ok_or_else(|| missing_field("paths"))?;
        if paths.is_empty() {
            return Err(crate::error::LineageError::ConfigurationError {
                message: "At least one input path is required".to_string(),
            });
        }

        let pattern = self
            .pattern
            .unwrap_or_else(|| DEFAULT_FACT_PATTERN.to_string());
        if let Err(e) = glob::Pattern::new(&pattern) {
            return Err(crate::error::LineageError::ConfigurationError {
                message: format!("Invalid glob pattern '{pattern}': {e}"),
            });
        }

        Ok(BatchConfig {
            paths,
            output_dir: self.output_dir.ok_or_else(|| missing_field("output_dir"))?,
            pattern,
            style: self.style,
            placeholders: self.placeholders,
            undirected: self.undirected,
        })
    }
}
