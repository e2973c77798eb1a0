//! Render command configuration

use std::path::PathBuf;

use crate::cli::PlaceholderMode;
use crate::common::{ConfigBuilder, missing_field};

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub facts: PathBuf,
    pub output: Option<PathBuf>,
    pub style: Option<PathBuf>,
    pub lineage: Option<String>,
    pub placeholders: Option<PlaceholderMode>,
    pub undirected: bool,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct RenderConfigBuilder {
    facts: Option<PathBuf>,
    output: Option<PathBuf>,
    style: Option<PathBuf>,
    lineage: Option<String>,
    placeholders: Option<PlaceholderMode>,
    undirected: bool,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facts(mut self, facts: PathBuf) -> Self {
        self.facts = Some(facts);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_style(mut self, style: Option<PathBuf>) -> Self {
        self.style = style;
        self
    }

    pub fn with_lineage(mut self, lineage: Option<String>) -> Self {
        self.lineage = lineage;
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

impl ConfigBuilder for RenderConfigBuilder {
    type Config = RenderConfig;

    fn build(self) -> Result<Self::Config, crate::error::LineageError> {
        Ok(RenderConfig {
            facts: self.facts.ok_or_else(|| missing_field("facts"))?,
            output: self.output,
            style: self.style,
            lineage: self.lineage,
            placeholders: self.placeholders,
            undirected: self.undirected,
        })
    }
}
