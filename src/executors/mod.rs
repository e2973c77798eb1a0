//! Command executors that handle the actual logic for each command

pub mod batch;
pub mod render;

use std::path::Path;

use miette::Result;

use crate::builder::{ApiGraphBuilder, BuilderOptions};
use crate::error::LineageError;
use crate::facts::FactSet;
use crate::render::DotSerializer;

/// Trait for command executors
pub trait CommandExecutor {
    type Config;

    /// Execute the command with the given configuration
    fn execute(config: Self::Config) -> Result<()>;
}

/// Load one fact file and serialize the graph built from it.
pub(crate) fn render_fact_file(
    path: &Path,
    options: &BuilderOptions,
) -> std::result::Result<String, LineageError> {
    let facts = FactSet::load(path)?;
    let graph = ApiGraphBuilder::with_options(options.clone()).build(&facts)?;
    DotSerializer::new().serialize(&graph)
}
