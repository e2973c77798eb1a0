//! Batch command executor

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use indicatif::ParallelProgressIterator;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use tracing::info;

use crate::builder::BuilderOptions;
use crate::config::{BatchConfig, resolve_builder_options};
use crate::constants::output::DOT_EXTENSION;
use crate::discovery::FactDiscovery;
use crate::error::LineageError;
use crate::executors::{CommandExecutor, render_fact_file};
use crate::progress::ProgressReporter;

pub struct BatchExecutor;

impl CommandExecutor for BatchExecutor {
    type Config = BatchConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let options = resolve_builder_options(
            config.style.as_deref(),
            config.placeholders,
            config.undirected,
        )
        .wrap_err("Failed to load style configuration")?;

        let progress = ProgressReporter::new();
        progress.start_discovery();
        let discovery = FactDiscovery::new(&config.pattern)?;
        let files = discovery.discover(&config.paths);
        progress.finish_discovery(files.len());

        if files.is_empty() {
            return Ok(());
        }

        let targets = output_targets(&files, &config.output_dir)?;
        fs::create_dir_all(&config.output_dir)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!(
                    "Failed to create output directory '{}'",
                    config.output_dir.display()
                )
            })?;

        // One graph per task; nothing is shared between them
        let pb = progress.start_rendering(targets.len());
        let failures: Vec<(PathBuf, LineageError)> = targets
            .par_iter()
            .progress_with(pb.clone())
            .filter_map(|(input, output)| {
                render_to_file(input, output, &options)
                    .err()
                    .map(|e| (input.clone(), e))
            })
            .collect();

        let rendered = targets.len() - failures.len();
        progress.finish_rendering(&pb, rendered, failures.len());
        info!(rendered, failed = failures.len(), "batch rendering complete");

        if failures.is_empty() {
            return Ok(());
        }

        for (input, error) in &failures {
            eprintln!(
                "{} {}: {}",
                style("✗").red(),
                style(input.display()).bold(),
                error
            );
        }

        let (first_input, first_error) = failures
            .into_iter()
            .next()
            .ok_or_else(|| miette::miette!("Batch rendering failed"))?;
        Err(miette::Report::new(first_error))
            .wrap_err_with(|| format!("Failed to render '{}'", first_input.display()))
    }
}

fn render_to_file(
    input: &Path,
    output: &Path,
    options: &BuilderOptions,
) -> std::result::Result<(), LineageError> {
    let text = render_fact_file(input, options)?;
    fs::write(output, text)?;
    Ok(())
}

/// Pair every input with `<output_dir>/<stem>.dot`. Two inputs mapping to the
/// same output file is a configuration error.
fn output_targets(
    files: &[PathBuf],
    output_dir: &Path,
) -> std::result::Result<Vec<(PathBuf, PathBuf)>, LineageError> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut targets = Vec::with_capacity(files.len());

    for input in files {
        let stem = input
            .file_stem()
            .ok_or_else(|| LineageError::ConfigurationError {
                message: format!("Cannot derive an output name from '{}'", input.display()),
            })?;
        let output = output_dir.join(format!("{}.{DOT_EXTENSION}", stem.to_string_lossy()));

        if let Some(previous) = claimed.insert(output.clone(), input) {
            return Err(LineageError::ConfigurationError {
                message: format!(
                    "'{}' and '{}' would both be written to '{}'",
                    previous.display(),
                    input.display(),
                    output.display()
                ),
            });
        }
        targets.push((input.clone(), output));
    }

    Ok(targets)
}
