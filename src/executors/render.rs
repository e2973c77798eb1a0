//! Render command executor

use std::fs::File;
use std::io::{self, BufWriter, Write};

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::info;

use crate::config::{RenderConfig, resolve_builder_options};
use crate::executors::{CommandExecutor, render_fact_file};

pub struct RenderExecutor;

impl CommandExecutor for RenderExecutor {
    type Config = RenderConfig;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Rendering {}...",
            style("📊").cyan(),
            style(config.facts.display()).bold()
        );

        let mut options = resolve_builder_options(
            config.style.as_deref(),
            config.placeholders,
            config.undirected,
        )
        .wrap_err("Failed to load style configuration")?;
        options.lineage = config.lineage.clone();

        let text = render_fact_file(&config.facts, &options).wrap_err_with(|| {
            format!("Failed to render '{}'", config.facts.display())
        })?;
        info!(facts = %config.facts.display(), bytes = text.len(), "rendered graph");

        // Determine output destination
        let mut output_writer: Box<dyn Write> = if let Some(output_path) = config.output.as_ref()
        {
            Box::new(BufWriter::new(
                File::create(output_path)
                    .into_diagnostic()
                    .wrap_err_with(|| {
                        format!("Failed to create output file '{}'", output_path.display())
                    })?,
            ))
        } else {
            Box::new(io::stdout())
        };

        output_writer
            .write_all(text.as_bytes())
            .and_then(|()| output_writer.flush())
            .into_diagnostic()
            .wrap_err("Failed to write DOT output")?;

        if let Some(output_path) = config.output {
            eprintln!(
                "{} Graph written to {}",
                style("✓").green(),
                style(output_path.display()).bold()
            );
        }

        Ok(())
    }
}
