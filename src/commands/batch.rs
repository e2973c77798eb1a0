//! Batch command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::BatchConfig;
use crate::error::LineageError;

impl FromCommand for BatchConfig {
    fn from_command(command: Commands) -> Result<Self, LineageError> {
        match command {
            Commands::Batch {
                paths,
                output_dir,
                pattern,
                common,
            } => BatchConfig::builder()
                .with_paths(paths)
                .with_output_dir(output_dir)
                .with_pattern(pattern)
                .with_style(common.style)
                .with_placeholders(common.placeholders)
                .with_undirected(common.undirected)
                .build(),
            _ => Err(LineageError::ConfigurationError {
                message: "Invalid command type for BatchConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(BatchConfig);

/// Execute the batch command over every discovered fact file
pub fn execute_batch_command(command: Commands) -> Result<()> {
    let config = BatchConfig::from_command(command)
        .wrap_err("Failed to parse batch command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::batch::BatchExecutor;
    BatchExecutor::execute(config)
}
