//! Render command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::RenderConfig;
use crate::error::LineageError;

impl FromCommand for RenderConfig {
    fn from_command(command: Commands) -> Result<Self, LineageError> {
        match command {
            Commands::Render {
                facts,
                output,
                lineage,
                common,
            } => RenderConfig::builder()
                .with_facts(facts)
                .with_output(output)
                .with_lineage(lineage)
                .with_style(common.style)
                .with_placeholders(common.placeholders)
                .with_undirected(common.undirected)
                .build(),
            _ => Err(LineageError::ConfigurationError {
                message: "Invalid command type for RenderConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(RenderConfig);

/// Execute the render command for a single fact file
pub fn execute_render_command(command: Commands) -> Result<()> {
    let config = RenderConfig::from_command(command)
        .wrap_err("Failed to parse render command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::render::RenderExecutor;
    RenderExecutor::execute(config)
}
