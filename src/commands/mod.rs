//! Command implementations for the graph-lineage CLI
//!
//! - render: render one fact file to DOT
//! - batch: render every fact file under a set of directories

pub mod batch;
pub mod render;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Render { .. } => render::execute_render_command(command),
        Commands::Batch { .. } => batch::execute_batch_command(command),
    }
}
