//! Common functionality shared across commands

use std::path::PathBuf;

use clap::Args;

use crate::cli::PlaceholderMode;

/// Style arguments shared by the render and batch commands
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Style configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "STYLE", env = "GRAPH_LINEAGE_CONFIG")]
    pub style: Option<PathBuf>,

    /// Placeholder policy for bases outside the fact set
    #[arg(long, value_enum, env = "GRAPH_LINEAGE_PLACEHOLDERS")]
    pub placeholders: Option<PlaceholderMode>,

    /// Emit an undirected graph
    #[arg(long, env = "GRAPH_LINEAGE_UNDIRECTED")]
    pub undirected: bool,
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::LineageError>;
}

/// Trait for configurations that can be created from CLI commands
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::LineageError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::LineageError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

/// Error for a builder field that was never set
pub(crate) fn missing_field(field: &str) -> crate::error::LineageError {
    crate::error::LineageError::ConfigurationError {
        message: format!("Missing required field: {field}"),
    }
}
