use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::common::CommonArgs;

#[derive(Parser)]
#[command(
    name = "graph-lineage",
    about = "Render class lineage graphs as Graphviz DOT",
    long_about = "graph-lineage turns structural facts about a package (packages, modules, \
                  classes and their base classes) into deterministic Graphviz DOT documents. \
                  Packages and modules become nested clusters, classes become nodes and every \
                  inheritance link becomes an edge from the derived class to its base.",
    subcommand_required = true,
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        long_about = "Render a single fact file (JSON or TOML) to DOT. The document is written \
                      to stdout unless --output is given. Use --lineage to restrict the graph \
                      to the classes under a qualified prefix together with their ancestors \
                      and descendants."
    )]
    Render {
        #[arg(value_name = "FACTS", env = "GRAPH_LINEAGE_FACTS")]
        facts: PathBuf,

        #[arg(short, long, env = "GRAPH_LINEAGE_OUTPUT")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PREFIX",
            env = "GRAPH_LINEAGE_LINEAGE"
        )]
        lineage: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    #[command(
        long_about = "Render every fact file found under the given directories. Each file is \
                      built and serialized independently and in parallel, and written to \
                      <output-dir>/<file stem>.dot."
    )]
    Batch {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        #[arg(long, value_name = "DIR", env = "GRAPH_LINEAGE_OUTPUT_DIR")]
        output_dir: PathBuf,

        #[arg(
            long,
            value_name = "GLOB",
            default_value = crate::constants::output::DEFAULT_FACT_PATTERN,
            env = "GRAPH_LINEAGE_PATTERN"
        )]
        pattern: String,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// How bases outside the fact set are drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderMode {
    /// One placeholder node per unknown base
    PerName,
    /// One shared node for all unknown bases
    Shared,
}
