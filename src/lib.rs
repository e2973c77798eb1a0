//! # Graph Lineage - Class Lineage Graphs as Graphviz DOT
//!
//! Graph Lineage builds an in-memory model of a directed or undirected graph
//! (nodes, edges, nested clusters and their attributes) and serializes it
//! deterministically into Graphviz DOT. On top of the model sits a builder
//! that turns structural facts about a package (packages, modules, classes
//! and their bases) into an inheritance graph.
//!
//! ## Main Components
//!
//! - **Model**: the graph object model with per-graph identity registries
//! - **Render**: explicit-stack traversal and the DOT serializer
//! - **Facts**: the input fact interface, loadable from JSON or TOML
//! - **Builder**: translates fact sets into graphs, including lineage
//!   filtering and placeholder nodes for unknown bases
//!
//! ## Usage
//!
//! ### Building a graph by hand
//!
//! ```
//! use graph_lineage::model::Graph;
//! use graph_lineage::render::DotSerializer;
//!
//! # fn main() -> Result<(), graph_lineage::error::LineageError> {
//! let mut graph = Graph::directed();
//! let a = graph.new_node("A", None)?;
//! let b = graph.new_node("B", None)?;
//! graph.new_edge(a, b, None)?;
//!
//! let text = DotSerializer::new().serialize(&graph)?;
//! assert_eq!(text, "digraph {\n    A;\n    B;\n    A -> B;\n}\n");
//! # Ok(())
//! # }
//! ```
//!
//! ### Rendering a fact file
//!
//! ```no_run
//! use std::path::Path;
//!
//! use graph_lineage::builder::{ApiGraphBuilder, BuilderOptions, PlaceholderPolicy};
//! use graph_lineage::facts::FactSet;
//! use graph_lineage::render::DotSerializer;
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! let facts = FactSet::load(Path::new("facts/uqbar.json"))?;
//!
//! let options = BuilderOptions {
//!     lineage: Some("uqbar.io".to_string()),
//!     placeholders: PlaceholderPolicy::shared(),
//!     ..BuilderOptions::default()
//! };
//! let graph = ApiGraphBuilder::with_options(options).build(&facts)?;
//!
//! let mut file = std::fs::File::create("uqbar.dot").into_diagnostic()?;
//! DotSerializer::new().write_to(&graph, &mut file)?;
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod discovery;
mod progress;
mod utils;

// Public modules
pub mod builder;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod executors;
pub mod facts;
pub mod model;
pub mod render;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let cli = Cli::parse();
    execute_command(cli.command)
}
