//! # Configuration Module
//!
//! Configuration structures for the graph-lineage commands and the style
//! file shared by both of them. Command configs are assembled with builder
//! patterns:
//!
//! ```
//! use graph_lineage::common::ConfigBuilder;
//! use graph_lineage::config::{BatchConfig, RenderConfig};
//!
//! let render = RenderConfig::builder()
//!     .with_facts("facts/uqbar.json".into())
//!     .with_lineage(Some("uqbar.io".to_string()))
//!     .build()
//!     .unwrap();
//! assert!(render.output.is_none());
//!
//! let batch = BatchConfig::builder()
//!     .with_paths(vec!["facts".into()])
//!     .with_output_dir("graphs".into())
//!     .build()
//!     .unwrap();
//! assert_eq!(batch.pattern, "*.json");
//! ```

pub mod batch;
pub mod render;
pub mod style;

pub use batch::BatchConfig;
pub use render::RenderConfig;
pub use style::{StyleConfig, resolve_builder_options};
