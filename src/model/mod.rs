//! # Graph Object Model
//!
//! In-memory model of a DOT graph: nodes, edges, nested clusters and the
//! attribute maps attached to each of them.
//!
//! ## Components
//!
//! - **Graph**: the root container; owns every entity in arenas and keeps the
//!   graph-wide node and cluster registries
//! - **Cluster**: ordered children plus graph/node/edge default attributes
//! - **Node** / **Edge**: addressable elements with their own attributes
//! - **AttributeMap**: ordered, typed attribute storage
//!
//! ## Example
//!
//! ```
//! use graph_lineage::model::Graph;
//!
//! # fn main() -> Result<(), graph_lineage::error::LineageError> {
//! let mut graph = Graph::directed();
//! let package = graph.new_cluster(Some("uqbar"), None)?;
//! graph[package].attributes.set("label", "uqbar")?;
//!
//! let timer = graph.new_node("uqbar.io.Timer", Some(package))?;
//! let object = graph.new_node("builtins.object", None)?;
//! graph.new_edge(timer, object, None)?;
//!
//! // Re-requesting a node by name returns the same handle
//! assert_eq!(graph.new_node("uqbar.io.Timer", None)?, timer);
//! # Ok(())
//! # }
//! ```

mod attributes;
mod entities;
mod graph;
mod html;
pub mod identifier;

pub use attributes::{
    AttributeMap, AttributeValue, RecordField, RecordLabel, StyleMap, StyleValue,
    style_to_attributes,
};
pub use entities::{
    Child, Cluster, ClusterId, ClusterKind, Compass, Edge, EdgeDirection, EdgeId, Node, NodeId,
    Port,
};
pub use graph::Graph;
pub use html::{CellEntry, HtmlContent, HtmlLabel, RowEntry, Table, TableCell, TableRow};
