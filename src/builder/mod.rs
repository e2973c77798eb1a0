//! # API Graph Builder
//!
//! Translates a [`FactSet`] into a [`Graph`]: one cluster per package or
//! module (nested along the qualified-name hierarchy), one node per class
//! and one edge per (class, base) pair pointing from derived to base.
//!
//! Construction runs in two passes. The first creates every cluster and
//! class node so that a base declared later in the fact set still resolves
//! to its real node; the second adds the inheritance edges in base-list
//! order, synthesizing placeholder nodes for bases outside the fact set.
//!
//! ```
//! use graph_lineage::builder::ApiGraphBuilder;
//! use graph_lineage::facts::{FactRecord, FactSet};
//! use graph_lineage::render::DotSerializer;
//!
//! # fn main() -> Result<(), graph_lineage::error::LineageError> {
//! let facts = FactSet::new()
//!     .with_record(FactRecord::class("A").with_bases(["B"]))
//!     .with_record(FactRecord::class("B"));
//!
//! let graph = ApiGraphBuilder::new().build(&facts)?;
//! let text = DotSerializer::new().serialize(&graph)?;
//! assert_eq!(text, "digraph {\n    A;\n    B;\n    A -> B;\n}\n");
//! # Ok(())
//! # }
//! ```

mod lineage;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

pub use lineage::LineageFilter;
use tracing::debug;

use crate::constants::builder::SHARED_PLACEHOLDER_NAME;
use crate::error::LineageError;
use crate::facts::{FactRecord, FactSet};
use crate::model::{AttributeMap, ClusterId, Graph, NodeId, style_to_attributes};
use crate::utils::string::{enclosing_paths, leaf_segment};

/// How bases outside the fact set are represented
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// One placeholder node per foreign base, named after it
    #[default]
    PerName,
    /// A single node with the given name stands in for every foreign base
    Shared(String),
}

impl PlaceholderPolicy {
    /// Shared policy using the default placeholder name
    pub fn shared() -> Self {
        PlaceholderPolicy::Shared(SHARED_PLACEHOLDER_NAME.to_string())
    }
}

/// Options controlling graph construction
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    pub directed: bool,
    /// Overrides the fact set's own name
    pub graph_name: Option<String>,
    pub placeholders: PlaceholderPolicy,
    /// Label clusters with the last segment of their qualified name
    pub cluster_labels: bool,
    /// Label qualified class nodes with the last segment of their name
    pub class_labels: bool,
    /// Restrict the graph to the lineage of classes under this prefix
    pub lineage: Option<String>,
    pub graph_attributes: AttributeMap,
    pub node_defaults: AttributeMap,
    pub edge_defaults: AttributeMap,
    /// Applied to every generated cluster
    pub cluster_attributes: AttributeMap,
    /// Applied to every synthesized placeholder node
    pub placeholder_attributes: AttributeMap,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            directed: true,
            graph_name: None,
            placeholders: PlaceholderPolicy::default(),
            cluster_labels: true,
            class_labels: true,
            lineage: None,
            graph_attributes: AttributeMap::new(),
            node_defaults: AttributeMap::new(),
            edge_defaults: AttributeMap::new(),
            cluster_attributes: AttributeMap::new(),
            placeholder_attributes: AttributeMap::new(),
        }
    }
}

/// Builds class-lineage graphs from fact sets
#[derive(Debug, Clone, Default)]
pub struct ApiGraphBuilder {
    options: BuilderOptions,
}

/// Per-build bookkeeping
struct BuildState<'a> {
    graph: Graph,
    /// Qualified names of declared packages and modules
    containers: HashMap<&'a str, &'a FactRecord>,
    clusters: HashMap<&'a str, ClusterId>,
    classes: HashSet<&'a str>,
    placeholders: usize,
}

impl ApiGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Build a graph from `facts`.
    pub fn build(&self, facts: &FactSet) -> Result<Graph, LineageError> {
        let facts = match &self.options.lineage {
            Some(prefix) => Cow::Owned(LineageFilter::new(prefix.as_str()).apply(facts)),
            None => Cow::Borrowed(facts),
        };

        let mut state = BuildState {
            graph: self.new_graph(&facts)?,
            containers: facts
                .containers()
                .map(|record| (record.name.as_str(), record))
                .collect(),
            clusters: HashMap::new(),
            classes: facts.classes().map(|record| record.name.as_str()).collect(),
            placeholders: 0,
        };

        // Pass 1: containment tree
        for record in &facts.records {
            if record.kind.is_container() {
                self.ensure_cluster(&mut state, &record.name)?;
            } else {
                self.add_class(&mut state, record)?;
            }
        }

        // Pass 2: inheritance edges
        for record in facts.classes() {
            let derived = state.graph.find_node(&record.name).ok_or_else(|| {
                LineageError::DanglingEdgeReference {
                    endpoint: record.name.clone(),
                }
            })?;
            for base in &record.bases {
                let head = if state.classes.contains(base.as_str()) {
                    state.graph.find_node(base)
                } else {
                    None
                };
                let head = match head {
                    Some(head) => head,
                    None => self.placeholder(&mut state, base)?,
                };
                state.graph.new_edge(derived, head, None)?;
            }
        }

        debug!(
            nodes = state.graph.node_count(),
            edges = state.graph.edge_count(),
            clusters = state.graph.cluster_count(),
            placeholders = state.placeholders,
            "built lineage graph"
        );
        Ok(state.graph)
    }

    fn new_graph(&self, facts: &FactSet) -> Result<Graph, LineageError> {
        let mut graph = Graph::new(self.options.directed);
        if let Some(name) = self.options.graph_name.as_ref().or(facts.name.as_ref()) {
            graph = graph.with_name(name)?;
        }

        let root = graph.root();
        graph[root].attributes.merge(&self.options.graph_attributes)?;
        graph[root].node_defaults.merge(&self.options.node_defaults)?;
        graph[root].edge_defaults.merge(&self.options.edge_defaults)?;
        Ok(graph)
    }

    /// Cluster for a declared container, creating it and every declared
    /// enclosing container on first use.
    fn ensure_cluster(
        &self,
        state: &mut BuildState<'_>,
        name: &str,
    ) -> Result<Option<ClusterId>, LineageError> {
        let mut parent = None;
        for path in enclosing_paths(name).chain(std::iter::once(name)) {
            let Some(&record) = state.containers.get(path) else {
                continue;
            };
            if let Some(&existing) = state.clusters.get(path) {
                parent = Some(existing);
                continue;
            }

            let id = state.graph.new_cluster(Some(path), parent)?;
            let cluster = &mut state.graph[id];
            if self.options.cluster_labels {
                cluster.attributes.set("label", leaf_segment(path))?;
            }
            cluster.attributes.merge(&self.options.cluster_attributes)?;
            cluster.attributes.merge(&style_to_attributes(&record.style)?)?;

            state.clusters.insert(record.name.as_str(), id);
            parent = Some(id);
        }
        Ok(parent)
    }

    /// Declare a class node inside the closest declared enclosing container.
    fn add_class(&self, state: &mut BuildState<'_>, record: &FactRecord) -> Result<NodeId, LineageError> {
        let enclosing = enclosing_paths(&record.name)
            .filter(|path| state.containers.contains_key(*path))
            .last();
        let parent = match enclosing {
            Some(path) => self.ensure_cluster(state, path)?,
            None => None,
        };

        let id = state.graph.new_node(&record.name, parent)?;
        let node = &mut state.graph[id];
        let leaf = leaf_segment(&record.name);
        if self.options.class_labels && leaf != record.name {
            node.attributes.set("label", leaf)?;
        }
        node.attributes.merge(&style_to_attributes(&record.style)?)?;
        Ok(id)
    }

    /// Node standing in for a base outside the fact set
    fn placeholder(&self, state: &mut BuildState<'_>, base: &str) -> Result<NodeId, LineageError> {
        let name = match &self.options.placeholders {
            PlaceholderPolicy::PerName => base,
            PlaceholderPolicy::Shared(name) => name.as_str(),
        };
        if let Some(existing) = state.graph.find_node(name) {
            return Ok(existing);
        }

        debug!(base, placeholder = name, "synthesizing placeholder for unknown base");
        let id = state.graph.new_node(name, None)?;
        let node = &mut state.graph[id];
        let leaf = leaf_segment(name);
        if self.options.class_labels && leaf != name {
            node.attributes.set("label", leaf)?;
        }
        node.attributes.merge(&self.options.placeholder_attributes)?;
        state.placeholders += 1;
        Ok(id)
    }
}
