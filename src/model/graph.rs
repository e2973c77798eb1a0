use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::constants::grammar::ANONYMOUS_CLUSTER_STEM;
use crate::error::LineageError;
use crate::model::attributes::AttributeValue;
use crate::model::entities::{
    Child, Cluster, ClusterId, ClusterKind, Edge, EdgeId, GraphKey, Node, NodeId,
};
use crate::model::identifier::validate_name;

const ROOT_INDEX: usize = 0;

/// The root of a graph model.
///
/// All entities live in arenas owned by the graph and are addressed by
/// handles. The containment tree (root cluster → clusters → children) is
/// append-only: entities cannot be removed or reparented once created, so it
/// can never contain a cycle. Node and cluster names are unique graph-wide;
/// the registries that enforce this belong to this instance only. Handles
/// issued by another graph are rejected.
#[derive(Debug, Clone)]
pub struct Graph {
    key: GraphKey,
    name: Option<String>,
    directed: bool,
    strict: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    clusters: Vec<Cluster>,
    node_index: HashMap<String, NodeId>,
    cluster_index: HashMap<String, ClusterId>,
    /// Identifiers of emitted `subgraph` blocks, after the cluster prefix
    block_ids: HashSet<String>,
    anonymous_clusters: usize,
}

impl Graph {
    /// Create an empty graph. Directedness is fixed for the graph's lifetime.
    pub fn new(directed: bool) -> Self {
        Self {
            key: GraphKey::next(),
            name: None,
            directed,
            strict: false,
            nodes: Vec::new(),
            edges: Vec::new(),
            clusters: vec![Cluster::new(None, None, ClusterKind::Root, None)],
            node_index: HashMap::new(),
            cluster_index: HashMap::new(),
            block_ids: HashSet::new(),
            anonymous_clusters: 0,
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, LineageError> {
        validate_name("graph", name)?;
        self.name = Some(name.to_string());
        Ok(self)
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn root(&self) -> ClusterId {
        ClusterId::new(self.key, ROOT_INDEX)
    }

    /// Create a cluster under `parent` (the root when `None`).
    ///
    /// Anonymous clusters get a synthesized name so they can still be emitted
    /// with the `cluster_` prefix.
    pub fn new_cluster(
        &mut self,
        name: Option<&str>,
        parent: Option<ClusterId>,
    ) -> Result<ClusterId, LineageError> {
        self.add_container(name, parent, ClusterKind::Cluster)
    }

    /// Create a plain subgraph under `parent`. Subgraphs group statements
    /// (e.g. for `rank=same`) without being drawn as a box.
    pub fn new_subgraph(
        &mut self,
        name: Option<&str>,
        parent: Option<ClusterId>,
    ) -> Result<ClusterId, LineageError> {
        self.add_container(name, parent, ClusterKind::Subgraph)
    }

    fn add_container(
        &mut self,
        name: Option<&str>,
        parent: Option<ClusterId>,
        kind: ClusterKind,
    ) -> Result<ClusterId, LineageError> {
        let parent = self.check_cluster(parent)?;
        let id = ClusterId::new(self.key, self.clusters.len());

        let emitted_name = match name {
            Some(name) => {
                validate_name("cluster", name)?;
                if self.cluster_index.contains_key(name) {
                    return Err(LineageError::DuplicateClusterName {
                        name: name.to_string(),
                    });
                }
                let block_id = kind.block_id(name);
                if self.block_ids.contains(&block_id) {
                    return Err(LineageError::DuplicateClusterName { name: block_id });
                }
                Some(name.to_string())
            }
            None if kind == ClusterKind::Cluster => Some(self.synthesize_cluster_name()),
            None => None,
        };

        if let Some(emitted) = &emitted_name {
            self.cluster_index.insert(emitted.clone(), id);
            self.block_ids.insert(kind.block_id(emitted));
        }

        debug!(cluster = ?emitted_name, parent = parent.index, "created cluster");
        self.clusters.push(Cluster::new(
            name.map(str::to_string),
            emitted_name,
            kind,
            Some(parent),
        ));
        self.clusters[parent.index].children.push(Child::Cluster(id));
        Ok(id)
    }

    fn synthesize_cluster_name(&mut self) -> String {
        loop {
            let candidate = format!("{}_{}", ANONYMOUS_CLUSTER_STEM, self.anonymous_clusters);
            self.anonymous_clusters += 1;
            if !self.cluster_index.contains_key(&candidate)
                && !self
                    .block_ids
                    .contains(&ClusterKind::Cluster.block_id(&candidate))
            {
                return candidate;
            }
        }
    }

    /// Create a node, or return the existing node with this name.
    ///
    /// A new node is declared in `parent` (the root when `None`). When the
    /// name is already registered and a different `parent` is given
    /// explicitly, that cluster gets a reference to the existing node; the
    /// serializer still emits the node only once.
    pub fn new_node(
        &mut self,
        name: &str,
        parent: Option<ClusterId>,
    ) -> Result<NodeId, LineageError> {
        validate_name("node", name)?;
        let explicit_parent = parent.is_some();
        let parent = self.check_cluster(parent)?;

        if let Some(&existing) = self.node_index.get(name) {
            let children = &mut self.clusters[parent.index].children;
            if explicit_parent && !children.contains(&Child::Node(existing)) {
                children.push(Child::Node(existing));
            }
            return Ok(existing);
        }

        let id = NodeId::new(self.key, self.nodes.len());
        debug!(node = name, parent = parent.index, "created node");
        self.nodes.push(Node::new(name.to_string(), parent));
        self.node_index.insert(name.to_string(), id);
        self.clusters[parent.index].children.push(Child::Node(id));
        Ok(id)
    }

    /// Create an edge from `tail` to `head` in `parent` (the root when
    /// `None`). Both endpoints must belong to this graph.
    pub fn new_edge(
        &mut self,
        tail: NodeId,
        head: NodeId,
        parent: Option<ClusterId>,
    ) -> Result<EdgeId, LineageError> {
        for endpoint in [tail, head] {
            if self.get_node(endpoint).is_none() {
                return Err(LineageError::DanglingEdgeReference {
                    endpoint: format!("#{}", endpoint.index),
                });
            }
        }
        let parent = self.check_cluster(parent)?;

        let id = EdgeId::new(self.key, self.edges.len());
        debug!(
            tail = self.nodes[tail.index].name(),
            head = self.nodes[head.index].name(),
            "created edge"
        );
        self.edges.push(Edge::new(tail, head, parent));
        self.clusters[parent.index].children.push(Child::Edge(id));
        Ok(id)
    }

    /// Create an edge between two nodes looked up by name.
    pub fn new_edge_between(
        &mut self,
        tail: &str,
        head: &str,
        parent: Option<ClusterId>,
    ) -> Result<EdgeId, LineageError> {
        let lookup = |name: &str| {
            self.find_node(name)
                .ok_or_else(|| LineageError::DanglingEdgeReference {
                    endpoint: name.to_string(),
                })
        };
        let tail = lookup(tail)?;
        let head = lookup(head)?;
        self.new_edge(tail, head, parent)
    }

    fn check_cluster(&self, cluster: Option<ClusterId>) -> Result<ClusterId, LineageError> {
        match cluster {
            None => Ok(self.root()),
            Some(id) if self.get_cluster(id).is_some() => Ok(id),
            Some(id) => Err(LineageError::UnknownCluster { index: id.index }),
        }
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn find_cluster(&self, name: &str) -> Option<ClusterId> {
        self.cluster_index.get(name).copied()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.owns(id.graph).then(|| self.nodes.get(id.index)).flatten()
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.owns(id.graph).then(|| self.edges.get(id.index)).flatten()
    }

    pub fn get_cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.owns(id.graph).then(|| self.clusters.get(id.index)).flatten()
    }

    fn owns(&self, key: GraphKey) -> bool {
        self.key == key
    }

    /// Arena position for indexing. Like slice indexing, a handle from
    /// another graph panics.
    fn slot(&self, key: GraphKey, index: usize) -> usize {
        assert!(self.owns(key), "handle #{index} belongs to another graph");
        index
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of clusters and subgraphs, not counting the root
    pub fn cluster_count(&self) -> usize {
        self.clusters.len() - 1
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(self.key, i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(self.key, i), e))
    }

    /// Walk from `cluster` up to the root, both included.
    pub fn ancestors(&self, cluster: ClusterId) -> impl Iterator<Item = ClusterId> + '_ {
        std::iter::successors(Some(cluster), move |id| {
            self.get_cluster(*id).and_then(Cluster::parent)
        })
    }

    /// Effective value of a node attribute: the node's own entry, else the
    /// closest enclosing cluster's node default.
    pub fn resolve_node_attribute(&self, node: NodeId, name: &str) -> Option<&AttributeValue> {
        let node = self.get_node(node)?;
        node.attributes.resolve(
            name,
            self.ancestors(node.parent)
                .map(|id| &self.clusters[id.index].node_defaults),
        )
    }

    /// Effective value of an edge attribute: the edge's own entry, else the
    /// closest enclosing cluster's edge default.
    pub fn resolve_edge_attribute(&self, edge: EdgeId, name: &str) -> Option<&AttributeValue> {
        let edge = self.get_edge(edge)?;
        edge.attributes.resolve(
            name,
            self.ancestors(edge.parent)
                .map(|id| &self.clusters[id.index].edge_defaults),
        )
    }

    /// Effective value of a cluster attribute, inherited from enclosing
    /// clusters and the root.
    pub fn resolve_cluster_attribute(
        &self,
        cluster: ClusterId,
        name: &str,
    ) -> Option<&AttributeValue> {
        let own = self.get_cluster(cluster)?;
        own.attributes.resolve(
            name,
            self.ancestors(cluster)
                .skip(1)
                .map(|id| &self.clusters[id.index].attributes),
        )
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[self.slot(id.graph, id.index)]
    }
}

impl IndexMut<NodeId> for Graph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        let slot = self.slot(id.graph, id.index);
        &mut self.nodes[slot]
    }
}

impl Index<EdgeId> for Graph {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Edge {
        &self.edges[self.slot(id.graph, id.index)]
    }
}

impl IndexMut<EdgeId> for Graph {
    fn index_mut(&mut self, id: EdgeId) -> &mut Edge {
        let slot = self.slot(id.graph, id.index);
        &mut self.edges[slot]
    }
}

impl Index<ClusterId> for Graph {
    type Output = Cluster;

    fn index(&self, id: ClusterId) -> &Cluster {
        &self.clusters[self.slot(id.graph, id.index)]
    }
}

impl IndexMut<ClusterId> for Graph {
    fn index_mut(&mut self, id: ClusterId) -> &mut Cluster {
        let slot = self.slot(id.graph, id.index);
        &mut self.clusters[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = Graph::directed();
        assert!(graph.is_directed());
        assert!(!graph.is_strict());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.cluster_count(), 0);
        assert!(graph[graph.root()].is_root());
        assert!(graph[graph.root()].children().is_empty());
    }

    #[test]
    fn test_node_dedup_by_name() {
        let mut graph = Graph::directed();
        let first = graph.new_node("A", None).unwrap();
        let second = graph.new_node("A", None).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph[graph.root()].children(), &[Child::Node(first)]);
    }

    #[test]
    fn test_node_redeclared_in_other_cluster_adds_reference() {
        let mut graph = Graph::directed();
        let a = graph.new_cluster(Some("a"), None).unwrap();
        let b = graph.new_cluster(Some("b"), None).unwrap();
        let node = graph.new_node("Shared", Some(a)).unwrap();
        let again = graph.new_node("Shared", Some(b)).unwrap();
        let lookup_only = graph.new_node("Shared", None).unwrap();

        assert_eq!(node, again);
        assert_eq!(node, lookup_only);
        assert_eq!(graph[node].parent(), a);
        assert_eq!(graph[b].children(), &[Child::Node(node)]);
        assert_eq!(graph[graph.root()].children().len(), 2);
    }

    #[test]
    fn test_duplicate_cluster_name() {
        let mut graph = Graph::directed();
        let outer = graph.new_cluster(Some("pkg"), None).unwrap();
        let err = graph.new_cluster(Some("pkg"), Some(outer)).unwrap_err();
        assert!(matches!(err, LineageError::DuplicateClusterName { name } if name == "pkg"));
    }

    #[test]
    fn test_subgraph_cannot_shadow_cluster_block() {
        let mut graph = Graph::directed();
        graph.new_cluster(Some("a"), None).unwrap();
        let err = graph.new_subgraph(Some("cluster_a"), None).unwrap_err();
        assert!(
            matches!(err, LineageError::DuplicateClusterName { name } if name == "cluster_a")
        );

        graph.new_subgraph(Some("cluster_b"), None).unwrap();
        let err = graph.new_cluster(Some("b"), None).unwrap_err();
        assert!(
            matches!(err, LineageError::DuplicateClusterName { name } if name == "cluster_b")
        );
    }

    #[test]
    fn test_anonymous_cluster_skips_subgraph_block_ids() {
        let mut graph = Graph::directed();
        graph
            .new_subgraph(Some("cluster_anonymous_0"), None)
            .unwrap();
        let anonymous = graph.new_cluster(None, None).unwrap();
        assert_eq!(graph[anonymous].emitted_name(), Some("anonymous_1"));
    }

    #[test]
    fn test_anonymous_clusters_get_unique_names() {
        let mut graph = Graph::directed();
        graph.new_cluster(Some("anonymous_0"), None).unwrap();
        let first = graph.new_cluster(None, None).unwrap();
        let second = graph.new_cluster(None, None).unwrap();

        assert_eq!(graph[first].emitted_name(), Some("anonymous_1"));
        assert_eq!(graph[second].emitted_name(), Some("anonymous_2"));
        assert!(graph[first].name().is_none());

        let plain = graph.new_subgraph(None, None).unwrap();
        assert!(graph[plain].emitted_name().is_none());
    }

    #[test]
    fn test_edge_requires_registered_nodes() {
        let mut graph = Graph::directed();
        graph.new_node("A", None).unwrap();

        let err = graph.new_edge_between("A", "B", None).unwrap_err();
        assert!(matches!(err, LineageError::DanglingEdgeReference { endpoint } if endpoint == "B"));

        let mut other = Graph::directed();
        other.new_node("X", None).unwrap();
        let y = other.new_node("Y", None).unwrap();
        let x = graph.find_node("A").unwrap();
        assert!(graph.new_edge(x, y, None).is_err());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_foreign_node_with_valid_index_is_rejected() {
        let mut other = Graph::directed();
        let foreign = other.new_node("Foreign", None).unwrap();

        let mut graph = Graph::directed();
        let a = graph.new_node("A", None).unwrap();
        assert_eq!(foreign.index(), a.index());

        let err = graph.new_edge(a, foreign, None).unwrap_err();
        assert!(matches!(err, LineageError::DanglingEdgeReference { .. }));
        assert!(graph.get_node(foreign).is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_foreign_cluster_with_valid_index_is_rejected() {
        let mut other = Graph::directed();
        let foreign = other.new_cluster(Some("c"), None).unwrap();

        let mut graph = Graph::directed();
        let local = graph.new_cluster(Some("d"), None).unwrap();
        assert_eq!(foreign.index(), local.index());

        let err = graph.new_node("A", Some(foreign)).unwrap_err();
        assert!(matches!(err, LineageError::UnknownCluster { index: 1 }));
        let err = graph.new_cluster(Some("e"), Some(other.root())).unwrap_err();
        assert!(matches!(err, LineageError::UnknownCluster { index: 0 }));
        assert!(graph.get_cluster(foreign).is_none());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    #[should_panic(expected = "belongs to another graph")]
    fn test_indexing_with_foreign_handle_panics() {
        let mut other = Graph::directed();
        let foreign = other.new_node("Foreign", None).unwrap();

        let mut graph = Graph::directed();
        graph.new_node("A", None).unwrap();
        let _ = &graph[foreign];
    }

    #[test]
    fn test_foreign_cluster_handle() {
        let mut other = Graph::directed();
        let foreign = other.new_cluster(Some("c"), None).unwrap();

        let mut graph = Graph::directed();
        let err = graph.new_node("A", Some(foreign)).unwrap_err();
        assert!(matches!(err, LineageError::UnknownCluster { index: 1 }));
    }

    #[test]
    fn test_invalid_names() {
        let mut graph = Graph::directed();
        assert!(graph.new_node("", None).is_err());
        assert!(graph.new_cluster(Some("bad\0"), None).is_err());
        assert!(Graph::directed().with_name("").is_err());
    }

    #[test]
    fn test_resolve_precedence() {
        let mut graph = Graph::directed();
        let root = graph.root();
        graph[root].node_defaults.set("fontname", "Arial").unwrap();
        let cluster = graph.new_cluster(Some("pkg"), None).unwrap();
        graph[cluster].node_defaults.set("color", "red").unwrap();
        let node = graph.new_node("A", Some(cluster)).unwrap();
        graph[node].attributes.set("color", "blue").unwrap();
        let other = graph.new_node("B", Some(cluster)).unwrap();

        assert_eq!(
            graph.resolve_node_attribute(node, "color"),
            Some(&AttributeValue::text("blue"))
        );
        assert_eq!(
            graph.resolve_node_attribute(other, "color"),
            Some(&AttributeValue::text("red"))
        );
        assert_eq!(
            graph.resolve_node_attribute(other, "fontname"),
            Some(&AttributeValue::text("Arial"))
        );
        assert!(graph.resolve_node_attribute(other, "shape").is_none());
    }

    #[test]
    fn test_resolve_edge_and_cluster_attributes() {
        let mut graph = Graph::directed();
        let root = graph.root();
        graph[root].edge_defaults.set("arrowhead", "empty").unwrap();
        graph[root].attributes.set("fontsize", 10).unwrap();
        let cluster = graph.new_cluster(Some("pkg"), None).unwrap();
        let a = graph.new_node("A", Some(cluster)).unwrap();
        let b = graph.new_node("B", Some(cluster)).unwrap();
        let edge = graph.new_edge(a, b, Some(cluster)).unwrap();

        assert_eq!(
            graph.resolve_edge_attribute(edge, "arrowhead"),
            Some(&AttributeValue::text("empty"))
        );
        assert_eq!(
            graph.resolve_cluster_attribute(cluster, "fontsize"),
            Some(&AttributeValue::Integer(10))
        );
    }

    #[test]
    fn test_ancestors() {
        let mut graph = Graph::directed();
        let outer = graph.new_cluster(Some("outer"), None).unwrap();
        let inner = graph.new_cluster(Some("inner"), Some(outer)).unwrap();

        let chain: Vec<ClusterId> = graph.ancestors(inner).collect();
        assert_eq!(chain, vec![inner, outer, graph.root()]);
    }

    #[test]
    fn test_graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
