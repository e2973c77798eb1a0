//! Graph entities and the handles used to address them
//!
//! Entities live in arenas owned by [`Graph`](super::Graph); everything else
//! refers to them through the copyable handles defined here.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::constants::grammar::CLUSTER_PREFIX;
use crate::model::attributes::AttributeMap;

/// Identity of one [`Graph`](super::Graph) instance. Every handle carries the
/// key of the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct GraphKey(u32);

impl GraphKey {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        GraphKey(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub(crate) graph: GraphKey,
            pub(crate) index: usize,
        }

        impl $name {
            pub(crate) fn new(graph: GraphKey, index: usize) -> Self {
                Self { graph, index }
            }

            /// Position in the owning graph's arena
            pub fn index(self) -> usize {
                self.index
            }
        }
    };
}

arena_handle!(
    /// Handle to a node in a graph's arena
    NodeId
);

arena_handle!(
    /// Handle to an edge in a graph's arena
    EdgeId
);

arena_handle!(
    /// Handle to a cluster in a graph's arena; the root cluster is always index 0
    ClusterId
);

/// An entry in a cluster's ordered child list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    Edge(EdgeId),
    Cluster(ClusterId),
}

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    /// Cluster in which the node was first declared
    pub(crate) parent: ClusterId,
    pub attributes: AttributeMap,
}

impl Node {
    pub(crate) fn new(name: String, parent: ClusterId) -> Self {
        Self {
            name,
            parent,
            attributes: AttributeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> ClusterId {
        self.parent
    }
}

/// Compass point qualifier on an edge end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Center,
}

impl Compass {
    pub fn as_str(self) -> &'static str {
        match self {
            Compass::North => "n",
            Compass::NorthEast => "ne",
            Compass::East => "e",
            Compass::SouthEast => "se",
            Compass::South => "s",
            Compass::SouthWest => "sw",
            Compass::West => "w",
            Compass::NorthWest => "nw",
            Compass::Center => "c",
        }
    }
}

/// Port qualifier on an edge end, for record and HTML-shaped nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Port {
    pub name: Option<String>,
    pub compass: Option<Compass>,
}

impl Port {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            compass: None,
        }
    }

    pub fn compass(compass: Compass) -> Self {
        Self {
            name: None,
            compass: Some(compass),
        }
    }

    pub fn with_compass(mut self, compass: Compass) -> Self {
        self.compass = Some(compass);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.compass.is_none()
    }
}

/// Arrow direction override, emitted as the `dir` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Forward,
    Back,
    Both,
    None,
}

impl EdgeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeDirection::Forward => "forward",
            EdgeDirection::Back => "back",
            EdgeDirection::Both => "both",
            EdgeDirection::None => "none",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) tail: NodeId,
    pub(crate) head: NodeId,
    pub(crate) parent: ClusterId,
    pub tail_port: Option<Port>,
    pub head_port: Option<Port>,
    pub direction: Option<EdgeDirection>,
    pub attributes: AttributeMap,
}

impl Edge {
    pub(crate) fn new(tail: NodeId, head: NodeId, parent: ClusterId) -> Self {
        Self {
            tail,
            head,
            parent,
            tail_port: None,
            head_port: None,
            direction: None,
            attributes: AttributeMap::new(),
        }
    }

    pub fn tail(&self) -> NodeId {
        self.tail
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn parent(&self) -> ClusterId {
        self.parent
    }

    pub fn with_tail_port(&mut self, port: Port) -> &mut Self {
        self.tail_port = Some(port);
        self
    }

    pub fn with_head_port(&mut self, port: Port) -> &mut Self {
        self.head_port = Some(port);
        self
    }

    pub fn with_direction(&mut self, direction: EdgeDirection) -> &mut Self {
        self.direction = Some(direction);
        self
    }
}

/// Whether a container is drawn as a cluster box or only groups statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    Root,
    Cluster,
    Subgraph,
}

impl ClusterKind {
    /// Identifier written after `subgraph` for a block with this name
    pub fn block_id(self, name: &str) -> String {
        match self {
            ClusterKind::Cluster => format!("{CLUSTER_PREFIX}{name}"),
            ClusterKind::Root | ClusterKind::Subgraph => name.to_string(),
        }
    }
}

/// A container of nodes, edges and nested clusters.
///
/// Besides its own (graph-class) attributes, a cluster carries node and edge
/// defaults that descendants inherit unless they override them.
#[derive(Debug, Clone)]
pub struct Cluster {
    name: Option<String>,
    /// Name used in the output; synthesized for anonymous clusters
    pub(crate) emitted_name: Option<String>,
    pub(crate) kind: ClusterKind,
    pub(crate) parent: Option<ClusterId>,
    pub(crate) children: Vec<Child>,
    pub attributes: AttributeMap,
    pub node_defaults: AttributeMap,
    pub edge_defaults: AttributeMap,
}

impl Cluster {
    pub(crate) fn new(
        name: Option<String>,
        emitted_name: Option<String>,
        kind: ClusterKind,
        parent: Option<ClusterId>,
    ) -> Self {
        Self {
            name,
            emitted_name,
            kind,
            parent,
            children: Vec::new(),
            attributes: AttributeMap::new(),
            node_defaults: AttributeMap::new(),
            edge_defaults: AttributeMap::new(),
        }
    }

    /// The user-supplied name, `None` for anonymous clusters and the root
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn emitted_name(&self) -> Option<&str> {
        self.emitted_name.as_deref()
    }

    /// Block identifier in the output, e.g. `cluster_io` for a cluster named `io`
    pub fn block_id(&self) -> Option<String> {
        self.emitted_name().map(|name| self.kind.block_id(name))
    }

    pub fn kind(&self) -> ClusterKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ClusterId> {
        self.parent
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.kind == ClusterKind::Root
    }
}
