use std::io::Write;

use tracing::debug;

use super::walk::{Visit, traversal};
use super::writer::DotWriter;
use crate::constants::grammar::{
    DIRECTED_CONNECTOR, DIRECTED_KEYWORD, STRICT_KEYWORD, SUBGRAPH_KEYWORD,
    UNDIRECTED_CONNECTOR, UNDIRECTED_KEYWORD,
};
use crate::constants::output::DEFAULT_INDENT;
use crate::error::LineageError;
use crate::model::identifier::format_id;
use crate::model::{
    AttributeMap, AttributeValue, Cluster, ClusterId, ClusterKind, EdgeId, Graph, NodeId, Port,
};

/// Serializes a [`Graph`] into DOT text.
///
/// The output is a function of the graph alone: the same graph always
/// produces byte-identical text, so callers can key caches on a hash of it.
#[derive(Debug, Clone)]
pub struct DotSerializer {
    indent: usize,
}

impl Default for DotSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl DotSerializer {
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }

    /// Spaces per nesting level
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Serialize the whole graph into a string.
    pub fn serialize(&self, graph: &Graph) -> Result<String, LineageError> {
        let visits = traversal(graph);
        self.serialize_visits(graph, &visits)
    }

    /// Serialize the graph and write the text to `output`.
    pub fn write_to(&self, graph: &Graph, output: &mut dyn Write) -> Result<(), LineageError> {
        let text = self.serialize(graph)?;
        output.write_all(text.as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// Emit statements for an explicit visit sequence. Entities are looked up
    /// in `graph` and every edge endpoint is re-validated before emission.
    pub fn serialize_visits(&self, graph: &Graph, visits: &[Visit]) -> Result<String, LineageError> {
        let connector = if graph.is_directed() {
            DIRECTED_CONNECTOR
        } else {
            UNDIRECTED_CONNECTOR
        };
        let mut writer = DotWriter::new(self.indent);

        for visit in visits {
            match *visit {
                Visit::Enter(id) => {
                    let cluster = cluster(graph, id)?;
                    writer.open(&block_header(graph, cluster))?;
                    write_defaults(&mut writer, cluster)?;
                }
                Visit::Exit(_) => {
                    writer.close();
                }
                Visit::Node(id) => {
                    let node = graph.get_node(id).ok_or_else(|| dangling(id))?;
                    let attributes = node.attributes.to_dot_list()?;
                    writer.statement(&format_id(node.name()), attributes.as_deref())?;
                }
                Visit::Edge(id) => {
                    let statement = edge_statement(graph, id, connector)?;
                    let attributes = edge_attributes(graph, id)?.to_dot_list()?;
                    writer.statement(&statement, attributes.as_deref())?;
                }
            }
        }

        let text = writer.finish();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            clusters = graph.cluster_count(),
            bytes = text.len(),
            "serialized graph"
        );
        Ok(text)
    }
}

fn cluster(graph: &Graph, id: ClusterId) -> Result<&Cluster, LineageError> {
    graph
        .get_cluster(id)
        .ok_or(LineageError::UnknownCluster { index: id.index() })
}

fn dangling(id: NodeId) -> LineageError {
    LineageError::DanglingEdgeReference {
        endpoint: format!("#{}", id.index()),
    }
}

fn block_header(graph: &Graph, cluster: &Cluster) -> String {
    match cluster.kind() {
        ClusterKind::Root => {
            let mut header = String::new();
            if graph.is_strict() {
                header.push_str(STRICT_KEYWORD);
                header.push(' ');
            }
            header.push_str(if graph.is_directed() {
                DIRECTED_KEYWORD
            } else {
                UNDIRECTED_KEYWORD
            });
            if let Some(name) = graph.name() {
                header.push(' ');
                header.push_str(&format_id(name));
            }
            header
        }
        ClusterKind::Cluster | ClusterKind::Subgraph => match cluster.block_id() {
            Some(id) => format!("{SUBGRAPH_KEYWORD} {}", format_id(&id)),
            None => SUBGRAPH_KEYWORD.to_string(),
        },
    }
}

fn write_defaults(writer: &mut DotWriter, cluster: &Cluster) -> Result<(), LineageError> {
    let defaults = [
        ("graph", &cluster.attributes),
        ("node", &cluster.node_defaults),
        ("edge", &cluster.edge_defaults),
    ];
    for (class, map) in defaults {
        if let Some(list) = map.to_dot_list()? {
            writer.statement(class, Some(&list))?;
        }
    }
    Ok(())
}

fn endpoint(graph: &Graph, id: NodeId, port: Option<&Port>) -> Result<String, LineageError> {
    let node = graph.get_node(id).ok_or_else(|| dangling(id))?;
    let mut text = format_id(node.name());
    if let Some(port) = port {
        if let Some(name) = &port.name {
            text.push(':');
            text.push_str(&format_id(name));
        }
        if let Some(compass) = port.compass {
            text.push(':');
            text.push_str(compass.as_str());
        }
    }
    Ok(text)
}

fn edge_statement(graph: &Graph, id: EdgeId, connector: &str) -> Result<String, LineageError> {
    let edge = graph
        .get_edge(id)
        .ok_or(LineageError::DanglingEdgeReference {
            endpoint: format!("edge #{}", id.index()),
        })?;
    let tail = endpoint(graph, edge.tail(), edge.tail_port.as_ref())?;
    let head = endpoint(graph, edge.head(), edge.head_port.as_ref())?;
    Ok(format!("{tail} {connector} {head}"))
}

/// The edge's own attributes, plus `dir` from the direction override unless
/// the map already sets it.
fn edge_attributes(graph: &Graph, id: EdgeId) -> Result<AttributeMap, LineageError> {
    let edge = &graph[id];
    let mut attributes = edge.attributes.clone();
    if let Some(direction) = edge.direction
        && !attributes.contains("dir")
    {
        attributes.set("dir", AttributeValue::identifier(direction.as_str()))?;
    }
    Ok(attributes)
}
