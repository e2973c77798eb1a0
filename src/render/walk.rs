//! Linearization of the containment tree
//!
//! The walk is depth-first over cluster children in insertion order, using an
//! explicit stack so deeply nested packages cannot exhaust the call stack. A
//! node is visited only at its first declaration; later references to it are
//! skipped.

use crate::model::{Child, ClusterId, EdgeId, Graph, NodeId};

/// One step of the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Enter(ClusterId),
    Node(NodeId),
    Edge(EdgeId),
    Exit(ClusterId),
}

/// Produce the full visit sequence for `graph`, starting with
/// `Enter(root)` and ending with `Exit(root)`.
pub fn traversal(graph: &Graph) -> Vec<Visit> {
    let root = graph.root();
    let mut visits = vec![Visit::Enter(root)];
    let mut declared = vec![false; graph.node_count()];
    // (cluster, index of the next child to visit)
    let mut stack: Vec<(ClusterId, usize)> = vec![(root, 0)];

    while let Some(&(cluster, next)) = stack.last() {
        let child = graph
            .get_cluster(cluster)
            .and_then(|c| c.children().get(next).copied());

        let Some(child) = child else {
            stack.pop();
            visits.push(Visit::Exit(cluster));
            continue;
        };

        if let Some(frame) = stack.last_mut() {
            frame.1 += 1;
        }

        match child {
            Child::Node(id) => {
                if let Some(seen) = declared.get_mut(id.index())
                    && !*seen
                {
                    *seen = true;
                    visits.push(Visit::Node(id));
                }
            }
            Child::Edge(id) => visits.push(Visit::Edge(id)),
            Child::Cluster(id) => {
                visits.push(Visit::Enter(id));
                stack.push((id, 0));
            }
        }
    }

    visits
}
