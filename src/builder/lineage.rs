use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use tracing::debug;

use crate::facts::FactSet;
use crate::utils::string::is_within;

/// Restricts a fact set to the lineage of the classes under a qualified
/// prefix: those classes, everything they inherit from and everything that
/// inherits from them. Containers are kept when they enclose a kept class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageFilter {
    prefix: String,
}

impl LineageFilter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Names of the classes in the lineage
    pub fn related_classes<'a>(&self, facts: &'a FactSet) -> HashSet<&'a str> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for record in facts.classes() {
            indices
                .entry(record.name.as_str())
                .or_insert_with(|| graph.add_node(record.name.as_str()));
        }

        // Edges point from derived to base
        for record in facts.classes() {
            let derived = indices[record.name.as_str()];
            for base in &record.bases {
                if let Some(&base) = indices.get(base.as_str()) {
                    graph.add_edge(derived, base, ());
                }
            }
        }

        let seeds: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&ix| is_within(graph[ix], &self.prefix))
            .collect();

        let mut kept: HashSet<NodeIndex> = HashSet::new();

        let mut ancestors = Dfs::empty(&graph);
        for &seed in &seeds {
            ancestors.move_to(seed);
            while let Some(ix) = ancestors.next(&graph) {
                kept.insert(ix);
            }
        }

        let reversed = Reversed(&graph);
        let mut descendants = Dfs::empty(reversed);
        for &seed in &seeds {
            descendants.move_to(seed);
            while let Some(ix) = descendants.next(reversed) {
                kept.insert(ix);
            }
        }

        kept.into_iter().map(|ix| graph[ix]).collect()
    }

    /// A copy of `facts` holding only the lineage, in the original order.
    pub fn apply(&self, facts: &FactSet) -> FactSet {
        let classes = self.related_classes(facts);

        let records = facts
            .records
            .iter()
            .filter(|record| {
                if record.kind.is_container() {
                    classes
                        .iter()
                        .any(|class| is_within(class, &record.name))
                } else {
                    classes.contains(record.name.as_str())
                }
            })
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            prefix = %self.prefix,
            kept = records.len(),
            total = facts.len(),
            "applied lineage filter"
        );

        FactSet {
            name: facts.name.clone(),
            records,
        }
    }
}
