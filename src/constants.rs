//! Configuration constants for graph-lineage
//!
//! Grammar keywords and connector tokens used by the serializer, plus the
//! defaults shared by the CLI and the progress display.

use std::time::Duration;

/// DOT grammar tokens
pub mod grammar {
    /// Keywords that can never be emitted as bare identifiers
    pub const RESERVED_WORDS: &[&str] = &["node", "edge", "graph", "digraph", "subgraph", "strict"];

    pub const DIRECTED_KEYWORD: &str = "digraph";
    pub const UNDIRECTED_KEYWORD: &str = "graph";
    pub const STRICT_KEYWORD: &str = "strict";
    pub const SUBGRAPH_KEYWORD: &str = "subgraph";

    pub const DIRECTED_CONNECTOR: &str = "->";
    pub const UNDIRECTED_CONNECTOR: &str = "--";

    /// Prefix Graphviz requires for a subgraph to be drawn as a cluster
    pub const CLUSTER_PREFIX: &str = "cluster_";

    /// Stem used when synthesizing names for anonymous clusters
    pub const ANONYMOUS_CLUSTER_STEM: &str = "anonymous";
}

/// Output formatting configuration
pub mod output {
    /// Spaces per nesting level in emitted DOT
    pub const DEFAULT_INDENT: usize = 4;

    /// Extension for rendered files in batch mode
    pub const DOT_EXTENSION: &str = "dot";

    /// Default glob for fact files in batch mode
    pub const DEFAULT_FACT_PATTERN: &str = "*.json";
}

/// Defaults applied by the API graph builder
pub mod builder {
    /// Node name used for the shared placeholder policy
    pub const SHARED_PLACEHOLDER_NAME: &str = "external";
}

/// Progress bar configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
}
