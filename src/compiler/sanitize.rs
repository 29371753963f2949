use crate::flowchart::{Flowchart, GraphEdge, GraphNode};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// Deterministic and idempotent: `sanitize_id(&sanitize_id(x)) == sanitize_id(x)`.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn is_sanitized(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A 1:1 table from original ids to sanitized ids, valid for one compilation pass.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    mapping: AHashMap<String, String>,
    used: AHashSet<String>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `original` to a sanitized id, reusing the existing entry if there is one.
    /// Distinct originals that sanitize to the same string get `_2`, `_3`, ... suffixes.
    pub fn insert(&mut self, original: &str) -> String {
        if let Some(existing) = self.mapping.get(original) {
            return existing.clone();
        }
        let assigned = self.reserve(&sanitize_id(original));
        if assigned != sanitize_id(original) {
            warn!(original, assigned = %assigned, "sanitized id collision");
        }
        self.mapping.insert(original.to_string(), assigned.clone());
        assigned
    }

    /// Claims an unused id derived from `candidate` without recording an original.
    /// Used for generated nodes and edges.
    pub fn reserve(&mut self, candidate: &str) -> String {
        let base = sanitize_id(candidate);
        let mut assigned = base.clone();
        let mut suffix = 2usize;
        while self.used.contains(&assigned) {
            assigned = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.used.insert(assigned.clone());
        assigned
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.mapping.get(original).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.mapping.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// The flowchart after id sanitization, plus the tables used to produce it.
#[derive(Debug, Clone, Default)]
pub struct SanitizedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub node_ids: IdMap,
    /// Edge ids are only reserved, never mapped: duplicate edge ids get suffixed.
    pub edge_ids: IdMap,
    /// Original ids of nodes that were discarded.
    pub dropped_nodes: Vec<String>,
    /// Original ids of edges that were discarded.
    pub dropped_edges: Vec<String>,
}

/// Produces sanitized copies of every usable node and edge. The input is left untouched.
pub fn sanitize_flowchart(flowchart: &Flowchart) -> SanitizedGraph {
    let mut graph = SanitizedGraph::default();

    for node in &flowchart.nodes {
        if node.id.is_empty() {
            warn!(kind = node.kind.display_name(), "discarding node without id");
            graph.dropped_nodes.push(String::new());
            continue;
        }
        if graph.node_ids.contains(&node.id) {
            warn!(node_id = %node.id, "discarding duplicate node id");
            graph.dropped_nodes.push(node.id.clone());
            continue;
        }
        let mut sanitized = node.clone();
        sanitized.id = graph.node_ids.insert(&node.id);
        graph.nodes.push(sanitized);
    }

    for edge in &flowchart.edges {
        if edge.id.is_empty() {
            warn!(source = %edge.source, target = %edge.target, "discarding edge without id");
            graph.dropped_edges.push(String::new());
            continue;
        }
        let (Some(source), Some(target)) = (
            graph.node_ids.get(&edge.source),
            graph.node_ids.get(&edge.target),
        ) else {
            debug!(edge_id = %edge.id, "dropping edge with unknown endpoint");
            graph.dropped_edges.push(edge.id.clone());
            continue;
        };

        graph.edges.push(GraphEdge {
            id: graph.edge_ids.reserve(&edge.id),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: sanitize_handle(&graph.node_ids, edge.source_handle.as_deref()),
            target_handle: sanitize_handle(&graph.node_ids, edge.target_handle.as_deref()),
            data_label: edge.data_label.clone(),
            label: edge.label.clone(),
        });
    }

    graph
}

/// Handles naming a node reuse that node's mapping; any other handle only has its
/// characters substituted.
fn sanitize_handle(node_ids: &IdMap, handle: Option<&str>) -> Option<String> {
    match handle {
        None | Some("") => None,
        Some(h) => Some(
            node_ids
                .get(h)
                .map(str::to_string)
                .unwrap_or_else(|| sanitize_id(h)),
        ),
    }
}
