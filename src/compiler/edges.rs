use super::parsing::ParsedCondition;
use super::sanitize::{IdMap, sanitize_id};
use crate::flowchart::{GraphEdge, GraphNode, NodeKind};
use crate::pathway::OutputEdge;
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Label used when nothing better is known about an edge.
pub const FALLBACK_LABEL: &str = "next";

/// Rewrites sanitized source edges into provider edges.
pub struct EdgeRewriter<'a> {
    nodes: AHashMap<&'a str, &'a GraphNode>,
    conditions: &'a AHashMap<String, Option<ParsedCondition>>,
}

impl<'a> EdgeRewriter<'a> {
    pub fn new(
        nodes: &'a [GraphNode],
        conditions: &'a AHashMap<String, Option<ParsedCondition>>,
    ) -> Self {
        Self {
            nodes: nodes.iter().map(|n| (n.id.as_str(), n)).collect(),
            conditions,
        }
    }

    /// Produces the output edges in source order.
    ///
    /// Edges leaving a conditional node are re-rooted at `start_id` and carry the branch
    /// label; edges touching any node outside `output_ids` are dropped and their ids
    /// pushed onto `dropped`.
    pub fn rewrite(
        &self,
        edges: &[GraphEdge],
        start_id: Option<&str>,
        output_ids: &AHashSet<&str>,
        edge_ids: &mut IdMap,
        dropped: &mut Vec<String>,
    ) -> Vec<OutputEdge> {
        let mut rewritten = Vec::with_capacity(edges.len());

        for edge in edges {
            if !output_ids.contains(edge.target.as_str()) {
                debug!(edge_id = %edge.id, target = %edge.target, "dropping edge into removed node");
                dropped.push(edge.id.clone());
                continue;
            }

            if let Some(condition) = self.conditions.get(&edge.source) {
                let Some(start_id) = start_id else {
                    debug!(edge_id = %edge.id, "dropping conditional edge without a start node");
                    dropped.push(edge.id.clone());
                    continue;
                };
                rewritten.push(self.reroot(edge, condition.as_ref(), start_id, edge_ids));
                continue;
            }

            if !output_ids.contains(edge.source.as_str()) {
                debug!(edge_id = %edge.id, source = %edge.source, "dropping edge from removed node");
                dropped.push(edge.id.clone());
                continue;
            }

            let label = self.resolve_label(edge);
            let mut output = OutputEdge::new(&edge.id, &edge.source, &edge.target, label);
            output.source_handle = edge.source_handle.clone();
            output.target_handle = edge.target_handle.clone();
            rewritten.push(output);
        }

        rewritten
    }

    /// Replaces an edge leaving a conditional node with one leaving the start node.
    fn reroot(
        &self,
        edge: &GraphEdge,
        condition: Option<&ParsedCondition>,
        start_id: &str,
        edge_ids: &mut IdMap,
    ) -> OutputEdge {
        let label = match condition {
            Some(condition) => condition
                .label_for_handle(edge.source_handle.as_deref())
                .to_string(),
            None => self.resolve_label(edge),
        };
        let id = edge_ids.reserve(&format!(
            "{}_{}_{}",
            start_id,
            sanitize_id(&label),
            edge.target
        ));
        debug!(edge_id = %id, %label, "rerouted conditional edge from start node");

        let mut output = OutputEdge::new(id, start_id, &edge.target, label);
        output.target_handle = edge.target_handle.clone();
        output
    }

    /// `data.label`, then `label`, then the customer-response option the handle points at,
    /// then [`FALLBACK_LABEL`].
    pub fn resolve_label(&self, edge: &GraphEdge) -> String {
        non_blank(edge.data_label.as_deref())
            .or_else(|| non_blank(edge.label.as_deref()))
            .or_else(|| self.option_label(edge))
            .unwrap_or(FALLBACK_LABEL)
            .to_string()
    }

    fn option_label(&self, edge: &GraphEdge) -> Option<&str> {
        let index = response_index(edge.source_handle.as_deref()?)?;
        match &self.nodes.get(edge.source.as_str())?.kind {
            NodeKind::CustomerResponse { options, .. } => {
                non_blank(options.get(index).map(String::as_str))
            }
            _ => None,
        }
    }
}

/// Parses `response-<index>`, or its sanitized form `response_<index>`.
pub fn response_index(handle: &str) -> Option<usize> {
    handle
        .strip_prefix("response-")
        .or_else(|| handle.strip_prefix("response_"))?
        .parse()
        .ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
