//! Output-completeness guarantees: every pathway has a Default node, an End Call node
//! and, when it has at least two nodes, at least one edge.
use super::builder::NodeBuilder;
use super::edges::FALLBACK_LABEL;
use super::sanitize::IdMap;
use crate::pathway::{NodeType, OutputEdge, OutputNode};
use tracing::debug;

const DEFAULT_NODE_ID: &str = "default_greeting";
const END_CALL_NODE_ID: &str = "end_call";

/// Inserts a generic greeting at the front when no Default node exists.
/// Returns the id of the synthesized node.
pub(super) fn ensure_default_node(
    nodes: &mut Vec<OutputNode>,
    builder: &NodeBuilder<'_>,
    node_ids: &mut IdMap,
) -> Option<String> {
    if nodes.iter().any(|n| n.node_type == NodeType::Default) {
        return None;
    }
    let id = node_ids.reserve(DEFAULT_NODE_ID);
    debug!(node_id = %id, "synthesized default node");
    nodes.insert(0, builder.synthesized_default(id.clone()));
    Some(id)
}

/// Appends a generic closing node when no End Call node exists.
/// Returns the id of the synthesized node.
pub(super) fn ensure_end_call_node(
    nodes: &mut Vec<OutputNode>,
    builder: &NodeBuilder<'_>,
    node_ids: &mut IdMap,
) -> Option<String> {
    if nodes.iter().any(|n| n.node_type == NodeType::EndCall) {
        return None;
    }
    let id = node_ids.reserve(END_CALL_NODE_ID);
    debug!(node_id = %id, "synthesized end call node");
    nodes.push(builder.synthesized_end_call(id.clone()));
    Some(id)
}

/// Connects the first Default node to the first End Call node when the pathway has
/// nodes but no edges. Returns the id of the synthesized edge.
pub(super) fn ensure_connecting_edge(
    nodes: &[OutputNode],
    edges: &mut Vec<OutputEdge>,
    edge_ids: &mut IdMap,
) -> Option<String> {
    if !edges.is_empty() || nodes.len() < 2 {
        return None;
    }
    let source = nodes.iter().find(|n| n.node_type == NodeType::Default)?;
    let target = nodes.iter().find(|n| n.node_type == NodeType::EndCall)?;

    let id = edge_ids.reserve(&format!("{}_{}_{}", source.id, FALLBACK_LABEL, target.id));
    debug!(edge_id = %id, "synthesized connecting edge");
    edges.push(OutputEdge::new(
        id.clone(),
        &source.id,
        &target.id,
        FALLBACK_LABEL,
    ));
    Some(id)
}
