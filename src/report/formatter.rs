use crate::compiler::Diagnostics;
use crate::pathway::{OutputEdge, OutputNode, Pathway};
use itertools::Itertools;

/// Renders compiled pathways as human-readable outlines.
pub struct PathwayFormatter;

impl PathwayFormatter {
    /// One line per node, followed by its outgoing edges:
    ///
    /// ```text
    /// Pathway: Intake (Collects caller details)
    ///   * start_ [Default] Start: "Hi"
    ///       --next--> end_1
    ///     end_1 [End Call] End Call: "Bye"
    /// ```
    pub fn format_outline(pathway: &Pathway) -> String {
        let mut lines = vec![format!(
            "Pathway: {} ({})",
            pathway.name, pathway.description
        )];

        for node in pathway.output_nodes() {
            lines.push(Self::format_node(node));
            lines.extend(
                pathway
                    .edges
                    .iter()
                    .filter(|edge| edge.source == node.id)
                    .map(Self::format_edge),
            );
        }
        lines.join("\n")
    }

    /// Summarizes what the compiler had to fix, or `None` if nothing was fixed.
    pub fn format_diagnostics(diagnostics: &Diagnostics) -> Option<String> {
        let mut lines = Vec::new();
        lines.extend(diagnostics.issues.iter().map(|i| format!("issue: {}", i)));
        if !diagnostics.dropped_nodes.is_empty() {
            lines.push(format!(
                "dropped nodes: {}",
                Self::format_ids(&diagnostics.dropped_nodes)
            ));
        }
        if !diagnostics.dropped_edges.is_empty() {
            lines.push(format!(
                "dropped edges: {}",
                Self::format_ids(&diagnostics.dropped_edges)
            ));
        }
        if !diagnostics.unparsed_conditions.is_empty() {
            lines.push(format!(
                "unparsed conditions: {}",
                diagnostics.unparsed_conditions.join(", ")
            ));
        }
        if !diagnostics.synthesized.is_empty() {
            lines.push(format!(
                "synthesized: {}",
                diagnostics.synthesized.join(", ")
            ));
        }
        if diagnostics.cleared_start_flags > 0 {
            lines.push(format!(
                "cleared {} extra start flag(s)",
                diagnostics.cleared_start_flags
            ));
        }
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn format_node(node: &OutputNode) -> String {
        let marker = if node.is_start() { "*" } else { " " };
        format!(
            "  {} {} [{}] {}: {:?}",
            marker,
            node.id,
            node.node_type,
            node.data.name,
            node.spoken_text()
        )
    }

    fn format_edge(edge: &OutputEdge) -> String {
        format!("      --{}--> {}", edge.label, edge.target)
    }

    fn format_ids(ids: &[String]) -> String {
        ids.iter()
            .map(|id| if id.is_empty() { "<missing id>" } else { id.as_str() })
            .join(", ")
    }
}
