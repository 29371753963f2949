//! Common test utilities for building flowcharts and checking compiled pathways.
use chrono::{DateTime, TimeZone, Utc};
use michi::compiler::sanitize::is_sanitized;
use michi::prelude::*;

/// Creates the smallest useful flowchart: one greeting wired to one end call.
///
/// Ids carry characters the provider rejects: `start!` and `end#1`.
#[allow(dead_code)]
pub fn create_simple_flowchart() -> Flowchart {
    Flowchart {
        nodes: vec![
            GraphNode::new(
                "start!",
                NodeKind::Greeting {
                    text: "Hi".to_string(),
                },
            ),
            GraphNode::new(
                "end#1",
                NodeKind::EndCall {
                    text: "Bye".to_string(),
                    prompt: None,
                },
            ),
        ],
        edges: vec![GraphEdge::new("e1", "start!", "end#1")],
        name: None,
        description: None,
    }
}

/// Creates a flowchart with an age check branching to two customer responses.
///
/// Logic: `greeting -> if (Age <= 65) -> young | old`
#[allow(dead_code)]
pub fn create_conditional_flowchart() -> Flowchart {
    Flowchart {
        nodes: vec![
            GraphNode::new(
                "g1",
                NodeKind::Greeting {
                    text: "Hello, thanks for calling!".to_string(),
                },
            ),
            GraphNode::new(
                "cond-1",
                NodeKind::Conditional {
                    condition: "if (Age <= 65) { True } else { False }".to_string(),
                },
            ),
            customer_response("cr-young", "Are you still working?", &["Yes", "No"], None),
            customer_response("cr-old", "Are you retired?", &["Yes", "No"], None),
        ],
        edges: vec![
            GraphEdge::new("e1", "g1", "cond-1"),
            GraphEdge::new("e2", "cond-1", "cr-young").with_source_handle("true"),
            GraphEdge::new("e3", "cond-1", "cr-old").with_source_handle("false"),
        ],
        name: None,
        description: None,
    }
}

#[allow(dead_code)]
pub fn question(id: &str, text: &str) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::Question {
            text: text.to_string(),
        },
    )
}

#[allow(dead_code)]
pub fn end_call(id: &str, text: &str) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::EndCall {
            text: text.to_string(),
            prompt: None,
        },
    )
}

#[allow(dead_code)]
pub fn customer_response(
    id: &str,
    text: &str,
    options: &[&str],
    variable_name: Option<&str>,
) -> GraphNode {
    GraphNode::new(
        id,
        NodeKind::CustomerResponse {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            variable_name: variable_name.map(str::to_string),
        },
    )
}

#[allow(dead_code)]
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

/// Compiles with default configuration and a fixed timestamp.
#[allow(dead_code)]
pub fn compile(flowchart: Flowchart) -> CompiledPathway {
    Compiler::builder(flowchart)
        .with_timestamp(fixed_timestamp())
        .build()
        .compile()
}

#[allow(dead_code)]
pub fn edge_between<'a>(pathway: &'a Pathway, source: &str, target: &str) -> Option<&'a OutputEdge> {
    pathway
        .edges
        .iter()
        .find(|e| e.source == source && e.target == target)
}

/// Checks every structural rule the provider enforces on a pathway document.
#[allow(dead_code)]
pub fn assert_pathway_invariants(pathway: &Pathway) {
    let starts: Vec<&OutputNode> = pathway.output_nodes().filter(|n| n.is_start()).collect();
    assert_eq!(starts.len(), 1, "exactly one start node expected");
    assert_eq!(starts[0].data.name, "Start");
    assert!(starts[0].data.extract_vars.is_some());

    assert!(
        matches!(pathway.nodes.last(), Some(PathwayEntry::GlobalConfig { .. })),
        "node list must end with the global config sentinel"
    );
    assert_eq!(
        pathway
            .nodes
            .iter()
            .filter(|e| matches!(e, PathwayEntry::GlobalConfig { .. }))
            .count(),
        1
    );

    for node in pathway.output_nodes() {
        assert!(is_sanitized(&node.id), "node id '{}' is not sanitized", node.id);
        match node.node_type {
            NodeType::EndCall => assert!(
                matches!(node.data.content, NodeContent::Prompt { .. }),
                "end call node '{}' must use prompt",
                node.id
            ),
            _ => assert!(
                matches!(node.data.content, NodeContent::Text { .. }),
                "node '{}' must use text",
                node.id
            ),
        }
        assert!(!node.spoken_text().trim().is_empty());
        if !node.is_start() {
            assert!(node.data.extract_vars.is_none());
        }
    }

    for edge in &pathway.edges {
        assert!(is_sanitized(&edge.id), "edge id '{}' is not sanitized", edge.id);
        assert!(is_sanitized(&edge.source));
        assert!(is_sanitized(&edge.target));
        for handle in [&edge.source_handle, &edge.target_handle].into_iter().flatten() {
            assert!(is_sanitized(handle), "handle '{}' is not sanitized", handle);
        }
        assert!(!edge.label.is_empty(), "edge '{}' has an empty label", edge.id);
        assert_eq!(edge.label, edge.data.label);
        assert!(pathway.node(&edge.source).is_some(), "dangling source '{}'", edge.source);
        assert!(pathway.node(&edge.target).is_some(), "dangling target '{}'", edge.target);
    }

    let edge_ids: std::collections::HashSet<&str> =
        pathway.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids.len(), pathway.edges.len(), "edge ids must be unique");
}

/// An editor document exercising most node kinds, handles and labels.
#[allow(dead_code)]
pub const EDITOR_FLOWCHART_JSON: &str = r#"{
  "name": "Senior screening",
  "description": "Routes callers by age",
  "nodes": [
    { "id": "greet 1", "type": "greeting", "data": { "text": "Hi there!" } },
    { "id": "cond#1", "type": "conditional", "data": { "condition": "if (Age <= 65) { True } else { False }" } },
    { "id": "young", "type": "customerResponse", "data": { "text": "Are you working?", "options": ["Yes", { "text": "No" }], "variableName": "Employment" } },
    { "id": "old", "type": "customerResponse", "data": { "text": "Are you retired?", "options": ["Yes", "No"] } },
    { "id": "bye", "type": "endCall", "data": { "text": "Goodbye!" } },
    { "id": "agent", "type": "transfer", "data": { "text": "Transferring you now.", "transferNumber": "+15550001111" } }
  ],
  "edges": [
    { "id": "e1", "source": "greet 1", "target": "cond#1" },
    { "id": "e2", "source": "cond#1", "target": "young", "sourceHandle": "true" },
    { "id": "e3", "source": "cond#1", "target": "old", "sourceHandle": "false" },
    { "id": "e4", "source": "young", "target": "bye", "sourceHandle": "response-0" },
    { "id": "e5", "source": "young", "target": "agent", "sourceHandle": "response-1" },
    { "id": "e6", "source": "old", "target": "bye", "label": "done" }
  ]
}"#;
