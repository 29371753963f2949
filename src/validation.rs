//! Shape checks on raw editor JSON, run before the compiler sees the graph.
//!
//! The validator never rejects a graph it can navigate. Every irregularity becomes a
//! human-readable issue plus a fallback substitution, so the compiler can still produce
//! a best-effort pathway. Only a missing or non-array node list makes the graph
//! unusable.
use crate::ui::{UiEdge, UiEdgeData, UiFlowchart, UiNode, UiNodeData, UiNodeType};
use ahash::AHashSet;
use serde_json::{Map, Value};
use tracing::debug;

const FALLBACK_NODE_TYPE: &str = "question";

/// Outcome of validating a raw flowchart.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// `true` when no issue was found.
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// `false` when the root is not an object or the node list is missing / not an array.
    pub has_node_list: bool,
    /// Nodes that survived validation, with fallbacks substituted for malformed parts.
    pub nodes_with_fallbacks: Vec<UiNode>,
    /// Edges whose endpoints both resolve to surviving nodes.
    pub edges: Vec<UiEdge>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ValidationReport {
    fn finish(mut self) -> Self {
        self.is_valid = self.issues.is_empty();
        self
    }

    /// Rebuilds an editor flowchart out of the validated parts.
    pub fn into_ui_flowchart(self) -> UiFlowchart {
        UiFlowchart {
            nodes: self.nodes_with_fallbacks,
            edges: self.edges,
            name: self.name,
            description: self.description,
        }
    }
}

/// Validates a raw flowchart document and substitutes fallbacks where possible.
pub fn validate(raw: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = raw.as_object() else {
        report.issues.push("Flowchart must be a JSON object".to_string());
        return report.finish();
    };

    report.name = string_field(root, "name");
    report.description = string_field(root, "description");

    match root.get("nodes") {
        Some(Value::Array(nodes)) => {
            report.has_node_list = true;
            validate_nodes(nodes, &mut report);
        }
        Some(_) => {
            report.issues.push("'nodes' must be an array".to_string());
            return report.finish();
        }
        None => {
            report
                .issues
                .push("Flowchart is missing a 'nodes' list".to_string());
            return report.finish();
        }
    }

    match root.get("edges") {
        Some(Value::Array(edges)) => validate_edges(edges, &mut report),
        Some(_) => report
            .issues
            .push("'edges' must be an array; ignoring all edges".to_string()),
        None => report
            .issues
            .push("Flowchart is missing an 'edges' list".to_string()),
    }

    report.finish()
}

fn validate_nodes(nodes: &[Value], report: &mut ValidationReport) {
    let mut seen: AHashSet<String> = AHashSet::new();

    for (index, raw_node) in nodes.iter().enumerate() {
        let Some(node) = raw_node.as_object() else {
            report
                .issues
                .push(format!("Node at index {} is not an object", index));
            continue;
        };

        let Some(id) = string_field(node, "id").filter(|id| !id.is_empty()) else {
            report
                .issues
                .push(format!("Node at index {} has no string id; dropped", index));
            continue;
        };

        if !seen.insert(id.clone()) {
            report
                .issues
                .push(format!("Duplicate node id '{}'; keeping the first", id));
            continue;
        }

        let node_type = match node.get("type").and_then(Value::as_str) {
            Some(tag) if UiNodeType::parse(tag).is_some() => tag.to_string(),
            Some(tag) => {
                report.issues.push(format!(
                    "Node '{}' has unknown type '{}'; using '{}'",
                    id, tag, FALLBACK_NODE_TYPE
                ));
                FALLBACK_NODE_TYPE.to_string()
            }
            None => {
                report.issues.push(format!(
                    "Node '{}' has no type; using '{}'",
                    id, FALLBACK_NODE_TYPE
                ));
                FALLBACK_NODE_TYPE.to_string()
            }
        };

        let data = match node.get("data") {
            None | Some(Value::Null) => UiNodeData::default(),
            Some(Value::Object(fields)) => node_data(&id, fields, report),
            Some(_) => {
                report.issues.push(format!(
                    "Node '{}' has non-object data; using empty data",
                    id
                ));
                UiNodeData::default()
            }
        };

        report.nodes_with_fallbacks.push(UiNode {
            id,
            node_type: Some(node_type),
            data,
        });
    }
}

/// Deserializes a node payload, dropping only the fields whose value has the wrong shape.
fn node_data(id: &str, fields: &Map<String, Value>, report: &mut ValidationReport) -> UiNodeData {
    if let Ok(data) = serde_json::from_value::<UiNodeData>(Value::Object(fields.clone())) {
        return data;
    }

    let mut accepted = Map::new();
    for (key, value) in fields {
        let single = Map::from_iter([(key.clone(), value.clone())]);
        match serde_json::from_value::<UiNodeData>(Value::Object(single)) {
            Ok(_) => {
                accepted.insert(key.clone(), value.clone());
            }
            Err(e) => report.issues.push(format!(
                "Node '{}' has malformed field '{}' ({}); ignoring it",
                id, key, e
            )),
        }
    }

    serde_json::from_value(Value::Object(accepted)).unwrap_or_else(|e| {
        report.issues.push(format!(
            "Node '{}' has malformed data ({}); using empty data",
            id, e
        ));
        UiNodeData::default()
    })
}

fn validate_edges(edges: &[Value], report: &mut ValidationReport) {
    let known: AHashSet<&str> = report
        .nodes_with_fallbacks
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    let mut accepted = Vec::new();

    for (index, raw_edge) in edges.iter().enumerate() {
        let Some(edge) = raw_edge.as_object() else {
            report
                .issues
                .push(format!("Edge at index {} is not an object", index));
            continue;
        };

        let (Some(source), Some(target)) = (string_field(edge, "source"), string_field(edge, "target"))
        else {
            report.issues.push(format!(
                "Edge at index {} has no string source/target; dropped",
                index
            ));
            continue;
        };

        if !known.contains(source.as_str()) || !known.contains(target.as_str()) {
            report.issues.push(format!(
                "Edge {} -> {} references an unknown node; dropped",
                source, target
            ));
            continue;
        }

        let id = match string_field(edge, "id").filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let generated = format!("e-{}-{}", source, target);
                report.issues.push(format!(
                    "Edge {} -> {} has no id; using '{}'",
                    source, target, generated
                ));
                generated
            }
        };

        let data = edge
            .get("data")
            .and_then(Value::as_object)
            .map(|d| UiEdgeData {
                label: string_field(d, "label"),
            });

        accepted.push(UiEdge {
            id,
            source,
            target,
            source_handle: string_field(edge, "sourceHandle"),
            target_handle: string_field(edge, "targetHandle"),
            label: string_field(edge, "label"),
            data,
        });
    }

    debug!(
        accepted = accepted.len(),
        total = edges.len(),
        "validated edges"
    );
    report.edges = accepted;
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
