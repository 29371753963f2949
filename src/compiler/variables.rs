use super::parsing::ParsedCondition;
use crate::flowchart::{GraphNode, NodeKind};
use crate::pathway::{ExtractedVariable, VariableType};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Gathers every variable the graph reads or extracts into one deduplicated list.
pub struct VariableCollector<'a> {
    seeds: &'a [String],
    integer_names: AHashSet<&'a str>,
}

impl<'a> VariableCollector<'a> {
    pub fn new(seeds: &'a [String], integer_names: &'a [String]) -> Self {
        Self {
            seeds,
            integer_names: integer_names.iter().map(String::as_str).collect(),
        }
    }

    /// Walks the nodes once. `start_id` is the selected start node, whose explicit
    /// extraction list is the only one honored. `conditions` holds the parsed
    /// expression of each conditional node, keyed by node id. Names keep first-seen order.
    pub fn collect(
        &self,
        nodes: &[GraphNode],
        start_id: Option<&str>,
        conditions: &AHashMap<String, Option<ParsedCondition>>,
    ) -> Vec<ExtractedVariable> {
        let mut names: Vec<&str> = self.seeds.iter().map(String::as_str).collect();

        for node in nodes {
            if start_id == Some(node.id.as_str()) {
                names.extend(node.extract_vars.iter().map(String::as_str));
            }
            match &node.kind {
                NodeKind::CustomerResponse {
                    variable_name: Some(name),
                    ..
                } => names.push(name),
                NodeKind::Response {
                    extract_variables, ..
                } => names.extend(extract_variables.iter().map(String::as_str)),
                NodeKind::Conditional { .. } => {
                    if let Some(Some(condition)) = conditions.get(&node.id) {
                        names.push(&condition.variable);
                    }
                }
                _ => {}
            }
        }

        names
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unique()
            .map(|name| self.describe(name))
            .collect()
    }

    fn infer_type(&self, name: &str) -> VariableType {
        if self.integer_names.contains(name) {
            VariableType::Integer
        } else {
            VariableType::String
        }
    }

    fn describe(&self, name: &str) -> ExtractedVariable {
        ExtractedVariable {
            name: name.to_string(),
            var_type: self.infer_type(name),
            description: format!("The caller's {}", name),
            required: false,
        }
    }
}
