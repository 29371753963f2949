//! Start-node selection as an ordered list of pure rules; the first rule that matches wins.
use crate::flowchart::{GraphNode, NodeKind};
use crate::pathway::{ExtractVarSettings, ExtractedVariable, NodeType, OutputNode};
use tracing::debug;

/// Name forced onto the chosen start node.
pub const START_NAME: &str = "Start";

/// Identifies which rule chose the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    /// The first Greeting node in source order.
    Greeting,
    /// The first node labeled or named `"Start"`.
    StartMarker,
    /// The first node of the output array.
    FirstNode,
    /// A Default node whose text reads like a greeting, used after synthesis.
    GreetingText,
    /// The first node, unconditionally.
    Fallback,
}

pub type SelectionRule = fn(&[GraphNode]) -> Option<usize>;

/// Rules applied to the retained source nodes, in priority order.
pub const SELECTION_RULES: [(StartRule, SelectionRule); 3] = [
    (StartRule::Greeting, first_greeting),
    (StartRule::StartMarker, first_start_marker),
    (StartRule::FirstNode, first_node),
];

pub fn first_greeting(nodes: &[GraphNode]) -> Option<usize> {
    nodes
        .iter()
        .position(|n| matches!(n.kind, NodeKind::Greeting { .. }))
}

pub fn first_start_marker(nodes: &[GraphNode]) -> Option<usize> {
    nodes.iter().position(|n| {
        n.label.as_deref() == Some(START_NAME) || n.name.as_deref() == Some(START_NAME)
    })
}

pub fn first_node(nodes: &[GraphNode]) -> Option<usize> {
    if nodes.is_empty() { None } else { Some(0) }
}

/// Runs the source-node rules and returns the index of the chosen node.
pub fn select_start(nodes: &[GraphNode]) -> Option<(usize, StartRule)> {
    let selected = SELECTION_RULES
        .iter()
        .find_map(|(rule, select)| select(nodes).map(|index| (index, *rule)));
    if let Some((index, rule)) = selected {
        debug!(node_id = %nodes[index].id, ?rule, "selected start node");
    }
    selected
}

/// Picks a start node among assembled nodes when none was selected from the source graph.
pub fn select_fallback(nodes: &[OutputNode], greeting_terms: &[String]) -> Option<(usize, StartRule)> {
    let selected = nodes
        .iter()
        .position(|n| {
            n.node_type == NodeType::Default && mentions_greeting(n.spoken_text(), greeting_terms)
        })
        .map(|index| (index, StartRule::GreetingText))
        .or_else(|| (!nodes.is_empty()).then_some((0, StartRule::Fallback)));
    if let Some((index, rule)) = selected {
        debug!(node_id = %nodes[index].id, ?rule, "selected fallback start node");
    }
    selected
}

/// Whole-word, case-insensitive match of any greeting term against `text`.
pub fn mentions_greeting(text: &str, terms: &[String]) -> bool {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let padded = format!(" {} ", words.join(" "));

    terms.iter().any(|term| {
        let term = term.trim().to_lowercase();
        !term.is_empty() && padded.contains(&format!(" {} ", term))
    })
}

/// Turns `node` into the pathway's entry point.
pub fn designate(node: &mut OutputNode, variables: Vec<ExtractedVariable>) {
    node.data.is_start = true;
    node.data.name = START_NAME.to_string();
    node.data.model_options = node.data.model_options.clone().with_start_flags();
    node.data.extract_vars = Some(variables);
    node.data.extract_var_settings = Some(ExtractVarSettings::default());
}

/// Removes every start-only attribute from `node`.
pub fn clear(node: &mut OutputNode) {
    node.data.is_start = false;
    node.data.model_options = node.data.model_options.clone().without_start_flags();
    node.data.extract_vars = None;
    node.data.extract_var_settings = None;
}

/// Keeps only the first node flagged as start. Returns how many flags were cleared.
pub fn enforce_single_start(nodes: &mut [OutputNode]) -> usize {
    let mut cleared = 0;
    let mut seen_start = false;
    for node in nodes.iter_mut().filter(|n| n.data.is_start) {
        if seen_start {
            debug!(node_id = %node.id, "clearing duplicate start flag");
            clear(node);
            cleared += 1;
        } else {
            seen_start = true;
        }
    }
    cleared
}
