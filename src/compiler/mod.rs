use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::flowchart::{Flowchart, GraphNode, IntoFlowchart, NodeKind};
use crate::pathway::{GlobalConfig, OutputNode, Pathway, PathwayEntry};
use crate::validation;
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

mod builder;
mod completion;
pub mod edges;
pub mod parsing;
pub mod sanitize;
pub mod start;
pub mod variables;

pub use builder::provider_type;
use builder::NodeBuilder;
use edges::EdgeRewriter;
use parsing::{ParsedCondition, parse_condition};
use sanitize::sanitize_flowchart;
use start::StartRule;
use variables::VariableCollector;

/// Caller-supplied pathway metadata, usually from the surrounding form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathwayMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PathwayMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }
}

/// Everything the compiler absorbed instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Issues reported by the validator before compilation.
    pub issues: Vec<String>,
    /// Original ids of discarded nodes (empty string for nodes without an id).
    pub dropped_nodes: Vec<String>,
    /// Ids of discarded edges. Edges dropped during sanitization are listed by their
    /// original id, edges dropped while rewriting by their sanitized id.
    pub dropped_edges: Vec<String>,
    /// Sanitized ids of conditional nodes whose expression could not be parsed.
    pub unparsed_conditions: Vec<String>,
    /// Ids of nodes and edges created to complete the pathway.
    pub synthesized: Vec<String>,
    /// The rule that chose the start node.
    pub start_rule: Option<StartRule>,
    /// Extra start flags cleared by the final enforcement pass.
    pub cleared_start_flags: usize,
}

/// The compiled pathway together with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPathway {
    pub pathway: Pathway,
    pub diagnostics: Diagnostics,
}

/// Compiles a `Flowchart` into a provider pathway.
///
/// Compilation never fails on a typed flowchart: missing mandatory nodes and edges are
/// synthesized, and ambiguous start nodes are resolved deterministically.
pub struct Compiler {
    flowchart: Flowchart,
    metadata: PathwayMetadata,
    config: CompilerConfig,
    timestamp: Option<DateTime<Utc>>,
}

pub struct CompilerBuilder {
    flowchart: Flowchart,
    metadata: PathwayMetadata,
    config: CompilerConfig,
    timestamp: Option<DateTime<Utc>>,
}

impl CompilerBuilder {
    pub fn new(flowchart: Flowchart) -> Self {
        Self {
            flowchart,
            metadata: PathwayMetadata::default(),
            config: CompilerConfig::default(),
            timestamp: None,
        }
    }
    pub fn with_metadata(mut self, metadata: PathwayMetadata) -> Self {
        self.metadata = metadata;
        self
    }
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }
    /// Fixes the time used for placeholder names, for reproducible output.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            flowchart: self.flowchart,
            metadata: self.metadata,
            config: self.config,
            timestamp: self.timestamp,
        }
    }
}

impl Compiler {
    pub fn builder(flowchart: Flowchart) -> CompilerBuilder {
        CompilerBuilder::new(flowchart)
    }

    pub fn compile(&self) -> CompiledPathway {
        let mut diagnostics = Diagnostics::default();

        // 1. Sanitize ids. The caller's flowchart is only read.
        let mut graph = sanitize_flowchart(&self.flowchart);
        diagnostics.dropped_nodes = std::mem::take(&mut graph.dropped_nodes);
        diagnostics.dropped_edges = std::mem::take(&mut graph.dropped_edges);

        // 2. Parse every conditional expression once.
        let conditions = self.parse_conditions(&graph.nodes, &mut diagnostics);

        // 3. Conditional nodes never reach the output.
        let retained: Vec<GraphNode> = graph
            .nodes
            .iter()
            .filter(|n| !n.kind.is_conditional())
            .cloned()
            .collect();

        // 4. Pick the start node among the source nodes.
        let mut start_id = start::select_start(&retained).map(|(index, rule)| {
            diagnostics.start_rule = Some(rule);
            retained[index].id.clone()
        });

        // 5. Collect extraction variables across the whole graph.
        let variables = VariableCollector::new(
            &self.config.seed_variables,
            &self.config.integer_variables,
        )
        .collect(&graph.nodes, start_id.as_deref(), &conditions);

        let builder = NodeBuilder::new(&self.config);
        let mut nodes: Vec<OutputNode> = retained.iter().map(|n| builder.build(n)).collect();

        // 6. Complete the node set.
        diagnostics.synthesized.extend(completion::ensure_default_node(
            &mut nodes,
            &builder,
            &mut graph.node_ids,
        ));
        diagnostics.synthesized.extend(completion::ensure_end_call_node(
            &mut nodes,
            &builder,
            &mut graph.node_ids,
        ));

        if start_id.is_none() {
            start_id = start::select_fallback(&nodes, &self.config.greeting_terms).map(
                |(index, rule)| {
                    diagnostics.start_rule = Some(rule);
                    nodes[index].id.clone()
                },
            );
        }

        if let Some(id) = start_id.as_deref() {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
                start::designate(node, variables);
            }
        }

        // 7. Rewrite edges against the final node set.
        let output_ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut edges = EdgeRewriter::new(&retained, &conditions).rewrite(
            &graph.edges,
            start_id.as_deref(),
            &output_ids,
            &mut graph.edge_ids,
            &mut diagnostics.dropped_edges,
        );
        diagnostics.synthesized.extend(completion::ensure_connecting_edge(
            &nodes,
            &mut edges,
            &mut graph.edge_ids,
        ));

        // 8. Exactly one start node, whatever happened upstream.
        diagnostics.cleared_start_flags = start::enforce_single_start(&mut nodes);

        let (name, description) = self.resolve_metadata();
        info!(
            pathway = %name,
            nodes = nodes.len(),
            edges = edges.len(),
            synthesized = diagnostics.synthesized.len(),
            "compiled pathway"
        );

        let mut entries: Vec<PathwayEntry> = nodes.into_iter().map(PathwayEntry::Node).collect();
        entries.push(PathwayEntry::GlobalConfig {
            global_config: GlobalConfig::default(),
        });

        CompiledPathway {
            pathway: Pathway {
                name,
                description,
                nodes: entries,
                edges,
            },
            diagnostics,
        }
    }

    fn parse_conditions(
        &self,
        nodes: &[GraphNode],
        diagnostics: &mut Diagnostics,
    ) -> AHashMap<String, Option<ParsedCondition>> {
        nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Conditional { condition } => {
                    let parsed = parse_condition(condition);
                    if parsed.is_none() {
                        warn!(node_id = %node.id, %condition, "unparseable condition, branches fall back to plain edges");
                        diagnostics.unparsed_conditions.push(node.id.clone());
                    }
                    Some((node.id.clone(), parsed))
                }
                _ => None,
            })
            .collect()
    }

    /// Caller metadata first, then the flowchart's own, then a timestamped placeholder.
    fn resolve_metadata(&self) -> (String, String) {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        let pick = |first: &Option<String>, second: &Option<String>| {
            [first, second]
                .into_iter()
                .flatten()
                .find(|v| !v.trim().is_empty())
                .cloned()
        };

        let name = pick(&self.metadata.name, &self.flowchart.name)
            .unwrap_or_else(|| format!("Pathway {}", timestamp.format("%Y-%m-%d %H:%M:%S")));
        let description = pick(&self.metadata.description, &self.flowchart.description)
            .unwrap_or_else(|| format!("Pathway created {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
        (name, description)
    }
}

/// Validates, converts and compiles an editor flowchart given as JSON text.
///
/// Fails only when the text is not JSON or the document has no navigable node list;
/// every other irregularity is reported through [`Diagnostics::issues`].
pub fn compile_json(
    json: &str,
    metadata: PathwayMetadata,
    config: CompilerConfig,
) -> Result<CompiledPathway, CompileError> {
    let raw: Value =
        serde_json::from_str(json).map_err(|e| CompileError::JsonParse(e.to_string()))?;
    compile_value(&raw, metadata, config)
}

/// Same as [`compile_json`] for an already parsed document.
pub fn compile_value(
    raw: &Value,
    metadata: PathwayMetadata,
    config: CompilerConfig,
) -> Result<CompiledPathway, CompileError> {
    let report = validation::validate(raw);
    if !report.has_node_list {
        return Err(CompileError::InvalidFlowchart {
            issues: report.issues,
        });
    }
    if !report.is_valid {
        warn!(issues = report.issues.len(), "flowchart has validation issues, using fallbacks");
    }

    let issues = report.issues.clone();
    let flowchart = report
        .into_ui_flowchart()
        .into_flowchart()
        .map_err(|e| CompileError::InvalidFlowchart {
            issues: vec![e.to_string()],
        })?;

    let mut compiled = Compiler::builder(flowchart)
        .with_metadata(metadata)
        .with_config(config)
        .build()
        .compile();
    compiled.diagnostics.issues = issues;
    Ok(compiled)
}
