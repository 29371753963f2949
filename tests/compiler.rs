//! Tests for the compilation pass: start selection, edge rewriting and synthesis.
mod common;
use common::*;
use michi::compiler::start::StartRule;
use michi::config::ModelDefaults;
use michi::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_compiler_builds_simple_flowchart() {
    let compiled = compile(create_simple_flowchart());
    let pathway = &compiled.pathway;

    // Two real nodes plus the global config sentinel.
    assert_eq!(pathway.nodes.len(), 3);
    assert_eq!(pathway.output_nodes().count(), 2);

    let start = pathway.node("start_").expect("start node should exist");
    assert_eq!(start.node_type, NodeType::Default);
    assert!(start.is_start());
    assert_eq!(start.data.name, "Start");
    assert_eq!(start.spoken_text(), "Hi");

    let end = pathway.node("end_1").expect("end node should exist");
    assert_eq!(end.node_type, NodeType::EndCall);
    assert!(!end.is_start());
    assert_eq!(
        end.data.content,
        NodeContent::Prompt {
            prompt: "Bye".to_string()
        }
    );

    assert_eq!(pathway.edges.len(), 1);
    let edge = &pathway.edges[0];
    assert_eq!(edge.id, "e1");
    assert_eq!(edge.source, "start_");
    assert_eq!(edge.target, "end_1");
    assert_eq!(edge.label, "next");

    assert_eq!(compiled.diagnostics.start_rule, Some(StartRule::Greeting));
    assert!(compiled.diagnostics.synthesized.is_empty());
    assert_pathway_invariants(pathway);
}

#[test]
fn test_conditional_branches_are_rerouted_from_start() {
    let compiled = compile(create_conditional_flowchart());
    let pathway = &compiled.pathway;

    assert!(pathway.node("cond_1").is_none(), "conditional must not be emitted");
    assert!(pathway.edges.iter().all(|e| e.source != "cond_1" && e.target != "cond_1"));

    let young = edge_between(pathway, "g1", "cr_young").expect("true branch edge");
    assert_eq!(young.label, "Age<=65");
    assert_eq!(young.id, "g1_Age__65_cr_young");

    let old = edge_between(pathway, "g1", "cr_old").expect("false branch edge");
    assert_eq!(old.label, "Age>65");
    assert_eq!(old.id, "g1_Age_65_cr_old");

    assert_eq!(pathway.edges.len(), 2);
    assert_pathway_invariants(pathway);
}

#[test]
fn test_conditional_flowchart_gets_end_call_synthesized() {
    let compiled = compile(create_conditional_flowchart());
    let pathway = &compiled.pathway;

    let end = pathway.node("end_call").expect("end call should be synthesized");
    assert_eq!(end.node_type, NodeType::EndCall);
    assert_eq!(end.data.name, "End Call");
    assert_eq!(compiled.diagnostics.synthesized, vec!["end_call".to_string()]);

    // Synthesized nodes are appended after the source nodes.
    let ids: Vec<&str> = pathway.output_nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["g1", "cr_young", "cr_old", "end_call"]);
}

#[test]
fn test_inequality_condition_labels() {
    let mut flowchart = create_conditional_flowchart();
    flowchart.nodes[1].kind = NodeKind::Conditional {
        condition: "if (Age == 65) { True } else { False }".to_string(),
    };

    let pathway = compile(flowchart).pathway;
    assert_eq!(edge_between(&pathway, "g1", "cr_young").unwrap().label, "Age==65");
    assert_eq!(edge_between(&pathway, "g1", "cr_old").unwrap().label, "Age!=65");
}

#[test]
fn test_unparseable_condition_falls_back_to_plain_labels() {
    let mut flowchart = create_conditional_flowchart();
    flowchart.nodes[1].kind = NodeKind::Conditional {
        condition: "ask whether the caller is retired".to_string(),
    };
    flowchart.edges[2] = GraphEdge::new("e3", "cond-1", "cr-old")
        .with_source_handle("false")
        .with_label("retired");

    let compiled = compile(flowchart);
    let pathway = &compiled.pathway;

    assert_eq!(compiled.diagnostics.unparsed_conditions, vec!["cond_1".to_string()]);
    assert!(pathway.node("cond_1").is_none());
    assert_eq!(edge_between(pathway, "g1", "cr_young").unwrap().label, "next");
    assert_eq!(edge_between(pathway, "g1", "cr_old").unwrap().label, "retired");
    assert_pathway_invariants(pathway);
}

#[test]
fn test_start_rule_priority_prefers_greeting() {
    let mut start_marker = question("q2", "Second question");
    start_marker.label = Some("Start".to_string());
    let flowchart = Flowchart {
        nodes: vec![
            question("q1", "First question"),
            start_marker,
            GraphNode::new(
                "g1",
                NodeKind::Greeting {
                    text: "Welcome!".to_string(),
                },
            ),
        ],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    assert_eq!(compiled.diagnostics.start_rule, Some(StartRule::Greeting));
    assert!(compiled.pathway.node("g1").unwrap().is_start());
    assert!(!compiled.pathway.node("q2").unwrap().is_start());
}

#[test]
fn test_start_rule_uses_start_marker_without_greeting() {
    let mut start_marker = question("q2", "Second question");
    start_marker.name = Some("Start".to_string());
    let flowchart = Flowchart {
        nodes: vec![question("q1", "First question"), start_marker],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    assert_eq!(compiled.diagnostics.start_rule, Some(StartRule::StartMarker));
    assert_eq!(compiled.pathway.start_node().unwrap().id, "q2");
}

#[test]
fn test_start_rule_falls_back_to_first_node() {
    let flowchart = Flowchart {
        nodes: vec![question("q1", "What brings you here?"), question("q2", "Anything else?")],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    assert_eq!(compiled.diagnostics.start_rule, Some(StartRule::FirstNode));
    assert_eq!(compiled.pathway.start_node().unwrap().id, "q1");
    assert_pathway_invariants(&compiled.pathway);
}

#[test]
fn test_empty_flowchart_is_completed() {
    let compiled = compile(Flowchart::default());
    let pathway = &compiled.pathway;

    assert_eq!(pathway.nodes.len(), 3);
    let ids: Vec<&str> = pathway.output_nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["default_greeting", "end_call"]);

    let start = pathway.start_node().expect("a start node must exist");
    assert_eq!(start.id, "default_greeting");
    assert_eq!(start.node_type, NodeType::Default);
    assert_eq!(compiled.diagnostics.start_rule, Some(StartRule::GreetingText));

    assert_eq!(pathway.edges.len(), 1);
    assert_eq!(pathway.edges[0].id, "default_greeting_next_end_call");
    assert_eq!(pathway.edges[0].label, "next");
    assert_eq!(
        compiled.diagnostics.synthesized,
        vec![
            "default_greeting".to_string(),
            "end_call".to_string(),
            "default_greeting_next_end_call".to_string()
        ]
    );
    assert_pathway_invariants(pathway);
}

#[test]
fn test_end_call_only_flowchart_keeps_source_start() {
    let flowchart = Flowchart {
        nodes: vec![end_call("bye", "Goodbye!")],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    let pathway = &compiled.pathway;

    // The synthesized greeting is not promoted when the graph already chose a start.
    assert_eq!(pathway.start_node().unwrap().id, "bye");
    let greeting = pathway.node("default_greeting").unwrap();
    assert!(!greeting.is_start());
    assert_eq!(pathway.output_nodes().next().unwrap().id, "default_greeting");

    assert_eq!(pathway.edges.len(), 1);
    assert_eq!(pathway.edges[0].source, "default_greeting");
    assert_eq!(pathway.edges[0].target, "bye");
    assert_pathway_invariants(pathway);
}

#[test]
fn test_synthesized_ids_avoid_existing_nodes() {
    let flowchart = Flowchart {
        nodes: vec![question("end_call", "Is there anything else?")],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;
    assert!(pathway.node("end_call").is_some());
    let end = pathway.node("end_call_2").expect("suffixed end call");
    assert_eq!(end.node_type, NodeType::EndCall);
    assert_pathway_invariants(&pathway);
}

#[test]
fn test_edge_labels_follow_priority() {
    let flowchart = Flowchart {
        nodes: vec![
            customer_response("cr", "Shall we continue?", &["Yes", "No"], None),
            question("a", "A"),
            question("b", "B"),
            question("c", "C"),
            end_call("d", "Bye"),
        ],
        edges: vec![
            GraphEdge::new("e1", "cr", "a").with_source_handle("response-1"),
            GraphEdge::new("e2", "cr", "b")
                .with_source_handle("response-0")
                .with_label("Sure"),
            GraphEdge::new("e3", "cr", "c")
                .with_source_handle("response-0")
                .with_label("Plain")
                .with_data_label("Data"),
            GraphEdge::new("e4", "cr", "d").with_source_handle("response-5"),
            GraphEdge::new("e5", "a", "d").with_label("   "),
        ],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;
    let labels: Vec<(&str, &str)> = pathway
        .edges
        .iter()
        .map(|e| (e.id.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("e1", "No"),
            ("e2", "Sure"),
            ("e3", "Data"),
            ("e4", "next"),
            ("e5", "next"),
        ]
    );
    // Handles are kept in their sanitized form.
    assert_eq!(pathway.edges[0].source_handle.as_deref(), Some("response_1"));
    assert_pathway_invariants(&pathway);
}

#[test]
fn test_id_collisions_get_suffixes() {
    let flowchart = Flowchart {
        nodes: vec![question("a!", "First"), question("a#", "Second"), end_call("end", "Bye")],
        edges: vec![
            GraphEdge::new("x", "a#", "a!"),
            GraphEdge::new("x", "a!", "end"),
        ],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    let pathway = &compiled.pathway;

    assert!(pathway.node("a_").is_some());
    assert!(pathway.node("a__2").is_some());
    assert_eq!(pathway.edges[0].source, "a__2");
    assert_eq!(pathway.edges[0].target, "a_");
    assert_eq!(pathway.edges[0].id, "x");
    assert_eq!(pathway.edges[1].id, "x_2");
    assert_pathway_invariants(pathway);
}

#[test]
fn test_duplicate_and_invalid_source_records_are_dropped() {
    let flowchart = Flowchart {
        nodes: vec![
            question("q1", "First"),
            question("q1", "Duplicate"),
            question("", "No id"),
            end_call("bye", "Bye"),
        ],
        edges: vec![
            GraphEdge::new("e1", "q1", "bye"),
            GraphEdge::new("e2", "q1", "missing"),
            GraphEdge::new("", "q1", "bye"),
        ],
        ..Default::default()
    };

    let compiled = compile(flowchart);
    assert_eq!(compiled.pathway.node("q1").unwrap().spoken_text(), "First");
    assert_eq!(compiled.pathway.output_nodes().count(), 2);
    assert_eq!(compiled.pathway.edges.len(), 1);
    assert_eq!(
        compiled.diagnostics.dropped_nodes,
        vec!["q1".to_string(), String::new()]
    );
    assert_eq!(
        compiled.diagnostics.dropped_edges,
        vec!["e2".to_string(), String::new()]
    );
}

#[test]
fn test_start_node_carries_variables_and_flags() {
    let flowchart = Flowchart {
        nodes: vec![
            GraphNode::new(
                "g1",
                NodeKind::Greeting {
                    text: "Hi".to_string(),
                },
            )
            .marked_start(vec!["Email".to_string()]),
            customer_response("zip", "What is your zip code?", &[], Some("Zip")),
            GraphNode::new(
                "r1",
                NodeKind::Response {
                    text: "Thanks".to_string(),
                    extract_variables: vec!["Name".to_string(), " Age ".to_string()],
                },
            ),
            end_call("bye", "Bye"),
        ],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;
    let start = pathway.start_node().unwrap();
    let variables: Vec<(&str, VariableType)> = start
        .data
        .extract_vars
        .as_ref()
        .unwrap()
        .iter()
        .map(|v| (v.name.as_str(), v.var_type))
        .collect();
    assert_eq!(
        variables,
        vec![
            ("Age", VariableType::Integer),
            ("Email", VariableType::String),
            ("Zip", VariableType::Integer),
            ("Name", VariableType::String),
        ]
    );

    let options = &start.data.model_options;
    assert_eq!(options.skip_user_response, Some(false));
    assert_eq!(options.block_interruptions, Some(false));
    assert!(start.data.extract_var_settings.is_some());

    let other = pathway.node("zip").unwrap();
    assert_eq!(other.data.model_options.skip_user_response, None);
    assert!(other.data.extract_vars.is_none());
}

#[test]
fn test_condition_variables_are_collected() {
    let mut flowchart = create_conditional_flowchart();
    flowchart.nodes[1].kind = NodeKind::Conditional {
        condition: "if (Income > 50000) { True } else { False }".to_string(),
    };

    let pathway = compile(flowchart).pathway;
    let names: Vec<&str> = pathway
        .start_node()
        .unwrap()
        .data
        .extract_vars
        .as_ref()
        .unwrap()
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["Age", "Income"]);
}

#[test]
fn test_enforce_single_start_keeps_first() {
    let mut nodes: Vec<OutputNode> = compile(create_simple_flowchart())
        .pathway
        .output_nodes()
        .cloned()
        .collect();
    michi::compiler::start::designate(&mut nodes[1], Vec::new());

    let cleared = michi::compiler::start::enforce_single_start(&mut nodes);
    assert_eq!(cleared, 1);
    assert!(nodes[0].is_start());
    assert!(!nodes[1].is_start());
    assert!(nodes[1].data.extract_vars.is_none());
    assert_eq!(nodes[1].data.model_options.is_sms_return_node, None);
}

#[test]
fn test_node_names_and_content_fallbacks() {
    let mut labeled = question("q1", "");
    labeled.label = Some("Intake".to_string());
    let flowchart = Flowchart {
        nodes: vec![
            labeled,
            GraphNode::new(
                "t1",
                NodeKind::Transfer {
                    text: "Transferring".to_string(),
                    transfer_number: Some("+15550001111".to_string()),
                },
            ),
            GraphNode::new(
                "end",
                NodeKind::EndCall {
                    text: String::new(),
                    prompt: None,
                },
            ),
            GraphNode::new(
                "hook",
                NodeKind::Webhook {
                    text: "Saving your details".to_string(),
                    webhook: WebhookConfig {
                        url: "https://example.com/hook".to_string(),
                        ..Default::default()
                    },
                },
            ),
        ],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;

    // q1 becomes the start node and is renamed.
    let q1 = pathway.node("q1").unwrap();
    assert_eq!(q1.data.name, "Start");
    assert_eq!(q1.spoken_text(), "Please continue the conversation.");

    let transfer = pathway.node("t1").unwrap();
    assert_eq!(transfer.node_type, NodeType::TransferCall);
    assert_eq!(transfer.data.name, "Transfer");
    assert_eq!(transfer.data.transfer_number.as_deref(), Some("+15550001111"));

    let end = pathway.node("end").unwrap();
    assert_eq!(
        end.data.content,
        NodeContent::Prompt {
            prompt: "Thank you for calling. Goodbye!".to_string()
        }
    );

    let hook = pathway.node("hook").unwrap();
    assert_eq!(hook.node_type, NodeType::Webhook);
    assert_eq!(hook.data.url.as_deref(), Some("https://example.com/hook"));
    assert_eq!(hook.data.method.as_deref(), Some("POST"));
}

#[test]
fn test_end_call_prompt_takes_precedence_over_text() {
    let flowchart = Flowchart {
        nodes: vec![GraphNode::new(
            "end",
            NodeKind::EndCall {
                text: "From text".to_string(),
                prompt: Some("From prompt".to_string()),
            },
        )],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;
    assert_eq!(pathway.node("end").unwrap().spoken_text(), "From prompt");
}

#[test]
fn test_config_overrides() {
    let config = CompilerConfig {
        seed_variables: Vec::new(),
        integer_variables: vec!["Income".to_string()],
        synthesized_greeting: "Good morning, this is the clinic.".to_string(),
        model_options: ModelDefaults {
            model_type: "base".to_string(),
            temperature: 0.7,
        },
        ..Default::default()
    };
    let mut flowchart = create_conditional_flowchart();
    flowchart.nodes[1].kind = NodeKind::Conditional {
        condition: "if (Income >= 1000) { True } else { False }".to_string(),
    };

    let pathway = Compiler::builder(flowchart)
        .with_config(config.clone())
        .with_timestamp(fixed_timestamp())
        .build()
        .compile()
        .pathway;

    let variables = pathway.start_node().unwrap().data.extract_vars.clone().unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].name, "Income");
    assert_eq!(variables[0].var_type, VariableType::Integer);
    assert!(pathway
        .output_nodes()
        .all(|n| n.data.model_options.model_type == "base"));

    let empty = Compiler::builder(Flowchart::default())
        .with_config(config)
        .build()
        .compile()
        .pathway;
    let start = empty.start_node().unwrap();
    assert_eq!(start.spoken_text(), "Good morning, this is the clinic.");
    assert_eq!(start.data.extract_vars, Some(Vec::new()));
}

#[test]
fn test_metadata_resolution_order() {
    let mut flowchart = create_simple_flowchart();
    flowchart.name = Some("From flowchart".to_string());
    flowchart.description = Some("Flowchart description".to_string());

    let from_caller = Compiler::builder(flowchart.clone())
        .with_metadata(PathwayMetadata::new("From caller", "Caller description"))
        .build()
        .compile()
        .pathway;
    assert_eq!(from_caller.name, "From caller");
    assert_eq!(from_caller.description, "Caller description");

    let from_flowchart = Compiler::builder(flowchart)
        .with_name("   ")
        .build()
        .compile()
        .pathway;
    assert_eq!(from_flowchart.name, "From flowchart");
    assert_eq!(from_flowchart.description, "Flowchart description");

    let placeholder = compile(create_simple_flowchart()).pathway;
    assert_eq!(placeholder.name, "Pathway 2024-01-02 03:04:05");
    assert_eq!(placeholder.description, "Pathway created 2024-01-02 03:04:05 UTC");
}

#[test]
fn test_compilation_is_deterministic_and_leaves_input_untouched() {
    let flowchart = create_conditional_flowchart();
    let compiler = Compiler::builder(flowchart.clone())
        .with_timestamp(fixed_timestamp())
        .build();

    let first = compiler.compile();
    let second = compiler.compile();
    assert_eq!(first, second);

    assert_eq!(flowchart, create_conditional_flowchart());
    assert_eq!(flowchart.nodes[1].id, "cond-1");
}

#[test]
fn test_extract_vars_ignored_on_nodes_not_selected_as_start() {
    let flowchart = Flowchart {
        nodes: vec![
            GraphNode::new(
                "g",
                NodeKind::Greeting {
                    text: "Hello".to_string(),
                },
            ),
            question("q", "What is your name?").marked_start(vec!["Name".to_string()]),
            end_call("bye", "Bye"),
        ],
        ..Default::default()
    };

    let pathway = compile(flowchart).pathway;
    let start = pathway.start_node().unwrap();
    assert_eq!(start.id, "g");
    let names: Vec<&str> = start
        .data
        .extract_vars
        .as_ref()
        .unwrap()
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["Age"]);
}

#[test]
fn test_rewrite_drops_are_recorded() {
    let compiled = compile(create_conditional_flowchart());
    // The edge into the removed conditional node is lost during rewriting.
    assert_eq!(compiled.diagnostics.dropped_edges, vec!["e1".to_string()]);

    let summary = PathwayFormatter::format_diagnostics(&compiled.diagnostics).unwrap();
    assert!(summary.contains("dropped edges: e1"));
}
