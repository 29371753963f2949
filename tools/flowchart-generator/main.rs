use clap::Parser;
use michi::ui::{UiEdge, UiEdgeData, UiFlowchart, UiNode, UiNodeData, UiOption, UiVariableRef};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate random editor flowcharts for exercising the Michi compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flowchart.json")]
    output: String,

    /// Number of conversational nodes to generate (greeting and end call excluded)
    #[arg(long, default_value_t = 10)]
    nodes: usize,

    /// Number of conditional nodes to sprinkle into the flow
    #[arg(long, default_value_t = 2)]
    conditionals: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const VARIABLES: [&str; 5] = ["Age", "Zip", "Name", "Income", "Email"];
const OPERATORS: [&str; 6] = ["<", "<=", ">", ">=", "==", "!="];
const QUESTIONS: [&str; 5] = [
    "What is your age?",
    "Could you tell me your zip code?",
    "May I have your full name?",
    "What is your yearly income?",
    "What email should we use to reach you?",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating flowchart ({} nodes, {} conditionals)...",
        cli.nodes, cli.conditionals
    );

    let flowchart = generate_flowchart(&mut rng, cli.nodes, cli.conditionals);
    let json_output = serde_json::to_string_pretty(&flowchart)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} nodes and {} edges into '{}'",
        flowchart.nodes.len(),
        flowchart.edges.len(),
        cli.output
    );

    Ok(())
}

/// Builds a chain greeting -> body nodes -> end call, with conditionals branching
/// forward from random points of the chain.
fn generate_flowchart(rng: &mut StdRng, body_nodes: usize, conditionals: usize) -> UiFlowchart {
    let mut nodes = vec![node("greeting-1", "greeting", text_data("Hello! Thanks for calling."))];
    for index in 0..body_nodes {
        nodes.push(generate_body_node(rng, index));
    }
    nodes.push(node(
        "end-call#1",
        "endCall",
        UiNodeData {
            prompt: Some("Thanks for your time, goodbye!".to_string()),
            ..Default::default()
        },
    ));

    let mut edges: Vec<UiEdge> = nodes
        .windows(2)
        .enumerate()
        .map(|(index, pair)| edge(format!("e{}", index), &pair[0].id, &pair[1].id, None))
        .collect();

    // Branch targets are drawn from the chain only: body nodes and the end call.
    let chain_len = nodes.len();
    for index in 0..conditionals {
        let id = format!("conditional {}", index);
        let variable = VARIABLES.choose(rng).copied().unwrap_or("Age");
        let operator = OPERATORS.choose(rng).copied().unwrap_or("<");
        let value = rng.random_range(1..100);
        nodes.push(node(
            &id,
            "conditional",
            UiNodeData {
                condition: Some(format!(
                    "if ({} {} {}) {{ True }} else {{ False }}",
                    variable, operator, value
                )),
                ..Default::default()
            },
        ));

        let true_target = nodes[rng.random_range(1..chain_len)].id.clone();
        let false_target = nodes[rng.random_range(1..chain_len)].id.clone();
        edges.push(edge(format!("{}-true", id), &id, &true_target, Some("true")));
        edges.push(edge(format!("{}-false", id), &id, &false_target, Some("false")));
    }

    UiFlowchart {
        nodes,
        edges,
        name: Some("Generated flowchart".to_string()),
        description: Some(format!(
            "{} body nodes, {} conditionals",
            body_nodes, conditionals
        )),
    }
}

fn generate_body_node(rng: &mut StdRng, index: usize) -> UiNode {
    let id = format!("node-{}", index);
    let question = QUESTIONS.choose(rng).copied().unwrap_or(QUESTIONS[0]);
    match rng.random_range(0..4) {
        0 => node(&id, "question", text_data(question)),
        1 => node(
            &id,
            "customerResponse",
            UiNodeData {
                text: Some(question.to_string()),
                options: Some(vec![
                    UiOption::Text("Yes".to_string()),
                    UiOption::Text("No".to_string()),
                ]),
                variable_name: VARIABLES.choose(rng).map(|v| v.to_string()),
                ..Default::default()
            },
        ),
        2 => node(
            &id,
            "response",
            UiNodeData {
                text: Some("Got it, thank you.".to_string()),
                extract_variables: Some(vec![UiVariableRef::Name(
                    VARIABLES.choose(rng).copied().unwrap_or("Name").to_string(),
                )]),
                ..Default::default()
            },
        ),
        _ => node(
            &id,
            "transfer",
            UiNodeData {
                text: Some("Let me transfer you to an agent.".to_string()),
                transfer_number: Some(format!("+1555{:07}", rng.random_range(0..10_000_000))),
                ..Default::default()
            },
        ),
    }
}

fn node(id: &str, node_type: &str, data: UiNodeData) -> UiNode {
    UiNode {
        id: id.to_string(),
        node_type: Some(node_type.to_string()),
        data,
    }
}

fn text_data(text: &str) -> UiNodeData {
    UiNodeData {
        text: Some(text.to_string()),
        ..Default::default()
    }
}

fn edge(id: String, source: &str, target: &str, source_handle: Option<&str>) -> UiEdge {
    UiEdge {
        id,
        source: source.to_string(),
        target: target.to_string(),
        source_handle: source_handle.map(str::to_string),
        target_handle: None,
        label: None,
        data: Some(UiEdgeData::default()),
    }
}
