use clap::{ArgAction, Parser};
use michi::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Compiles canvas flowcharts into voice-call pathway documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flowchart JSON file saved by the editor
    flowchart_path: Option<String>,

    /// Where to write the pathway JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Pathway name (defaults to the flowchart's own name)
    #[arg(long)]
    name: Option<String>,

    /// Pathway description (defaults to the flowchart's own description)
    #[arg(long)]
    description: Option<String>,

    /// Optional compiler configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Only validate the flowchart and report issues
    #[arg(long)]
    validate_only: bool,

    /// Print a human-readable outline of the compiled pathway to stderr
    #[arg(long)]
    outline: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.human {
        run_interactive(cli);
    } else {
        run_non_interactive(cli);
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let flowchart_path = cli.flowchart_path.clone().unwrap_or_else(|| {
        exit_with_error("Flowchart path is required in non-interactive mode.");
    });
    run_compilation(&cli, &flowchart_path, cli.output.clone());
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(cli: Cli) {
    eprintln!("--- Michi Interactive Mode ---");

    let flowchart_path = prompt_for_input("Enter flowchart path", Some("data/flowchart.json"));
    let output_path = prompt_for_input("Enter output path (optional)", Some("pathway.json"));
    let output = if output_path.is_empty() {
        None
    } else {
        Some(output_path)
    };

    run_compilation(&cli, &flowchart_path, output);
}

fn run_compilation(cli: &Cli, flowchart_path: &str, output: Option<String>) {
    let total_start = Instant::now();

    let flowchart_json = fs::read_to_string(flowchart_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flowchart file '{}': {}",
            flowchart_path, e
        ))
    });
    let config = match &cli.config {
        Some(path) => CompilerConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => CompilerConfig::default(),
    };

    if cli.validate_only {
        run_validation(&flowchart_json);
        return;
    }

    let metadata = PathwayMetadata {
        name: cli.name.clone(),
        description: cli.description.clone(),
    };

    let compile_start = Instant::now();
    let compiled = compile_json(&flowchart_json, metadata, config)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    info!(elapsed = ?compile_start.elapsed(), "compilation finished");

    if let Some(summary) = PathwayFormatter::format_diagnostics(&compiled.diagnostics) {
        eprintln!("{}", summary);
    }
    if cli.outline {
        eprintln!("{}", PathwayFormatter::format_outline(&compiled.pathway));
    }

    let json = compiled
        .pathway
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize pathway: {}", e)));

    match output {
        Some(path) => {
            fs::write(&path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write pathway to '{}': {}", path, e))
            });
            eprintln!(
                "Pathway '{}' written to '{}' ({} nodes, {} edges)",
                compiled.pathway.name,
                path,
                compiled.pathway.output_nodes().count(),
                compiled.pathway.edges.len()
            );
        }
        None => println!("{}", json),
    }

    debug!(elapsed = ?total_start.elapsed(), "total execution");
}

fn run_validation(flowchart_json: &str) {
    let raw: serde_json::Value = serde_json::from_str(flowchart_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flowchart JSON: {}", e)));
    let report = validate(&raw);

    if report.is_valid {
        println!(
            "Flowchart is valid ({} nodes, {} edges)",
            report.nodes_with_fallbacks.len(),
            report.edges.len()
        );
        return;
    }

    println!("Flowchart has {} issue(s):", report.issues.len());
    for issue in &report.issues {
        println!("  - {}", issue);
    }
    if !report.has_node_list {
        std::process::exit(1);
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    eprint!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stderr().flush() {
        exit_with_error(&format!("Failed to flush prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read input: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
