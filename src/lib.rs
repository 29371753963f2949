//! # Michi - Flowchart-to-Pathway Compiler
//!
//! **Michi** compiles the conversation flowcharts drawn in a drag-and-drop canvas into the
//! strict pathway format an AI voice-call provider accepts. The provider rejects any
//! pathway that breaks its structural rules, so the compiler guarantees them instead of
//! hoping for them: exactly one start node, provider-safe ids, a label on every edge,
//! mutually exclusive `text` / `prompt` fields, and at least a greeting, a closing and
//! one edge between them.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Read the editor's JSON, or build a [`flowchart::Flowchart`] in code.
//! 2.  **Convert**: Editor JSON goes through [`validation::validate`] and the
//!     [`flowchart::IntoFlowchart`] trait. Implement that trait to support another editor.
//! 3.  **Compile**: Use [`Compiler::builder`] with optional metadata and configuration.
//!     Compilation sanitizes ids, parses conditions, collects extraction variables,
//!     selects the start node, rewrites edges and synthesizes anything missing.
//! 4.  **Deploy**: Serialize the resulting [`pathway::Pathway`] and hand it to the provider.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use michi::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flowchart = Flowchart {
//!         nodes: vec![
//!             GraphNode::new("start!", NodeKind::Greeting { text: "Hi".to_string() }),
//!             GraphNode::new(
//!                 "end#1",
//!                 NodeKind::EndCall { text: "Bye".to_string(), prompt: None },
//!             ),
//!         ],
//!         edges: vec![GraphEdge::new("e1", "start!", "end#1")],
//!         name: None,
//!         description: None,
//!     };
//!
//!     let compiled = Compiler::builder(flowchart)
//!         .with_name("Intake")
//!         .with_description("Collects caller details")
//!         .build()
//!         .compile();
//!
//!     println!("{}", PathwayFormatter::format_outline(&compiled.pathway));
//!     println!("{}", compiled.pathway.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! Editor JSON can be compiled in one call with [`compile_json`], which only fails when
//! the document has no navigable node list.

pub mod compiler;
pub mod config;
pub mod error;
pub mod flowchart;
pub mod pathway;
pub mod prelude;
pub mod report;
pub mod ui;
pub mod validation;

pub use compiler::{
    CompiledPathway, Compiler, CompilerBuilder, Diagnostics, PathwayMetadata, compile_json,
    compile_value,
};
