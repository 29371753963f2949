//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the michi crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use michi::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flowchart_json = std::fs::read_to_string("path/to/flowchart.json")?;
//! let config = CompilerConfig::from_file("path/to/config.json")?;
//!
//! let compiled = compile_json(&flowchart_json, PathwayMetadata::default(), config)?;
//! println!("{}", compiled.pathway.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{
    CompiledPathway, Compiler, CompilerBuilder, Diagnostics, PathwayMetadata, compile_json,
    compile_value,
};
pub use crate::config::CompilerConfig;

// Graph model and conversion
pub use crate::flowchart::{
    Flowchart, GraphEdge, GraphNode, IntoFlowchart, NodeKind, WebhookConfig,
};
pub use crate::ui::UiFlowchart;
pub use crate::validation::{ValidationReport, validate};

// Provider output
pub use crate::pathway::{
    ExtractedVariable, NodeContent, NodeType, OutputEdge, OutputNode, Pathway, PathwayEntry,
    VariableType,
};

// Error types
pub use crate::error::{CompileError, ConfigError, ConversionError};

// Outline formatting
pub use crate::report::PathwayFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
