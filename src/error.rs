use thiserror::Error;

/// Errors that can occur at the JSON entry point of the compiler.
///
/// Data-quality problems inside a navigable graph are never reported here; they are
/// absorbed by fallback synthesis and surfaced as diagnostics instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Failed to parse flowchart JSON: {0}")]
    JsonParse(String),

    #[error("Invalid flowchart: {}", issues.join("; "))]
    InvalidFlowchart { issues: Vec<String> },
}

/// Errors that can occur when converting an editor format into a Michi `Flowchart`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid editor data: {0}")]
    Validation(String),
}

/// Errors that can occur while loading a compiler configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not parse config: {0}")]
    Json(#[from] serde_json::Error),
}
