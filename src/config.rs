use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Tunable knobs of a compilation pass.
///
/// Every field has a default, so a configuration file only needs to list what it
/// overrides:
///
/// ```json
/// { "seed_variables": [], "integer_variables": ["Age", "Zip", "Count"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Variables always extracted on the start node, whether or not the graph mentions them.
    pub seed_variables: Vec<String>,
    /// Variable names inferred as `integer`. Matching is exact.
    pub integer_variables: Vec<String>,
    /// Terms that make a Default node look like a greeting when no start node was chosen.
    pub greeting_terms: Vec<String>,
    /// Text used for Default nodes whose text is blank.
    pub default_text: String,
    /// Prompt used for End Call nodes that carry neither prompt nor text.
    pub end_call_prompt: String,
    /// Text of the Default node synthesized when the graph has none.
    pub synthesized_greeting: String,
    /// Prompt of the End Call node synthesized when the graph has none.
    pub synthesized_closing: String,
    pub model_options: ModelDefaults,
}

/// Model settings applied to every generated node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    pub model_type: String,
    pub temperature: f64,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            model_type: "smart".to_string(),
            temperature: 0.2,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            seed_variables: vec!["Age".to_string()],
            integer_variables: vec!["Age".to_string(), "Zip".to_string()],
            greeting_terms: [
                "hello",
                "hi",
                "hey",
                "welcome",
                "greet",
                "good morning",
                "good afternoon",
                "good evening",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_text: "Please continue the conversation.".to_string(),
            end_call_prompt: "Thank you for calling. Goodbye!".to_string(),
            synthesized_greeting: "Hello! Thank you for calling. How can I help you today?"
                .to_string(),
            synthesized_closing: "Thank you for your time. Have a great day. Goodbye!"
                .to_string(),
            model_options: ModelDefaults::default(),
        }
    }
}

impl CompilerConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Parse a configuration from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
