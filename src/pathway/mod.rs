//! Provider-format pathway document.
pub mod edge;
pub mod node;

pub use edge::*;
pub use node::*;

use serde::{Deserialize, Serialize};

/// The compiled pathway, serialized exactly as the provider's pathway-definition schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub name: String,
    pub description: String,
    pub nodes: Vec<PathwayEntry>,
    pub edges: Vec<OutputEdge>,
}

/// An entry of the node list: either a real node or the trailing global-config sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathwayEntry {
    Node(OutputNode),
    GlobalConfig {
        #[serde(rename = "globalConfig")]
        global_config: GlobalConfig,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(rename = "globalPrompt")]
    pub global_prompt: String,
}

impl Pathway {
    /// Iterates over the real nodes, skipping the global-config sentinel.
    pub fn output_nodes(&self) -> impl Iterator<Item = &OutputNode> {
        self.nodes.iter().filter_map(|entry| match entry {
            PathwayEntry::Node(node) => Some(node),
            PathwayEntry::GlobalConfig { .. } => None,
        })
    }

    pub fn node(&self, id: &str) -> Option<&OutputNode> {
        self.output_nodes().find(|n| n.id == id)
    }

    pub fn start_node(&self) -> Option<&OutputNode> {
        self.output_nodes().find(|n| n.is_start())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
