use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The provider's closed vocabulary of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "Default")]
    Default,
    #[serde(rename = "End Call")]
    EndCall,
    #[serde(rename = "Transfer Call")]
    TransferCall,
    #[serde(rename = "Webhook")]
    Webhook,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Default => "Default",
            NodeType::EndCall => "End Call",
            NodeType::TransferCall => "Transfer Call",
            NodeType::Webhook => "Webhook",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in provider format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: NodeData,
}

impl OutputNode {
    pub fn is_start(&self) -> bool {
        self.data.is_start
    }

    /// The text spoken by the node, whichever field carries it.
    pub fn spoken_text(&self) -> &str {
        match &self.data.content {
            NodeContent::Text { text } => text,
            NodeContent::Prompt { prompt } => prompt,
        }
    }
}

/// The `text` and `prompt` fields are mutually exclusive; which one a node carries
/// depends on its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    Text { text: String },
    Prompt { prompt: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub name: String,
    #[serde(flatten)]
    pub content: NodeContent,
    /// Always serialized; the provider rejects nodes that omit it.
    #[serde(rename = "isStart")]
    pub is_start: bool,
    #[serde(rename = "modelOptions")]
    pub model_options: ModelOptions,
    #[serde(
        rename = "extractVars",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extract_vars: Option<Vec<ExtractedVariable>>,
    #[serde(
        rename = "extractVarSettings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extract_var_settings: Option<ExtractVarSettings>,
    #[serde(
        rename = "transferNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transfer_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl NodeData {
    pub fn new(name: impl Into<String>, content: NodeContent, model_options: ModelOptions) -> Self {
        Self {
            name: name.into(),
            content,
            is_start: false,
            model_options,
            extract_vars: None,
            extract_var_settings: None,
            transfer_number: None,
            url: None,
            method: None,
            body: None,
        }
    }
}

/// Per-node model settings. The behavioral flags are only emitted on the start node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    pub model_type: String,
    pub temperature: f64,
    #[serde(
        rename = "isSMSReturnNode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_sms_return_node: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_user_response: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_end_call_tool: Option<bool>,
    #[serde(
        rename = "block_interruptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub block_interruptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_silence_repeat: Option<bool>,
}

impl ModelOptions {
    pub fn new(model_type: impl Into<String>, temperature: f64) -> Self {
        Self {
            model_type: model_type.into(),
            temperature,
            is_sms_return_node: None,
            skip_user_response: None,
            disable_end_call_tool: None,
            block_interruptions: None,
            disable_silence_repeat: None,
        }
    }

    /// Sets the behavioral flags the provider expects on the entry node.
    pub fn with_start_flags(mut self) -> Self {
        self.is_sms_return_node = Some(false);
        self.skip_user_response = Some(false);
        self.disable_end_call_tool = Some(false);
        self.block_interruptions = Some(false);
        self.disable_silence_repeat = Some(false);
        self
    }

    pub fn without_start_flags(mut self) -> Self {
        self.is_sms_return_node = None;
        self.skip_user_response = None;
        self.disable_end_call_tool = None;
        self.block_interruptions = None;
        self.disable_silence_repeat = None;
        self
    }
}

/// Inferred type of an extracted variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Integer,
    Boolean,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::String => write!(f, "string"),
            VariableType::Integer => write!(f, "integer"),
            VariableType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A variable the voice agent extracts during the call.
/// Serialized as the provider's `[name, type, description, required]` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(String, VariableType, String, bool)",
    into = "(String, VariableType, String, bool)"
)]
pub struct ExtractedVariable {
    pub name: String,
    pub var_type: VariableType,
    pub description: String,
    pub required: bool,
}

impl From<(String, VariableType, String, bool)> for ExtractedVariable {
    fn from((name, var_type, description, required): (String, VariableType, String, bool)) -> Self {
        Self {
            name,
            var_type,
            description,
            required,
        }
    }
}

impl From<ExtractedVariable> for (String, VariableType, String, bool) {
    fn from(var: ExtractedVariable) -> Self {
        (var.name, var.var_type, var.description, var.required)
    }
}

/// Extraction settings attached to the start node. The provider accepts an empty object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractVarSettings {}
