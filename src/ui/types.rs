use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete flowchart as saved by the canvas editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiFlowchart {
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Editor node with ID, kind tag and a free-form data payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub data: UiNodeData,
}

/// Editor node payload. Which fields are meaningful depends on the node type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiNodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_vars: Option<Vec<UiVariableRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<UiOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_variables: Option<Vec<UiVariableRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_number: Option<String>,
    #[serde(alias = "url", skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(alias = "method", skip_serializing_if = "Option::is_none")]
    pub webhook_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A customer-response option, stored either as plain text or as an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiOption {
    Text(String),
    Labeled {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl UiOption {
    pub fn text(&self) -> Option<&str> {
        match self {
            UiOption::Text(text) => Some(text),
            UiOption::Labeled { text, label } => text.as_deref().or(label.as_deref()),
        }
    }
}

/// A variable reference: a bare name, an object with a `name`, or a provider-style tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiVariableRef {
    Name(String),
    Named { name: String },
    Tuple(Vec<Value>),
}

impl UiVariableRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            UiVariableRef::Name(name) | UiVariableRef::Named { name } => Some(name),
            UiVariableRef::Tuple(values) => values.first().and_then(Value::as_str),
        }
    }
}

/// Editor edge connecting two nodes, optionally through named handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UiEdgeData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiEdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
