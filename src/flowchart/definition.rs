use serde_json::Value;

/// The complete, canonical definition of a conversation flowchart, ready for compilation.
/// This is the target structure for any editor format conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flowchart {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A single node of the conversation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: Option<String>,
    pub name: Option<String>,
    /// Set when the editor explicitly marked this node as the entry point.
    pub is_start: bool,
    /// Variables the editor asked to extract from the start node.
    pub extract_vars: Vec<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            name: None,
            is_start: false,
            extract_vars: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn marked_start(mut self, extract_vars: Vec<String>) -> Self {
        self.is_start = true;
        self.extract_vars = extract_vars;
        self
    }

    /// The spoken text carried by the node, if its kind has one.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Greeting { text }
            | NodeKind::Question { text }
            | NodeKind::Response { text, .. }
            | NodeKind::CustomerResponse { text, .. }
            | NodeKind::Transfer { text, .. }
            | NodeKind::EndCall { text, .. }
            | NodeKind::Webhook { text, .. }
            | NodeKind::FacebookLead { text }
            | NodeKind::GoogleLead { text }
            | NodeKind::Zapier { text } => Some(text.as_str()),
            NodeKind::Conditional { .. } => None,
        }
    }
}

/// The closed set of node kinds the editor can produce, each with its own payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Greeting {
        text: String,
    },
    Question {
        text: String,
    },
    Response {
        text: String,
        extract_variables: Vec<String>,
    },
    CustomerResponse {
        text: String,
        options: Vec<String>,
        variable_name: Option<String>,
    },
    Transfer {
        text: String,
        transfer_number: Option<String>,
    },
    EndCall {
        text: String,
        prompt: Option<String>,
    },
    Webhook {
        text: String,
        webhook: WebhookConfig,
    },
    Conditional {
        condition: String,
    },
    FacebookLead {
        text: String,
    },
    GoogleLead {
        text: String,
    },
    Zapier {
        text: String,
    },
}

impl NodeKind {
    /// Human-readable kind name, used when a node has neither label nor name.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Greeting { .. } => "Greeting",
            NodeKind::Question { .. } => "Question",
            NodeKind::Response { .. } => "Response",
            NodeKind::CustomerResponse { .. } => "Customer Response",
            NodeKind::Transfer { .. } => "Transfer",
            NodeKind::EndCall { .. } => "End Call",
            NodeKind::Webhook { .. } => "Webhook",
            NodeKind::Conditional { .. } => "Conditional",
            NodeKind::FacebookLead { .. } => "Facebook Lead",
            NodeKind::GoogleLead { .. } => "Google Lead",
            NodeKind::Zapier { .. } => "Zapier",
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, NodeKind::Conditional { .. })
    }
}

/// Outbound HTTP call configured on a webhook node.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub url: String,
    pub method: String,
    pub body: Option<Value>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "POST".to_string(),
            body: None,
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    /// Label stored under the edge's `data` payload.
    pub data_label: Option<String>,
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_data_label(mut self, label: impl Into<String>) -> Self {
        self.data_label = Some(label.into());
        self
    }
}
