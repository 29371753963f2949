use crate::config::CompilerConfig;
use crate::flowchart::{GraphNode, NodeKind};
use crate::pathway::{ModelOptions, NodeContent, NodeData, NodeType, OutputNode};

/// Maps an editor node kind onto the provider's node vocabulary.
pub fn provider_type(kind: &NodeKind) -> NodeType {
    match kind {
        NodeKind::EndCall { .. } => NodeType::EndCall,
        NodeKind::Transfer { .. } => NodeType::TransferCall,
        NodeKind::Webhook { .. } => NodeType::Webhook,
        NodeKind::Greeting { .. }
        | NodeKind::Question { .. }
        | NodeKind::CustomerResponse { .. }
        | NodeKind::Response { .. }
        | NodeKind::Conditional { .. }
        | NodeKind::FacebookLead { .. }
        | NodeKind::GoogleLead { .. }
        | NodeKind::Zapier { .. } => NodeType::Default,
    }
}

/// Responsible for turning sanitized graph nodes into provider nodes.
pub(super) struct NodeBuilder<'a> {
    config: &'a CompilerConfig,
}

impl<'a> NodeBuilder<'a> {
    pub(super) fn new(config: &'a CompilerConfig) -> Self {
        Self { config }
    }

    fn model_options(&self) -> ModelOptions {
        let defaults = &self.config.model_options;
        ModelOptions::new(defaults.model_type.clone(), defaults.temperature)
    }

    /// Builds the provider node for a non-conditional graph node. The result is never
    /// flagged as start; start selection happens afterwards.
    pub(super) fn build(&self, node: &GraphNode) -> OutputNode {
        let node_type = provider_type(&node.kind);
        let name = non_blank(node.label.as_deref())
            .or_else(|| non_blank(node.name.as_deref()))
            .unwrap_or(node.kind.display_name());

        let content = match &node.kind {
            NodeKind::EndCall { text, prompt } => NodeContent::Prompt {
                prompt: non_blank(prompt.as_deref())
                    .or_else(|| non_blank(Some(text.as_str())))
                    .unwrap_or(&self.config.end_call_prompt)
                    .to_string(),
            },
            _ => NodeContent::Text {
                text: non_blank(node.text())
                    .unwrap_or(&self.config.default_text)
                    .to_string(),
            },
        };

        let mut data = NodeData::new(name, content, self.model_options());
        match &node.kind {
            NodeKind::Transfer {
                transfer_number, ..
            } => data.transfer_number = transfer_number.clone(),
            NodeKind::Webhook { webhook, .. } => {
                data.url = Some(webhook.url.clone());
                data.method = Some(webhook.method.clone());
                data.body = webhook.body.clone();
            }
            _ => {}
        }

        OutputNode {
            id: node.id.clone(),
            node_type,
            data,
        }
    }

    /// A generic Default node used when the graph has none.
    pub(super) fn synthesized_default(&self, id: String) -> OutputNode {
        OutputNode {
            id,
            node_type: NodeType::Default,
            data: NodeData::new(
                "Greeting",
                NodeContent::Text {
                    text: self.config.synthesized_greeting.clone(),
                },
                self.model_options(),
            ),
        }
    }

    /// A generic End Call node used when the graph has none.
    pub(super) fn synthesized_end_call(&self, id: String) -> OutputNode {
        OutputNode {
            id,
            node_type: NodeType::EndCall,
            data: NodeData::new(
                "End Call",
                NodeContent::Prompt {
                    prompt: self.config.synthesized_closing.clone(),
                },
                self.model_options(),
            ),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
