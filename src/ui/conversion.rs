use super::types::{UiEdge, UiFlowchart, UiNode, UiNodeData, UiVariableRef};
use crate::error::ConversionError;
use crate::flowchart::{Flowchart, GraphEdge, GraphNode, IntoFlowchart, NodeKind, WebhookConfig};
use tracing::warn;

/// Kind tags understood by the editor format, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiNodeType {
    Greeting,
    Question,
    Response,
    CustomerResponse,
    Transfer,
    EndCall,
    Webhook,
    Conditional,
    FacebookLead,
    GoogleLead,
    Zapier,
}

impl UiNodeType {
    /// Parses an editor type tag. Case, spaces, dashes and underscores are ignored,
    /// so `"endCall"`, `"end-call"` and `"End Call"` are the same tag.
    pub fn parse(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "greeting" | "start" => Some(Self::Greeting),
            "question" | "default" => Some(Self::Question),
            "response" => Some(Self::Response),
            "customerresponse" => Some(Self::CustomerResponse),
            "transfer" | "transfercall" => Some(Self::Transfer),
            "endcall" | "end" => Some(Self::EndCall),
            "webhook" => Some(Self::Webhook),
            "conditional" | "condition" => Some(Self::Conditional),
            "facebooklead" => Some(Self::FacebookLead),
            "googlelead" => Some(Self::GoogleLead),
            "zapier" => Some(Self::Zapier),
            _ => None,
        }
    }
}

impl IntoFlowchart for UiFlowchart {
    fn into_flowchart(self) -> Result<Flowchart, ConversionError> {
        let nodes = self.nodes.into_iter().map(convert_node).collect();
        let edges = self.edges.into_iter().map(convert_edge).collect();

        Ok(Flowchart {
            nodes,
            edges,
            name: self.name,
            description: self.description,
        })
    }
}

fn convert_node(node: UiNode) -> GraphNode {
    let node_type = match node.node_type.as_deref() {
        Some(tag) => UiNodeType::parse(tag).unwrap_or_else(|| {
            warn!(node_id = %node.id, node_type = tag, "unknown node type, treating as question");
            UiNodeType::Question
        }),
        None => UiNodeType::Question,
    };

    let data = node.data;
    let kind = convert_kind(node_type, &data);

    GraphNode {
        id: node.id,
        kind,
        label: data.label,
        name: data.name,
        is_start: data.is_start.unwrap_or(false),
        extract_vars: variable_names(data.extract_vars.as_deref()),
    }
}

fn convert_kind(node_type: UiNodeType, data: &UiNodeData) -> NodeKind {
    let text = data.text.clone().unwrap_or_default();
    match node_type {
        UiNodeType::Greeting => NodeKind::Greeting { text },
        UiNodeType::Question => NodeKind::Question { text },
        UiNodeType::Response => NodeKind::Response {
            text,
            extract_variables: variable_names(data.extract_variables.as_deref()),
        },
        UiNodeType::CustomerResponse => NodeKind::CustomerResponse {
            text,
            options: data
                .options
                .iter()
                .flatten()
                .map(|option| option.text().unwrap_or_default().to_string())
                .collect(),
            variable_name: data.variable_name.clone(),
        },
        UiNodeType::Transfer => NodeKind::Transfer {
            text,
            transfer_number: data.transfer_number.clone(),
        },
        UiNodeType::EndCall => NodeKind::EndCall {
            text,
            prompt: data.prompt.clone(),
        },
        UiNodeType::Webhook => NodeKind::Webhook {
            text,
            webhook: WebhookConfig {
                url: data.webhook_url.clone().unwrap_or_default(),
                method: data
                    .webhook_method
                    .clone()
                    .unwrap_or_else(|| WebhookConfig::default().method),
                body: data.body.clone(),
            },
        },
        UiNodeType::Conditional => NodeKind::Conditional {
            condition: data
                .condition
                .clone()
                .or_else(|| data.text.clone())
                .unwrap_or_default(),
        },
        UiNodeType::FacebookLead => NodeKind::FacebookLead { text },
        UiNodeType::GoogleLead => NodeKind::GoogleLead { text },
        UiNodeType::Zapier => NodeKind::Zapier { text },
    }
}

fn convert_edge(edge: UiEdge) -> GraphEdge {
    GraphEdge {
        id: edge.id,
        source: edge.source,
        target: edge.target,
        source_handle: edge.source_handle,
        target_handle: edge.target_handle,
        data_label: edge.data.and_then(|d| d.label),
        label: edge.label,
    }
}

fn variable_names(refs: Option<&[UiVariableRef]>) -> Vec<String> {
    refs.unwrap_or_default()
        .iter()
        .filter_map(UiVariableRef::name)
        .map(str::to_string)
        .collect()
}
