use serde::{Deserialize, Serialize};

/// An edge in provider format. `label` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    #[serde(
        rename = "targetHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
    pub data: EdgeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub label: String,
}

impl OutputEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            data: EdgeData {
                label: label.clone(),
            },
            label,
            source_handle: None,
            target_handle: None,
        }
    }
}
