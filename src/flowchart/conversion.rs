use super::definition::Flowchart;
use crate::error::ConversionError;

/// A trait for editor data models that can be converted into a Michi `Flowchart`.
///
/// This is the extension point that keeps the compiler independent of any one canvas
/// editor. By implementing this trait on your own structs, you provide a translation
/// layer into the typed graph model the compiler works on.
///
/// # Example
///
/// ```rust,no_run
/// use michi::prelude::*;
///
/// struct MyStep { id: String, says: String }
/// struct MyScript { steps: Vec<MyStep> }
///
/// impl IntoFlowchart for MyScript {
///     fn into_flowchart(self) -> std::result::Result<Flowchart, ConversionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|step| GraphNode::new(step.id, NodeKind::Question { text: step.says }))
///             .collect();
///
///         Ok(Flowchart {
///             nodes,
///             edges: vec![], // Convert your connections here as well
///             name: None,
///             description: None,
///         })
///     }
/// }
/// ```
pub trait IntoFlowchart {
    /// Consumes the object and converts it into a compilable flowchart.
    fn into_flowchart(self) -> Result<Flowchart, ConversionError>;
}

impl IntoFlowchart for Flowchart {
    fn into_flowchart(self) -> Result<Flowchart, ConversionError> {
        Ok(self)
    }
}
