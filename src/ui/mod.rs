//! The canvas editor's JSON format and its conversion into the typed graph model.
pub mod conversion;
pub mod types;

pub use conversion::UiNodeType;
pub use types::*;
