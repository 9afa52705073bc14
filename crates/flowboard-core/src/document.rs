//! The persisted diagram document.
//!
//! A document is the `{ nodes, edges }` snapshot written verbatim as UTF-8
//! JSON by Save and read back by Load. It is the only persisted artifact;
//! there is no server round-trip and no partial apply — import either
//! replaces the whole diagram or leaves it untouched.

use crate::model::{DiagramNode, Edge};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Download name the Save action uses.
pub const EXPORT_FILE_NAME: &str = "flow_data.json";

/// The serializable `{nodes, edges}` snapshot.
///
/// Missing top-level keys deserialize as empty collections, so `{}` is a
/// valid (empty) diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<DiagramNode>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// The one failure class the editor surfaces to the user: an import file
/// that does not parse as a diagram document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not read diagram JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read diagram JSON: top level must be an object")]
    NotAnObject,
}

impl Document {
    /// Parse a document from JSON text. The top level must be an object;
    /// the caller keeps its current diagram untouched on error.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(DocumentError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Emit as JSON with 2-space indentation, the format Save downloads.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
