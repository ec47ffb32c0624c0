//! Extraction result wire types shared between the extraction service and the review session.

use serde::{Deserialize, Serialize};

/// Where in the source packet a value was read from.
///
/// The bounding box is passed through verbatim; its axis and unit convention
/// belong to the extraction service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub snippet: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

/// One extracted datum from the packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub section: String,
    /// Unique within one [`ExtractionResult`].
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub source: Option<Source>,
}

impl Field {
    /// The present value, if any. Empty strings count as absent.
    pub fn present_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn has_value(&self) -> bool {
        self.present_value().is_some()
    }

    /// Confidence used for display and sorting: 0 when the value is absent.
    pub fn display_confidence(&self) -> f64 {
        if self.has_value() { self.confidence } else { 0.0 }
    }
}

/// Descriptive metadata about the uploaded packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    /// Coarse tag such as `pdf`, `image` or `text`.
    pub file_type: String,
    #[serde(default)]
    pub pages: Option<u32>,
    /// Advisory, non-blocking.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// The closed set of next steps the extraction service can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Submit,
    RequestMoreInfo,
    StartAppealDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action: ActionKind,
    pub reason: String,
}

/// A citation tying a field value to its location in the packet.
///
/// References a [`Field`] by `key`; not every field has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// The full response of `POST /extract`. Never mutated once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document: DocumentInfo,
    pub fields: Vec<Field>,
    pub missing_fields: Vec<String>,
    pub suggested_next_action: SuggestedAction,
    pub audit_trail: Vec<AuditEntry>,
}

impl ExtractionResult {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Confidence of the field an audit entry cites, if that field exists.
    pub fn confidence_for(&self, key: &str) -> Option<f64> {
        self.field(key).map(|f| f.confidence)
    }

    pub fn action(&self) -> ActionKind {
        self.suggested_next_action.action
    }

    /// Keys that occur more than once in `fields`, in order of their second occurrence.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.key.as_str()) && !dups.contains(&field.key.as_str()) {
                dups.push(field.key.as_str());
            }
        }
        dups
    }
}
