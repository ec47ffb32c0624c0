//! Appeal outline synthesis.
//!
//! The outline is a pure function of the extraction result: no clock, no
//! randomness, so regenerating it for an unchanged result is byte-identical.
//! The payer's actual denial rationale is not available here, so that section
//! is always a fill-in instruction for the reviewer.

use std::str::FromStr;

use thiserror::Error;

use crate::model::ExtractionResult;

const MAX_EVIDENCE_LINES: usize = 4;

const DENIAL_PLACEHOLDER: &str = "- [Insert payer denial rationale]";
const EVIDENCE_PLACEHOLDER: &str = "- [Add clinical evidence]";
const DEFAULT_ATTACHMENTS: &[&str] = &["Chart notes", "Labs", "Prior auth request form"];

/// File stem used when the outline is saved to disk.
pub const OUTLINE_FILE_STEM: &str = "appeal-outline";

/// Build the appeal outline text for `result`.
pub fn build_outline(result: &ExtractionResult) -> String {
    let evidence = evidence_lines(result);
    let evidence = if evidence.is_empty() {
        EVIDENCE_PLACEHOLDER.to_string()
    } else {
        evidence.join("\n")
    };

    let attachments: Vec<String> = if result.missing_fields.is_empty() {
        DEFAULT_ATTACHMENTS.iter().map(|a| format!("- {a}")).collect()
    } else {
        result.missing_fields.iter().map(|m| format!("- {m}")).collect()
    };
    let attachments = attachments.join("\n");

    [
        "Appeal Outline",
        "",
        "Denial reason:",
        DENIAL_PLACEHOLDER,
        "",
        "Evidence:",
        evidence.as_str(),
        "",
        "Attachments:",
        attachments.as_str(),
    ]
    .join("\n")
}

/// Audit trail first; field values only when the trail is empty.
fn evidence_lines(result: &ExtractionResult) -> Vec<String> {
    if !result.audit_trail.is_empty() {
        return result
            .audit_trail
            .iter()
            .take(MAX_EVIDENCE_LINES)
            .map(|entry| {
                let value = entry.value.as_deref().unwrap_or("—");
                match entry.page {
                    Some(page) => format!("- {}: {} (p{})", entry.label, value, page),
                    None => format!("- {}: {}", entry.label, value),
                }
            })
            .collect();
    }

    result
        .fields
        .iter()
        .filter_map(|f| f.present_value().map(|v| format!("- {}: {}", f.label, v)))
        .take(MAX_EVIDENCE_LINES)
        .collect()
}

/// On-disk format for a downloaded outline. Only the extension differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Markdown,
}

#[derive(Debug, Error)]
#[error("unknown export format '{0}' (expected 'txt' or 'md')")]
pub struct UnknownExportFormat(pub String);

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    /// `appeal-outline.txt` or `appeal-outline.md`.
    pub fn file_name(self) -> String {
        format!("{}.{}", OUTLINE_FILE_STEM, self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(UnknownExportFormat(s.to_string())),
        }
    }
}
