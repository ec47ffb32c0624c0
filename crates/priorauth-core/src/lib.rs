pub mod action;
pub mod appeal;
pub mod demo;
pub mod missing;
pub mod model;
pub mod organize;
pub mod run_meta;

pub use action::{LOW_CONFIDENCE_THRESHOLD, NextAction, interpret};
pub use appeal::{ExportFormat, UnknownExportFormat, build_outline};
pub use demo::{Demo, UnknownDemo};
pub use model::{
    ActionKind, AuditEntry, DocumentInfo, ExtractionResult, Field, Source, SuggestedAction,
};
pub use organize::{SectionGroup, format_confidence, group_by_section};
pub use run_meta::{RunMetadata, Stage, TimelineEntry};
