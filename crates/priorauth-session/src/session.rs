//! The review session state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Ready ──(select / outline / sort / export)──▶ Ready
//!   ▲                 │                │
//!   └────── err ──────┘                └──submit──▶ Loading ──err──▶ Ready
//! ```
//!
//! Everything derived from one extraction result (run metadata, appeal
//! outline, selected field) lives in a single [`Review`] record. A new result
//! replaces the whole record, so stale derived state cannot survive it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use priorauth_client::{ExtractError, Extractor};
use priorauth_core::{
    Demo, ExportFormat, ExtractionResult, Field, NextAction, RunMetadata, SectionGroup,
    build_outline, group_by_section, interpret, missing,
};
use tracing::{info, warn};

use crate::SessionError;
use crate::export::Clipboard;
use crate::status::StatusFlash;

/// How long a status message stays up.
pub const STATUS_CLEAR_AFTER: Duration = Duration::from_millis(1800);

/// Packet types the extraction service accepts, by extension.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["pdf", "png", "jpg", "jpeg", "tiff", "bmp", "svg", "txt"];

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub status_clear_after: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_clear_after: STATUS_CLEAR_AFTER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No result yet.
    Idle,
    /// One extraction request in flight.
    Loading,
    /// A result is displayed.
    Ready,
}

/// One accepted extraction result and everything derived from it.
#[derive(Debug, Clone)]
pub struct Review {
    result: ExtractionResult,
    run: RunMetadata,
    outline: Option<String>,
    selected: Option<String>,
}

impl Review {
    fn new(result: ExtractionResult) -> Self {
        Self {
            result,
            run: RunMetadata::now(),
            outline: None,
            selected: None,
        }
    }

    pub fn result(&self) -> &ExtractionResult {
        &self.result
    }

    pub fn run(&self) -> &RunMetadata {
        &self.run
    }

    pub fn outline(&self) -> Option<&str> {
        self.outline.as_deref()
    }

    /// The field whose source evidence is open, if any.
    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.as_deref().and_then(|key| self.result.field(key))
    }
}

/// State for one reviewer working through extraction results.
pub struct ReviewSession<E> {
    extractor: E,
    phase: Phase,
    review: Option<Review>,
    file: Option<PathBuf>,
    sort_by_confidence: bool,
    error: Option<String>,
    status: StatusFlash,
}

impl<E> ReviewSession<E> {
    pub fn new(extractor: E, config: SessionConfig) -> Self {
        Self {
            extractor,
            phase: Phase::Idle,
            review: None,
            file: None,
            sort_by_confidence: false,
            error: None,
            status: StatusFlash::new(config.status_clear_after),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.review.as_ref().map(|r| &r.result)
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Message from the last failed submission, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current transient status, if it has not cleared yet.
    pub fn status(&self) -> Option<String> {
        self.status.current()
    }

    pub fn sort_by_confidence(&self) -> bool {
        self.sort_by_confidence
    }

    // ── Submission ──

    /// Choose the packet to upload next.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(ext))
            });
        if !supported {
            return Err(SessionError::UnsupportedFile(path));
        }
        self.file = Some(path);
        Ok(())
    }

    /// Enter `Loading` and hand out the file to upload.
    ///
    /// Refused while another submission is in flight or when no file is selected.
    pub fn begin_submit(&mut self) -> Result<PathBuf, SessionError> {
        if self.phase == Phase::Loading {
            return Err(SessionError::SubmissionInFlight);
        }
        let file = self.file.clone().ok_or(SessionError::NoFileSelected)?;
        self.phase = Phase::Loading;
        self.error = None;
        info!(file = %file.display(), "submission started");
        Ok(file)
    }

    /// Apply the outcome of the request started by [`begin_submit`](Self::begin_submit).
    ///
    /// On failure the previous result, if any, stays on screen.
    pub fn finish_submit(
        &mut self,
        outcome: Result<ExtractionResult, ExtractError>,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::Loading {
            warn!("extraction outcome arrived with no submission in flight; ignored");
            return Err(SessionError::NoSubmissionInFlight);
        }
        match outcome {
            Ok(result) => {
                self.accept(result);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "submission failed");
                self.error = Some(message);
                self.phase = if self.review.is_some() {
                    Phase::Ready
                } else {
                    Phase::Idle
                };
                Err(SessionError::Submission(err))
            }
        }
    }

    /// Replace the current result with a canned one, no network involved.
    pub fn load_demo(&mut self, demo: Demo) -> Result<(), SessionError> {
        if self.phase == Phase::Loading {
            return Err(SessionError::SubmissionInFlight);
        }
        info!(demo = ?demo, "loading demo result");
        self.accept(demo.result());
        Ok(())
    }

    fn accept(&mut self, result: ExtractionResult) {
        for key in result.duplicate_keys() {
            warn!(key, "duplicate field key in extraction result");
        }
        let review = Review::new(result);
        info!(
            run_id = %review.run.run_id,
            filename = %review.result.document.filename,
            fields = review.result.fields.len(),
            missing = review.result.missing_fields.len(),
            action = %review.result.action(),
            "extraction result accepted"
        );
        self.review = Some(review);
        self.error = None;
        self.phase = Phase::Ready;
    }

    // ── Derived views ──

    /// Fields grouped by section, honouring the confidence-sort toggle.
    pub fn sections(&self) -> Vec<SectionGroup<'_>> {
        self.result()
            .map(|r| group_by_section(&r.fields, self.sort_by_confidence))
            .unwrap_or_default()
    }

    pub fn next_action(&self) -> Option<NextAction<'_>> {
        self.result().map(interpret)
    }

    pub fn prioritized_missing(&self) -> Vec<&str> {
        self.result()
            .map(|r| missing::prioritize(&r.missing_fields))
            .unwrap_or_default()
    }

    pub fn why_line(&self) -> Option<String> {
        self.result().map(|r| missing::summary_line(&r.missing_fields))
    }

    // ── Reviewer actions ──

    /// Flip the confidence sort. Returns the new setting.
    pub fn toggle_sort(&mut self) -> bool {
        self.sort_by_confidence = !self.sort_by_confidence;
        self.sort_by_confidence
    }

    /// Open the source evidence for one field, replacing any open selection.
    ///
    /// Only fields that carry a source can be inspected.
    pub fn select_field(&mut self, key: &str) -> Result<&Field, SessionError> {
        let review = self.review.as_mut().ok_or(SessionError::NoResult)?;
        let field = review
            .result
            .field(key)
            .ok_or_else(|| SessionError::UnknownField(key.to_string()))?;
        if field.source.is_none() {
            return Err(SessionError::NoSource(key.to_string()));
        }
        review.selected = Some(field.key.clone());
        review
            .selected_field()
            .ok_or_else(|| SessionError::UnknownField(key.to_string()))
    }

    pub fn close_evidence(&mut self) {
        if let Some(review) = self.review.as_mut() {
            review.selected = None;
        }
    }

    /// Build and store the appeal outline, overwriting any previous one.
    pub fn generate_outline(&mut self) -> Result<&str, SessionError> {
        let review = self.review.as_mut().ok_or(SessionError::NoResult)?;
        let action = review.result.action();
        if !action.allows_appeal_outline() {
            return Err(SessionError::AppealUnavailable(action));
        }
        let outline = build_outline(&review.result);
        info!(run_id = %review.run.run_id, bytes = outline.len(), "appeal outline generated");
        Ok(review.outline.insert(outline).as_str())
    }

    /// Copy the stored outline to the clipboard and flash the outcome.
    pub fn copy_outline(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), SessionError> {
        let outline = self
            .review
            .as_ref()
            .and_then(|r| r.outline.as_deref())
            .ok_or(SessionError::NoOutline)?;
        match clipboard.write_text(outline) {
            Ok(()) => {
                info!(bytes = outline.len(), "appeal outline copied");
                self.status.set("Copied");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.status.set("Copy failed");
                Err(SessionError::Clipboard(err))
            }
        }
    }

    /// Save the stored outline as `appeal-outline.<ext>` inside `dir`.
    pub fn download_outline(
        &mut self,
        dir: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf, SessionError> {
        let outline = self
            .review
            .as_ref()
            .and_then(|r| r.outline.as_deref())
            .ok_or(SessionError::NoOutline)?;
        let file_name = format.file_name();
        let path = dir.join(&file_name);
        match std::fs::write(&path, outline.as_bytes()) {
            Ok(()) => {
                info!(path = %path.display(), "appeal outline saved");
                self.status.set(format!("Saved {file_name}"));
                Ok(path)
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "appeal outline save failed");
                self.status.set("Save failed");
                Err(SessionError::Save { path, source })
            }
        }
    }
}

impl<E: Extractor> ReviewSession<E> {
    /// Upload the selected file and apply the outcome.
    pub async fn submit(&mut self) -> Result<(), SessionError> {
        let file = self.begin_submit()?;
        let outcome = self.extractor.extract(&file).await;
        self.finish_submit(outcome)
    }
}
