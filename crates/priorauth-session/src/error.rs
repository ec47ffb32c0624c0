use std::path::PathBuf;

use priorauth_client::ExtractError;
use priorauth_core::ActionKind;
use thiserror::Error;

use crate::export::ClipboardError;

/// Why a session operation was refused or failed.
///
/// Every variant leaves the session usable. Precondition failures
/// (`NoFileSelected`, `NoResult`, `NoOutline`, ...) change no state at all.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no packet selected")]
    NoFileSelected,

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no submission in flight")]
    NoSubmissionInFlight,

    #[error("{0}")]
    Submission(#[from] ExtractError),

    #[error("no extraction result loaded")]
    NoResult,

    #[error("no field with key '{0}'")]
    UnknownField(String),

    #[error("field '{0}' has no source to inspect")]
    NoSource(String),

    #[error("appeal outline is only offered for Start Appeal Draft (current action: {0})")]
    AppealUnavailable(ActionKind),

    #[error("no appeal outline generated yet")]
    NoOutline,

    #[error("copy failed: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("cannot save {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}
