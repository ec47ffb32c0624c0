//! Outline export seams.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Platform clipboard. The session only needs write access.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}
