//! Review session: sequences extraction, selection, appeal drafting and export for one reviewer.

mod error;
pub mod export;
mod session;
mod status;

pub use error::SessionError;
pub use export::{Clipboard, ClipboardError};
pub use session::{
    Phase, Review, ReviewSession, STATUS_CLEAR_AFTER, SUPPORTED_EXTENSIONS, SessionConfig,
};
pub use status::StatusFlash;
