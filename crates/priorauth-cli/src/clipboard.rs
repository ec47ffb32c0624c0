//! Clipboard backed by an external command such as `pbcopy` or `wl-copy`.

use std::io::Write;
use std::process::{Command, Stdio};

use priorauth_session::{Clipboard, ClipboardError};
use tracing::debug;

/// Pipes text to a command's stdin.
///
/// The command line is split on whitespace with no shell quoting, so an
/// argument cannot itself contain spaces. Wrap anything fancier in a script.
pub struct CommandClipboard {
    command: Option<String>,
}

impl CommandClipboard {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let command = self.command.as_deref().ok_or_else(|| {
            ClipboardError::Unavailable(
                "no clipboard command configured (set PRIORAUTH_CLIPBOARD_CMD)".into(),
            )
        })?;
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard command is empty".into()))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // Stdin is dropped before the wait so the child sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        // Always reap the child, even when the write failed.
        let status = child.wait()?;
        if !status.success() {
            return Err(ClipboardError::Unavailable(format!(
                "`{command}` exited with {status}"
            )));
        }
        written?;
        debug!(command, bytes = text.len(), "clipboard written");
        Ok(())
    }
}
