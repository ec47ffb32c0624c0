//! Transient status message with a single cancellable auto-clear timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Default)]
struct Slot {
    generation: u64,
    message: Option<String>,
}

/// A status line that clears itself after a fixed delay.
///
/// Setting a new message aborts the pending clear and starts a fresh one.
/// Each message also carries a generation number, and a timer only clears
/// the message it was started for, so a late timer can never wipe a newer
/// status.
pub struct StatusFlash {
    slot: Arc<Mutex<Slot>>,
    timer: Option<JoinHandle<()>>,
    clear_after: Duration,
}

impl StatusFlash {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            slot: Arc::default(),
            timer: None,
            clear_after,
        }
    }

    /// Show `message`, replacing any current status and its timer.
    ///
    /// Outside a tokio runtime the message is shown but never auto-cleared.
    pub fn set(&mut self, message: impl Into<String>) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let message = message.into();
        debug!(status = %message, "status set");
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.message = Some(message);
            slot.generation
        };

        let Ok(handle) = Handle::try_current() else {
            warn!("no async runtime; status will not auto-clear");
            return;
        };
        let slot = Arc::clone(&self.slot);
        let delay = self.clear_after;
        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.message = None;
            }
        }));
    }

    pub fn current(&self) -> Option<String> {
        lock(&self.slot).message.clone()
    }
}

impl Drop for StatusFlash {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(1800);

    #[tokio::test(start_paused = true)]
    async fn clears_after_delay() {
        let mut flash = StatusFlash::new(DELAY);
        flash.set("Copied");
        assert_eq!(flash.current().as_deref(), Some("Copied"));

        sleep(Duration::from_millis(1799)).await;
        assert_eq!(flash.current().as_deref(), Some("Copied"));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(flash.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_status_is_not_cleared_by_old_timer() {
        let mut flash = StatusFlash::new(DELAY);
        flash.set("Copied");
        sleep(Duration::from_millis(1000)).await;

        flash.set("Copy failed");
        // The first timer would have fired at 1800ms.
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(flash.current().as_deref(), Some("Copy failed"));

        sleep(Duration::from_millis(900)).await;
        assert_eq!(flash.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn clears_regardless_of_reads() {
        let mut flash = StatusFlash::new(DELAY);
        flash.set("Saved appeal-outline.md");
        for _ in 0..5 {
            sleep(Duration::from_millis(300)).await;
            let _ = flash.current();
        }
        sleep(Duration::from_millis(400)).await;
        assert_eq!(flash.current(), None);
    }

    #[test]
    fn without_runtime_message_stays() {
        let mut flash = StatusFlash::new(DELAY);
        flash.set("Copied");
        assert_eq!(flash.current().as_deref(), Some("Copied"));
    }
}
