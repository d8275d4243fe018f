//! Copy-to-clipboard with a transient "copied" acknowledgment.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use arboard::Clipboard;
use tracing::{error, info};

use crate::error::ClipboardError;
use crate::scheduler::{Scheduler, TimerId};

pub const COPY_FAILED_MESSAGE: &str = "Failed to copy. Please try again or copy manually.";

/// Asynchronous clipboard write capability.
#[allow(async_fn_in_trait)]
pub trait ClipboardWrite {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Surface for failures the user has to acknowledge.
pub trait FailureNotice {
    fn notify_failure(&mut self, message: &str);
}

/// System clipboard through arboard.
///
/// The handle is opened on first write and kept, since on X11 the selection
/// is only served while it is alive.
#[derive(Clone, Default)]
pub struct SystemClipboard {
    inner: Arc<Mutex<Option<Clipboard>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWrite for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let inner = self.inner.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut guard = inner
                .lock()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            if guard.is_none() {
                *guard = Some(Clipboard::new()?);
            }
            match guard.as_mut() {
                Some(clipboard) => clipboard.set_text(text).map_err(ClipboardError::from),
                None => Err(ClipboardError::Unavailable("no clipboard handle".into())),
            }
        })
        .await
        .map_err(|e| ClipboardError::Interrupted(e.to_string()))?
    }
}

/// Per-field copy state.
#[derive(Debug)]
pub struct ClipboardNotifier {
    window: Duration,
    copied: bool,
    pending_reset: Option<TimerId>,
}

impl ClipboardNotifier {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            copied: false,
            pending_reset: None,
        }
    }

    /// Writes `text`, then shows the copied flag for the copy window.
    ///
    /// A failure clears the flag and goes to `notice` once; it is not retried.
    pub async fn copy<W, S, N>(
        &mut self,
        text: &str,
        writer: &W,
        scheduler: &mut S,
        notice: &mut N,
    ) -> Result<(), ClipboardError>
    where
        W: ClipboardWrite,
        S: Scheduler,
        N: FailureNotice,
    {
        let outcome = writer.write_text(text).await;
        self.cancel_reset(scheduler);
        match outcome {
            Ok(()) => {
                info!(chars = text.chars().count(), "copied to clipboard");
                self.copied = true;
                self.pending_reset = Some(scheduler.schedule(self.window));
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "failed to copy text");
                self.copied = false;
                notice.notify_failure(COPY_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Handles a fired timer. Returns false if `id` is not the pending reset.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.pending_reset != Some(id) {
            return false;
        }
        self.pending_reset = None;
        self.copied = false;
        true
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn dispose(&mut self, scheduler: &mut impl Scheduler) {
        self.cancel_reset(scheduler);
        self.copied = false;
    }

    fn cancel_reset(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(id) = self.pending_reset.take() {
            scheduler.cancel(id);
        }
    }
}
