use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet period before an edit is rendered.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debounce for a live practice preview.
///
/// Every edit cancels the pending render and schedules a new one, so only
/// content that sat unchanged for the full delay is published. Must be driven
/// from inside a tokio runtime.
pub struct PreviewDebouncer {
    delay: Duration,
    tx: Arc<watch::Sender<String>>,
    pending: Option<JoinHandle<()>>,
    renders: Arc<AtomicUsize>,
}

impl PreviewDebouncer {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_delay(initial, PREVIEW_DEBOUNCE)
    }

    #[must_use]
    pub fn with_delay(initial: impl Into<String>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial.into());
        Self {
            delay,
            tx: Arc::new(tx),
            pending: None,
            renders: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Receiver that observes each published render.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// Content currently shown in the preview.
    #[must_use]
    pub fn rendered(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Number of renders published so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Record an edit and restart the quiet period.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.cancel();
        let content = content.into();
        let tx = Arc::clone(&self.tx);
        let renders = Arc::clone(&self.renders);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_replace(content);
            renders.fetch_add(1, Ordering::Relaxed);
        }));
    }

    /// Drop any scheduled render.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for PreviewDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
