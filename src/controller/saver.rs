//! Debounced layout persistence
//!
//! Rapid `apply` calls are coalesced into a single write per debounce
//! window, last value wins. The debounce is a cancellable scheduled
//! task, aborted and replaced on every schedule, rather than a raw
//! timer id, so it runs under tokio's paused test clock without real
//! waits. Since one task is in flight at most, writes for the same
//! file can never race each other.

use crate::host::LayoutHost;
use crate::host::persistence::LAYOUT_SCHEMA_VERSION;
use crate::layout::LayoutNode;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Coalescing window for layout writes.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(650);

/// Cancel-and-reschedule wrapper around the host's `save_layout`.
pub struct DebouncedSaver<H: LayoutHost + 'static> {
    host: Arc<H>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    /// Last scheduled payload, kept for `flush`.
    last: Option<(PathBuf, LayoutNode)>,
}

impl<H: LayoutHost + 'static> DebouncedSaver<H> {
    pub fn new(host: Arc<H>, delay: Duration) -> Self {
        Self {
            host,
            delay,
            pending: None,
            last: None,
        }
    }

    /// Schedule a write, replacing any write still waiting out its
    /// debounce window.
    pub fn schedule(&mut self, project: PathBuf, layout: LayoutNode) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.last = Some((project.clone(), layout.clone()));

        let host = Arc::clone(&self.host);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = host.save_layout(&project, &layout, LAYOUT_SCHEMA_VERSION) {
                log::warn!("Deferred layout save failed for {}: {}", project.display(), e);
            }
        }));
    }

    /// Drop whatever is still pending without writing it. Used when
    /// the project it belongs to is going away.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.last = None;
    }

    /// Write the latest payload immediately, skipping the remainder of
    /// the debounce window.
    ///
    /// Assumes a current-thread runtime: the debounce task cannot be
    /// mid-`save_layout` while this runs, so aborting it and writing
    /// here never produces two writes. On a multi-thread runtime an
    /// abort could race a task already past its sleep.
    pub fn flush(&mut self) {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => handle.abort(),
            // Already written (or nothing scheduled); nothing to flush.
            _ => {
                self.last = None;
                return;
            }
        }
        if let Some((project, layout)) = self.last.take() {
            if let Err(e) = self
                .host
                .save_layout(&project, &layout, LAYOUT_SCHEMA_VERSION)
            {
                log::warn!("Flushed layout save failed for {}: {}", project.display(), e);
            }
        }
    }
}

impl<H: LayoutHost + 'static> Drop for DebouncedSaver<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
