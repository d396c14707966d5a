//! Error types for the window host surface.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the window host.
///
/// Only [`HostError::Unauthorized`] is a hard error by design: honoring
/// an unauthorized project path would be a security violation, not a UX
/// inconvenience. Everything else is caught at the call site, logged,
/// and absorbed into a per-pane no-op.
#[derive(Debug, Error)]
pub enum HostError {
    /// The project path was never granted through `authorize`.
    #[error("project path is not authorized: {0}")]
    Unauthorized(PathBuf),

    /// The backend failed to create a window.
    #[error("window creation failed for pane {pane}: {message}")]
    WindowCreation {
        pane: crate::layout::PaneId,
        message: String,
    },

    /// No display is connected; nothing can be opened.
    #[error("no display connected")]
    NoDisplays,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    /// Layout document storage failed.
    #[error("layout storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}
