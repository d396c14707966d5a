//! Window host: the privileged side of the workspace
//!
//! The host owns everything the UI side must not touch directly: the
//! floating window registry, the persisted layout documents, and the
//! authorization gate in front of both. The UI side reaches it only
//! through the [`LayoutHost`] surface; every call is fire-and-forget
//! safe: the controller never assumes success and always has a local
//! fallback.

pub mod authorization;
pub mod persistence;
pub mod registry;

use crate::error::HostError;
use crate::geometry::Bounds;
use crate::layout::{LayoutNode, PaneId};
use authorization::AuthorizedRoots;
use parking_lot::Mutex;
use persistence::{FloatingPaneDescriptor, PersistedLayoutDocument};
use registry::{FloatingWindowRegistry, OpenOutcome, WindowBackend};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The stored workspace state handed back to the controller on load.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLayout {
    /// Untrusted layout tree; `None` when nothing was ever saved.
    pub layout: Option<Value>,
    pub floating_panes: Vec<FloatingPaneDescriptor>,
    /// Schema tag found in the document, `None` for legacy files.
    pub schema_version: Option<u32>,
}

impl StoredLayout {
    fn empty() -> Self {
        Self {
            layout: None,
            floating_panes: Vec::new(),
            schema_version: Some(persistence::LAYOUT_SCHEMA_VERSION),
        }
    }
}

/// The host surface consumed by the workspace controller.
///
/// Unauthorized paths degrade per operation: `load`/`list` return
/// empty results, everything else fails hard with
/// [`HostError::Unauthorized`].
pub trait LayoutHost: Send + Sync {
    /// The concrete host never fails here (absent or malformed
    /// documents become the empty shape); the `Result` exists for
    /// transports that can actually be unreachable.
    fn load_layout(&self, project: &Path) -> Result<StoredLayout, HostError>;

    fn save_layout(
        &self,
        project: &Path,
        layout: &LayoutNode,
        schema_version: u32,
    ) -> Result<(), HostError>;

    fn reset_layout(&self, project: &Path) -> Result<(), HostError>;

    fn open_floating_pane(
        &self,
        project: &Path,
        pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> Result<OpenOutcome, HostError>;

    fn close_floating_pane(&self, project: &Path, pane: PaneId) -> Result<(), HostError>;

    fn list_floating_panes(&self, project: &Path) -> Vec<FloatingPaneDescriptor>;
}

/// Concrete host over an injected window backend.
pub struct WindowHost<B: WindowBackend> {
    backend: B,
    authorized: Mutex<AuthorizedRoots>,
    registry: Mutex<FloatingWindowRegistry>,
}

impl<B: WindowBackend> WindowHost<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            authorized: Mutex::new(AuthorizedRoots::new()),
            registry: Mutex::new(FloatingWindowRegistry::new()),
        }
    }

    /// One-time grant called by the project-loading collaborator when
    /// a project opens successfully.
    pub fn authorize(&self, project: &Path) -> Result<PathBuf, HostError> {
        self.authorized.lock().authorize(project)
    }

    /// Entry point for the backend's window-close lifecycle events;
    /// the only removal path for registry entries.
    pub fn window_closed(&self, project: &Path, pane: PaneId) {
        if let Ok(root) = self.authorized.lock().resolve(project) {
            self.registry.lock().note_closed(&root, pane);
        }
    }

    fn resolve(&self, project: &Path) -> Result<PathBuf, HostError> {
        self.authorized.lock().resolve(project)
    }
}

impl<B: WindowBackend> LayoutHost for WindowHost<B> {
    fn load_layout(&self, project: &Path) -> Result<StoredLayout, HostError> {
        let Ok(root) = self.resolve(project) else {
            log::warn!(
                "Refusing layout load for unauthorized path {}",
                project.display()
            );
            return Ok(StoredLayout::empty());
        };
        let doc = persistence::load_document(&root);
        Ok(StoredLayout {
            layout: doc.layout,
            floating_panes: doc.floating_panes,
            schema_version: doc.version,
        })
    }

    fn save_layout(
        &self,
        project: &Path,
        layout: &LayoutNode,
        schema_version: u32,
    ) -> Result<(), HostError> {
        let root = self.resolve(project)?;
        let doc = PersistedLayoutDocument {
            version: Some(schema_version),
            layout: Some(serde_json::to_value(layout)?),
            // Live windows are the source of truth for what floats.
            floating_panes: self.registry.lock().list(&root),
        };
        persistence::save_document(&root, &doc)?;
        Ok(())
    }

    fn reset_layout(&self, project: &Path) -> Result<(), HostError> {
        let root = self.resolve(project)?;
        persistence::reset_document(&root)?;
        Ok(())
    }

    fn open_floating_pane(
        &self,
        project: &Path,
        pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> Result<OpenOutcome, HostError> {
        let root = self.resolve(project)?;
        self.registry
            .lock()
            .open(&root, pane, bounds, display_id, &self.backend)
    }

    fn close_floating_pane(&self, project: &Path, pane: PaneId) -> Result<(), HostError> {
        let root = self.resolve(project)?;
        self.registry.lock().close(&root, pane);
        Ok(())
    }

    fn list_floating_panes(&self, project: &Path) -> Vec<FloatingPaneDescriptor> {
        let Ok(root) = self.resolve(project) else {
            log::warn!(
                "Refusing floating pane list for unauthorized path {}",
                project.display()
            );
            return Vec::new();
        };
        self.registry.lock().list(&root)
    }
}
