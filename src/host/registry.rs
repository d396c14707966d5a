//! Floating window registry
//!
//! Per-project map of pane → live window. The registry is the only
//! object mutated by more than one host call path (open, close, list,
//! reset), so its surface is kept deliberately narrow and it is owned
//! by the [`WindowHost`](super::WindowHost) that created it, never a
//! process-wide static, so multiple hosts (tests, multi-window
//! shells) cannot share state implicitly.
//!
//! Invariant: at most one live window per `(project root, pane)`.
//! Entries are removed exactly once, on the window's own close
//! lifecycle event, never by timer or external request.

use crate::error::HostError;
use crate::geometry::{Bounds, ClampInfo, DisplayInfo, clamp_floating_bounds};
use crate::host::persistence::FloatingPaneDescriptor;
use crate::layout::PaneId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A live OS window handle as seen by the registry.
pub trait HostWindow: Send {
    /// Bring the window to front.
    fn focus(&self);
    /// Start the window's close lifecycle.
    fn close(&mut self);
    /// Whether the underlying window is already gone.
    fn is_destroyed(&self) -> bool;
    /// Current outer geometry.
    fn bounds(&self) -> Bounds;
    /// Display the window currently sits on, if known.
    fn display_id(&self) -> Option<u32>;
}

/// The privileged side able to enumerate displays and create windows.
///
/// Implemented by the embedding shell (winit, in the desktop build);
/// tests use scripted fakes.
pub trait WindowBackend: Send + Sync {
    /// Currently connected displays.
    fn displays(&self) -> Vec<DisplayInfo>;

    /// Create a window for a pane. `bounds` and `display_id` are
    /// already clamped; `None` bounds mean the backend picks its own
    /// default placement.
    fn create_window(
        &self,
        pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> Result<Box<dyn HostWindow>, HostError>;
}

/// Result of an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOutcome {
    /// False when an existing live window was focused instead.
    pub created: bool,
    /// Present when the requested geometry had to be adjusted.
    pub clamp: Option<ClampInfo>,
}

/// Per-project map of pane → live window.
#[derive(Default)]
pub struct FloatingWindowRegistry {
    windows: HashMap<PathBuf, HashMap<PaneId, Box<dyn HostWindow>>>,
}

impl FloatingWindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a floating window for a pane, or focus the existing one.
    ///
    /// Idempotent: a second open for the same `(root, pane)` never
    /// creates a second window. Fails with [`HostError::NoDisplays`]
    /// when the backend reports no connected display.
    pub fn open(
        &mut self,
        root: &Path,
        pane: PaneId,
        requested: Option<Bounds>,
        display_id: Option<u32>,
        backend: &dyn WindowBackend,
    ) -> Result<OpenOutcome, HostError> {
        if let Some(existing) = self.windows.get(root).and_then(|panes| panes.get(&pane)) {
            if !existing.is_destroyed() {
                log::debug!("Pane {} already floating for {}, focusing", pane, root.display());
                existing.focus();
                return Ok(OpenOutcome {
                    created: false,
                    clamp: None,
                });
            }
            // Stale handle whose close event never arrived; replace it.
            log::warn!("Dropping destroyed window handle for pane {}", pane);
            self.note_closed(root, pane);
        }

        let displays = backend.displays();
        if displays.is_empty() {
            return Err(HostError::NoDisplays);
        }
        let (bounds, target_display, clamp) =
            match clamp_floating_bounds(requested, display_id, &displays) {
                Some(outcome) => (Some(outcome.bounds), Some(outcome.display_id), outcome.clamp),
                None => (None, None, None),
            };

        let window = backend.create_window(pane, bounds, target_display)?;
        self.windows
            .entry(root.to_path_buf())
            .or_default()
            .insert(pane, window);
        log::info!(
            "Opened floating pane {} for {} at {:?}",
            pane,
            root.display(),
            bounds
        );
        Ok(OpenOutcome {
            created: true,
            clamp,
        })
    }

    /// Remove the entry for a window whose close lifecycle event just
    /// fired. No-op if the entry is already gone.
    pub fn note_closed(&mut self, root: &Path, pane: PaneId) {
        if let Some(panes) = self.windows.get_mut(root) {
            if panes.remove(&pane).is_some() {
                log::debug!("Floating pane {} closed for {}", pane, root.display());
            }
            if panes.is_empty() {
                self.windows.remove(root);
            }
        }
    }

    /// Close a pane's window. Closing an absent pane is a no-op.
    pub fn close(&mut self, root: &Path, pane: PaneId) -> bool {
        let Some(panes) = self.windows.get_mut(root) else {
            return false;
        };
        let Some(mut window) = panes.remove(&pane) else {
            return false;
        };
        if panes.is_empty() {
            self.windows.remove(root);
        }
        if !window.is_destroyed() {
            window.close();
        }
        true
    }

    /// Close every tracked window for a project. Returns how many were
    /// closed.
    pub fn close_all(&mut self, root: &Path) -> usize {
        let panes: Vec<PaneId> = self.panes(root);
        for pane in &panes {
            self.close(root, *pane);
        }
        panes.len()
    }

    /// Serialize every live window back into descriptor form by
    /// reading its current geometry. This is how "what floating panes
    /// currently exist" is derived for persistence, not tracked
    /// separately.
    pub fn list(&self, root: &Path) -> Vec<FloatingPaneDescriptor> {
        let Some(panes) = self.windows.get(root) else {
            return Vec::new();
        };
        let mut descriptors: Vec<FloatingPaneDescriptor> = panes
            .iter()
            .filter(|(_, win)| !win.is_destroyed())
            .map(|(pane, win)| {
                FloatingPaneDescriptor::new(*pane, Some(win.bounds()), win.display_id())
            })
            .collect();
        descriptors.sort_by_key(|d| d.id.clone());
        descriptors
    }

    /// Panes with a tracked window for this project.
    pub fn panes(&self, root: &Path) -> Vec<PaneId> {
        self.windows
            .get(root)
            .map(|panes| panes.keys().copied().collect())
            .unwrap_or_default()
    }
}


#[cfg(test)]
mod tests {
    use super::test_backend::FakeBackend;
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/projects/novel")
    }

    #[test]
    fn test_open_creates_window_with_clamped_bounds() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        let outcome = registry
            .open(
                &root(),
                PaneId::Notes,
                Some(Bounds::new(-500, 50, 2000, 400)),
                Some(1),
                &backend,
            )
            .unwrap();

        assert!(outcome.created);
        let clamp = outcome.clamp.unwrap();
        assert_eq!(clamp.after, Bounds::new(0, 50, 1920, 400));
        assert_eq!(backend.created.lock().len(), 1);
        assert_eq!(
            backend.created.lock()[0].lock().bounds,
            Bounds::new(0, 50, 1920, 400)
        );
    }

    #[test]
    fn test_second_open_focuses_existing_window() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        let bounds = Some(Bounds::new(10, 10, 400, 300));

        let first = registry
            .open(&root(), PaneId::Notes, bounds, None, &backend)
            .unwrap();
        let second = registry
            .open(&root(), PaneId::Notes, bounds, None, &backend)
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.clamp, None);
        // Exactly one live window, focused once by the second attempt.
        assert_eq!(backend.created.lock().len(), 1);
        assert_eq!(backend.created.lock()[0].lock().focus_count, 1);
    }

    #[test]
    fn test_open_without_bounds_lets_backend_choose() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        let outcome = registry
            .open(&root(), PaneId::Critique, None, None, &backend)
            .unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.clamp, None);
    }

    #[test]
    fn test_open_with_no_displays_is_refused() {
        let backend = FakeBackend::default();
        let mut registry = FloatingWindowRegistry::new();
        let err = registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap_err();
        assert!(matches!(err, HostError::NoDisplays));
        assert!(backend.created.lock().is_empty());
        assert!(registry.panes(&root()).is_empty());
    }

    #[test]
    fn test_close_event_is_only_removal_path() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap();
        assert_eq!(registry.panes(&root()), vec![PaneId::Notes]);

        registry.note_closed(&root(), PaneId::Notes);
        assert!(registry.panes(&root()).is_empty());
        // Duplicate close event is harmless.
        registry.note_closed(&root(), PaneId::Notes);
    }

    #[test]
    fn test_close_absent_pane_is_noop() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        assert!(!registry.close(&root(), PaneId::Wizard));
        registry
            .open(&root(), PaneId::Wizard, None, None, &backend)
            .unwrap();
        assert!(registry.close(&root(), PaneId::Wizard));
        assert!(backend.created.lock()[0].lock().destroyed);
        assert!(!registry.close(&root(), PaneId::Wizard));
    }

    #[test]
    fn test_destroyed_window_is_replaced_on_open() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap();
        backend.created.lock()[0].lock().destroyed = true;

        let outcome = registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap();
        assert!(outcome.created);
        assert_eq!(backend.created.lock().len(), 2);
    }

    #[test]
    fn test_list_reads_live_geometry() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        registry
            .open(
                &root(),
                PaneId::Notes,
                Some(Bounds::new(20, 30, 400, 360)),
                Some(1),
                &backend,
            )
            .unwrap();
        registry
            .open(&root(), PaneId::Critique, None, None, &backend)
            .unwrap();

        // User dragged the notes window; list must reflect current
        // geometry, not what open was called with.
        backend.created.lock()[0].lock().bounds = Bounds::new(600, 80, 400, 360);

        let listed = registry.list(&root());
        assert_eq!(listed.len(), 2);
        let notes = listed.iter().find(|d| d.id == "notes").unwrap();
        assert_eq!(notes.bounds, Some(Bounds::new(600, 80, 400, 360)));
        assert_eq!(notes.display_id, Some(1));
    }

    #[test]
    fn test_list_skips_destroyed_windows() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap();
        backend.created.lock()[0].lock().destroyed = true;
        assert!(registry.list(&root()).is_empty());
    }

    #[test]
    fn test_projects_are_isolated() {
        let backend = FakeBackend::single_display();
        let mut registry = FloatingWindowRegistry::new();
        let other = PathBuf::from("/projects/memoir");
        registry
            .open(&root(), PaneId::Notes, None, None, &backend)
            .unwrap();
        registry
            .open(&other, PaneId::Notes, None, None, &backend)
            .unwrap();

        assert_eq!(registry.close_all(&root()), 1);
        assert!(registry.panes(&root()).is_empty());
        assert_eq!(registry.panes(&other), vec![PaneId::Notes]);
    }

    #[test]
    fn test_creation_failure_leaves_no_entry() {
        let mut backend = FakeBackend::single_display();
        backend.fail_panes.push(PaneId::Wizard);
        let mut registry = FloatingWindowRegistry::new();

        let err = registry
            .open(&root(), PaneId::Wizard, None, None, &backend)
            .unwrap_err();
        assert!(matches!(err, HostError::WindowCreation { .. }));
        assert!(registry.panes(&root()).is_empty());
    }
}
