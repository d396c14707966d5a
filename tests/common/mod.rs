//! Shared integration test helpers for inkdesk-workspace.
//!
//! Provides a scriptable in-memory [`WindowBackend`] for exercising
//! the real [`WindowHost`](inkdesk_workspace::WindowHost), and a
//! recording [`LayoutHost`] fake for exercising the controller without
//! touching the filesystem.
//!
//! Include with `mod common;` at the top of each test file. The
//! `#[allow(dead_code)]` suppresses warnings when only a subset of
//! helpers is used per file.

#![allow(dead_code)]

use inkdesk_workspace::error::HostError;
use inkdesk_workspace::geometry::{Bounds, ClampInfo, DisplayInfo};
use inkdesk_workspace::host::persistence::{FloatingPaneDescriptor, LAYOUT_SCHEMA_VERSION};
use inkdesk_workspace::host::registry::{HostWindow, OpenOutcome, WindowBackend};
use inkdesk_workspace::host::{LayoutHost, StoredLayout};
use inkdesk_workspace::layout::{LayoutNode, PaneId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Fake window backend (drives the real WindowHost)
// ---------------------------------------------------------------------------

/// Observable state of one fake OS window.
#[derive(Debug)]
pub struct WindowState {
    pub focus_count: usize,
    pub destroyed: bool,
    pub bounds: Bounds,
    pub display_id: Option<u32>,
}

pub struct FakeWindow(pub Arc<Mutex<WindowState>>);

impl HostWindow for FakeWindow {
    fn focus(&self) {
        self.0.lock().focus_count += 1;
    }

    fn close(&mut self) {
        self.0.lock().destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.0.lock().destroyed
    }

    fn bounds(&self) -> Bounds {
        self.0.lock().bounds
    }

    fn display_id(&self) -> Option<u32> {
        self.0.lock().display_id
    }
}

/// Backend that creates fake windows and records every creation.
#[derive(Default)]
pub struct FakeBackend {
    pub displays: Vec<DisplayInfo>,
    pub created: Mutex<Vec<Arc<Mutex<WindowState>>>>,
}

impl FakeBackend {
    /// Single 1920x1080 primary display with the work area at the
    /// origin.
    pub fn single_display() -> Self {
        Self {
            displays: vec![DisplayInfo {
                id: 1,
                name: Some("Primary".to_string()),
                work_area: Bounds::new(0, 0, 1920, 1080),
                primary: true,
            }],
            ..Default::default()
        }
    }
}

impl WindowBackend for FakeBackend {
    fn displays(&self) -> Vec<DisplayInfo> {
        self.displays.clone()
    }

    fn create_window(
        &self,
        _pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> Result<Box<dyn HostWindow>, HostError> {
        let state = Arc::new(Mutex::new(WindowState {
            focus_count: 0,
            destroyed: false,
            bounds: bounds.unwrap_or(Bounds::new(100, 100, 640, 480)),
            display_id,
        }));
        self.created.lock().push(Arc::clone(&state));
        Ok(Box::new(FakeWindow(state)))
    }
}

// ---------------------------------------------------------------------------
// Fake layout host (drives the controller)
// ---------------------------------------------------------------------------

type OpenHook = Box<dyn Fn(PaneId) + Send + Sync>;

/// Recording [`LayoutHost`] with failure injection. Every mutating
/// call is logged so tests can assert exact call sequences.
#[derive(Default)]
pub struct FakeHost {
    pub stored: Mutex<Option<StoredLayout>>,
    pub fail_load: Mutex<bool>,
    pub fail_saves: Mutex<bool>,
    pub fail_open_panes: Mutex<Vec<PaneId>>,
    pub clamp_results: Mutex<HashMap<PaneId, ClampInfo>>,
    pub listed: Mutex<Vec<FloatingPaneDescriptor>>,

    pub saved: Mutex<Vec<(PathBuf, LayoutNode)>>,
    pub opened: Mutex<Vec<(PaneId, Option<Bounds>, Option<u32>)>>,
    pub closed: Mutex<Vec<PaneId>>,
    pub resets: Mutex<usize>,
    /// Invoked at the top of every `open_floating_pane`; lets a test
    /// cancel a load mid-rehydration.
    pub on_open: Mutex<Option<OpenHook>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(stored: StoredLayout) -> Self {
        let host = Self::new();
        *host.stored.lock() = Some(stored);
        host
    }
}

impl LayoutHost for FakeHost {
    fn load_layout(&self, _project: &Path) -> Result<StoredLayout, HostError> {
        if *self.fail_load.lock() {
            return Err(HostError::Storage(anyhow::anyhow!("host unreachable")));
        }
        Ok(self.stored.lock().clone().unwrap_or(StoredLayout {
            layout: None,
            floating_panes: Vec::new(),
            schema_version: Some(LAYOUT_SCHEMA_VERSION),
        }))
    }

    fn save_layout(
        &self,
        project: &Path,
        layout: &LayoutNode,
        _schema_version: u32,
    ) -> Result<(), HostError> {
        if *self.fail_saves.lock() {
            return Err(HostError::Storage(anyhow::anyhow!("disk full")));
        }
        self.saved
            .lock()
            .push((project.to_path_buf(), layout.clone()));
        Ok(())
    }

    fn reset_layout(&self, _project: &Path) -> Result<(), HostError> {
        *self.resets.lock() += 1;
        Ok(())
    }

    fn open_floating_pane(
        &self,
        _project: &Path,
        pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> Result<OpenOutcome, HostError> {
        if let Some(hook) = self.on_open.lock().as_ref() {
            hook(pane);
        }
        self.opened.lock().push((pane, bounds, display_id));
        if self.fail_open_panes.lock().contains(&pane) {
            return Err(HostError::WindowCreation {
                pane,
                message: "scripted failure".to_string(),
            });
        }
        Ok(OpenOutcome {
            created: true,
            clamp: self.clamp_results.lock().get(&pane).cloned(),
        })
    }

    fn close_floating_pane(&self, _project: &Path, pane: PaneId) -> Result<(), HostError> {
        self.closed.lock().push(pane);
        Ok(())
    }

    fn list_floating_panes(&self, _project: &Path) -> Vec<FloatingPaneDescriptor> {
        self.listed.lock().clone()
    }
}

pub fn descriptor(
    pane: PaneId,
    bounds: Option<Bounds>,
    display_id: Option<u32>,
) -> FloatingPaneDescriptor {
    FloatingPaneDescriptor::new(pane, bounds, display_id)
}
