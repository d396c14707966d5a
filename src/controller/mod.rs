//! Workspace controller: the UI-process side of the docking workspace
//!
//! Owns the runtime state for the active project (current layout
//! tree, focus, relocation highlights) and orchestrates load, apply,
//! persist, and reset against the window host. One controller exists
//! per workspace; its state is replaced wholesale when the active
//! project changes and discarded when the workspace unmounts.
//!
//! Every host call is treated as fallible: a failure is logged and
//! degrades to a no-op for the affected pane, never aborting a batch
//! of otherwise-independent operations.

pub mod relocation;
pub mod saver;

use crate::geometry::{Bounds, ClampInfo};
use crate::host::LayoutHost;
use crate::host::persistence::LAYOUT_SCHEMA_VERSION;
use crate::hotkeys::focus::{CycleDirection, next_focus, resolve_cycle_order};
use crate::hotkeys::{HotkeyAction, HotkeyDispatcher, KeyEvent};
use crate::layout::presets::PresetRegistry;
use crate::layout::sanitize::sanitize;
use crate::layout::{LayoutNode, PaneId};
use crate::settings::WorkspaceSettings;
use parking_lot::Mutex;
use relocation::{AdvisoryResponse, RelocationNotifier, SnapRequest};
use saver::DebouncedSaver;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Lifecycle of the controller for the active project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePhase {
    /// No project yet, or the workspace was torn down.
    Uninitialized,
    /// Persisted document requested, answer pending.
    Loading,
    /// Layout applied (possibly a fallback); operations accepted.
    Ready,
}

/// Cooperative cancellation capability for an in-flight load.
///
/// Cancellation is checked after every suspension point, never
/// preempted: a reopen already in flight still completes, but does not
/// mutate now-stale state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The relocation advisory offered to the user after the first clamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationAdvisory {
    pub pane: PaneId,
    /// Pre-clamp geometry, for "try previous position".
    pub previous: Bounds,
    pub display_id: Option<u32>,
}

/// Orchestrates the docking workspace for one project at a time.
pub struct WorkspaceController<H: LayoutHost + 'static> {
    host: Arc<H>,
    presets: PresetRegistry,
    settings: WorkspaceSettings,
    hotkeys: HotkeyDispatcher,

    project: Option<PathBuf>,
    phase: WorkspacePhase,
    layout: LayoutNode,
    /// Mirror of `layout` for synchronous reads inside callbacks that
    /// cannot borrow the controller.
    latest_layout: Arc<Mutex<LayoutNode>>,
    focused: Option<PaneId>,
    load_error: Option<String>,
    load_token: CancelToken,
    pending_advisory: Option<RelocationAdvisory>,

    saver: DebouncedSaver<H>,
    relocation: RelocationNotifier,
}

impl<H: LayoutHost + 'static> WorkspaceController<H> {
    pub fn new(host: Arc<H>, presets: PresetRegistry, settings: WorkspaceSettings) -> Self {
        let initial = presets.get(&settings.default_preset);
        let saver = DebouncedSaver::new(
            Arc::clone(&host),
            Duration::from_millis(settings.save_debounce_ms),
        );
        let relocation = RelocationNotifier::new(
            settings.auto_snap,
            settings.relocation_advisory_suppressed,
        );
        let hotkeys = HotkeyDispatcher::new(settings.hotkeys_enabled);
        Self {
            host,
            presets,
            hotkeys,
            project: None,
            phase: WorkspacePhase::Uninitialized,
            latest_layout: Arc::new(Mutex::new(initial.clone())),
            layout: initial,
            focused: None,
            load_error: None,
            load_token: CancelToken::new(),
            pending_advisory: None,
            saver,
            relocation,
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Make `project` the active project: load its persisted layout,
    /// sanitize it, and sequentially reopen its floating panes.
    ///
    /// A newer call supersedes an older one through the cancellation
    /// token; stale work is discarded at the next suspension point.
    pub async fn open_project(&mut self, project: PathBuf) {
        self.load_token.cancel();
        let token = CancelToken::new();
        self.load_token = token.clone();

        self.saver.cancel();
        self.relocation.reset_for_project();
        self.pending_advisory = None;
        self.focused = None;
        self.load_error = None;
        self.project = Some(project.clone());
        self.phase = WorkspacePhase::Loading;
        log::info!("Loading workspace for {}", project.display());

        let default_tree = self.presets.get(&self.settings.default_preset);
        let stored = match self.host.load_layout(&project) {
            Ok(stored) => stored,
            Err(e) => {
                // Recoverable: the workspace is never blank.
                log::error!("Failed to load workspace for {}: {}", project.display(), e);
                self.load_error = Some(e.to_string());
                self.install(default_tree);
                self.phase = WorkspacePhase::Ready;
                return;
            }
        };
        if token.is_cancelled() {
            log::debug!("Workspace load for {} superseded", project.display());
            return;
        }

        let tree = match stored.schema_version {
            Some(version) if version == LAYOUT_SCHEMA_VERSION => match &stored.layout {
                Some(candidate) => sanitize(Some(candidate), &default_tree),
                None => default_tree.clone(),
            },
            Some(version) => {
                // Any other schema tag is treated the same as "never
                // saved": the stored tree is discarded wholesale.
                log::warn!(
                    "Discarding stored layout with schema version {} (current is {})",
                    version,
                    LAYOUT_SCHEMA_VERSION
                );
                default_tree.clone()
            }
            None => default_tree.clone(),
        };
        self.install(tree);
        self.phase = WorkspacePhase::Ready;

        // Window creation goes against a shared per-project registry
        // without a lock, so reopening fans out one pane at a time.
        for descriptor in &stored.floating_panes {
            let Some(pane) = descriptor.pane() else {
                log::warn!("Skipping floating pane with unknown id {:?}", descriptor.id);
                continue;
            };
            match self.host.open_floating_pane(
                &project,
                pane,
                descriptor.bounds,
                descriptor.display_id,
            ) {
                Ok(outcome) => self.handle_clamp(pane, outcome.clamp),
                Err(e) => log::warn!("Failed to reopen floating pane {}: {}", pane, e),
            }
            tokio::task::yield_now().await;
            if token.is_cancelled() {
                log::debug!("Project switch during rehydration, stopping");
                return;
            }
        }
    }

    /// Tear down the workspace state. Pending layout changes are
    /// flushed so nothing typed in the last debounce window is lost.
    pub fn close_project(&mut self) {
        self.load_token.cancel();
        self.saver.flush();
        self.project = None;
        self.phase = WorkspacePhase::Uninitialized;
        self.focused = None;
        self.pending_advisory = None;
        self.load_error = None;
    }

    // ------------------------------------------------------------------
    // Layout operations
    // ------------------------------------------------------------------

    /// Apply a new layout tree. The rendered state and the synchronous
    /// mirror are updated before the persistence write is scheduled,
    /// so rapid reads never see a stale tree.
    pub fn apply(&mut self, tree: &LayoutNode) {
        self.install(tree.clone());
        if let Some(project) = self.project.clone() {
            self.saver.schedule(project, self.layout.clone());
        }
    }

    /// Apply a preset by name (unknown names fall back to the default
    /// preset).
    pub fn apply_preset(&mut self, name: &str) {
        let tree = self.presets.get(name);
        self.apply(&tree);
    }

    /// Apply a preset by catalogue index, for digit hotkeys.
    pub fn apply_preset_index(&mut self, index: usize) {
        match self.presets.by_index(index) {
            Some(tree) => self.apply(&tree),
            None => log::debug!("No preset at index {}", index),
        }
    }

    /// Reset to the configured default preset: best-effort close all
    /// floating windows, best-effort delete the persisted document,
    /// then apply the preset unconditionally; the visible reset
    /// happens even if the deletes failed.
    pub fn reset(&mut self) {
        if let Some(project) = self.project.clone() {
            for descriptor in self.host.list_floating_panes(&project) {
                let Some(pane) = descriptor.pane() else { continue };
                if let Err(e) = self.host.close_floating_pane(&project, pane) {
                    log::warn!("Failed to close floating pane {} during reset: {}", pane, e);
                }
            }
            if let Err(e) = self.host.reset_layout(&project) {
                log::warn!(
                    "Failed to delete persisted layout for {}: {}",
                    project.display(),
                    e
                );
            }
            self.saver.cancel();
        }
        let default_tree = self.presets.get(&self.settings.default_preset);
        self.install(default_tree);
    }

    /// Bring a hidden pane back into the tree (70/30 row split policy).
    pub fn reopen_hidden(&mut self, pane: PaneId) {
        let tree = self.layout.ensure_present(pane);
        self.apply(&tree);
    }

    // ------------------------------------------------------------------
    // Floating panes
    // ------------------------------------------------------------------

    /// Detach a pane into its own window. Returns whether a new window
    /// was created (false when an existing one was focused, or on any
    /// failure).
    pub fn open_floating(
        &mut self,
        pane: PaneId,
        bounds: Option<Bounds>,
        display_id: Option<u32>,
    ) -> bool {
        let Some(project) = self.project.clone() else {
            return false;
        };
        match self.host.open_floating_pane(&project, pane, bounds, display_id) {
            Ok(outcome) => {
                self.handle_clamp(pane, outcome.clamp);
                outcome.created
            }
            Err(e) => {
                log::warn!("Failed to open floating pane {}: {}", pane, e);
                false
            }
        }
    }

    /// Close a pane's floating window, if it has one.
    pub fn close_floating(&mut self, pane: PaneId) {
        let Some(project) = self.project.clone() else {
            return;
        };
        if let Err(e) = self.host.close_floating_pane(&project, pane) {
            log::warn!("Failed to close floating pane {}: {}", pane, e);
        }
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focus a pane visible in the current tree.
    pub fn focus(&mut self, pane: PaneId) -> bool {
        if self.layout.contains(pane) {
            self.focused = Some(pane);
            true
        } else {
            false
        }
    }

    /// Step focus through the resolved cycle order. Returns the pane
    /// to focus and scroll into view.
    pub fn cycle_focus(&mut self, direction: CycleDirection) -> Option<PaneId> {
        let visible = self.layout.leaves();
        let order = resolve_cycle_order(&self.settings.focus_cycle_order, &visible);
        let target = next_focus(&order, self.focused, direction);
        if let Some(pane) = target {
            self.focused = Some(pane);
        }
        target
    }

    /// Feed a key event through the hotkey dispatcher. Returns true
    /// when the event was consumed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(action) = self.hotkeys.dispatch(event) else {
            return false;
        };
        match action {
            HotkeyAction::ResetLayout => self.reset(),
            HotkeyAction::ApplyPreset(index) => self.apply_preset_index(index),
            HotkeyAction::CycleFocus(direction) => {
                self.cycle_focus(direction);
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Relocation
    // ------------------------------------------------------------------

    fn handle_clamp(&mut self, pane: PaneId, clamp: Option<ClampInfo>) {
        let Some(info) = clamp else { return };
        let Some(event) = self.relocation.record_clamp(pane, &info, Instant::now()) else {
            return;
        };
        if event.show_advisory
            && self.pending_advisory.is_none()
            && let Some(previous) = info.before
        {
            self.pending_advisory = Some(RelocationAdvisory {
                pane,
                previous,
                display_id: info.requested_display_id,
            });
        }
        if let Some(snap) = event.auto_snap {
            self.spawn_auto_snap(snap);
        }
    }

    /// Answer the pending relocation advisory.
    pub fn respond_advisory(&mut self, response: AdvisoryResponse) {
        let prompt = self.pending_advisory.take();
        self.relocation.respond(response);
        match response {
            AdvisoryResponse::Acknowledge => {}
            AdvisoryResponse::SuppressPermanently => {
                // Callers persist the settings file on their own
                // schedule; the flag is effective immediately.
                self.settings.relocation_advisory_suppressed = true;
            }
            AdvisoryResponse::TryPreviousPosition => {
                if let Some(prompt) = prompt {
                    self.close_floating(prompt.pane);
                    self.open_floating(prompt.pane, Some(prompt.previous), prompt.display_id);
                }
            }
        }
    }

    fn spawn_auto_snap(&self, snap: SnapRequest) {
        let Some(project) = self.project.clone() else {
            return;
        };
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            tokio::time::sleep(snap.delay).await;
            if let Err(e) = host.close_floating_pane(&project, snap.pane) {
                log::debug!("Auto-snap close for pane {} failed: {}", snap.pane, e);
            }
            match host.open_floating_pane(&project, snap.pane, Some(snap.bounds), snap.display_id)
            {
                Ok(outcome) if outcome.clamp.is_none() => {
                    log::info!("Auto-snap restored pane {} to its requested position", snap.pane);
                }
                Ok(_) => {
                    log::debug!("Auto-snap for pane {} was clamped again, giving up", snap.pane);
                }
                Err(e) => log::warn!("Auto-snap reopen for pane {} failed: {}", snap.pane, e),
            }
        });
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> WorkspacePhase {
        self.phase
    }

    pub fn layout(&self) -> &LayoutNode {
        &self.layout
    }

    /// Shared handle for synchronous layout reads inside callbacks.
    pub fn latest_layout(&self) -> Arc<Mutex<LayoutNode>> {
        Arc::clone(&self.latest_layout)
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pending_advisory(&self) -> Option<&RelocationAdvisory> {
        self.pending_advisory.as_ref()
    }

    /// Whether the relocation highlight is currently active on a pane.
    pub fn is_highlighted(&self, pane: PaneId) -> bool {
        self.relocation.is_highlighted(pane, Instant::now())
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    /// Token guarding the in-flight load; a shell tearing the
    /// workspace down cancels it to discard stale results.
    pub fn load_cancel_token(&self) -> CancelToken {
        self.load_token.clone()
    }

    fn install(&mut self, tree: LayoutNode) {
        *self.latest_layout.lock() = tree.clone();
        self.layout = tree;
    }
}

#[cfg(test)]
pub(crate) mod test_host {
    //! Recording fake of the host surface with failure injection.

    use crate::error::HostError;
    use crate::geometry::{Bounds, ClampInfo};
    use crate::host::persistence::FloatingPaneDescriptor;
    use crate::host::registry::OpenOutcome;
    use crate::host::{LayoutHost, StoredLayout};
    use crate::layout::{LayoutNode, PaneId};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    type OpenHook = Box<dyn Fn(PaneId) + Send + Sync>;

    #[derive(Default)]
    pub struct FakeHost {
        pub stored: Mutex<Option<StoredLayout>>,
        pub fail_load: Mutex<bool>,
        pub fail_saves: Mutex<bool>,
        pub fail_open_panes: Mutex<Vec<PaneId>>,
        pub fail_reset: Mutex<bool>,
        pub clamp_results: Mutex<HashMap<PaneId, ClampInfo>>,
        pub listed: Mutex<Vec<FloatingPaneDescriptor>>,

        pub saved: Mutex<Vec<(PathBuf, LayoutNode)>>,
        pub opened: Mutex<Vec<(PaneId, Option<Bounds>, Option<u32>)>>,
        pub closed: Mutex<Vec<PaneId>>,
        pub resets: Mutex<usize>,
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
                schema_version: Some(crate::host::persistence::LAYOUT_SCHEMA_VERSION),
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
            if *self.fail_reset.lock() {
                return Err(HostError::Storage(anyhow::anyhow!("delete failed")));
            }
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
}
