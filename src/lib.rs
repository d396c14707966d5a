//! Docking workspace and floating pane geometry manager for the
//! InkDesk writing environment.
//!
//! The crate is split along the app's process boundary:
//!
//! - [`layout`]: the split-tree layout model, the fail-closed
//!   sanitizer for persisted trees, and the preset catalogue.
//! - [`geometry`]: display selection and work-area clamping for
//!   floating windows.
//! - [`host`]: the privileged side, with path authorization, the
//!   per-project floating window registry, and the persisted layout
//!   document under `.inkdesk/workspace.json`.
//! - [`controller`]: the UI side, with the workspace state machine,
//!   debounced persistence, relocation advisories, and auto-snap.
//! - [`hotkeys`]: chord matching and focus cycling.
//!
//! The two sides meet at the [`host::LayoutHost`] trait; the concrete
//! [`host::WindowHost`] implements it over a [`host::registry::WindowBackend`]
//! supplied by the embedding shell.

pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod hotkeys;
pub mod layout;
pub mod settings;

pub use controller::{WorkspaceController, WorkspacePhase};
pub use error::HostError;
pub use geometry::{Bounds, ClampOutcome, DisplayInfo};
pub use host::{LayoutHost, StoredLayout, WindowHost};
pub use layout::{LayoutNode, PaneId, SplitDirection};
pub use settings::WorkspaceSettings;
