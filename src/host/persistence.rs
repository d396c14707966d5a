//! Persisted layout document storage
//!
//! One JSON document per project, stored under the project-scoped
//! hidden directory as `.inkdesk/workspace.json`. Loading never fails:
//! an absent or malformed file yields the documented empty shape so
//! the workspace always has something valid to start from. The layout
//! inside the document stays an untrusted `serde_json::Value` until
//! the sanitizer has seen it.

use crate::geometry::Bounds;
use crate::layout::PaneId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Schema tag written into every saved document. Not a concurrency
/// token; documents with any other tag are treated as never saved.
pub const LAYOUT_SCHEMA_VERSION: u32 = 2;

/// Hidden per-project directory holding workspace state.
pub const LAYOUT_DIR: &str = ".inkdesk";
/// Layout document filename inside [`LAYOUT_DIR`].
pub const LAYOUT_FILE: &str = "workspace.json";

/// A pane detached into its own window, as persisted.
///
/// The id is kept as a raw string so one unknown pane (written by a
/// newer build, say) is skipped on rehydration instead of poisoning
/// the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingPaneDescriptor {
    pub id: String,

    /// Absent bounds mean "let the host choose".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<u32>,
}

impl FloatingPaneDescriptor {
    pub fn new(pane: PaneId, bounds: Option<Bounds>, display_id: Option<u32>) -> Self {
        Self {
            id: pane.as_str().to_string(),
            bounds,
            display_id,
        }
    }

    /// The pane this descriptor refers to, if the id is valid.
    pub fn pane(&self) -> Option<PaneId> {
        PaneId::parse(&self.id)
    }
}

/// The per-project layout document as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayoutDocument {
    /// Schema tag. Older documents may lack it entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// The layout tree, untrusted until sanitized.
    #[serde(default)]
    pub layout: Option<Value>,

    #[serde(default)]
    pub floating_panes: Vec<FloatingPaneDescriptor>,
}

impl PersistedLayoutDocument {
    /// The documented empty shape returned for absent or malformed
    /// files: no layout, no floating panes, current schema tag.
    pub fn empty() -> Self {
        Self {
            version: Some(LAYOUT_SCHEMA_VERSION),
            layout: None,
            floating_panes: Vec::new(),
        }
    }
}

/// Path of the layout document for a project root.
pub fn layout_path(project_root: &Path) -> PathBuf {
    project_root.join(LAYOUT_DIR).join(LAYOUT_FILE)
}

/// Load the layout document for a project. Never errors.
pub fn load_document(project_root: &Path) -> PersistedLayoutDocument {
    let path = layout_path(project_root);
    if !path.exists() {
        log::debug!("No layout document at {}", path.display());
        return PersistedLayoutDocument::empty();
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("Failed to read layout document {}: {}", path.display(), e);
            return PersistedLayoutDocument::empty();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!(
                "Malformed layout document {}: {}, starting clean",
                path.display(),
                e
            );
            PersistedLayoutDocument::empty()
        }
    }
}

/// Write the layout document for a project, creating the hidden
/// directory if needed.
pub fn save_document(project_root: &Path, doc: &PersistedLayoutDocument) -> Result<()> {
    let path = layout_path(project_root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create layout directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(doc).context("Failed to serialize layout")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write layout document {}", path.display()))?;

    log::info!("Saved workspace layout to {}", path.display());
    Ok(())
}

/// Delete the layout document. Idempotent if already absent.
pub fn reset_document(project_root: &Path) -> Result<()> {
    let path = layout_path(project_root);
    match std::fs::remove_file(&path) {
        Ok(()) => {
            log::info!("Deleted workspace layout {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to delete layout document {}", path.display()))
        }
    }
}
