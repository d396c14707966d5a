//! User-level workspace settings
//!
//! Small YAML file under the user config directory. Every field has a
//! default so a partially-written or older file still loads.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_preset() -> String {
    crate::layout::presets::DEFAULT_PRESET.to_string()
}

fn default_save_debounce_ms() -> u64 {
    650
}

/// Workspace behavior knobs surfaced to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Preset applied when a project has no saved layout.
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Feature flag for the global hotkey listener.
    #[serde(default)]
    pub hotkeys_enabled: bool,

    /// When set, a clamped floating pane is automatically retried at
    /// its original position after a short delay.
    #[serde(default)]
    pub auto_snap: bool,

    /// Permanently suppress the relocation advisory. Set when the user
    /// picks "don't tell me again".
    #[serde(default)]
    pub relocation_advisory_suppressed: bool,

    /// Pane order used for focus cycling. Unknown or duplicate names
    /// are filtered out at use; an empty result falls back to the
    /// canonical pane order.
    #[serde(default)]
    pub focus_cycle_order: Vec<String>,

    /// Coalescing window for layout persistence, in milliseconds.
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            hotkeys_enabled: false,
            auto_snap: false,
            relocation_advisory_suppressed: false,
            focus_cycle_order: Vec::new(),
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

/// Default settings file location: `<config dir>/inkdesk/workspace.yaml`.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inkdesk")
        .join("workspace.yaml")
}

/// Load settings from a specific file, falling back to defaults when
/// the file is absent.
pub fn load_settings_from(path: &Path) -> Result<WorkspaceSettings> {
    if !path.exists() {
        log::debug!("No workspace settings at {}, using defaults", path.display());
        return Ok(WorkspaceSettings::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workspace settings {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(WorkspaceSettings::default());
    }
    serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse workspace settings {}", path.display()))
}

/// Save settings to a specific file, creating parent directories.
pub fn save_settings_to(settings: &WorkspaceSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
    }
    let contents =
        serde_yaml_ng::to_string(settings).context("Failed to serialize workspace settings")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write workspace settings {}", path.display()))?;
    log::info!("Saved workspace settings to {}", path.display());
    Ok(())
}
