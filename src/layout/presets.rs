//! Named canonical layout trees
//!
//! Presets are config data, not logic. The registry matters to the
//! controller only for its clone-on-read guarantee: callers never
//! receive a reference into the registry's own storage, so no preset
//! can be mutated from outside.

use super::{LayoutNode, PaneId, SplitDirection};

/// Key of the preset returned when a lookup misses.
pub const DEFAULT_PRESET: &str = "drafting";

/// Ordered mapping from preset name to canonical tree.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    /// Insertion order doubles as the digit-hotkey order.
    presets: Vec<(String, LayoutNode)>,
}

impl PresetRegistry {
    /// The built-in catalogue shipped with the app.
    pub fn builtin() -> Self {
        let mut registry = Self {
            presets: Vec::new(),
        };
        registry.insert(
            DEFAULT_PRESET,
            LayoutNode::split(
                SplitDirection::Row,
                LayoutNode::split(
                    SplitDirection::Column,
                    LayoutNode::Pane(PaneId::Wizard),
                    LayoutNode::Pane(PaneId::Outline),
                    50.0,
                ),
                LayoutNode::Pane(PaneId::DraftBoard),
                35.0,
            ),
        );
        registry.insert(
            "planning",
            LayoutNode::split(
                SplitDirection::Row,
                LayoutNode::Pane(PaneId::Wizard),
                LayoutNode::split(
                    SplitDirection::Column,
                    LayoutNode::Pane(PaneId::Outline),
                    LayoutNode::Pane(PaneId::Notes),
                    60.0,
                ),
                40.0,
            ),
        );
        registry.insert(
            "revision",
            LayoutNode::split(
                SplitDirection::Row,
                LayoutNode::Pane(PaneId::DraftBoard),
                LayoutNode::Pane(PaneId::Critique),
                65.0,
            ),
        );
        registry.insert("focus", LayoutNode::Pane(PaneId::DraftBoard));
        registry
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, name: &str, tree: LayoutNode) {
        if let Some(entry) = self.presets.iter_mut().find(|(n, _)| n == name) {
            entry.1 = tree;
        } else {
            self.presets.push((name.to_string(), tree));
        }
    }

    /// Fetch a preset by name, falling back to [`DEFAULT_PRESET`] when
    /// the name is unknown. Always returns a deep copy.
    pub fn get(&self, name: &str) -> LayoutNode {
        self.presets
            .iter()
            .find(|(n, _)| n == name)
            .or_else(|| self.presets.iter().find(|(n, _)| n == DEFAULT_PRESET))
            .map(|(_, tree)| tree.clone())
            .unwrap_or(LayoutNode::Pane(PaneId::DraftBoard))
    }

    /// Fetch by catalogue position (digit hotkeys are 1-based; callers
    /// pass the zero-based index).
    pub fn by_index(&self, index: usize) -> Option<LayoutNode> {
        self.presets.get(index).map(|(_, tree)| tree.clone())
    }

    /// Preset names in catalogue order.
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of presets in the catalogue.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
