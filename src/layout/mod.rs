//! Layout tree model for the docking workspace
//!
//! The workspace is described by a binary split tree: every node is
//! either a single pane or a split holding two child trees. All
//! operations here are pure and total: they never fail and never
//! mutate their input. Trees are strictly owned; moving one across an
//! ownership boundary (persistence, preset registry) always goes
//! through `Clone`, so no two owners ever share a subtree.

pub mod presets;
pub mod sanitize;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Split ratio used when `ensure_present` has to synthesize a split:
/// the existing tree keeps 70% and the reopened pane gets the rest.
pub const REOPEN_SPLIT_PERCENTAGE: f64 = 70.0;

/// Identifier for a workspace pane.
///
/// This is a closed set: the writing app has exactly these five
/// regions. Declaration order is the canonical order used for focus
/// cycling fallbacks and `hidden_panes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaneId {
    /// Guided story wizard
    Wizard,
    /// Chapter/scene outline
    Outline,
    /// Main drafting surface
    DraftBoard,
    /// Generated critique / feedback
    Critique,
    /// Free-form notes
    Notes,
}

impl PaneId {
    /// All panes in canonical order.
    pub const ALL: [PaneId; 5] = [
        PaneId::Wizard,
        PaneId::Outline,
        PaneId::DraftBoard,
        PaneId::Critique,
        PaneId::Notes,
    ];

    /// The stable string form used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaneId::Wizard => "wizard",
            PaneId::Outline => "outline",
            PaneId::DraftBoard => "draft-board",
            PaneId::Critique => "critique",
            PaneId::Notes => "notes",
        }
    }

    /// Parse a persisted pane string. Returns `None` for anything
    /// outside the closed set.
    pub fn parse(s: &str) -> Option<PaneId> {
        PaneId::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children are side by side (first = left)
    Row,
    /// Children are stacked (first = top)
    Column,
}

impl SplitDirection {
    /// Parse the persisted lowercase form.
    pub fn parse(s: &str) -> Option<SplitDirection> {
        match s {
            "row" => Some(SplitDirection::Row),
            "column" => Some(SplitDirection::Column),
            _ => None,
        }
    }
}

/// A node in the workspace layout tree.
///
/// Serializes to the persisted JSON shape: a leaf is its pane string,
/// a split is `{direction, first, second, splitPercentage}`. There is
/// deliberately no `Deserialize` impl; untrusted trees come off disk
/// as `serde_json::Value` and enter through [`sanitize::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayoutNode {
    /// A single pane occupying this region.
    Pane(PaneId),
    /// A binary split of this region.
    Split {
        direction: SplitDirection,
        first: Box<LayoutNode>,
        second: Box<LayoutNode>,
        /// Share of the region given to `first`, 0–100. Advisory UI
        /// state; preserved verbatim, never bounds-clamped.
        #[serde(rename = "splitPercentage")]
        split_percentage: f64,
    },
}

impl LayoutNode {
    /// Convenience constructor for a split node.
    pub fn split(
        direction: SplitDirection,
        first: LayoutNode,
        second: LayoutNode,
        split_percentage: f64,
    ) -> LayoutNode {
        LayoutNode::Split {
            direction,
            first: Box::new(first),
            second: Box::new(second),
            split_percentage,
        }
    }

    /// Collect every leaf pane, left to right.
    pub fn leaves(&self) -> Vec<PaneId> {
        fn walk(node: &LayoutNode, out: &mut Vec<PaneId>) {
            match node {
                LayoutNode::Pane(id) => out.push(*id),
                LayoutNode::Split { first, second, .. } => {
                    walk(first, out);
                    walk(second, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// Short-circuiting membership test.
    pub fn contains(&self, pane: PaneId) -> bool {
        match self {
            LayoutNode::Pane(id) => *id == pane,
            LayoutNode::Split { first, second, .. } => {
                first.contains(pane) || second.contains(pane)
            }
        }
    }

    /// Panes from the canonical set that do not appear in this tree,
    /// in canonical order.
    pub fn hidden_panes(&self) -> Vec<PaneId> {
        let present = self.leaves();
        PaneId::ALL
            .iter()
            .copied()
            .filter(|p| !present.contains(p))
            .collect()
    }

    /// Return a tree that is guaranteed to contain `pane`.
    ///
    /// If the pane is already present this is just a clone. Otherwise
    /// the existing tree becomes the left 70% of a new row split and
    /// the pane takes the right 30%. The fixed ratio and direction are
    /// deliberate policy.
    pub fn ensure_present(&self, pane: PaneId) -> LayoutNode {
        if self.contains(pane) {
            return self.clone();
        }
        LayoutNode::split(
            SplitDirection::Row,
            self.clone(),
            LayoutNode::Pane(pane),
            REOPEN_SPLIT_PERCENTAGE,
        )
    }
}
