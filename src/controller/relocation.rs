//! Relocation notifier and auto-snap policy
//!
//! When the clamp engine moves a floating pane away from where it was
//! requested, the user should understand why their window jumped. The
//! notifier drives three reactions: a short per-pane highlight, a
//! one-time-per-session advisory, and (when the policy is enabled) a
//! single delayed attempt to put the window back where it was asked
//! for. Clamp events are deduplicated by pane + original geometry so
//! one clamp can never spawn a retry loop.

use crate::geometry::{Bounds, ClampInfo};
use crate::layout::PaneId;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// How long the relocation highlight stays on a pane.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);
/// Delay before an auto-snap reopen attempt.
pub const AUTO_SNAP_DELAY: Duration = Duration::from_millis(1200);

/// Dedup key: one auto-snap attempt per pane + original geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SnapKey {
    pane: PaneId,
    original: Bounds,
}

/// A scheduled attempt to restore a pane to its pre-clamp geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapRequest {
    pub pane: PaneId,
    pub bounds: Bounds,
    pub display_id: Option<u32>,
    pub delay: Duration,
}

/// User reply to the relocation advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryResponse {
    Acknowledge,
    /// Persisted user preference; no advisory for any later session.
    SuppressPermanently,
    /// Reopen at the pre-clamp bounds and display.
    TryPreviousPosition,
}

/// What a clamp event asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationEvent {
    pub pane: PaneId,
    /// First qualifying clamp of the session, unless suppressed.
    pub show_advisory: bool,
    pub auto_snap: Option<SnapRequest>,
}

/// Tracks highlight, advisory, and auto-snap state for one workspace.
#[derive(Debug)]
pub struct RelocationNotifier {
    highlights: HashMap<PaneId, Instant>,
    advisory_shown: bool,
    advisory_suppressed: bool,
    auto_snap_enabled: bool,
    attempted: HashSet<SnapKey>,
}

impl RelocationNotifier {
    pub fn new(auto_snap_enabled: bool, advisory_suppressed: bool) -> Self {
        Self {
            highlights: HashMap::new(),
            advisory_shown: false,
            advisory_suppressed,
            auto_snap_enabled,
            attempted: HashSet::new(),
        }
    }

    /// Process a clamp result. Returns `None` when the clamp did not
    /// actually move or resize the window.
    pub fn record_clamp(
        &mut self,
        pane: PaneId,
        info: &ClampInfo,
        now: Instant,
    ) -> Option<RelocationEvent> {
        if !info.changed() {
            return None;
        }
        let original = info.before?;

        // Re-triggering resets the highlight timer instead of stacking
        // a second expiration.
        self.highlights.insert(pane, now);

        let show_advisory = !self.advisory_shown && !self.advisory_suppressed;
        if show_advisory {
            self.advisory_shown = true;
        }

        let auto_snap = if self.auto_snap_enabled {
            let key = SnapKey { pane, original };
            if self.attempted.insert(key) {
                Some(SnapRequest {
                    pane,
                    bounds: original,
                    display_id: info.requested_display_id,
                    delay: AUTO_SNAP_DELAY,
                })
            } else {
                log::debug!("Auto-snap already attempted for pane {}", pane);
                None
            }
        } else {
            None
        };

        Some(RelocationEvent {
            pane,
            show_advisory,
            auto_snap,
        })
    }

    /// Whether the relocation highlight is still active for a pane.
    pub fn is_highlighted(&self, pane: PaneId, now: Instant) -> bool {
        self.highlights
            .get(&pane)
            .is_some_and(|since| now.duration_since(*since) < HIGHLIGHT_DURATION)
    }

    /// Apply the user's advisory reply. `TryPreviousPosition` is acted
    /// on by the controller; here it only closes the prompt.
    pub fn respond(&mut self, response: AdvisoryResponse) {
        if response == AdvisoryResponse::SuppressPermanently {
            self.advisory_suppressed = true;
        }
    }

    pub fn advisory_suppressed(&self) -> bool {
        self.advisory_suppressed
    }

    /// Per-project runtime state (highlights, snap dedup) is replaced
    /// wholesale on project change; the advisory stays once-per-session.
    pub fn reset_for_project(&mut self) {
        self.highlights.clear();
        self.attempted.clear();
    }
}
