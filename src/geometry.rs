//! Geometry clamp engine for floating pane windows
//!
//! Runs on every floating-pane open and reopen, including app-restart
//! rehydration. This is the mechanism that keeps a pane from
//! reappearing off-screen after a monitor is unplugged or a resolution
//! changes: requested bounds are fitted into the usable work area of a
//! connected display before any window is created.
//!
//! Displays are plain data here. The Window Host feeds in whatever its
//! backend reports; nothing in this module talks to the OS.

use serde::{Deserialize, Serialize};

/// Smallest width a floating pane window may be clamped to.
pub const MIN_FLOAT_WIDTH: u32 = 240;
/// Smallest height a floating pane window may be clamped to.
pub const MIN_FLOAT_HEIGHT: u32 = 180;

/// A rectangle in virtual screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the intersection with another rectangle, in pixels.
    ///
    /// Edges are computed in i64: bounds read back from a persisted
    /// document are untrusted and may sit anywhere in the i32/u32
    /// range, where `x + width` overflows i32.
    pub fn overlap_area(&self, other: &Bounds) -> u64 {
        let left = (self.x as i64).max(other.x as i64);
        let top = (self.y as i64).max(other.y as i64);
        let right = (self.x as i64 + self.width as i64).min(other.x as i64 + other.width as i64);
        let bottom =
            (self.y as i64 + self.height as i64).min(other.y as i64 + other.height as i64);
        if right <= left || bottom <= top {
            return 0;
        }
        (right - left) as u64 * (bottom - top) as u64
    }

    /// Whether this rectangle lies entirely inside `outer`.
    pub fn contained_in(&self, outer: &Bounds) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.x as i64 + self.width as i64 <= outer.x as i64 + outer.width as i64
            && self.y as i64 + self.height as i64 <= outer.y as i64 + outer.height as i64
    }
}

/// A connected display as reported by the window backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Backend-assigned display id, stable for the session.
    pub id: u32,
    /// Human-readable name, when the platform provides one.
    pub name: Option<String>,
    /// Usable rectangle excluding OS-reserved regions (taskbar, dock).
    pub work_area: Bounds,
    /// Whether this is the primary display.
    pub primary: bool,
}

/// Why requested bounds were adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClampReason {
    /// The requested display is no longer connected.
    DisplayFallback,
    /// The requested size exceeded the work area (or fell below the
    /// floating-pane minimums).
    Oversized,
    /// The requested position would have left the work area.
    OutOfBounds,
}

/// Record of a clamp that changed the requested geometry.
///
/// Produced only here, consumed only by the relocation notifier,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampInfo {
    /// The geometry as requested, before clamping.
    pub before: Option<Bounds>,
    /// The geometry the window was actually given.
    pub after: Bounds,
    pub reason: ClampReason,
    /// Display the caller asked for, if any.
    pub requested_display_id: Option<u32>,
}

impl ClampInfo {
    /// True when the clamp actually moved or resized the window.
    pub fn changed(&self) -> bool {
        self.before.is_some_and(|b| b != self.after)
    }
}

/// Result of fitting requested bounds onto a connected display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampOutcome {
    pub bounds: Bounds,
    /// Display the bounds were fitted to.
    pub display_id: u32,
    /// Present only when the request had to be adjusted.
    pub clamp: Option<ClampInfo>,
}

/// Pick the display to fit `requested` onto.
///
/// Priority: an explicitly requested id that is still connected, then
/// the connected display with the largest overlap with the requested
/// rectangle, then the primary display.
pub fn select_display<'a>(
    displays: &'a [DisplayInfo],
    requested: Option<&Bounds>,
    requested_display_id: Option<u32>,
) -> Option<&'a DisplayInfo> {
    if displays.is_empty() {
        return None;
    }
    if let Some(id) = requested_display_id
        && let Some(display) = displays.iter().find(|d| d.id == id)
    {
        return Some(display);
    }
    if let Some(rect) = requested {
        let best = displays
            .iter()
            .max_by_key(|d| d.work_area.overlap_area(rect));
        if let Some(display) = best
            && display.work_area.overlap_area(rect) > 0
        {
            return Some(display);
        }
    }
    displays.iter().find(|d| d.primary).or_else(|| displays.first())
}

/// Fit `requested` into the work area of a single display.
///
/// Clamping an already-clamped rectangle against the same display is a
/// no-op; the output is always fully contained in the work area.
pub fn clamp_to_work_area(requested: &Bounds, work_area: &Bounds) -> Bounds {
    let width = requested.width.max(MIN_FLOAT_WIDTH).min(work_area.width);
    let height = requested.height.max(MIN_FLOAT_HEIGHT).min(work_area.height);
    let max_x = work_area.x + (work_area.width - width) as i32;
    let max_y = work_area.y + (work_area.height - height) as i32;
    Bounds {
        x: requested.x.clamp(work_area.x, max_x),
        y: requested.y.clamp(work_area.y, max_y),
        width,
        height,
    }
}

/// Clamp requested floating-pane bounds against the connected displays.
///
/// Returns `None` when no bounds were requested (the host picks its
/// defaults elsewhere) or when no display is connected at all.
pub fn clamp_floating_bounds(
    requested: Option<Bounds>,
    requested_display_id: Option<u32>,
    displays: &[DisplayInfo],
) -> Option<ClampOutcome> {
    let requested = requested?;
    let display = select_display(displays, Some(&requested), requested_display_id)?;
    let after = clamp_to_work_area(&requested, &display.work_area);

    let display_missing = requested_display_id.is_some_and(|id| id != display.id);
    let clamp = if after != requested || display_missing {
        let reason = if display_missing {
            ClampReason::DisplayFallback
        } else if after.width != requested.width || after.height != requested.height {
            ClampReason::Oversized
        } else {
            ClampReason::OutOfBounds
        };
        log::debug!(
            "Clamped floating bounds {:?} -> {:?} on display {} ({:?})",
            requested,
            after,
            display.id,
            reason
        );
        Some(ClampInfo {
            before: Some(requested),
            after,
            reason,
            requested_display_id,
        })
    } else {
        None
    };

    Some(ClampOutcome {
        bounds: after,
        display_id: display.id,
        clamp,
    })
}
