//! Focus cycling across workspace panes
//!
//! A linear scan over a resolved pane order: find the pane holding
//! focus, step ±1 modulo the list length. The caller requests focus
//! and a smooth scroll on the returned pane.

use crate::layout::PaneId;

/// Direction of a focus-cycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

/// Resolve the cycle order from the configured names.
///
/// Unknown names, duplicates, and panes not visible in the current
/// tree are dropped. If nothing valid survives, the canonical pane
/// order (restricted to visible panes) is used instead.
pub fn resolve_cycle_order(configured: &[String], visible: &[PaneId]) -> Vec<PaneId> {
    let mut order: Vec<PaneId> = Vec::new();
    for name in configured {
        if let Some(pane) = PaneId::parse(name)
            && visible.contains(&pane)
            && !order.contains(&pane)
        {
            order.push(pane);
        }
    }
    if order.is_empty() {
        order = PaneId::ALL
            .iter()
            .copied()
            .filter(|p| visible.contains(p))
            .collect();
    }
    if order.is_empty() {
        order = PaneId::ALL.to_vec();
    }
    order
}

/// Step to the next pane in `order`.
///
/// When the current focus matches no pane in the list, forward starts
/// at the head and backward at the tail.
pub fn next_focus(
    order: &[PaneId],
    current: Option<PaneId>,
    direction: CycleDirection,
) -> Option<PaneId> {
    if order.is_empty() {
        return None;
    }
    let len = order.len();
    let position = current.and_then(|pane| order.iter().position(|p| *p == pane));
    let target = match (position, direction) {
        (Some(i), CycleDirection::Forward) => (i + 1) % len,
        (Some(i), CycleDirection::Backward) => (i + len - 1) % len,
        (None, CycleDirection::Forward) => 0,
        (None, CycleDirection::Backward) => len - 1,
    };
    Some(order[target])
}
