//! Fail-closed validation of untrusted layout trees
//!
//! The persisted workspace file is the only input the renderer ever
//! receives that did not originate in this process, so it is treated
//! as hostile: corrupted disk state, version skew, or a garbled
//! document must never produce a partially-repaired tree. Anything
//! that does not validate is replaced wholesale by the fallback tree.

use super::{LayoutNode, PaneId, SplitDirection};
use serde_json::Value;

/// Turn an arbitrary JSON candidate into a guaranteed-valid tree.
///
/// Rules:
/// - `None` / JSON null → clone of `fallback`.
/// - A string in the closed pane set → that leaf.
/// - Any other string → clone of `fallback`.
/// - An object → recursively sanitize `first` and `second`, then
///   rebuild the split preserving `direction` and `splitPercentage`
///   verbatim. A direction outside `row`/`column` or a non-finite
///   `splitPercentage` cannot be represented and fails the whole
///   candidate closed.
/// - Anything else (numbers, booleans, arrays) → clone of `fallback`.
///
/// Total and idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(candidate: Option<&Value>, fallback: &LayoutNode) -> LayoutNode {
    match candidate {
        None | Some(Value::Null) => fallback.clone(),
        Some(value) => sanitize_value(value).unwrap_or_else(|| {
            log::warn!("Discarding invalid persisted layout, applying fallback");
            fallback.clone()
        }),
    }
}

/// Validate a candidate without a fallback. `None` means invalid.
fn sanitize_value(value: &Value) -> Option<LayoutNode> {
    match value {
        Value::String(s) => PaneId::parse(s).map(LayoutNode::Pane),
        Value::Object(map) => {
            let direction = map
                .get("direction")
                .and_then(Value::as_str)
                .and_then(SplitDirection::parse)?;
            let split_percentage = map.get("splitPercentage").and_then(Value::as_f64)?;
            if !split_percentage.is_finite() {
                return None;
            }
            let first = sanitize_value(map.get("first")?)?;
            let second = sanitize_value(map.get("second")?)?;
            Some(LayoutNode::split(direction, first, second, split_percentage))
        }
        _ => None,
    }
}
