//! Workspace hotkey dispatcher
//!
//! One global key listener, active only while the hotkeys feature
//! flag is set, installed for the lifetime of the workspace. The
//! dispatcher is pure: it classifies an already-normalized key event
//! into a workspace action, or `None` when the event is not ours.
//!
//! Chords (CmdOrCtrl resolves to Cmd on macOS, Ctrl elsewhere):
//! - CmdOrCtrl+Alt+0: reset to the default preset
//! - CmdOrCtrl+Alt+1..9: apply preset N
//! - CmdOrCtrl+Alt+[ / ]: cycle focus backward / forward
//! - CmdOrCtrl+Shift+E: cycle focus forward (for layouts lacking
//!   bracket keys)

pub mod focus;

pub use focus::CycleDirection;

/// A normalized keyboard event as delivered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key, case-insensitive for letters.
    pub key: char,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    /// Another listener already consumed this event.
    pub already_handled: bool,
    /// The event targets an editable text control.
    pub from_editable: bool,
    /// False when a bounding container was supplied and the event
    /// originated outside the workspace focus subtree.
    pub inside_workspace: bool,
}

impl KeyEvent {
    /// A bare key press with no modifiers, inside the workspace.
    pub fn plain(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
            super_key: false,
            already_handled: false,
            from_editable: false,
            inside_workspace: true,
        }
    }
}

/// Action resolved from a hotkey chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Reset the workspace to the configured default preset.
    ResetLayout,
    /// Apply the preset at this zero-based catalogue index.
    ApplyPreset(usize),
    CycleFocus(CycleDirection),
}

/// Keyboard-driven preset switching and focus cycling.
#[derive(Debug, Clone)]
pub struct HotkeyDispatcher {
    enabled: bool,
}

impl HotkeyDispatcher {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Flip the feature flag at runtime.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Classify an event. Returns `None` for events the workspace must
    /// not touch: dispatcher disabled, event already handled, event in
    /// an editable control, or event outside the workspace subtree.
    pub fn dispatch(&self, event: &KeyEvent) -> Option<HotkeyAction> {
        if !self.enabled
            || event.already_handled
            || event.from_editable
            || !event.inside_workspace
        {
            return None;
        }

        if primary_chord(event) {
            return match event.key {
                '0' => Some(HotkeyAction::ResetLayout),
                '1'..='9' => {
                    let digit = event.key as usize - '0' as usize;
                    Some(HotkeyAction::ApplyPreset(digit - 1))
                }
                '[' => Some(HotkeyAction::CycleFocus(CycleDirection::Backward)),
                ']' => Some(HotkeyAction::CycleFocus(CycleDirection::Forward)),
                _ => None,
            };
        }

        if secondary_chord(event) && event.key.eq_ignore_ascii_case(&'e') {
            return Some(HotkeyAction::CycleFocus(CycleDirection::Forward));
        }

        None
    }
}

/// CmdOrCtrl+Alt, exactly.
fn primary_chord(event: &KeyEvent) -> bool {
    let (cmd_or_ctrl, other) = platform_modifier(event);
    cmd_or_ctrl && event.alt && !event.shift && !other
}

/// CmdOrCtrl+Shift, exactly.
fn secondary_chord(event: &KeyEvent) -> bool {
    let (cmd_or_ctrl, other) = platform_modifier(event);
    cmd_or_ctrl && event.shift && !event.alt && !other
}

/// Resolve CmdOrCtrl for this platform: `(chord modifier, the one that
/// must stay up)`.
fn platform_modifier(event: &KeyEvent) -> (bool, bool) {
    #[cfg(target_os = "macos")]
    {
        (event.super_key, event.ctrl)
    }
    #[cfg(not(target_os = "macos"))]
    {
        (event.ctrl, event.super_key)
    }
}
