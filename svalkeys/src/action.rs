//! Actions stored in the keymap.

use crate::keycode::{KeyCode, ModifierCombination};

/// A single basic action that the engine can execute directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// A normal key stroke, including mouse keys.
    Key(KeyCode),
    /// A modifier combination held for the duration of the press.
    Modifier(ModifierCombination),
    /// Activate a layer while the key is held (momentary).
    LayerOn(u8),
    /// Toggle a layer on key release.
    LayerToggle(u8),
    /// Activate a layer and deactivate all other layers (except the default
    /// layer) on key press.
    LayerToggleOnly(u8),
}

/// A KeyAction is the action at a keyboard position, stored in the keymap.
/// It is either a single action or a reference into one of the dual-role
/// key tables of the behavior config.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, the next active layer below is checked.
    Transparent,
    /// A single action, triggered on press and cancelled on release.
    Single(Action),
    /// A single action with a modifier combination applied for its duration.
    WithModifier(Action, ModifierCombination),
    /// Tap-dance key, references the dance table by index.
    TapDance(u8),
    /// Dual-role modifier / mouse-button key, references the mod-button
    /// table by index.
    ModButton(u8),
}

impl KeyAction {
    /// Whether this action is one of the eight mouse buttons (used by the
    /// mod-button engine to tell clicks from plain keys).
    pub(crate) fn is_mouse_button(&self) -> bool {
        match self {
            KeyAction::Single(Action::Key(k)) | KeyAction::WithModifier(Action::Key(k), _) => {
                k.is_mouse_button()
            }
            _ => false,
        }
    }
}
