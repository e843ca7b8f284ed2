//! Dual-role modifier / mouse-button keys.
//!
//! Four keys of the mouse layer double as keyboard modifiers and mouse
//! buttons. The resolution is purely event driven, there are no timers:
//!
//! - pressed while an external modifier is already active: the key is a
//!   mouse button immediately (click-with-modifier);
//! - another key pressed while held: the key commits to its modifier role;
//! - pointer motion while held and uncommitted: the speculative modifier is
//!   replaced by the mouse button (drag);
//! - released without any of the above: the speculative modifier is taken
//!   back and the mouse button is tapped (plain click).

use crate::hid_state::{HidModifiers, HidMouseButtons};

/// Maximum number of entries in the mod-button table.
pub const MOD_BUTTON_MAX_NUM: usize = 4;

/// One dual-role modifier / mouse-button key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModButton {
    /// The modifier this key asserts when used as a keyboard modifier.
    pub modifier: HidModifiers,
    /// The mouse button this key emulates otherwise.
    pub button: HidMouseButtons,
}

impl ModButton {
    pub const fn new(modifier: HidModifiers, button: HidMouseButtons) -> Self {
        Self { modifier, button }
    }
}

/// Per-press resolution state of one mod-button.
///
/// At most one of `used_as_modifier`, `converted_to_mouse` and
/// `mods_on_press` is set; all flags reset on release. A release that never
/// arrives leaves the key held, the scanning layer guarantees delivery.
#[derive(Debug, Copy, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct ModButtonState {
    /// The physical key is currently down.
    pub is_held: bool,
    /// Committed to the modifier role by another key's press.
    pub used_as_modifier: bool,
    /// Converted to a held mouse button by pointer motion.
    pub converted_to_mouse: bool,
    /// An external modifier was active at press time, the key registered
    /// its mouse button immediately.
    pub mods_on_press: bool,
    /// Leave mouse mode when this key is released.
    pub exit_mouse_mode: bool,
}

impl ModButtonState {
    /// Held, but not yet resolved to either role.
    pub(crate) fn uncommitted(&self) -> bool {
        self.is_held && !self.used_as_modifier && !self.converted_to_mouse && !self.mods_on_press
    }
}
