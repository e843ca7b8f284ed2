//! Always-on key overrides: replace a key while a trigger modifier is held.
//!
//! Used for the shifted-symbol swaps of this keymap, e.g. shift+`(` types
//! `@`. The trigger modifiers are suppressed from the reports while the
//! replacement is registered, so the replacement's own modifiers (if any)
//! win.

use crate::action::KeyAction;
use crate::hid_state::HidModifiers;

/// Maximum number of entries in the override table.
pub const KEY_OVERRIDE_MAX_NUM: usize = 8;

/// One override entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyOverride {
    /// The action the override applies to, as resolved from the keymap.
    pub trigger: KeyAction,
    /// Modifiers that arm the override; any overlap with the currently held
    /// modifiers triggers it.
    pub trigger_mods: HidModifiers,
    /// The action registered instead of the trigger.
    pub replacement: KeyAction,
    /// Modifiers removed from the reports while the replacement is active.
    pub suppressed_mods: HidModifiers,
}

impl KeyOverride {
    pub const fn new(
        trigger: KeyAction,
        trigger_mods: HidModifiers,
        replacement: KeyAction,
        suppressed_mods: HidModifiers,
    ) -> Self {
        Self {
            trigger,
            trigger_mods,
            replacement,
            suppressed_mods,
        }
    }

    /// An override armed by either shift, with the shift suppressed while
    /// the replacement is active.
    pub const fn shifted(trigger: KeyAction, replacement: KeyAction) -> Self {
        Self::new(
            trigger,
            HidModifiers::SHIFT_MASK,
            replacement,
            HidModifiers::SHIFT_MASK,
        )
    }
}

/// A triggered override, held until the trigger key's release.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct ActiveOverride {
    pub replacement: KeyAction,
    pub suppress: HidModifiers,
}
