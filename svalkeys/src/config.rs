//! Tunable behavior of the engine.

use embassy_time::Duration;
use heapless::Vec;

use crate::key_override::{KEY_OVERRIDE_MAX_NUM, KeyOverride};
use crate::mod_button::{MOD_BUTTON_MAX_NUM, ModButton};
use crate::tap_dance::{DANCE_MAX_NUM, TapDance};

/// Options for configurable action behavior.
#[derive(Debug, Default)]
pub struct BehaviorConfig {
    pub dance: DancesConfig,
    pub mod_button: ModButtonsConfig,
    pub key_override: KeyOverridesConfig,
    pub mouse_mode: MouseModeConfig,
}

/// The dance table plus the global timeout defaults.
#[derive(Debug)]
pub struct DancesConfig {
    pub dances: Vec<TapDance, DANCE_MAX_NUM>,
    /// Press-to-resolution window used by entries without their own.
    pub tap_timeout: Duration,
    /// Release-to-next-press window used by entries without their own.
    pub release_timeout: Duration,
}

impl Default for DancesConfig {
    fn default() -> Self {
        Self {
            dances: Vec::new(),
            tap_timeout: Duration::from_millis(300),
            release_timeout: Duration::from_millis(20),
        }
    }
}

impl DancesConfig {
    /// The effective tap timeout for a dance entry.
    pub fn tap_timeout_of(&self, dance: &TapDance) -> Duration {
        dance.tap_timeout.unwrap_or(self.tap_timeout)
    }

    /// The effective release timeout for a dance entry.
    pub fn release_timeout_of(&self, dance: &TapDance) -> Duration {
        dance.release_timeout.unwrap_or(self.release_timeout)
    }
}

/// The dual-role modifier / mouse-button table.
#[derive(Debug, Default)]
pub struct ModButtonsConfig {
    pub buttons: Vec<ModButton, MOD_BUTTON_MAX_NUM>,
}

/// The always-on key override table.
#[derive(Debug, Default)]
pub struct KeyOverridesConfig {
    pub overrides: Vec<KeyOverride, KEY_OVERRIDE_MAX_NUM>,
}

/// The auto mouse layer.
#[derive(Debug, Copy, Clone)]
pub struct MouseModeConfig {
    /// Layer activated while mouse mode is on.
    pub layer: u8,
    /// Activate mouse mode on pointer motion.
    pub auto_activate: bool,
}

impl Default for MouseModeConfig {
    fn default() -> Self {
        Self {
            layer: crate::layout::MOUSE_LAYER,
            auto_activate: true,
        }
    }
}
