//! Tap-dance keys: dual-role keys resolved by timeouts.
//!
//! A tap-dance key is either tapped (released within the tap timeout),
//! tapped several times in a row (each release-to-press gap within the
//! release timeout), or held (press outlives the tap timeout). A hold with
//! no preceding taps fires the configured hold outcome; a hold after one or
//! more taps keeps the literal tap key registered instead, so "tap, tap,
//! hold" repeats the character.

use embassy_time::Duration;

use crate::hid_state::HidModifiers;
use crate::keycode::{KeyCode, ModifierCombination};

/// Maximum number of entries in the dance table.
pub const DANCE_MAX_NUM: usize = 16;

/// What a completed tap emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapOutcome {
    /// Tap the keycode.
    Key(KeyCode),
    /// Tap the keycode with a modifier combination applied for the stroke
    /// (shift+tab on the back-tab key).
    KeyWith(KeyCode, ModifierCombination),
    /// Shift-inverted pair: tap `plain` normally; when shift is already
    /// active the stroke becomes `swapped` with the shift suppressed for
    /// its duration and restored afterwards.
    ShiftSwap { plain: KeyCode, swapped: KeyCode },
    /// Smart shift: a single tap arms one-shot shift, a double tap or a tap
    /// with shift already active turns caps word on.
    SmartShift,
}

/// What a hold with no preceding taps resolves to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldOutcome {
    /// Push a layer onto the layer stack for the duration of the hold.
    Layer(u8),
    /// Register a modifier combination for the duration of the hold.
    Modifier(ModifierCombination),
}

/// One entry of the dance table.
///
/// Timeouts are optional per key; `None` falls back to the global values in
/// [`crate::config::DancesConfig`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapDance {
    pub tap: TapOutcome,
    pub hold: HoldOutcome,
    /// Press-to-resolution window: released earlier means tap, expiry means hold.
    pub tap_timeout: Option<Duration>,
    /// Release-to-next-press window grouping rapid taps into one sequence.
    pub release_timeout: Option<Duration>,
}

impl TapDance {
    pub const fn new(tap: TapOutcome, hold: HoldOutcome) -> Self {
        Self {
            tap,
            hold,
            tap_timeout: None,
            release_timeout: None,
        }
    }

    /// Layer-tap: tap the key, hold to activate the layer.
    pub const fn layer_tap(key: KeyCode, layer: u8) -> Self {
        Self::new(TapOutcome::Key(key), HoldOutcome::Layer(layer))
    }

    /// Modifier-tap: tap the key, hold for the modifier (home row mods).
    pub const fn modifier_tap(key: KeyCode, modifier: ModifierCombination) -> Self {
        Self::new(TapOutcome::Key(key), HoldOutcome::Modifier(modifier))
    }

    /// Shift-inverted layer-tap, the backspace/delete key.
    pub const fn shift_swap_layer_tap(plain: KeyCode, swapped: KeyCode, layer: u8) -> Self {
        Self::new(
            TapOutcome::ShiftSwap { plain, swapped },
            HoldOutcome::Layer(layer),
        )
    }

    /// The smart shift key: one-shot shift / caps word on tap, plain shift
    /// on hold.
    pub const fn smart_shift() -> Self {
        Self::new(
            TapOutcome::SmartShift,
            HoldOutcome::Modifier(ModifierCombination::LSHIFT),
        )
    }

    pub const fn with_timeouts(mut self, tap_timeout: Duration, release_timeout: Duration) -> Self {
        self.tap_timeout = Some(tap_timeout);
        self.release_timeout = Some(release_timeout);
        self
    }
}

/// How an established hold must be undone when its key is released.
///
/// One entry lives per pressed position from the moment the hold fires until
/// the release arrives; a release with no entry is a no-op.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ResolvedHold {
    /// Pop the layer stack.
    Layer,
    /// Unregister the modifier combination.
    Modifier(ModifierCombination),
    /// Unregister the literal tap key registered by a hold-after-tap.
    /// `added` are modifiers registered together with the key, `restore`
    /// are shift bits a shift-swap suppressed for the hold.
    Repeat {
        key: KeyCode,
        added: HidModifiers,
        restore: HidModifiers,
    },
}
