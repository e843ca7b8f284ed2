//! The Svalboard layout.
//!
//! Ten finger clusters (four directions + center each) and two thumb
//! clusters map to a 10x6 matrix: rows 0..=3 are the right-hand fingers
//! R1..R4, rows 4..=7 the left-hand fingers L1..L4, row 8 the right thumb
//! and row 9 the left thumb. Column order for fingers is center, north,
//! east, south, west (the sixth column is unused); thumbs use down, pad,
//! up, nail, knuckle, double-down.

use heapless::Vec;

use crate::action::KeyAction;
use crate::config::{
    BehaviorConfig, DancesConfig, KeyOverridesConfig, ModButtonsConfig, MouseModeConfig,
};
use crate::hid_state::{HidModifiers, HidMouseButtons};
use crate::key_override::KeyOverride;
use crate::keycode::ModifierCombination;
use crate::mod_button::ModButton;
use crate::tap_dance::TapDance;
use crate::{a, k, layer, mb, mo, td, to, wm};

pub const ROWS: usize = 10;
pub const COLS: usize = 6;
pub const NUM_LAYERS: usize = 7;

pub const BASE_LAYER: u8 = 0;
pub const NAV_LAYER: u8 = 1;
pub const NUM_LAYER: u8 = 2;
pub const SYM_LAYER: u8 = 3;
pub const FUN_LAYER: u8 = 4;
pub const SYS_LAYER: u8 = 5;
pub const MOUSE_LAYER: u8 = 6;

const SHIFT: ModifierCombination = ModifierCombination::LSHIFT;
const CTRL: ModifierCombination = ModifierCombination::LCTRL;
const ALT: ModifierCombination = ModifierCombination::LALT;
const GUI: ModifierCombination = ModifierCombination::LGUI;
const CTRL_GUI: ModifierCombination = ModifierCombination::new_from(false, true, false, false, true);
const GUI_SHIFT: ModifierCombination = ModifierCombination::new_from(false, true, false, true, false);

/// The dance table. Indices are referenced by `td!` entries in the keymap.
pub fn default_dances() -> Vec<TapDance, { crate::tap_dance::DANCE_MAX_NUM }> {
    use crate::keycode::KeyCode::*;
    use crate::tap_dance::TapOutcome;

    Vec::from_iter([
        // 0..=3: left home row, center keys A R S T
        TapDance::modifier_tap(A, CTRL),
        TapDance::modifier_tap(R, ALT),
        TapDance::modifier_tap(S, GUI),
        TapDance::modifier_tap(T, SHIFT),
        // 4..=7: right home row, center keys N E I O
        TapDance::modifier_tap(N, ModifierCombination::new_from(true, false, false, true, false)),
        TapDance::modifier_tap(E, ModifierCombination::new_from(true, true, false, false, false)),
        TapDance::modifier_tap(I, ModifierCombination::new_from(true, false, true, false, false)),
        TapDance::modifier_tap(O, ModifierCombination::new_from(true, false, false, false, true)),
        // 8: tab / symbol layer
        TapDance::layer_tap(Tab, SYM_LAYER),
        // 9: back-tab / function layer
        TapDance::new(TapOutcome::KeyWith(Tab, SHIFT), crate::tap_dance::HoldOutcome::Layer(FUN_LAYER)),
        // 10: space / number layer
        TapDance::layer_tap(Space, NUM_LAYER),
        // 11: backspace (delete when shifted) / navigation layer
        TapDance::shift_swap_layer_tap(Backspace, Delete, NAV_LAYER),
        // 12: smart shift
        TapDance::smart_shift(),
    ])
}

/// The four dual-role modifier / mouse-button keys of the mouse layer.
pub fn default_mod_buttons() -> Vec<ModButton, { crate::mod_button::MOD_BUTTON_MAX_NUM }> {
    Vec::from_iter([
        ModButton::new(
            HidModifiers::new().with_left_shift(true),
            HidMouseButtons::new().with_button1(true),
        ),
        ModButton::new(
            HidModifiers::new().with_left_alt(true),
            HidMouseButtons::new().with_button2(true),
        ),
        ModButton::new(
            HidModifiers::new().with_left_gui(true),
            HidMouseButtons::new().with_button3(true),
        ),
        ModButton::new(
            HidModifiers::new().with_left_ctrl(true),
            HidMouseButtons::new().with_button4(true),
        ),
    ])
}

/// The always-on shifted-symbol overrides plus the gui-bracket tilde.
pub fn default_key_overrides() -> Vec<KeyOverride, { crate::key_override::KEY_OVERRIDE_MAX_NUM }> {
    Vec::from_iter([
        // shift+( types @
        KeyOverride::shifted(wm!(Kc9, SHIFT), wm!(Kc2, SHIFT)),
        // shift+) types %
        KeyOverride::shifted(wm!(Kc0, SHIFT), wm!(Kc5, SHIFT)),
        // shift+! types ^
        KeyOverride::shifted(wm!(Kc1, SHIFT), wm!(Kc6, SHIFT)),
        // gui+[ types ~
        KeyOverride::new(
            k!(LeftBracket),
            HidModifiers::new().with_left_gui(true).with_right_gui(true),
            wm!(Grave, SHIFT),
            HidModifiers::new().with_left_gui(true).with_right_gui(true),
        ),
    ])
}

/// The full behavior config for this layout.
pub fn default_behavior() -> BehaviorConfig {
    BehaviorConfig {
        dance: DancesConfig {
            dances: default_dances(),
            ..DancesConfig::default()
        },
        mod_button: ModButtonsConfig {
            buttons: default_mod_buttons(),
        },
        key_override: KeyOverridesConfig {
            overrides: default_key_overrides(),
        },
        mouse_mode: MouseModeConfig::default(),
    }
}

#[rustfmt::skip]
pub const fn default_keymap() -> [[[KeyAction; COLS]; ROWS]; NUM_LAYERS] {
    [
        // Base layer (Colemak-DH on directional clusters)
        layer!([
            /*      Center     North             East              South       West              -            */
            /*R1*/ [td!(4),    k!(L),            k!(K),            k!(H),      k!(M),            a!(No)],
            /*R2*/ [td!(5),    k!(U),            k!(Minus),        k!(Comma),  k!(J),            a!(No)],
            /*R3*/ [td!(6),    k!(Y),            k!(Equal),        k!(Dot),    wm!(Kc0, SHIFT),  a!(No)],
            /*R4*/ [td!(7),    k!(Semicolon),    k!(Quote),        k!(Slash),  k!(RightBracket), a!(No)],
            /*L1*/ [td!(3),    k!(P),            k!(G),            k!(D),      k!(V),            a!(No)],
            /*L2*/ [td!(2),    k!(F),            k!(B),            k!(C),      wm!(Kc1, SHIFT),  a!(No)],
            /*L3*/ [td!(1),    k!(W),            wm!(Kc9, SHIFT),  k!(X),      k!(Backslash),    a!(No)],
            /*L4*/ [td!(0),    k!(Q),            k!(LeftBracket),  k!(Z),      k!(Grave),        a!(No)],
            /*      Down       Pad               Up                Nail        Knuckle           Double Down  */
            /*RT*/ [k!(Enter), td!(10),          k!(Escape),       td!(9),     mo!(6),           k!(CapsWordToggle)],
            /*LT*/ [td!(12),   td!(11),          k!(Again),        td!(8),     mo!(6),           k!(CapsWordToggle)]
        ]),
        // Navigation
        layer!([
            /*R1*/ [k!(Left),        wm!(Left, CTRL_GUI),  k!(End),          k!(H), k!(Home),            a!(No)],
            /*R2*/ [k!(Down),        wm!(Down, CTRL_GUI),  wm!(Right, ALT),  k!(J), wm!(Left, ALT),      a!(No)],
            /*R3*/ [k!(Up),          wm!(Up, CTRL_GUI),    wm!(Right, CTRL), k!(K), wm!(Left, CTRL),     a!(No)],
            /*R4*/ [k!(Right),       wm!(Right, CTRL_GUI), k!(PageDown),     k!(L), k!(PageUp),          a!(No)],
            /*L1*/ [k!(LShift),      a!(No),               a!(No),           a!(No), a!(No),             a!(No)],
            /*L2*/ [k!(LGui),        a!(No),               a!(No),           a!(No), a!(No),             a!(No)],
            /*L3*/ [k!(LAlt),        a!(No),               wm!(Tab, GUI),    a!(No), wm!(Tab, GUI_SHIFT), a!(No)],
            /*L4*/ [k!(LCtrl),       a!(No),               wm!(Grave, GUI),  a!(No), wm!(Grave, GUI_SHIFT), a!(No)],
            /*RT*/ [a!(Transparent), a!(Transparent),      a!(Transparent),  a!(No), a!(Transparent),    a!(No)],
            /*LT*/ [a!(No),          a!(Transparent),      a!(Transparent),  a!(No), a!(Transparent),    a!(No)]
        ]),
        // Numbers
        layer!([
            /*R1*/ [k!(RShift),      a!(No),           a!(No),           a!(No),          a!(No),          a!(No)],
            /*R2*/ [k!(RGui),        a!(No),           a!(No),           a!(No),          a!(No),          a!(No)],
            /*R3*/ [k!(RAlt),        a!(No),           a!(No),           a!(No),          a!(No),          a!(No)],
            /*R4*/ [k!(RCtrl),       a!(No),           a!(No),           a!(No),          a!(No),          a!(No)],
            /*L1*/ [k!(Kp9),         k!(KpPlus),       k!(Kp0),          k!(Kp4),         k!(KpDot),       a!(No)],
            /*L2*/ [k!(Kp8),         k!(KpMinus),      wm!(Kc0, SHIFT),  k!(Kp3),         wm!(Kc9, SHIFT), a!(No)],
            /*L3*/ [k!(Kp7),         k!(KpAsterisk),   k!(KpEqual),      k!(Kp2),         wm!(Kc6, SHIFT), a!(No)],
            /*L4*/ [k!(Kp6),         k!(KpSlash),      k!(KpComma),      k!(Kp1),         k!(Kp5),         a!(No)],
            /*RT*/ [a!(Transparent), a!(Transparent),  a!(Transparent),  a!(Transparent), a!(Transparent), a!(No)],
            /*LT*/ [k!(KpEnter),     a!(Transparent),  a!(Transparent),  a!(Transparent), a!(Transparent), a!(No)]
        ]),
        // Symbols
        layer!([
            /*R1*/ [wm!(LeftBracket, SHIFT),  wm!(Comma, SHIFT), wm!(Kc6, SHIFT),       k!(LeftBracket),  wm!(Kc4, SHIFT), a!(No)],
            /*R2*/ [wm!(Semicolon, SHIFT),    k!(Equal),         wm!(Backslash, SHIFT), wm!(Kc8, SHIFT),  wm!(Kc7, SHIFT), a!(No)],
            /*R3*/ [wm!(RightBracket, SHIFT), wm!(Dot, SHIFT),   wm!(Kc5, SHIFT),       k!(RightBracket), wm!(Kc1, SHIFT), a!(No)],
            /*R4*/ [wm!(Kc2, SHIFT),          wm!(Minus, SHIFT), k!(Backslash),         wm!(Kc3, SHIFT),  k!(Slash),       a!(No)],
            /*L1*/ [k!(LShift),               a!(No),            a!(No),                a!(No),           a!(No),          a!(No)],
            /*L2*/ [k!(LGui),                 a!(No),            a!(No),                a!(No),           a!(No),          a!(No)],
            /*L3*/ [k!(LAlt),                 a!(No),            a!(No),                a!(No),           a!(No),          a!(No)],
            /*L4*/ [k!(LCtrl),                a!(No),            a!(No),                a!(No),           a!(No),          a!(No)],
            /*RT*/ [a!(Transparent),          a!(Transparent),   a!(Transparent),       a!(No),           a!(Transparent), a!(No)],
            /*LT*/ [a!(No),                   a!(Transparent),   a!(Transparent),       a!(No),           a!(Transparent), a!(No)]
        ]),
        // Function keys
        layer!([
            /*R1*/ [k!(RShift),      a!(No),          a!(No),          a!(No),   a!(No),          a!(No)],
            /*R2*/ [k!(RGui),        a!(No),          a!(No),          a!(No),   a!(No),          a!(No)],
            /*R3*/ [k!(RAlt),        a!(No),          a!(No),          a!(No),   a!(No),          a!(No)],
            /*R4*/ [k!(RCtrl),       a!(No),          a!(No),          a!(No),   a!(No),          a!(No)],
            /*L1*/ [k!(F11),         k!(F20),         k!(F12),         k!(F16),  k!(F10),         a!(No)],
            /*L2*/ [k!(F8),          k!(F19),         k!(F9),          k!(F15),  k!(F7),          a!(No)],
            /*L3*/ [k!(F5),          k!(F18),         k!(F6),          k!(F14),  k!(F4),          a!(No)],
            /*L4*/ [k!(F2),          k!(F17),         k!(F3),          k!(F13),  k!(F1),          a!(No)],
            /*RT*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(No),   a!(Transparent), a!(No)],
            /*LT*/ [a!(No),          a!(Transparent), a!(Transparent), a!(No),   a!(Transparent), a!(No)]
        ]),
        // System (board controls live in the firmware proper, not here)
        layer!([
            /*R1*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No)],
            /*R2*/ [a!(Transparent), a!(No),          a!(Transparent), a!(No),          a!(Transparent), a!(No)],
            /*R3*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No)],
            /*R4*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No)],
            /*L1*/ [a!(No),          a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No)],
            /*L2*/ [a!(No),          a!(No),          a!(Transparent), a!(No),          a!(Transparent), a!(No)],
            /*L3*/ [a!(No),          a!(No),          a!(Transparent), a!(No),          a!(Transparent), a!(No)],
            /*L4*/ [a!(No),          a!(No),          a!(Transparent), a!(Transparent), a!(Transparent), a!(No)],
            /*RT*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
            /*LT*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)]
        ]),
        // Mouse layer: centers of the left home row become the dual-role
        // modifier / mouse-button keys while the pointer is in use
        layer!([
            /*R1*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),  a!(Transparent), a!(No)],
            /*R2*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),  a!(Transparent), a!(No)],
            /*R3*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),  a!(Transparent), a!(No)],
            /*R4*/ [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),  a!(Transparent), a!(No)],
            /*L1*/ [mb!(0),          a!(Transparent), a!(Transparent), k!(MouseBtn1),    a!(Transparent), a!(No)],
            /*L2*/ [mb!(2),          a!(No),          a!(Transparent), k!(MouseBtn3),    a!(Transparent), a!(No)],
            /*L3*/ [mb!(1),          a!(No),          a!(Transparent), k!(MouseBtn2),    a!(Transparent), a!(No)],
            /*L4*/ [mb!(3),          a!(No),          a!(Transparent), k!(MouseBtn4),    a!(Transparent), a!(No)],
            /*RT*/ [a!(Transparent), k!(MouseBtn1),   to!(0),          k!(MouseBtn2),    k!(MouseBtn3),   a!(Transparent)],
            /*LT*/ [a!(Transparent), a!(Transparent), to!(0),          a!(Transparent),  a!(Transparent), a!(Transparent)]
        ]),
    ]
}
