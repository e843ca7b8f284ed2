//! Layer indicator colors.
//!
//! Each layer has a fixed HSV color shown on the indicator LEDs; the RGB
//! driver itself lives outside this crate and reads the color through
//! [`layer_color`].

/// An HSV color, hue scaled to 0..=255 like the rest of the firmware world.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

pub const HSV_GREEN: Hsv = Hsv { h: 85, s: 255, v: 255 };
pub const HSV_ORANGE: Hsv = Hsv { h: 28, s: 255, v: 255 };
pub const HSV_AZURE: Hsv = Hsv { h: 132, s: 102, v: 255 };
pub const HSV_CORAL: Hsv = Hsv { h: 11, s: 176, v: 255 };
pub const HSV_YELLOW: Hsv = Hsv { h: 43, s: 255, v: 255 };
pub const HSV_TEAL: Hsv = Hsv { h: 128, s: 255, v: 128 };
pub const HSV_MAGENTA: Hsv = Hsv { h: 213, s: 255, v: 255 };

/// Color per layer: base, nav, num, sym, fn, sys, mouse.
pub const LAYER_COLORS: [Hsv; 7] = [
    HSV_GREEN,
    HSV_ORANGE,
    HSV_AZURE,
    HSV_CORAL,
    HSV_YELLOW,
    HSV_TEAL,
    HSV_MAGENTA,
];

/// The indicator color for a layer. Layers beyond the table reuse the base
/// color, so a misconfigured layer id never panics the LED task.
pub fn layer_color(layer: u8) -> Hsv {
    *LAYER_COLORS.get(layer as usize).unwrap_or(&LAYER_COLORS[0])
}
