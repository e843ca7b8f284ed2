//! Bit-level state that ends up in hid reports.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;

/// The modifier byte of the keyboard hid report.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidModifiers {
    #[bits(1)]
    pub(crate) left_ctrl: bool,
    #[bits(1)]
    pub(crate) left_shift: bool,
    #[bits(1)]
    pub(crate) left_alt: bool,
    #[bits(1)]
    pub(crate) left_gui: bool,
    #[bits(1)]
    pub(crate) right_ctrl: bool,
    #[bits(1)]
    pub(crate) right_shift: bool,
    #[bits(1)]
    pub(crate) right_alt: bool,
    #[bits(1)]
    pub(crate) right_gui: bool,
}

impl HidModifiers {
    /// Both shift bits, the mask the shift-inverted keys test against.
    pub const SHIFT_MASK: Self = Self::new().with_left_shift(true).with_right_shift(true);

    pub const fn is_empty(&self) -> bool {
        self.into_bits() == 0
    }
}

impl BitOr for HidModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}

impl BitAnd for HidModifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}

impl Not for HidModifiers {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}

impl BitOrAssign for HidModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAndAssign for HidModifiers {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

/// The button byte of the mouse hid report.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidMouseButtons {
    #[bits(1)]
    pub(crate) button1: bool, //left
    #[bits(1)]
    pub(crate) button2: bool, //right
    #[bits(1)]
    pub(crate) button3: bool, //middle
    #[bits(1)]
    pub(crate) button4: bool,
    #[bits(1)]
    pub(crate) button5: bool,
    #[bits(1)]
    pub(crate) button6: bool,
    #[bits(1)]
    pub(crate) button7: bool,
    #[bits(1)]
    pub(crate) button8: bool,
}

impl HidMouseButtons {
    pub const fn is_empty(&self) -> bool {
        self.into_bits() == 0
    }
}

impl BitOr for HidMouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}

impl BitAnd for HidMouseButtons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}

impl Not for HidMouseButtons {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}

impl BitOrAssign for HidMouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAndAssign for HidMouseButtons {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
