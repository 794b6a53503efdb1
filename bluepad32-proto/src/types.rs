//! Button bitfields: Buttons, Dpad, MiscButtons.
//!
//! The peer reports each group as a raw mask. [`Buttons::pressed`] and its
//! siblings return the masked bits rather than a `bool`, so callers can
//! combine results with further bit operations.

use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Regular gamepad buttons.
///
/// # Example
///
/// ```
/// use bluepad32_proto::Buttons;
///
/// let buttons = Buttons::A | Buttons::THUMB_R;
/// assert!(buttons.contains(Buttons::A));
/// assert_eq!(buttons.pressed(Buttons::THUMB_R), 1 << 9);
/// assert_eq!(buttons.pressed(Buttons::B), 0);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u16);

impl Buttons {
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const X: Self = Self(1 << 2);
    pub const Y: Self = Self(1 << 3);
    pub const L1: Self = Self(1 << 4);
    pub const R1: Self = Self(1 << 5);
    pub const L2: Self = Self(1 << 6);
    pub const R2: Self = Self(1 << 7);
    pub const THUMB_L: Self = Self(1 << 8);
    pub const THUMB_R: Self = Self(1 << 9);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if all of the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Buttons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Masked bits of `button`: non-zero when pressed.
    #[inline]
    #[must_use]
    pub const fn pressed(self, button: Buttons) -> u16 {
        self.0 & button.0
    }

    /// Get the raw u16 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// Directional pad. Only the low 4 bits are used.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dpad(pub u8);

impl Dpad {
    pub const UP: Self = Self(1 << 0);
    pub const DOWN: Self = Self(1 << 1);
    pub const RIGHT: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);

    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, direction: Dpad) -> bool {
        (self.0 & direction.0) == direction.0
    }

    /// Masked bits of `direction`: non-zero when pressed.
    #[inline]
    #[must_use]
    pub const fn pressed(self, direction: Dpad) -> u8 {
        self.0 & direction.0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl BitOr for Dpad {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Helper buttons that games rarely bind directly.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MiscButtons(pub u8);

impl MiscButtons {
    /// PS, Xbox, etc.
    pub const SYSTEM: Self = Self(1 << 0);
    /// Select, Share, `-`.
    pub const BACK: Self = Self(1 << 1);
    /// Start, Options, `+`.
    pub const HOME: Self = Self(1 << 2);

    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, button: MiscButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Masked bits of `button`: non-zero when pressed.
    #[inline]
    #[must_use]
    pub const fn pressed(self, button: MiscButtons) -> u8 {
        self.0 & button.0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl BitOr for MiscButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_BUTTONS: [Buttons; 10] = [
        Buttons::A,
        Buttons::B,
        Buttons::X,
        Buttons::Y,
        Buttons::L1,
        Buttons::R1,
        Buttons::L2,
        Buttons::R2,
        Buttons::THUMB_L,
        Buttons::THUMB_R,
    ];

    #[test]
    fn test_pressed_returns_bit_value() {
        let all = Buttons(0x03FF);
        for button in ALL_BUTTONS {
            assert_eq!(all.pressed(button), button.raw());
            assert_eq!(Buttons::NONE.pressed(button), 0);
        }
        // Bits above 1 must not be folded to 1
        assert_eq!(all.pressed(Buttons::THUMB_R), 0x0200);
    }

    #[test]
    fn test_buttons_are_distinct_bits() {
        let mut acc = Buttons::NONE;
        for button in ALL_BUTTONS {
            assert_eq!(button.raw().count_ones(), 1);
            assert!(!acc.contains(button));
            acc |= button;
        }
        assert_eq!(acc.raw(), 0x03FF);
    }

    #[test]
    fn test_dpad_pressed() {
        let dpad = Dpad::UP | Dpad::LEFT;
        assert_eq!(dpad.pressed(Dpad::UP), 0x01);
        assert_eq!(dpad.pressed(Dpad::LEFT), 0x08);
        assert_eq!(dpad.pressed(Dpad::DOWN), 0);
        assert!(!dpad.contains(Dpad::RIGHT));
    }

    #[test]
    fn test_misc_buttons_pressed() {
        let misc = MiscButtons::HOME;
        assert_eq!(misc.pressed(MiscButtons::HOME), 0x04);
        assert_eq!(misc.pressed(MiscButtons::SYSTEM), 0);
        assert!((MiscButtons::SYSTEM | MiscButtons::BACK).contains(MiscButtons::BACK));
    }
}
