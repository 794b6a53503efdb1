//! Connected-slot bitmask and edge detection between polls.

use bluepad32_proto::MAX_CONTROLLERS;

/// One bit per controller slot, set while the slot is occupied.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectedMask(u8);

/// Occupancy change of a single slot between two polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// 0 -> 1
    Connected,
    /// 1 -> 0
    Disconnected,
}

impl ConnectedMask {
    /// No slot occupied.
    pub const EMPTY: Self = Self(0);

    /// Mark `index` as occupied. Indices outside the slot range are ignored.
    #[inline]
    pub fn insert(&mut self, index: usize) {
        if index < MAX_CONTROLLERS {
            self.0 |= 1 << index;
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < MAX_CONTROLLERS && self.0 & (1 << index) != 0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Slots whose bit differs between `self` (previous) and `next`,
    /// in ascending index order.
    pub fn transitions(self, next: ConnectedMask) -> impl Iterator<Item = (usize, Transition)> {
        (0..MAX_CONTROLLERS).filter_map(move |idx| {
            match (self.contains(idx), next.contains(idx)) {
                (false, true) => Some((idx, Transition::Connected)),
                (true, false) => Some((idx, Transition::Disconnected)),
                _ => None,
            }
        })
    }
}
