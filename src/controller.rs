//! Controller: read/write view of one hub slot.

use crate::error::Error;
use crate::hub::Bluepad32;
use crate::transport::Transport;
use bluepad32_proto::{Buttons, ControllerData, Dpad, MiscButtons};

/// Handle bound to one controller slot of a [`Bluepad32`] hub.
///
/// Readers return fields of the latest snapshot. Named buttons return the
/// masked bit value (`state.buttons & BIT`), not a `bool`: non-zero means
/// pressed, and results can be OR-ed together. Writers forward to the hub
/// with this slot's index.
pub struct Controller<'a, T: Transport> {
    hub: &'a mut Bluepad32<T>,
    index: u8,
}

impl<'a, T: Transport> Controller<'a, T> {
    pub(crate) fn new(hub: &'a mut Bluepad32<T>, index: u8) -> Self {
        Self { hub, index }
    }

    #[inline]
    fn data(&self) -> &ControllerData {
        self.hub.snapshot(self.index)
    }

    /// Slot index this handle is bound to.
    #[inline]
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Whether the slot was reported by the last successful poll.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.hub.is_connected(self.index)
    }

    /// Full snapshot.
    #[must_use]
    pub fn state(&self) -> &ControllerData {
        self.data()
    }

    // --- Raw fields ---

    /// Device class tag.
    #[must_use]
    pub fn class(&self) -> u8 {
        self.data().class
    }

    #[must_use]
    pub fn dpad(&self) -> u8 {
        self.data().dpad.raw()
    }

    #[must_use]
    pub fn buttons(&self) -> u16 {
        self.data().buttons.raw()
    }

    #[must_use]
    pub fn misc_buttons(&self) -> u8 {
        self.data().misc_buttons.raw()
    }

    #[must_use]
    pub fn axis_x(&self) -> i32 {
        self.data().axis_x
    }

    #[must_use]
    pub fn axis_y(&self) -> i32 {
        self.data().axis_y
    }

    #[must_use]
    pub fn axis_rx(&self) -> i32 {
        self.data().axis_rx
    }

    #[must_use]
    pub fn axis_ry(&self) -> i32 {
        self.data().axis_ry
    }

    /// 0-1023.
    #[must_use]
    pub fn brake(&self) -> i32 {
        self.data().brake
    }

    /// 0-1023.
    #[must_use]
    pub fn throttle(&self) -> i32 {
        self.data().throttle
    }

    #[must_use]
    pub fn gyro(&self) -> (i32, i32, i32) {
        let d = self.data();
        (d.gyro_x, d.gyro_y, d.gyro_z)
    }

    #[must_use]
    pub fn accel(&self) -> (i32, i32, i32) {
        let d = self.data();
        (d.accel_x, d.accel_y, d.accel_z)
    }

    #[must_use]
    pub fn battery(&self) -> u8 {
        self.data().battery
    }

    // --- Named buttons (bit values) ---

    #[must_use]
    pub fn a(&self) -> u16 {
        self.data().buttons.pressed(Buttons::A)
    }

    #[must_use]
    pub fn b(&self) -> u16 {
        self.data().buttons.pressed(Buttons::B)
    }

    #[must_use]
    pub fn x(&self) -> u16 {
        self.data().buttons.pressed(Buttons::X)
    }

    #[must_use]
    pub fn y(&self) -> u16 {
        self.data().buttons.pressed(Buttons::Y)
    }

    #[must_use]
    pub fn l1(&self) -> u16 {
        self.data().buttons.pressed(Buttons::L1)
    }

    #[must_use]
    pub fn r1(&self) -> u16 {
        self.data().buttons.pressed(Buttons::R1)
    }

    #[must_use]
    pub fn l2(&self) -> u16 {
        self.data().buttons.pressed(Buttons::L2)
    }

    #[must_use]
    pub fn r2(&self) -> u16 {
        self.data().buttons.pressed(Buttons::R2)
    }

    #[must_use]
    pub fn thumb_l(&self) -> u16 {
        self.data().buttons.pressed(Buttons::THUMB_L)
    }

    #[must_use]
    pub fn thumb_r(&self) -> u16 {
        self.data().buttons.pressed(Buttons::THUMB_R)
    }

    #[must_use]
    pub fn dpad_up(&self) -> u8 {
        self.data().dpad.pressed(Dpad::UP)
    }

    #[must_use]
    pub fn dpad_down(&self) -> u8 {
        self.data().dpad.pressed(Dpad::DOWN)
    }

    #[must_use]
    pub fn dpad_right(&self) -> u8 {
        self.data().dpad.pressed(Dpad::RIGHT)
    }

    #[must_use]
    pub fn dpad_left(&self) -> u8 {
        self.data().dpad.pressed(Dpad::LEFT)
    }

    /// PS, Xbox, etc.
    #[must_use]
    pub fn system(&self) -> u8 {
        self.data().misc_buttons.pressed(MiscButtons::SYSTEM)
    }

    /// Select, Share, `-`.
    #[must_use]
    pub fn back(&self) -> u8 {
        self.data().misc_buttons.pressed(MiscButtons::BACK)
    }

    /// Start, Options, `+`.
    #[must_use]
    pub fn home(&self) -> u8 {
        self.data().misc_buttons.pressed(MiscButtons::HOME)
    }

    // --- Output commands ---

    /// See [`Bluepad32::set_player_leds`].
    pub fn set_player_leds(&mut self, leds: u8) -> Result<bool, Error<T::Error>> {
        self.hub.set_player_leds(self.index, leds)
    }

    /// See [`Bluepad32::set_lightbar_color`].
    pub fn set_lightbar_color(&mut self, rgb: (u8, u8, u8)) -> Result<bool, Error<T::Error>> {
        self.hub.set_lightbar_color(self.index, rgb)
    }

    /// See [`Bluepad32::set_rumble`].
    pub fn set_rumble(&mut self, force: u8, duration: u8) -> Result<bool, Error<T::Error>> {
        self.hub.set_rumble(self.index, force, duration)
    }
}

impl<T: Transport> core::fmt::Display for Controller<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self.data(), f)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::hub::tests::{at, controllers, response, version_ok, MockTransport};
    use bluepad32_proto::Command;
    use std::string::ToString;
    use std::vec;

    fn hub_reporting(data: ControllerData) -> Bluepad32<MockTransport> {
        let mut hub =
            Bluepad32::new(MockTransport::new(vec![version_ok(), controllers(&[data])])).unwrap();
        hub.poll().unwrap();
        hub
    }

    #[test]
    fn test_named_buttons_return_bit_values() {
        let mut hub = hub_reporting(ControllerData {
            buttons: Buttons(0x03FF),
            ..at(0)
        });
        let c = hub.controller(0).unwrap();

        assert_eq!(c.a(), 1 << 0);
        assert_eq!(c.b(), 1 << 1);
        assert_eq!(c.x(), 1 << 2);
        assert_eq!(c.y(), 1 << 3);
        assert_eq!(c.l1(), 1 << 4);
        assert_eq!(c.r1(), 1 << 5);
        assert_eq!(c.l2(), 1 << 6);
        assert_eq!(c.r2(), 1 << 7);
        assert_eq!(c.thumb_l(), 1 << 8);
        assert_eq!(c.thumb_r(), 1 << 9);
        assert_eq!(c.buttons(), 0x03FF);
    }

    #[test]
    fn test_unpressed_buttons_are_zero() {
        let mut hub = hub_reporting(ControllerData {
            buttons: Buttons::Y,
            ..at(1)
        });
        let c = hub.controller(1).unwrap();

        assert_eq!(c.a(), 0);
        assert_eq!(c.thumb_r(), 0);
        assert_eq!(c.y(), Buttons::Y.raw());
    }

    #[test]
    fn test_dpad_and_misc_buttons() {
        let mut hub = hub_reporting(ControllerData {
            dpad: Dpad::DOWN | Dpad::LEFT,
            misc_buttons: MiscButtons::BACK | MiscButtons::HOME,
            ..at(2)
        });
        let c = hub.controller(2).unwrap();

        assert_eq!(c.dpad(), 0x0A);
        assert_eq!(c.dpad_up(), 0);
        assert_eq!(c.dpad_down(), 0x02);
        assert_eq!(c.dpad_right(), 0);
        assert_eq!(c.dpad_left(), 0x08);
        assert_eq!(c.system(), 0);
        assert_eq!(c.back(), 0x02);
        assert_eq!(c.home(), 0x04);
        assert_eq!(c.misc_buttons(), 0x06);
    }

    #[test]
    fn test_raw_fields() {
        let data = ControllerData {
            class: 3,
            axis_x: -511,
            axis_y: 512,
            axis_rx: 1,
            axis_ry: -1,
            brake: 1023,
            throttle: 0,
            gyro_x: 1,
            gyro_y: 2,
            gyro_z: 3,
            accel_x: -4,
            accel_y: -5,
            accel_z: -6,
            battery: 255,
            ..at(3)
        };
        let mut hub = hub_reporting(data);
        let c = hub.controller(3).unwrap();

        assert_eq!(c.index(), 3);
        assert!(c.is_connected());
        assert_eq!(c.class(), 3);
        assert_eq!((c.axis_x(), c.axis_y()), (-511, 512));
        assert_eq!((c.axis_rx(), c.axis_ry()), (1, -1));
        assert_eq!((c.brake(), c.throttle()), (1023, 0));
        assert_eq!(c.gyro(), (1, 2, 3));
        assert_eq!(c.accel(), (-4, -5, -6));
        assert_eq!(c.battery(), 255);
        assert_eq!(c.state(), &data);
        assert!(c.to_string().starts_with("idx=3 class=3"));
    }

    #[test]
    fn test_writes_use_bound_index() {
        let mut hub = hub_reporting(at(1));
        hub.transport_mut().push(response(&[&[1]]));
        hub.transport_mut().push(response(&[&[0]]));
        hub.transport_mut().push(response(&[&[1]]));

        let mut c = hub.controller(1).unwrap();
        assert_eq!(c.set_player_leds(0x0F), Ok(true));
        assert_eq!(c.set_lightbar_color((1, 2, 3)), Ok(false));
        assert_eq!(c.set_rumble(255, 100), Ok(true));

        let sent = hub.release().sent;
        assert_eq!(sent[2], (Command::SetPlayerLeds, vec![vec![1], vec![0x0F]]));
        assert_eq!(
            sent[3],
            (Command::SetLightbarColor, vec![vec![1], vec![1, 2, 3]])
        );
        assert_eq!(sent[4], (Command::SetRumble, vec![vec![1], vec![255, 100]]));
    }
}
