//! Controller-data record: one per connected controller in a
//! [`Command::GetControllersData`](crate::Command::GetControllersData) reply.

use crate::types::{Buttons, Dpad, MiscButtons};
use byteorder::{ByteOrder, LittleEndian};

/// Size of one encoded record.
///
/// 3 x u8 + 6 x i32 + u16 + u8 + 6 x i32 + u8, packed little-endian.
pub const RECORD_LEN: usize = 3 + 6 * 4 + 2 + 1 + 6 * 4 + 1;

/// Error type for record decoding and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Input (or output buffer) length does not match [`RECORD_LEN`].
    InvalidLength(usize),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "invalid record length {len}, expected {RECORD_LEN}")
            }
        }
    }
}

/// Decoded state of one controller.
///
/// Brake and throttle are 0-1023 in practice but travel as `i32`, like the
/// axes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerData {
    /// Slot index assigned by the peer.
    pub index: u8,
    /// Device class tag.
    pub class: u8,
    pub dpad: Dpad,
    pub axis_x: i32,
    pub axis_y: i32,
    pub axis_rx: i32,
    pub axis_ry: i32,
    pub brake: i32,
    pub throttle: i32,
    pub buttons: Buttons,
    pub misc_buttons: MiscButtons,
    pub gyro_x: i32,
    pub gyro_y: i32,
    pub gyro_z: i32,
    pub accel_x: i32,
    pub accel_y: i32,
    pub accel_z: i32,
    pub battery: u8,
}

impl ControllerData {
    /// Decode a record. `bytes` must be exactly [`RECORD_LEN`] long.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != RECORD_LEN {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }

        let mut r = Reader { buf: bytes, pos: 0 };
        Ok(Self {
            index: r.u8(),
            class: r.u8(),
            dpad: Dpad(r.u8()),
            axis_x: r.i32(),
            axis_y: r.i32(),
            axis_rx: r.i32(),
            axis_ry: r.i32(),
            brake: r.i32(),
            throttle: r.i32(),
            buttons: Buttons(r.u16()),
            misc_buttons: MiscButtons(r.u8()),
            gyro_x: r.i32(),
            gyro_y: r.i32(),
            gyro_z: r.i32(),
            accel_x: r.i32(),
            accel_y: r.i32(),
            accel_z: r.i32(),
            battery: r.u8(),
        })
    }

    /// Encode into `buf`, which must be at least [`RECORD_LEN`] long.
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, DecodeError> {
        if buf.len() < RECORD_LEN {
            return Err(DecodeError::InvalidLength(buf.len()));
        }

        let mut w = Writer { buf, pos: 0 };
        w.u8(self.index);
        w.u8(self.class);
        w.u8(self.dpad.raw());
        for v in [
            self.axis_x,
            self.axis_y,
            self.axis_rx,
            self.axis_ry,
            self.brake,
            self.throttle,
        ] {
            w.i32(v);
        }
        w.u16(self.buttons.raw());
        w.u8(self.misc_buttons.raw());
        for v in [
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.accel_x,
            self.accel_y,
            self.accel_z,
        ] {
            w.i32(v);
        }
        w.u8(self.battery);

        debug_assert_eq!(w.pos, RECORD_LEN);
        Ok(w.pos)
    }
}

impl core::fmt::Display for ControllerData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "idx={} class={} dpad=0x{:02x} buttons=0x{:04x} misc=0x{:02x} \
             axis=({}, {}, {}, {}) brake={} throttle={} \
             gyro=({}, {}, {}) accel=({}, {}, {}) battery={}",
            self.index,
            self.class,
            self.dpad.raw(),
            self.buttons.raw(),
            self.misc_buttons.raw(),
            self.axis_x,
            self.axis_y,
            self.axis_rx,
            self.axis_ry,
            self.brake,
            self.throttle,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.battery,
        )
    }
}

/// Sequential little-endian reader. Length is checked up front by the caller.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    #[inline]
    fn u8(&mut self) -> u8 {
        let v = self.buf[self.pos];
        self.pos += 1;
        v
    }

    #[inline]
    fn u16(&mut self) -> u16 {
        let v = LittleEndian::read_u16(&self.buf[self.pos..self.pos + 2]);
        self.pos += 2;
        v
    }

    #[inline]
    fn i32(&mut self) -> i32 {
        let v = LittleEndian::read_i32(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        v
    }
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    #[inline]
    fn u8(&mut self, v: u8) {
        self.buf[self.pos] = v;
        self.pos += 1;
    }

    #[inline]
    fn u16(&mut self, v: u16) {
        LittleEndian::write_u16(&mut self.buf[self.pos..self.pos + 2], v);
        self.pos += 2;
    }

    #[inline]
    fn i32(&mut self, v: i32) {
        LittleEndian::write_i32(&mut self.buf[self.pos..self.pos + 4], v);
        self.pos += 4;
    }
}
