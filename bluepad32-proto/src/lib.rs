//! Wire protocol types for talking to a Bluepad32 co-processor.
//!
//! This crate contains everything that is fixed by the peer firmware:
//!
//! - **Commands**: [`Command`] opcodes and the expected [`PROTOCOL_VERSION`]
//! - **Types**: [`Buttons`], [`Dpad`] and [`MiscButtons`] bitfields
//! - **Records**: [`ControllerData`], the fixed-layout little-endian record
//!   returned for every connected controller by
//!   [`Command::GetControllersData`]
//!
//! # Record Layout
//!
//! ```text
//! offset  size  field
//!      0     1  index          u8
//!      1     1  class          u8
//!      2     1  dpad           u8
//!      3    16  axis x/y/rx/ry i32 x4
//!     19     8  brake/throttle i32 x2
//!     27     2  buttons        u16
//!     29     1  misc_buttons   u8
//!     30    12  gyro x/y/z     i32 x3
//!     42    12  accel x/y/z    i32 x3
//!     54     1  battery        u8
//! ```
//!
//! # Example
//!
//! ```
//! use bluepad32_proto::{Buttons, ControllerData, RECORD_LEN};
//!
//! let data = ControllerData {
//!     index: 1,
//!     buttons: Buttons::A | Buttons::R1,
//!     ..ControllerData::default()
//! };
//!
//! let mut buf = [0u8; RECORD_LEN];
//! data.encode(&mut buf).unwrap();
//!
//! let decoded = ControllerData::decode(&buf).unwrap();
//! assert_eq!(decoded.index, 1);
//! assert_eq!(decoded.buttons.pressed(Buttons::R1), Buttons::R1.raw());
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod record;
pub mod types;

pub use command::{Command, ProtocolVersion, MAX_CONTROLLERS, PROTOCOL_VERSION};
pub use record::{ControllerData, DecodeError, RECORD_LEN};
pub use types::{Buttons, Dpad, MiscButtons};
