//! Driver for gamepads attached to a Bluepad32 co-processor.
//!
//! A Bluepad32 peer (typically an ESP32 running the Bluepad32 firmware)
//! handles the Bluetooth side and exposes up to four controllers through a
//! small command/response protocol. This crate is the host side of that
//! protocol and does not depend on any particular link or chip.
//!
//! # Overview
//!
//! - [`transport`]: the link to the peer ([`Transport`])
//! - [`hub`]: owns the four slots, polls and fires notifications ([`Bluepad32`])
//! - [`controller`]: per-slot view with readers and output commands ([`Controller`])
//! - [`connection`]: connected-slot bitmask and edge detection ([`ConnectedMask`])
//!
//! Wire-level types come from [`bluepad32_proto`] and are re-exported here.
//!
//! # Example
//!
//! ```ignore
//! use bluepad32::{Bluepad32, Controller, Transport};
//!
//! fn on_connect<T: Transport>(c: &mut Controller<'_, T>) {
//!     let _ = c.set_lightbar_color((0xFF, 0x00, 0x00));
//! }
//!
//! fn on_disconnect<T: Transport>(_c: &mut Controller<'_, T>) {}
//!
//! let mut hub = Bluepad32::new(transport)?;
//! hub.set_callbacks(on_connect, on_disconnect);
//!
//! loop {
//!     hub.poll()?;
//!     if let Some(c) = hub.controller(0).filter(|c| c.is_connected()) {
//!         if c.a() != 0 {
//!             // ...
//!         }
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **`log`** (default): Log through the `log` facade
//! - **`defmt`**: Log and format through defmt (for embedded targets)
//! - **`std`**: Enable standard library support (for host testing)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod connection;
pub mod controller;
pub mod error;
pub mod hub;
pub mod transport;

pub use connection::{ConnectedMask, Transition};
pub use controller::Controller;
pub use error::Error;
pub use hub::{Bluepad32, ControllerCallback, FirmwareVersion};
pub use transport::{Block, Response, Transport, MAX_BLOCK_LEN, MAX_RESPONSE_BLOCKS};

pub use bluepad32_proto::{
    Buttons, Command, ControllerData, DecodeError, Dpad, MiscButtons, ProtocolVersion,
    MAX_CONTROLLERS, PROTOCOL_VERSION, RECORD_LEN,
};
