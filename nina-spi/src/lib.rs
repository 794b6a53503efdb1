//! NINA-style SPI link to a Bluepad32 co-processor.
//!
//! This crate implements [`bluepad32::Transport`] on top of the `embedded-hal`
//! 1.0 blocking traits, so it works with any chip HAL that provides an
//! [`SpiBus`](embedded_hal::spi::SpiBus), a chip-select
//! [`OutputPin`](embedded_hal::digital::OutputPin), a busy/ready
//! [`InputPin`](embedded_hal::digital::InputPin) and a
//! [`DelayNs`](embedded_hal::delay::DelayNs).
//!
//! # Framing
//!
//! Command (zero-padded to a multiple of 4 bytes):
//!
//! ```text
//! 0xE0 <cmd> <nparams> { <len> <bytes..> } 0xEE
//! ```
//!
//! Reply:
//!
//! ```text
//! 0xE0 <cmd | 0x80> <nblocks> { <len> <bytes..> } 0xEE
//! ```
//!
//! A `0xEF` in place of the start byte means the peer rejected the command.
//!
//! # Handshake
//!
//! Before each transfer the busy line must be low (peer idle). After
//! asserting CS the peer raises it to acknowledge the select.
//!
//! # Example
//!
//! ```ignore
//! use nina_spi::NinaSpi;
//! use bluepad32::Bluepad32;
//!
//! let transport = NinaSpi::new(spi, cs, busy, delay);
//! let mut hub = Bluepad32::new(transport)?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod frame;
pub mod spi;

pub use error::{NinaError, Stage};
pub use frame::{
    encode_command, read_response, END_CMD, ERR_CMD, GET_FW_VERSION_CMD, MAX_FRAME_LEN, REPLY_FLAG,
    START_CMD,
};
pub use spi::NinaSpi;

/// Timing configuration for the link.
///
/// Customize this at compile-time by creating your own const.
#[derive(Debug, Clone, Copy)]
pub struct NinaConfig {
    /// How long to wait for the peer to go idle before a transfer.
    pub ready_timeout_ms: u32,
    /// Pause between idle checks.
    pub ready_poll_ms: u32,
    /// How long to wait for the peer to acknowledge chip-select.
    pub select_timeout_us: u32,
    /// Pause between select-acknowledge checks.
    pub select_poll_us: u32,
    /// Reads spent looking for the reply start byte.
    pub start_byte_attempts: u8,
    /// Pause between start byte reads.
    pub start_byte_delay_ms: u32,
}

/// Timeouts matching the reference ESP32 co-processor driver.
pub const DEFAULT_CONFIG: NinaConfig = NinaConfig {
    ready_timeout_ms: 10_000,
    ready_poll_ms: 1,
    select_timeout_us: 1_000_000,
    select_poll_us: 10,
    start_byte_attempts: 10,
    start_byte_delay_ms: 10,
};

impl Default for NinaConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
