//! Transport trait: the command/response link to the co-processor.

use bluepad32_proto::{Command, MAX_CONTROLLERS, RECORD_LEN};

/// Largest single response block a transport must be able to hold.
///
/// Fits one controller-data record or the firmware version string.
pub const MAX_BLOCK_LEN: usize = 64;

/// Largest number of blocks in one response.
pub const MAX_RESPONSE_BLOCKS: usize = MAX_CONTROLLERS;

/// One length-prefixed block of a response.
pub type Block = heapless::Vec<u8, MAX_BLOCK_LEN>;

/// All blocks of one response, in wire order.
pub type Response = heapless::Vec<Block, MAX_RESPONSE_BLOCKS>;

const _: () = assert!(RECORD_LEN <= MAX_BLOCK_LEN);

/// Blocking command/response link to a Bluepad32 peer.
///
/// Implementations own framing, chip-select sequencing and ready-line
/// handshakes. Every call blocks until the exchange finished or failed;
/// timeouts are the implementation's business and surface as
/// [`Transport::Error`].
///
/// Parameters are sent as a list of blocks, each framed with its own length.
pub trait Transport {
    /// Link-level error.
    type Error: core::fmt::Debug;

    /// Send `command` with the given parameter blocks, without reading a reply.
    fn send_command(&mut self, command: Command, params: &[&[u8]]) -> Result<(), Self::Error>;

    /// Read the reply to a previously sent `command`.
    fn wait_response(&mut self, command: Command) -> Result<Response, Self::Error>;

    /// Send `command` and read its reply.
    fn send_command_get_response(
        &mut self,
        command: Command,
        params: &[&[u8]],
    ) -> Result<Response, Self::Error> {
        self.send_command(command, params)?;
        self.wait_response(command)
    }

    /// Raw firmware version string as reported by the peer's link layer.
    fn firmware_version(&mut self) -> Result<Block, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, command: Command, params: &[&[u8]]) -> Result<(), Self::Error> {
        T::send_command(self, command, params)
    }

    fn wait_response(&mut self, command: Command) -> Result<Response, Self::Error> {
        T::wait_response(self, command)
    }

    fn send_command_get_response(
        &mut self,
        command: Command,
        params: &[&[u8]],
    ) -> Result<Response, Self::Error> {
        T::send_command_get_response(self, command, params)
    }

    fn firmware_version(&mut self) -> Result<Block, Self::Error> {
        T::firmware_version(self)
    }
}
