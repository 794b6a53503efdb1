//! Link error types.

use embedded_hal::spi::ErrorKind;

/// Point in a transaction where a timeout hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Peer stayed busy.
    Ready,
    /// Peer did not acknowledge chip-select.
    Select,
    /// No reply start byte.
    StartByte,
}

/// Error type for link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NinaError {
    /// SPI bus error.
    Spi(ErrorKind),
    /// Chip-select or busy pin error.
    Pin,
    /// Peer did not respond in time.
    Timeout(Stage),
    /// Peer answered with an error frame.
    ErrorReply,
    /// Framing byte mismatch.
    UnexpectedByte { expected: u8, got: u8 },
    /// Reply has more blocks than a response can hold.
    TooManyBlocks(u8),
    /// Reply block longer than a response block can hold.
    BlockTooLong(u8),
    /// Command does not fit into one frame.
    FrameTooLong,
}

impl core::fmt::Display for NinaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(kind) => write!(f, "SPI error: {kind}"),
            Self::Pin => write!(f, "pin error"),
            Self::Timeout(stage) => write!(f, "timed out waiting for {stage:?}"),
            Self::ErrorReply => write!(f, "error response to command"),
            Self::UnexpectedByte { expected, got } => {
                write!(f, "expected 0x{expected:02x}, got 0x{got:02x}")
            }
            Self::TooManyBlocks(n) => write!(f, "reply has too many blocks ({n})"),
            Self::BlockTooLong(len) => write!(f, "reply block too long ({len} bytes)"),
            Self::FrameTooLong => write!(f, "command frame too long"),
        }
    }
}
