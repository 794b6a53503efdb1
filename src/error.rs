//! Error type for hub operations.

use bluepad32_proto::{DecodeError, MAX_CONTROLLERS};

/// Error type for hub operations, generic over the transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Error from the transport.
    Transport(E),
    /// A poll response carried a slot index outside `0..MAX_CONTROLLERS`.
    InvalidControllerIndex(u8),
    /// A poll response carried a malformed record.
    Decode(DecodeError),
    /// The firmware version string was not valid UTF-8.
    InvalidFirmwareVersion,
}

impl<E> From<DecodeError> for Error<E> {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::InvalidControllerIndex(idx) => write!(
                f,
                "controller index {idx} out of range (max {})",
                MAX_CONTROLLERS - 1
            ),
            Self::Decode(e) => write!(f, "malformed controller record: {e}"),
            Self::InvalidFirmwareVersion => write!(f, "firmware version is not valid UTF-8"),
        }
    }
}
