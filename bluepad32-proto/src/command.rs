//! Command opcodes and protocol version.
//!
//! NINA firmware commands stop at 0x50; the Bluepad32 extension reuses the
//! low opcode range for its own commands.

/// Maximum number of controllers the peer reports at once.
pub const MAX_CONTROLLERS: usize = 4;

/// Protocol version this crate speaks.
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::new(1, 0);

/// Commands understood by the Bluepad32 peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Response: 2 bytes, major and minor.
    GetProtocolVersion = 0x00,
    /// Legacy gamepad-only variant of [`Command::GetControllersData`].
    GetGamepadsData = 0x01,
    /// Params: `[slot]`, `[leds]`.
    SetPlayerLeds = 0x02,
    /// Params: `[slot]`, `[r, g, b]`.
    SetLightbarColor = 0x03,
    /// Params: `[slot]`, `[force, duration]`.
    SetRumble = 0x04,
    ForgetBluetoothKeys = 0x05,
    /// Params: `[enabled]`.
    EnableBluetoothConnections = 0x07,
    /// Response: one record per connected controller.
    GetControllersData = 0x09,
}

impl Command {
    /// Raw opcode sent on the wire.
    #[inline]
    #[must_use]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Look up a command by its opcode.
    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            0x00 => Some(Self::GetProtocolVersion),
            0x01 => Some(Self::GetGamepadsData),
            0x02 => Some(Self::SetPlayerLeds),
            0x03 => Some(Self::SetLightbarColor),
            0x04 => Some(Self::SetRumble),
            0x05 => Some(Self::ForgetBluetoothKeys),
            0x07 => Some(Self::EnableBluetoothConnections),
            0x09 => Some(Self::GetControllersData),
            _ => None,
        }
    }
}

/// Protocol version reported by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Build from the two-byte version response.
    ///
    /// Returns `None` if the response is shorter than one byte. A missing
    /// minor byte reads as 0.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let major = *bytes.first()?;
        let minor = bytes.get(1).copied().unwrap_or(0);
        Some(Self { major, minor })
    }

    /// Only the major version decides compatibility.
    #[inline]
    #[must_use]
    pub const fn is_compatible_with(self, other: ProtocolVersion) -> bool {
        self.major == other.major
    }
}

impl core::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
