//! Bluepad32: owns the controller slots and talks to the peer.

use crate::connection::{ConnectedMask, Transition};
use crate::controller::Controller;
use crate::error::Error;
use crate::transport::{Response, Transport, MAX_BLOCK_LEN};
use bluepad32_proto::{
    Command, ControllerData, ProtocolVersion, MAX_CONTROLLERS, PROTOCOL_VERSION,
};

/// Connect/disconnect notification, called from within [`Bluepad32::poll`].
pub type ControllerCallback<T> = fn(&mut Controller<'_, T>);

/// Firmware version string, NUL padding removed.
pub type FirmwareVersion = heapless::String<MAX_BLOCK_LEN>;

/// Hub for up to [`MAX_CONTROLLERS`] controllers behind one transport.
///
/// Call [`poll`](Self::poll) periodically (every few tens of milliseconds).
/// Each poll replaces the snapshot of every reported slot and fires the
/// registered callbacks for slots that appeared or vanished since the last
/// successful poll.
///
/// Snapshots of slots missing from a poll are kept as they were; only the
/// connected mask changes.
///
/// # Example
///
/// ```ignore
/// fn on_connect<T: Transport>(c: &mut Controller<'_, T>) {
///     let _ = c.set_player_leds(1 << c.index());
/// }
/// fn on_disconnect<T: Transport>(_c: &mut Controller<'_, T>) {}
///
/// let mut hub = Bluepad32::new(transport)?;
/// hub.set_callbacks(on_connect, on_disconnect);
/// loop {
///     hub.poll()?;
/// }
/// ```
pub struct Bluepad32<T: Transport> {
    transport: T,
    slots: [ControllerData; MAX_CONTROLLERS],
    connected: ConnectedMask,
    on_connect: Option<ControllerCallback<T>>,
    on_disconnect: Option<ControllerCallback<T>>,
    protocol_version: Option<ProtocolVersion>,
}

impl<T: Transport> Bluepad32<T> {
    /// Create a hub and run the protocol version check once.
    ///
    /// An incompatible version is logged, not fatal; see
    /// [`is_protocol_compatible`](Self::is_protocol_compatible).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the version query itself fails.
    pub fn new(transport: T) -> Result<Self, Error<T::Error>> {
        let mut hub = Self::new_unchecked(transport);
        hub.check_protocol_version()?;
        Ok(hub)
    }

    /// Create a hub without talking to the peer.
    #[must_use]
    pub fn new_unchecked(transport: T) -> Self {
        Self {
            transport,
            slots: core::array::from_fn(|idx| ControllerData {
                index: idx as u8,
                ..ControllerData::default()
            }),
            connected: ConnectedMask::EMPTY,
            on_connect: None,
            on_disconnect: None,
            protocol_version: None,
        }
    }

    /// Register the connect and disconnect notifications.
    ///
    /// Until this is called, polls still track connections but fire nothing.
    pub fn set_callbacks(
        &mut self,
        on_connect: ControllerCallback<T>,
        on_disconnect: ControllerCallback<T>,
    ) {
        self.on_connect = Some(on_connect);
        self.on_disconnect = Some(on_disconnect);
    }

    /// Fetch all controller records and fire connection notifications.
    ///
    /// Records are applied in order. A record with a bad length or a slot
    /// index out of range aborts the cycle: records before it stay applied,
    /// the rest are dropped, and the connected mask is left untouched, so no
    /// notification fires for this cycle.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the exchange fails
    /// - [`Error::Decode`] for a record of the wrong size
    /// - [`Error::InvalidControllerIndex`] for an index `>= MAX_CONTROLLERS`
    pub fn poll(&mut self) -> Result<(), Error<T::Error>> {
        let response = self
            .transport
            .send_command_get_response(Command::GetControllersData, &[])
            .map_err(Error::Transport)?;

        let mut connected = ConnectedMask::EMPTY;
        for block in &response {
            let data = ControllerData::decode(block).map_err(|e| {
                warn!("Dropping poll cycle: record of {} bytes", block.len());
                Error::Decode(e)
            })?;

            let idx = usize::from(data.index);
            if idx >= MAX_CONTROLLERS {
                warn!("Dropping poll cycle: controller index {} out of range", data.index);
                return Err(Error::InvalidControllerIndex(data.index));
            }

            self.slots[idx] = data;
            connected.insert(idx);
        }

        let previous = self.connected;
        if connected == previous {
            return Ok(());
        }
        self.connected = connected;

        trace!("Connected mask {} -> {}", previous.raw(), connected.raw());
        for (idx, transition) in previous.transitions(connected) {
            let callback = match transition {
                Transition::Connected => {
                    debug!("Controller {} connected", idx);
                    self.on_connect
                }
                Transition::Disconnected => {
                    debug!("Controller {} disconnected", idx);
                    self.on_disconnect
                }
            };

            match callback {
                Some(callback) => callback(&mut Controller::new(self, idx as u8)),
                None => debug!("No callback registered for controller {}", idx),
            }
        }

        Ok(())
    }

    /// Set the player LEDs of controller `index`.
    ///
    /// Only the 4 LSB of `leds` are used by the peer, one bit per LED.
    /// Returns whether the peer accepted the request.
    pub fn set_player_leds(&mut self, index: u8, leds: u8) -> Result<bool, Error<T::Error>> {
        self.request(Command::SetPlayerLeds, &[&[index], &[leds]])
    }

    /// Set the lightbar color of controller `index`.
    ///
    /// Returns whether the peer accepted the request.
    pub fn set_lightbar_color(
        &mut self,
        index: u8,
        (r, g, b): (u8, u8, u8),
    ) -> Result<bool, Error<T::Error>> {
        self.request(Command::SetLightbarColor, &[&[index], &[r, g, b]])
    }

    /// Start rumble on controller `index`.
    ///
    /// `force`: 255 is max force, 0 nothing. `duration`: 255 is about one
    /// second. Returns whether the peer accepted the request.
    pub fn set_rumble(
        &mut self,
        index: u8,
        force: u8,
        duration: u8,
    ) -> Result<bool, Error<T::Error>> {
        self.request(Command::SetRumble, &[&[index], &[force, duration]])
    }

    /// Delete the Bluetooth keys stored on the peer.
    ///
    /// Previously paired controllers must pair again.
    pub fn forget_bluetooth_keys(&mut self) -> Result<bool, Error<T::Error>> {
        self.request(Command::ForgetBluetoothKeys, &[])
    }

    /// Allow or refuse new Bluetooth pairings.
    ///
    /// Established connections and already paired devices are not affected.
    pub fn enable_bluetooth_connections(&mut self, enabled: bool) -> Result<bool, Error<T::Error>> {
        self.request(Command::EnableBluetoothConnections, &[&[u8::from(enabled)]])
    }

    /// Query the peer's protocol version and compare the major number
    /// against [`PROTOCOL_VERSION`].
    ///
    /// Returns `Ok(false)` on a mismatch or an empty reply. The peer keeps
    /// working either way.
    pub fn check_protocol_version(&mut self) -> Result<bool, Error<T::Error>> {
        let response = self
            .transport
            .send_command_get_response(Command::GetProtocolVersion, &[])
            .map_err(Error::Transport)?;

        let Some(version) = response.first().and_then(|b| ProtocolVersion::from_bytes(b)) else {
            warn!(
                "Empty protocol version reply. Expected {}.{}",
                PROTOCOL_VERSION.major,
                PROTOCOL_VERSION.minor
            );
            self.protocol_version = None;
            return Ok(false);
        };

        self.protocol_version = Some(version);
        if !version.is_compatible_with(PROTOCOL_VERSION) {
            error!(
                "Invalid protocol version. Expected {}.{}, got: {}.{}",
                PROTOCOL_VERSION.major,
                PROTOCOL_VERSION.minor,
                version.major,
                version.minor
            );
            return Ok(false);
        }

        debug!("Protocol version {}.{}", version.major, version.minor);
        Ok(true)
    }

    /// Firmware version string reported by the transport, e.g.
    /// `"Bluepad32 for Airlift v3.9.0"`.
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Error<T::Error>> {
        let block = self.transport.firmware_version().map_err(Error::Transport)?;
        let end = block.iter().position(|&b| b == 0).unwrap_or(block.len());
        let text =
            core::str::from_utf8(&block[..end]).map_err(|_| Error::InvalidFirmwareVersion)?;

        let mut version = FirmwareVersion::new();
        version
            .push_str(text)
            .map_err(|_| Error::InvalidFirmwareVersion)?;
        Ok(version)
    }

    /// Handle for slot `index`, connected or not.
    #[must_use]
    pub fn controller(&mut self, index: u8) -> Option<Controller<'_, T>> {
        if usize::from(index) < MAX_CONTROLLERS {
            Some(Controller::new(self, index))
        } else {
            None
        }
    }

    /// Latest snapshot of slot `index`.
    #[must_use]
    pub fn state(&self, index: u8) -> Option<&ControllerData> {
        self.slots.get(usize::from(index))
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self, index: u8) -> bool {
        self.connected.contains(usize::from(index))
    }

    /// Slots occupied as of the last successful poll.
    #[inline]
    #[must_use]
    pub fn connected_mask(&self) -> ConnectedMask {
        self.connected
    }

    /// Version reported by the last [`check_protocol_version`](Self::check_protocol_version).
    #[must_use]
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.protocol_version
    }

    #[must_use]
    pub fn is_protocol_compatible(&self) -> bool {
        self.protocol_version
            .is_some_and(|v| v.is_compatible_with(PROTOCOL_VERSION))
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    pub(crate) fn snapshot(&self, index: u8) -> &ControllerData {
        &self.slots[usize::from(index)]
    }

    /// Send a command whose reply is a single success byte.
    fn request(&mut self, command: Command, params: &[&[u8]]) -> Result<bool, Error<T::Error>> {
        let response = self
            .transport
            .send_command_get_response(command, params)
            .map_err(Error::Transport)?;

        let ok = is_success(&response);
        if !ok {
            debug!("Command {} rejected by peer", command.opcode());
        }
        Ok(ok)
    }
}

/// `true` iff the first byte of the first block is 1.
fn is_success(response: &Response) -> bool {
    matches!(response.first().and_then(|b| b.first()), Some(&1))
}
