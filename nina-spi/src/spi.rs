//! Blocking SPI transport.

use crate::error::{NinaError, Stage};
use crate::frame::{encode_command, read_response, GET_FW_VERSION_CMD, MAX_FRAME_LEN};
use crate::{NinaConfig, DEFAULT_CONFIG};
use bluepad32::{Block, Command, Response, Transport};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};

/// SPI link to the co-processor.
///
/// Owns the bus exclusively; chip-select is driven by hand because a reply
/// is read byte by byte until its start byte shows up.
pub struct NinaSpi<SPI, CS, BUSY, D> {
    spi: SPI,
    cs: CS,
    busy: BUSY,
    delay: D,
    config: NinaConfig,
    frame: [u8; MAX_FRAME_LEN],
}

impl<SPI, CS, BUSY, D> NinaSpi<SPI, CS, BUSY, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    /// Create a link with [`DEFAULT_CONFIG`].
    #[must_use]
    pub fn new(spi: SPI, cs: CS, busy: BUSY, delay: D) -> Self {
        Self::with_config(spi, cs, busy, delay, DEFAULT_CONFIG)
    }

    #[must_use]
    pub fn with_config(spi: SPI, cs: CS, busy: BUSY, delay: D, config: NinaConfig) -> Self {
        Self {
            spi,
            cs,
            busy,
            delay,
            config,
            frame: [0u8; MAX_FRAME_LEN],
        }
    }

    /// Decompose the link into its parts.
    pub fn release(self) -> (SPI, CS, BUSY, D) {
        (self.spi, self.cs, self.busy, self.delay)
    }

    /// Send a raw command frame.
    pub fn send_raw(&mut self, cmd: u8, params: &[&[u8]]) -> Result<(), NinaError> {
        let len = encode_command(cmd, params, &mut self.frame)?;
        self.transaction(|link| {
            link.spi.write(&link.frame[..len]).map_err(spi_error)?;
            link.spi.flush().map_err(spi_error)
        })
    }

    /// Read the reply to a raw command.
    pub fn wait_raw(&mut self, cmd: u8) -> Result<Response, NinaError> {
        self.transaction(|link| {
            let attempts = link.config.start_byte_attempts;
            let pause_ms = link.config.start_byte_delay_ms;
            let spi = &mut link.spi;
            let delay = &mut link.delay;
            read_response(
                cmd,
                attempts,
                || {
                    let mut byte = [0u8; 1];
                    spi.read(&mut byte).map_err(spi_error)?;
                    Ok(byte[0])
                },
                || delay.delay_ms(pause_ms),
            )
        })
    }

    /// Wait for idle, select, run `f`, deselect.
    ///
    /// CS is released even when `f` fails; the first error wins.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, NinaError>,
    ) -> Result<R, NinaError> {
        self.wait_for_ready()?;
        self.cs.set_low().map_err(|_| NinaError::Pin)?;

        let result = self.wait_for_select().and_then(|()| f(self));
        let released = self.cs.set_high().map_err(|_| NinaError::Pin);

        let value = result?;
        released?;
        Ok(value)
    }

    /// Busy line low: peer idle.
    fn wait_for_ready(&mut self) -> Result<(), NinaError> {
        let mut waited = 0;
        loop {
            if !self.busy.is_high().map_err(|_| NinaError::Pin)? {
                return Ok(());
            }
            if waited >= self.config.ready_timeout_ms {
                return Err(NinaError::Timeout(Stage::Ready));
            }
            self.delay.delay_ms(self.config.ready_poll_ms);
            waited += self.config.ready_poll_ms.max(1);
        }
    }

    /// Busy line high after CS: peer acknowledged the select.
    fn wait_for_select(&mut self) -> Result<(), NinaError> {
        let mut waited = 0;
        loop {
            if self.busy.is_high().map_err(|_| NinaError::Pin)? {
                return Ok(());
            }
            if waited >= self.config.select_timeout_us {
                return Err(NinaError::Timeout(Stage::Select));
            }
            self.delay.delay_us(self.config.select_poll_us);
            waited += self.config.select_poll_us.max(1);
        }
    }
}

impl<SPI, CS, BUSY, D> Transport for NinaSpi<SPI, CS, BUSY, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    type Error = NinaError;

    fn send_command(&mut self, command: Command, params: &[&[u8]]) -> Result<(), NinaError> {
        self.send_raw(command.opcode(), params)
    }

    fn wait_response(&mut self, command: Command) -> Result<Response, NinaError> {
        self.wait_raw(command.opcode())
    }

    fn firmware_version(&mut self) -> Result<Block, NinaError> {
        self.send_raw(GET_FW_VERSION_CMD, &[])?;
        let response = self.wait_raw(GET_FW_VERSION_CMD)?;
        Ok(response.into_iter().next().unwrap_or_default())
    }
}

fn spi_error<E: embedded_hal::spi::Error>(e: E) -> NinaError {
    NinaError::Spi(e.kind())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::frame::{END_CMD, START_CMD};
    use bluepad32::{Bluepad32, Buttons, ControllerData, RECORD_LEN};
    use core::convert::Infallible;
    use std::collections::VecDeque;
    use std::vec;
    use std::vec::Vec;

    /// Records writes; reads pop from a script, then return 0x00.
    #[derive(Default)]
    struct MockSpi {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            for w in words {
                *w = self.rx.pop_front().unwrap_or(0x00);
            }
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.tx.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)?;
            self.read(read)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            self.tx.extend_from_slice(words);
            self.read(words)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCs {
        history: Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.history.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.history.push(true);
            Ok(())
        }
    }

    /// Busy line of a well-behaved peer: idle before select, high after.
    struct HandshakeBusy {
        level: bool,
    }

    impl embedded_hal::digital::ErrorType for HandshakeBusy {
        type Error = Infallible;
    }

    impl InputPin for HandshakeBusy {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let level = self.level;
            self.level = !self.level;
            Ok(level)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|h| !h)
        }
    }

    /// Busy line stuck at one level.
    struct StuckBusy(bool);

    impl embedded_hal::digital::ErrorType for StuckBusy {
        type Error = Infallible;
    }

    impl InputPin for StuckBusy {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[derive(Default)]
    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn link(rx: &[u8]) -> NinaSpi<MockSpi, MockCs, HandshakeBusy, NoopDelay> {
        let spi = MockSpi {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
        };
        NinaSpi::new(
            spi,
            MockCs::default(),
            HandshakeBusy { level: false },
            NoopDelay::default(),
        )
    }

    fn reply(cmd: u8, blocks: &[&[u8]]) -> Vec<u8> {
        let mut out = vec![START_CMD, cmd | 0x80, blocks.len() as u8];
        for b in blocks {
            out.push(b.len() as u8);
            out.extend_from_slice(b);
        }
        out.push(END_CMD);
        out
    }

    #[test]
    fn test_send_writes_padded_frame_inside_select() {
        let mut link = link(&[]);
        link.send_command(Command::SetRumble, &[&[1], &[128, 10]])
            .unwrap();

        let (spi, cs, _, _) = link.release();
        assert_eq!(
            spi.tx,
            vec![START_CMD, 0x04, 2, 1, 1, 2, 128, 10, END_CMD, 0, 0, 0]
        );
        assert_eq!(cs.history, vec![false, true]);
    }

    #[test]
    fn test_send_get_response_round_trip() {
        let mut link = link(&reply(0x05, &[&[1]]));
        let response = link
            .send_command_get_response(Command::ForgetBluetoothKeys, &[])
            .unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response[0].as_slice(), &[1]);
        let (_, cs, _, _) = link.release();
        // One select for the command, one for the reply
        assert_eq!(cs.history, vec![false, true, false, true]);
    }

    #[test]
    fn test_firmware_version() {
        let mut link = link(&reply(GET_FW_VERSION_CMD, &[b"Bluepad32 v3\0"]));
        let version = link.firmware_version().unwrap();
        assert_eq!(version.as_slice(), b"Bluepad32 v3\0");

        let (spi, _, _, _) = link.release();
        assert_eq!(&spi.tx[..4], &[START_CMD, GET_FW_VERSION_CMD, 0, END_CMD]);
    }

    #[test]
    fn test_busy_peer_times_out() {
        let mut link = NinaSpi::new(
            MockSpi::default(),
            MockCs::default(),
            StuckBusy(true),
            NoopDelay::default(),
        );
        assert_eq!(
            link.send_command(Command::GetControllersData, &[]),
            Err(NinaError::Timeout(Stage::Ready))
        );
        let (spi, cs, _, _) = link.release();
        assert!(spi.tx.is_empty());
        assert!(cs.history.is_empty());
    }

    #[test]
    fn test_select_timeout_releases_cs() {
        let mut link = NinaSpi::new(
            MockSpi::default(),
            MockCs::default(),
            StuckBusy(false),
            NoopDelay::default(),
        );
        assert_eq!(
            link.send_command(Command::GetControllersData, &[]),
            Err(NinaError::Timeout(Stage::Select))
        );
        let (spi, cs, _, _) = link.release();
        assert!(spi.tx.is_empty());
        assert_eq!(cs.history, vec![false, true]);
    }

    #[test]
    fn test_hub_over_link() {
        let pressed = ControllerData {
            index: 2,
            buttons: Buttons::B,
            ..ControllerData::default()
        };
        let mut record = [0u8; RECORD_LEN];
        pressed.encode(&mut record).unwrap();

        let mut rx = reply(0x00, &[&[1, 0]]);
        rx.extend(reply(0x09, &[&record]));

        let mut hub = Bluepad32::new(link(&rx)).unwrap();
        assert!(hub.is_protocol_compatible());

        hub.poll().unwrap();
        assert!(hub.is_connected(2));
        let controller = hub.controller(2).unwrap();
        assert_eq!(controller.b(), Buttons::B.raw());
    }
}
