//! Bluepad32 gamepad demo for RP2040.
//!
//! Talks to an ESP32 running the Bluepad32 firmware over SPI, logs
//! connects and disconnects, and plays with the outputs of the active
//! controller:
//!
//! - **A**: rotate the lightbar color
//! - **B**: count the player LEDs up
//! - **X**: rumble
//!
//! # Hardware Configuration
//!
//! | Function  | GPIO | Description |
//! |-----------|------|-------------|
//! | SPI0 RX   | 16   | MISO |
//! | CS        | 17   | Chip-select (active low) |
//! | SPI0 SCK  | 18   | Clock |
//! | SPI0 TX   | 19   | MOSI |
//! | BUSY      | 20   | Co-processor busy/ready |
//! | RESET     | 21   | Co-processor reset (active low) |
//! | GPIO0     | 22   | Co-processor boot mode, held high |
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`forget-keys`**: Drop stored Bluetooth pairings at boot

#![no_std]

use bluepad32::{Controller, Error, Transport};
use defmt::info;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicU8, Ordering};

/// Time between polls.
pub const POLL_INTERVAL_MS: u64 = 32;

/// SPI clock for the co-processor link.
pub const SPI_FREQUENCY_HZ: u32 = 8_000_000;

const NO_CONTROLLER: u8 = u8::MAX;

/// Slot of the controller the demo reacts to.
static ACTIVE: AtomicU8 = AtomicU8::new(NO_CONTROLLER);

/// Slot the demo currently follows, if any.
pub fn active_controller() -> Option<u8> {
    match ACTIVE.load(Ordering::Relaxed) {
        NO_CONTROLLER => None,
        index => Some(index),
    }
}

/// Connect callback: follow the newest controller.
pub fn on_connect<T: Transport>(controller: &mut Controller<'_, T>) {
    info!("Controller {} connected", controller.index());
    ACTIVE.store(controller.index(), Ordering::Relaxed);
}

/// Disconnect callback: stop following the controller if it was active.
pub fn on_disconnect<T: Transport>(controller: &mut Controller<'_, T>) {
    info!("Controller {} disconnected", controller.index());
    let _ = ACTIVE.compare_exchange(
        controller.index(),
        NO_CONTROLLER,
        Ordering::Relaxed,
        Ordering::Relaxed,
    );
}

/// Pulse the co-processor reset line with GPIO0 held high (normal boot).
pub fn reset_coprocessor<P: OutputPin, D: DelayNs>(
    reset: &mut P,
    gpio0: &mut P,
    delay: &mut D,
) -> Result<(), P::Error> {
    gpio0.set_high()?;
    reset.set_low()?;
    delay.delay_ms(10);
    reset.set_high()?;
    // Boot time of the co-processor firmware
    delay.delay_ms(750);
    Ok(())
}

/// Button-to-output demo state.
pub struct Demo {
    color: (u8, u8, u8),
    player_leds: u8,
    greeted: Option<u8>,
}

impl Demo {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            color: (0xFF, 0x00, 0x00),
            player_leds: 0x01,
            greeted: None,
        }
    }

    /// React to the latest state of `controller`.
    pub fn update<T: Transport>(
        &mut self,
        controller: &mut Controller<'_, T>,
    ) -> Result<(), Error<T::Error>> {
        if self.greeted != Some(controller.index()) {
            self.greeted = Some(controller.index());
            info!("{}", defmt::Display2Format(&*controller));
            controller.set_lightbar_color(self.color)?;
        }

        if controller.a() != 0 {
            let (r, g, b) = self.color;
            self.color = (b, r, g);
            controller.set_lightbar_color(self.color)?;
        }

        if controller.b() != 0 {
            controller.set_player_leds(self.player_leds)?;
            self.player_leds = self.player_leds.wrapping_add(1) & 0x0F;
        }

        if controller.x() != 0 {
            // force 0-255, duration 0-255
            controller.set_rumble(128, 10)?;
        }

        Ok(())
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
