#![no_std]
#![no_main]

use bluepad32::Bluepad32;
use bluepad32_rp2040::{
    active_controller, on_connect, on_disconnect, reset_coprocessor, Demo, POLL_INTERVAL_MS,
    SPI_FREQUENCY_HZ,
};
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::{Delay, Duration, Ticker, Timer};
use nina_spi::NinaSpi;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Bluepad32 demo starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Co-processor reset ---
    let mut reset = Output::new(p.PIN_21, Level::High);
    let mut gpio0 = Output::new(p.PIN_22, Level::High);
    let cs = Output::new(p.PIN_17, Level::High);
    if reset_coprocessor(&mut reset, &mut gpio0, &mut Delay).is_err() {
        error!("Co-processor reset failed");
    }

    // --- SPI Setup ---
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;

    let spi = Spi::new_blocking(
        p.SPI0,
        p.PIN_18, // SCK
        p.PIN_19, // MOSI
        p.PIN_16, // MISO
        spi_config,
    );
    let busy = Input::new(p.PIN_20, Pull::None);
    let link = NinaSpi::new(spi, cs, busy, Delay);

    // --- Hub Setup ---
    let mut hub = Bluepad32::new_unchecked(link);
    while let Err(e) = hub.check_protocol_version() {
        error!("Co-processor not responding: {}", e);
        Timer::after_secs(1).await;
    }

    match hub.firmware_version() {
        Ok(version) => info!("Firmware version: {}", version.as_str()),
        Err(e) => warn!("Firmware version unavailable: {}", e),
    }

    #[cfg(feature = "forget-keys")]
    match hub.forget_bluetooth_keys() {
        Ok(true) => info!("Stored Bluetooth keys deleted"),
        Ok(false) => warn!("Co-processor refused to delete Bluetooth keys"),
        Err(e) => error!("Forget keys failed: {}", e),
    }

    if let Err(e) = hub.enable_bluetooth_connections(true) {
        error!("Enable connections failed: {}", e);
    }

    hub.set_callbacks(on_connect, on_disconnect);

    info!("Bluepad32 demo initialized, waiting for controllers...");

    let mut demo = Demo::new();
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        if let Err(e) = hub.poll() {
            warn!("Poll failed: {}", e);
        }

        let controller = match active_controller() {
            Some(index) => hub.controller(index),
            None => None,
        };
        if let Some(mut controller) = controller {
            if let Err(e) = demo.update(&mut controller) {
                warn!("Output command failed: {}", e);
            }
        }

        ticker.next().await;
    }
}
