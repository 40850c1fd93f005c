//! HC-SR04 Distance Meter firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Measures distance with an HC-SR04 and shows it on the Pimoroni PIM715
//! Display Pack 2.8" as a millimeter readout and a 0-100 cm bar gauge.
//!
//! # Wiring
//!
//! - Trigger: GPIO1
//! - Echo: GPIO2, through a 5 V to 3.3 V divider (the sensor drives 5 V)
//! - Display: PIM715 pinout, see [`display`]

#![no_std]
#![no_main]

mod clock;
mod display;

use defmt::{debug, info, warn};
use distance_meter::config::BOOT_SCREEN_MS;
use distance_meter::{PolledEcho, RangeSensor, Step, UpdateScheduler};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use crate::clock::EmbassyMicros;
use crate::display::{PanelPins, bring_up};

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"hcsr04-distance-meter"),
    embassy_rp::binary_info::rp_program_description!(c"HC-SR04 distance meter on PIM715 Display"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("HC-SR04 distance meter starting...");

    let p = embassy_rp::init(Default::default());

    let (mut display, _backlight) = bring_up(PanelPins {
        spi: p.SPI0,
        dc: p.PIN_16,
        cs: p.PIN_17,
        sck: p.PIN_18,
        mosi: p.PIN_19,
        backlight: p.PIN_20,
    });
    info!("Display initialized");

    // Sensor: trigger idles low, echo pulled down so a disconnected sensor reads as silence
    let trigger = Output::new(p.PIN_1, Level::Low);
    let echo = PolledEcho::new(Input::new(p.PIN_2, Pull::Down), EmbassyMicros);
    let mut scheduler = UpdateScheduler::new(RangeSensor::new(trigger, echo, Delay));

    if let Err(e) = scheduler.show_boot_screen(&mut display) {
        warn!("Boot screen failed: {}", defmt::Debug2Format(&e));
    }
    Timer::after_millis(BOOT_SCREEN_MS).await;

    if let Err(e) = scheduler.begin(&mut display) {
        warn!("Frame draw failed: {}", defmt::Debug2Format(&e));
    }
    info!("Starting main loop...");

    loop {
        match scheduler.step(Instant::now().as_millis(), &mut display) {
            Ok(Step::Measured(distance)) => debug!("Measured {} ({} mm)", distance, distance.mm()),
            Ok(Step::Displayed { gauge_repainted }) => debug!("Displayed, gauge repainted: {}", gauge_repainted),
            Ok(Step::Waiting | Step::Resumed) => {}
            Err(e) => warn!("Display update failed: {}", defmt::Debug2Format(&e)),
        }

        // Let the executor run between steps, outside the state machine
        Timer::after_millis(1).await;
    }
}
