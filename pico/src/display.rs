//! PIM715 Display Pack 2.8" bring-up (ST7789 over TX-only SPI0).
//!
//! | Signal    | GPIO | Notes                      |
//! |-----------|------|----------------------------|
//! | DC        | 16   |                            |
//! | CS        | 17   | idles high                 |
//! | SCK       | 18   | SPI0                       |
//! | MOSI      | 19   | SPI0                       |
//! | Backlight | 20   | held on for the whole run  |
//!
//! Reset is wired to RUN, so the panel restarts with the board. The meter is
//! laid out in the panel's native portrait orientation.

use display_interface_spi::SPIInterface;
use embassy_rp::Peri;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIN_16, PIN_17, PIN_18, PIN_19, PIN_20, SPI0};
use embassy_rp::spi::{Blocking, Config, Spi};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::{Builder, NoResetPin};

use distance_meter::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

type PanelBus<'d> = SPIInterface<ExclusiveDevice<Spi<'d, SPI0, Blocking>, Output<'d>, NoDelay>, Output<'d>>;

/// The initialised panel.
pub type Panel<'d> = mipidsi::Display<PanelBus<'d>, ST7789, NoResetPin>;

/// Pins and bus the panel occupies.
pub struct PanelPins<'d> {
    pub spi: Peri<'d, SPI0>,
    pub dc: Peri<'d, PIN_16>,
    pub cs: Peri<'d, PIN_17>,
    pub sck: Peri<'d, PIN_18>,
    pub mosi: Peri<'d, PIN_19>,
    pub backlight: Peri<'d, PIN_20>,
}

/// Switch the backlight on and initialise the panel.
///
/// Returns the backlight pin alongside the panel; dropping it turns the
/// backlight off.
pub fn bring_up(pins: PanelPins<'_>) -> (Panel<'_>, Output<'_>) {
    let backlight = Output::new(pins.backlight, Level::High);

    let mut config = Config::default();
    // ST7789 write clock tops out at 62.5 MHz
    config.frequency = 40_000_000;
    let spi = Spi::new_blocking_txonly(pins.spi, pins.sck, pins.mosi, config);

    let cs = Output::new(pins.cs, Level::High);
    let dc = Output::new(pins.dc, Level::Low);
    let device = ExclusiveDevice::new_no_delay(spi, cs).expect("panel chip select");

    let panel = Builder::new(ST7789, SPIInterface::new(device, dc))
        .display_size(SCREEN_WIDTH as u16, SCREEN_HEIGHT as u16)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut embassy_time::Delay)
        .expect("ST7789 init");

    (panel, backlight)
}
