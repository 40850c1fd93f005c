//! Static screen elements: boot message, title block, gauge borders and ticks.
//!
//! # Visual Layout
//!
//! ```text
//! ----------------------------
//!  HC-SR04 Distance Sensor
//! ----------------------------
//! Distance: 500 mm
//!
//!     ┏━━━━━┓─  100cm
//!     ┃     ┃─  90
//!     ┃     ┃   ...
//!     ┃▓▓▓▓▓┃─  10
//!     ┗━━━━━┛─  0cm
//! ```
//!
//! Everything here is drawn once per frame reset. Only the readout and the
//! gauge interior change afterwards.

use core::fmt::Write;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use heapless::String;

use crate::colors::{BLACK, DARK_GRAY};
use crate::config::{
    GAUGE_HEIGHT,
    GAUGE_MAX_CM,
    GAUGE_MIN_CM,
    GAUGE_WIDTH,
    GAUGE_X,
    GAUGE_Y,
    LINE_HEIGHT,
    TICK_LABEL_GAP,
    TICK_LENGTH,
    TICK_STEP_CM,
};
use crate::styles::{MIDDLE_LEFT, TICK_LABEL_STYLE, TITLE_STYLE, TOP_LEFT};

/// Horizontal rule framing the title.
const RULE: &str = "----------------------------";

/// Title block, one entry per line from the top of the screen.
const TITLE_LINES: [&str; 4] = [RULE, " HC-SR04 Distance Sensor", RULE, "Distance:"];

/// Message shown while the firmware brings up the sensor.
pub const BOOT_MESSAGE: &str = "Initialising...";

const BORDER_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(DARK_GRAY, 1);

/// Clear the screen and show the boot message.
pub fn draw_boot_screen<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK)?;
    Text::with_text_style(BOOT_MESSAGE, Point::zero(), TITLE_STYLE, TOP_LEFT).draw(display)?;
    Ok(())
}

/// Draw the title block, one line per row.
pub fn draw_title<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    for (line, text) in TITLE_LINES.iter().enumerate() {
        Text::with_text_style(text, Point::new(0, line as i32 * LINE_HEIGHT), TITLE_STYLE, TOP_LEFT).draw(display)?;
    }
    Ok(())
}

/// Draw the two gauge borders: the inner one at the gauge rectangle and a
/// second one a pixel outside it.
pub fn draw_gauge_borders<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(GAUGE_X, GAUGE_Y), Size::new(GAUGE_WIDTH, GAUGE_HEIGHT))
        .into_styled(BORDER_STYLE)
        .draw(display)?;
    Rectangle::new(Point::new(GAUGE_X - 1, GAUGE_Y - 1), Size::new(GAUGE_WIDTH + 2, GAUGE_HEIGHT + 2))
        .into_styled(BORDER_STYLE)
        .draw(display)?;
    Ok(())
}

/// Screen row of the tick for `cm`: the gauge bottom edge for the minimum,
/// the gauge top edge for the maximum.
pub const fn tick_y(cm: u32) -> i32 {
    let span = (GAUGE_MAX_CM - GAUGE_MIN_CM) as i32;
    GAUGE_Y + GAUGE_HEIGHT as i32 - (cm - GAUGE_MIN_CM) as i32 * GAUGE_HEIGHT as i32 / span
}

/// Label text for a tick. Only the two ends carry the unit.
pub fn tick_label(cm: u32) -> String<8> {
    let mut label = String::new();
    if cm == GAUGE_MIN_CM || cm == GAUGE_MAX_CM {
        write!(label, "{cm}cm").ok();
    } else {
        write!(label, "{cm}").ok();
    }
    label
}

/// Draw a tick mark and label every [`TICK_STEP_CM`] along the right side of the gauge.
pub fn draw_ticks<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let tick_x = GAUGE_X + GAUGE_WIDTH as i32;

    for cm in (GAUGE_MIN_CM..=GAUGE_MAX_CM).step_by(TICK_STEP_CM as usize) {
        let y = tick_y(cm);
        Line::new(Point::new(tick_x, y), Point::new(tick_x + TICK_LENGTH as i32 - 1, y))
            .into_styled(BORDER_STYLE)
            .draw(display)?;

        let label = tick_label(cm);
        Text::with_text_style(&label, Point::new(tick_x + TICK_LABEL_GAP, y), TICK_LABEL_STYLE, MIDDLE_LEFT)
            .draw(display)?;
    }
    Ok(())
}
