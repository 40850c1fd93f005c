//! Event log page.
//!
//! # Visual Layout
//!
//! ```text
//! EVENT LOG
//! ─────────────────────────────────────
//! >  12.3 Measured 49.9 cm
//! >  12.3 Displayed, gauge redrawn
//!     ...
//! ─────────────────────────────────────
//! SWEEP  target 123 cm  echo ok
//! pings 48
//! ```

use core::fmt::Write;

use distance_meter::event_log::{LOG_LINE_LENGTH, LogEntry};
use distance_meter::EventLog;
use distance_meter::colors::{BLACK, DARK_GRAY, GREEN, WHITE};
use distance_meter::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use distance_meter::styles::TITLE_STYLE;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

const TITLE_Y: i32 = 14;
const HEADER_DIVIDER_Y: i32 = 20;
const LOG_Y: i32 = 34;
const LOG_LINE_HEIGHT: i32 = 12;
const FOOTER_DIVIDER_Y: i32 = SCREEN_HEIGHT as i32 - 36;
const FOOTER_Y: i32 = SCREEN_HEIGHT as i32 - 22;
const MARGIN_X: i32 = 4;
const ENTRY_X: i32 = MARGIN_X + 8;

/// `"sss.d "` timestamp prefix: seconds wrap at 1000, one decimal.
const STAMP_LENGTH: usize = 6;
const ENTRY_LENGTH: usize = STAMP_LENGTH + LOG_LINE_LENGTH;

const PROMPT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, GREEN);
const TEXT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);
const DIVIDER_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(DARK_GRAY, 1);

/// What the footer reports about the simulated sensor.
pub struct SensorStatus {
    pub sweeping: bool,
    pub target_cm: f32,
    pub dropout: bool,
    pub pings: u32,
}

/// Redraw the whole log page.
pub fn draw_log_page<D>(
    display: &mut D,
    log: &EventLog,
    status: &SensorStatus,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BLACK).ok();

    Text::new("EVENT LOG", Point::new(MARGIN_X, TITLE_Y), TITLE_STYLE).draw(display).ok();
    draw_divider(display, HEADER_DIVIDER_Y);

    let mut y = LOG_Y;
    for entry in log.iter() {
        Text::new(">", Point::new(MARGIN_X, y), PROMPT_STYLE).draw(display).ok();

        let line = format_entry(entry);
        Text::new(&line, Point::new(ENTRY_X, y), TEXT_STYLE).draw(display).ok();

        y += LOG_LINE_HEIGHT;
    }

    draw_divider(display, FOOTER_DIVIDER_Y);
    draw_footer(display, status);
}

/// One log line: short timestamp then the entry text.
fn format_entry(entry: &LogEntry) -> String<ENTRY_LENGTH> {
    let mut line = String::new();
    let _ = write!(line, "{:>3}.{} {}", entry.at_ms / 1000 % 1000, entry.at_ms % 1000 / 100, entry.text());
    line
}

fn draw_footer<D>(
    display: &mut D,
    status: &SensorStatus,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mode = if status.sweeping { "SWEEP" } else { "MANUAL" };
    let echo = if status.dropout { "dropout" } else { "ok" };

    let mut line: String<40> = String::new();
    let _ = write!(line, "{mode}  target {:.0} cm  echo {echo}", status.target_cm);
    Text::new(&line, Point::new(MARGIN_X, FOOTER_Y), TEXT_STYLE).draw(display).ok();

    let mut pings: String<24> = String::new();
    let _ = write!(pings, "pings {}", status.pings);
    Text::new(&pings, Point::new(MARGIN_X, FOOTER_Y + LOG_LINE_HEIGHT), TEXT_STYLE)
        .draw(display)
        .ok();
}

fn draw_divider<D>(
    display: &mut D,
    y: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(Point::new(2, y), Point::new(SCREEN_WIDTH as i32 - 3, y))
        .into_styled(DIVIDER_STYLE)
        .draw(display)
        .ok();
}
