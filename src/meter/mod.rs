//! Meter screen: static frame, millimeter readout and the bar gauge.
//!
//! # Rendering Model
//!
//! The frame (title, borders, ticks) is drawn once by
//! [`MeterRenderer::draw_frame`]. After that each reading touches two regions:
//!
//! - **Readout**: always cleared and reprinted as `"{mm} mm"`
//! - **Gauge interior**: recomposed in an off-screen [`FillBuffer`] and blitted
//!   in one write, but only when the reading moved more than
//!   [`GAUGE_HYSTERESIS_CM`] from what the gauge currently shows
//!
//! The gauge covers 0-100 cm. Readings past the top show a full bar while the
//! readout keeps the real value. Row colors depend only on the row's height in
//! the gauge (red at the bottom, green at the top), so a taller bar adds rows
//! without recoloring the ones below.

pub mod buffer;
pub mod frame;

use core::fmt::Write;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::Text,
};
use heapless::String;

pub use self::buffer::FillBuffer;
pub use self::frame::{BOOT_MESSAGE, draw_boot_screen};
use crate::colors::{BLACK, color_for};
use crate::config::{
    GAUGE_HYSTERESIS_CM,
    GAUGE_INNER_HEIGHT,
    GAUGE_INNER_WIDTH,
    GAUGE_MAX_CM,
    GAUGE_MIN_CM,
    GAUGE_X,
    GAUGE_Y,
    READOUT_HEIGHT,
    READOUT_WIDTH,
    READOUT_X,
    READOUT_Y,
};
use crate::sensor::Distance;
use crate::styles::{READOUT_STYLE, TOP_LEFT};

/// Buffer sized to the gauge interior.
pub type GaugeBuffer = FillBuffer<GAUGE_INNER_WIDTH, GAUGE_INNER_HEIGHT>;

/// Screen position of the gauge interior (1px inside the inner border).
const GAUGE_ORIGIN: Point = Point::new(GAUGE_X + 1, GAUGE_Y + 1);

/// Region cleared before every readout repaint.
pub const READOUT_AREA: Rectangle = Rectangle::new(
    Point::new(READOUT_X, READOUT_Y),
    Size::new(READOUT_WIDTH, READOUT_HEIGHT),
);

/// Clamp a reading into the gauge domain, in centimeters.
#[inline]
pub fn gauge_cm(sample: Distance) -> f32 { sample.cm().clamp(GAUGE_MIN_CM as f32, GAUGE_MAX_CM as f32) }

/// Number of interior rows lit for a gauge value (already clamped).
pub fn fill_height(cm: f32) -> usize {
    let span = (GAUGE_MAX_CM - GAUGE_MIN_CM) as f32;
    let rows = (cm - GAUGE_MIN_CM as f32) / span * GAUGE_INNER_HEIGHT as f32;
    (rows.max(0.0) as usize).min(GAUGE_INNER_HEIGHT)
}

/// Readout text for a reading: millimeters rounded half up, no decimals.
pub fn readout_text(sample: Distance) -> String<16> {
    // Samples are never negative, so truncating after +0.5 rounds half up
    let mm = (sample.mm() + 0.5) as u32;
    let mut text = String::new();
    write!(text, "{mm} mm").ok();
    text
}

/// Draws the meter and tracks what the gauge currently shows.
pub struct MeterRenderer {
    buffer: GaugeBuffer,
    /// Gauge value on screen, `None` until the first fill after a frame reset.
    displayed_cm: Option<f32>,
}

impl MeterRenderer {
    pub const fn new() -> Self {
        Self {
            buffer: FillBuffer::new(),
            displayed_cm: None,
        }
    }

    /// Clear the screen and show the boot message. The gauge is gone
    /// afterwards, so the next reading repaints it.
    pub fn draw_boot_screen<D>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.displayed_cm = None;
        draw_boot_screen(display)
    }

    /// Clear the screen and draw the static meter with an empty gauge.
    pub fn draw_frame<D>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.displayed_cm = None;

        display.clear(BLACK)?;
        frame::draw_title(display)?;
        frame::draw_gauge_borders(display)?;
        frame::draw_ticks(display)?;

        self.buffer.fill(BLACK);
        self.buffer.blit(display, GAUGE_ORIGIN)
    }

    /// Show a new reading.
    ///
    /// The readout is always redrawn. Returns `Ok(true)` if the gauge was
    /// repainted as well.
    pub fn update_reading<D>(
        &mut self,
        display: &mut D,
        sample: Distance,
    ) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.draw_readout(display, sample)?;

        let cm = gauge_cm(sample);
        if !self.needs_repaint(cm) {
            return Ok(false);
        }

        self.compose_fill(cm);
        self.buffer.blit(display, GAUGE_ORIGIN)?;
        self.displayed_cm = Some(cm);
        Ok(true)
    }

    /// Whether a gauge value (already clamped) differs enough from the one on
    /// screen to repaint.
    pub fn needs_repaint(
        &self,
        cm: f32,
    ) -> bool {
        match self.displayed_cm {
            None => true,
            Some(shown) => {
                let delta = cm - shown;
                delta > GAUGE_HYSTERESIS_CM || delta < -GAUGE_HYSTERESIS_CM
            }
        }
    }

    /// Gauge value currently on screen.
    #[inline]
    pub const fn displayed_cm(&self) -> Option<f32> { self.displayed_cm }

    /// The composed gauge interior.
    #[inline]
    pub const fn buffer(&self) -> &GaugeBuffer { &self.buffer }

    fn draw_readout<D>(
        &self,
        display: &mut D,
        sample: Distance,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        display.fill_solid(&READOUT_AREA, BLACK)?;
        let text = readout_text(sample);
        Text::with_text_style(&text, READOUT_AREA.top_left, READOUT_STYLE, TOP_LEFT).draw(display)?;
        Ok(())
    }

    /// Repaint the buffer bottom-up with `fill_height(cm)` rows.
    fn compose_fill(
        &mut self,
        cm: f32,
    ) {
        self.buffer.fill(BLACK);
        for y in 0..fill_height(cm) {
            let color = color_for(y as f32 / GAUGE_INNER_HEIGHT as f32);
            self.buffer.paint_row(GAUGE_INNER_HEIGHT - 1 - y, color);
        }
    }
}

impl Default for MeterRenderer {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
