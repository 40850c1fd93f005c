//! Off-screen pixel buffer for the gauge interior.
//!
//! The gauge fill is composed here first and then pushed to the panel in one
//! `fill_contiguous` call. On the ST7789 that is a single address-window write,
//! so the bar never shows a half-painted state.

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

use crate::colors::BLACK;

/// Fixed-size RGB565 pixel grid, `W` columns by `H` rows.
///
/// Implements [`DrawTarget`], so anything from `embedded-graphics` can be
/// drawn into it. Pixels outside the grid are discarded.
pub struct FillBuffer<const W: usize, const H: usize> {
    rows: [[Rgb565; W]; H],
}

impl<const W: usize, const H: usize> FillBuffer<W, H> {
    /// Create a buffer filled with black.
    pub const fn new() -> Self { Self { rows: [[BLACK; W]; H] } }

    /// Set every pixel to `color`.
    pub fn fill(
        &mut self,
        color: Rgb565,
    ) {
        for row in &mut self.rows {
            row.fill(color);
        }
    }

    /// Paint row `y` (0 = top) edge to edge.
    pub fn paint_row(
        &mut self,
        y: usize,
        color: Rgb565,
    ) {
        let y = y as i32;
        Line::new(Point::new(0, y), Point::new(W as i32 - 1, y))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(
        &self,
        x: usize,
        y: usize,
    ) -> Option<Rgb565> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Copy the whole buffer to `target` with its top-left corner at `top_left`.
    pub fn blit<D>(
        &self,
        target: &mut D,
        top_left: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = Rectangle::new(top_left, self.size());
        target.fill_contiguous(&area, self.rows.iter().flatten().copied())
    }
}

impl<const W: usize, const H: usize> Default for FillBuffer<W, H> {
    fn default() -> Self { Self::new() }
}

impl<const W: usize, const H: usize> OriginDimensions for FillBuffer<W, H> {
    fn size(&self) -> Size { Size::new(W as u32, H as u32) }
}

impl<const W: usize, const H: usize> DrawTarget for FillBuffer<W, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if let Some(pixel) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *pixel = color;
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
