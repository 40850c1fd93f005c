//! Color constants and the red-to-green gauge ramp.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)
//!
//! This format is native to the ST7789 and requires no conversion when writing
//! to the panel.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Palette
// =============================================================================

/// Pure black (0, 0, 0). Background and empty gauge.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Title, readout and tick labels.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Bottom of the gauge ramp.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green (0, 63, 0). Top of the gauge ramp.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Dark gray for the gauge borders and tick marks.
/// RGB565: (15, 31, 15) - roughly 50% brightness.
pub const DARK_GRAY: Rgb565 = Rgb565::new(15, 31, 15);

// =============================================================================
// Gauge Ramp
// =============================================================================

/// Map a gauge fraction to a color on the red (0.0) to green (1.0) ramp.
///
/// Out-of-range input is clamped and NaN reads as 0.0. Blue is always zero.
/// Each channel is rounded to the nearest step of its own bit width, so the
/// ramp hits pure red and pure green exactly at the ends.
pub fn color_for(fraction: f32) -> Rgb565 {
    let t = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    Rgb565::new(quantize(1.0 - t, Rgb565::MAX_R), quantize(t, Rgb565::MAX_G), 0)
}

/// Round a 0.0-1.0 intensity into `0..=max`.
#[inline]
fn quantize(
    intensity: f32,
    max: u8,
) -> u8 {
    // Intensity is non-negative, so truncating after +0.5 rounds to nearest
    (intensity * f32::from(max) + 0.5) as u8
}

// =============================================================================
// Tests
// =============================================================================
