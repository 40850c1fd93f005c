//! Pre-computed text styles for the meter screen.
//!
//! `MonoTextStyle` and `TextStyle` are `const` constructible in embedded-graphics
//! 0.8, so every style the meter uses is built at compile time and shared.
//! All text is drawn with a top baseline so positions in [`config`](crate::config)
//! are the top-left corners of text boxes.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_7X13},
    },
    pixelcolor::Rgb565,
    text::{Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

use crate::colors::WHITE;

// =============================================================================
// Text Layout Styles
// =============================================================================

/// Top-left anchored text. Used for the title block and the readout.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new().baseline(Baseline::Top).build();

/// Left-aligned text centered vertically on its position. Used for tick labels
/// so each label lines up with its tick mark.
pub const MIDDLE_LEFT: TextStyle = TextStyleBuilder::new().baseline(Baseline::Middle).build();

// =============================================================================
// Character Styles
// =============================================================================

/// Title block and "Distance:" label (7x13 pixels).
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_7X13, WHITE);

/// Millimeter readout (`ProFont` 12pt).
pub const READOUT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, WHITE);

/// Tick labels next to the gauge (6x10 pixels).
pub const TICK_LABEL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);
