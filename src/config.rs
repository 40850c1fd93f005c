//! Compile-time configuration for the distance meter.
//!
//! Everything the meter can be tuned with lives here: display geometry, the
//! gauge domain, HC-SR04 timing and range bounds, and the refresh cadence.
//! Pin numbers are board specific and live with the firmware that owns the pins.
//!
//! # Compile-Time Validation
//!
//! Each group ends with `const` assertions. A layout that does not fit on the
//! screen, an inverted range or an echo timeout shorter than the round trip at
//! maximum range fails the build instead of misbehaving at runtime.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7789 240x320 panel in portrait orientation).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

/// Height of one line of the title block in pixels.
pub const LINE_HEIGHT: i32 = 16;

// =============================================================================
// Numeric Readout
// =============================================================================

/// Top-left corner of the millimeter readout (right of the "Distance:" label).
pub const READOUT_X: i32 = 72;
pub const READOUT_Y: i32 = 3 * LINE_HEIGHT;

/// Region cleared before each readout repaint. Fits "4000 mm" with margin.
pub const READOUT_WIDTH: u32 = 96;
pub const READOUT_HEIGHT: u32 = LINE_HEIGHT as u32;

const _: () = assert!(READOUT_X as u32 + READOUT_WIDTH <= SCREEN_WIDTH);

// =============================================================================
// Gauge Geometry
// =============================================================================

/// Top-left corner of the inner gauge border.
pub const GAUGE_X: i32 = 50;
pub const GAUGE_Y: i32 = 75;

/// Size of the inner gauge border. A second border is drawn 1px outside it.
pub const GAUGE_WIDTH: u32 = 40;
pub const GAUGE_HEIGHT: u32 = 220;

/// Fillable interior (1px inset from the inner border on every side).
pub const GAUGE_INNER_WIDTH: usize = (GAUGE_WIDTH - 2) as usize;
pub const GAUGE_INNER_HEIGHT: usize = (GAUGE_HEIGHT - 2) as usize;

/// Tick mark length to the right of the gauge.
pub const TICK_LENGTH: u32 = 10;

/// Horizontal gap between the gauge and the tick labels.
pub const TICK_LABEL_GAP: i32 = 15;

/// Widest tick label ("100cm") in pixels with the 6px label font.
const TICK_LABEL_MAX_WIDTH: i32 = 5 * 6;

// Outer border must stay on screen, title block must end above it
const _: () = assert!(GAUGE_X >= 1 && GAUGE_Y >= 1);
const _: () = assert!(GAUGE_Y > READOUT_Y + LINE_HEIGHT);
const _: () = assert!(GAUGE_Y as u32 + GAUGE_HEIGHT < SCREEN_HEIGHT);
const _: () = assert!(GAUGE_X + GAUGE_WIDTH as i32 + TICK_LABEL_GAP + TICK_LABEL_MAX_WIDTH <= SCREEN_WIDTH as i32);
const _: () = assert!(GAUGE_INNER_WIDTH > 0 && GAUGE_INNER_HEIGHT > 0);

// =============================================================================
// Gauge Domain
// =============================================================================

/// Lowest distance shown on the gauge (empty bar), in centimeters.
pub const GAUGE_MIN_CM: u32 = 0;

/// Highest distance shown on the gauge (full bar), in centimeters.
/// Readings beyond it show a full bar while the readout keeps the real value.
pub const GAUGE_MAX_CM: u32 = 100;

/// Spacing of tick marks along the gauge, in centimeters.
pub const TICK_STEP_CM: u32 = 10;

/// Minimum change (cm) before the gauge fill is repainted. A change of exactly
/// this much does not repaint.
pub const GAUGE_HYSTERESIS_CM: f32 = 1.0;

const _: () = assert!(GAUGE_MIN_CM < GAUGE_MAX_CM);
const _: () = assert!((GAUGE_MAX_CM - GAUGE_MIN_CM) % TICK_STEP_CM == 0);
const _: () = assert!(GAUGE_HYSTERESIS_CM >= 0.0);

// =============================================================================
// HC-SR04 Sensor
// =============================================================================

/// Readings below this are unreliable and reported as zero, in centimeters.
pub const SENSOR_MIN_CM: f32 = 2.0;

/// Readings above this clamp to it, in centimeters.
pub const SENSOR_MAX_CM: f32 = 400.0;

/// Speed of sound (343 m/s) in centimeters per microsecond.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

/// Low settle time before the trigger pulse, in microseconds.
pub const TRIGGER_SETTLE_US: u32 = 2;

/// Width of the trigger pulse, in microseconds.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Longest wait for an echo before giving up, in microseconds.
pub const ECHO_TIMEOUT_US: u32 = 30_000;

const _: () = assert!(SENSOR_MIN_CM < SENSOR_MAX_CM);
const _: () = assert!(GAUGE_MAX_CM as f32 <= SENSOR_MAX_CM);
// The timeout has to cover the round trip at maximum range (~23.3 ms)
const _: () = assert!(ECHO_TIMEOUT_US as f32 > SENSOR_MAX_CM * 2.0 / SPEED_OF_SOUND_CM_PER_US);

// =============================================================================
// Timing
// =============================================================================

/// Time between the end of one display update and the next sensor read (4 Hz).
pub const UPDATE_INTERVAL_MS: u64 = 250;

/// How long the boot message stays up before the meter frame is drawn.
pub const BOOT_SCREEN_MS: u64 = 1000;

const _: () = assert!(UPDATE_INTERVAL_MS > 0);
