//! HC-SR04 distance meter - testable core for the simulator and the Pico 2 firmware.
//!
//! The meter polls an ultrasonic sensor, shows the distance in millimeters and
//! draws a red-to-green bar gauge covering 0-100 cm:
//!
//! - [`config`]: Layout, sensor and timing constants (validated at compile time)
//! - [`colors`]: RGB565 palette and the red-to-green [`color_for`] ramp
//! - [`styles`]: Pre-computed text styles
//! - [`sensor`]: Trigger/echo cycle, echo timing and range clamping
//! - [`meter`]: Static gauge chrome, off-screen fill buffer and incremental redraw
//! - [`scheduler`]: Non-blocking read/display/wait state machine
//! - [`event_log`]: Ring buffer of recent events for on-screen logs
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), while the firmware links the
//! crate as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod event_log;
pub mod meter;
pub mod scheduler;
pub mod sensor;
pub mod styles;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use colors::color_for;
pub use event_log::EventLog;
pub use meter::MeterRenderer;
pub use scheduler::{Phase, Step, UpdateScheduler};
pub use sensor::{Distance, DistanceSource, Echo, EchoPin, MicrosClock, PolledEcho, RangeSensor};
