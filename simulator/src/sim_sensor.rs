//! Simulated HC-SR04 wiring for the desktop build.
//!
//! The real [`RangeSensor`](distance_meter::RangeSensor) driver runs unchanged:
//! [`SimTrigger`] stands in for the trigger pin, [`SimDelay`] for the
//! microsecond delay, and [`SimEcho`] answers each trigger with the echo an
//! ideal sensor would produce for the current target distance.
//!
//! The target either follows [`sweep_target_cm`] or is moved by hand, and the
//! echo can be forced to drop out to exercise the timeout path.

use std::convert::Infallible;
use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use distance_meter::{Echo, EchoPin};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin, PinState};

/// Farthest simulated target. Past the sensor's 400 cm so the upper clamp shows.
pub const MAX_TARGET_CM: f32 = 450.0;

/// Period of the automatic target sweep, in milliseconds.
pub const SWEEP_PERIOD_MS: u64 = 12_000;

/// Step for the Up/Down keys.
pub const MANUAL_STEP_CM: f32 = 5.0;

// =============================================================================
// Trigger and Delay
// =============================================================================

/// Trigger pin that counts rising edges.
#[derive(Default)]
pub struct SimTrigger {
    high: bool,
    pulses: u32,
}

impl SimTrigger {
    /// Number of trigger pulses started so far.
    pub const fn pulses(&self) -> u32 { self.pulses }
}

impl ErrorType for SimTrigger {
    type Error = Infallible;
}

impl OutputPin for SimTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.pulses = self.pulses.wrapping_add(1);
        }
        self.high = true;
        Ok(())
    }
}

/// Delay backed by `thread::sleep`.
pub struct SimDelay;

impl DelayNs for SimDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

// =============================================================================
// Echo
// =============================================================================

/// Echo line reflecting off a target at an adjustable distance.
pub struct SimEcho {
    target_cm: f32,
    dropout: bool,
}

impl SimEcho {
    pub fn new(target_cm: f32) -> Self {
        let mut echo = Self {
            target_cm: 0.0,
            dropout: false,
        };
        echo.set_target(target_cm);
        echo
    }

    /// Current target distance in centimeters.
    pub const fn target_cm(&self) -> f32 { self.target_cm }

    /// Move the target, limited to `0..=MAX_TARGET_CM`.
    pub fn set_target(
        &mut self,
        cm: f32,
    ) {
        self.target_cm = cm.clamp(0.0, MAX_TARGET_CM);
    }

    /// Move the target by `delta_cm`.
    pub fn nudge(
        &mut self,
        delta_cm: f32,
    ) {
        self.set_target(self.target_cm + delta_cm);
    }

    /// Whether echoes are currently suppressed.
    pub const fn dropout(&self) -> bool { self.dropout }

    /// Toggle echo dropout. Returns the new state.
    pub fn toggle_dropout(&mut self) -> bool {
        self.dropout = !self.dropout;
        self.dropout
    }
}

impl EchoPin for SimEcho {
    fn pulse_width(
        &mut self,
        level: PinState,
        timeout_us: u32,
    ) -> Echo {
        if self.dropout || level == PinState::Low {
            return Echo::Timeout;
        }
        match Echo::round_trip(self.target_cm) {
            Echo::Pulse { width_us } if width_us < timeout_us => Echo::Pulse { width_us },
            _ => Echo::Timeout,
        }
    }
}

// =============================================================================
// Sweep
// =============================================================================

/// Target distance of the automatic sweep at `elapsed_ms`.
///
/// Eases from 0 out to [`MAX_TARGET_CM`] and back once per [`SWEEP_PERIOD_MS`].
pub fn sweep_target_cm(elapsed_ms: u64) -> f32 {
    let phase = (elapsed_ms % SWEEP_PERIOD_MS) as f32 / SWEEP_PERIOD_MS as f32;
    MAX_TARGET_CM / 2.0 * (1.0 - (TAU * phase).cos())
}

#[cfg(test)]
mod tests {
    use distance_meter::{Distance, DistanceSource, RangeSensor};

    use super::*;

    fn sensor(target_cm: f32) -> RangeSensor<SimTrigger, SimEcho, SimDelay> {
        RangeSensor::new(SimTrigger::default(), SimEcho::new(target_cm), SimDelay)
    }

    #[test]
    fn test_measures_target() {
        let mut sensor = sensor(75.0);
        assert!((sensor.measure().cm() - 75.0).abs() < 0.05);
    }

    #[test]
    fn test_one_trigger_pulse_per_measurement() {
        let mut sensor = sensor(75.0);
        sensor.measure();
        sensor.measure();
        let (trigger, _, _) = sensor.release();
        assert_eq!(trigger.pulses(), 2);
    }

    #[test]
    fn test_dropout_reads_max_range() {
        let mut sensor = sensor(30.0);
        assert!(sensor.echo_mut().toggle_dropout());
        assert_eq!(sensor.measure(), Distance::MAX);
        assert!(!sensor.echo_mut().toggle_dropout());
        assert!((sensor.measure().cm() - 30.0).abs() < 0.05);
    }

    #[test]
    fn test_far_target_clamps() {
        let mut sensor = sensor(MAX_TARGET_CM);
        assert_eq!(sensor.measure(), Distance::MAX);
    }

    #[test]
    fn test_near_target_reads_zero() {
        let mut sensor = sensor(1.0);
        assert_eq!(sensor.measure(), Distance::ZERO);
    }

    #[test]
    fn test_target_is_bounded() {
        let mut echo = SimEcho::new(10.0);
        echo.nudge(-MANUAL_STEP_CM * 4.0);
        assert_eq!(echo.target_cm(), 0.0);
        echo.set_target(1_000.0);
        assert_eq!(echo.target_cm(), MAX_TARGET_CM);
    }

    #[test]
    fn test_sweep_covers_range() {
        assert_eq!(sweep_target_cm(0), 0.0);
        assert!((sweep_target_cm(SWEEP_PERIOD_MS / 2) - MAX_TARGET_CM).abs() < 0.01);
        assert_eq!(sweep_target_cm(SWEEP_PERIOD_MS), 0.0);
        assert!((0..SWEEP_PERIOD_MS).step_by(97).all(|t| (0.0..=MAX_TARGET_CM + 0.01).contains(&sweep_target_cm(t))));
    }
}
